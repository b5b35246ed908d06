//! Circuit intermediate representation.
//!
//! This crate provides the core data structures for representing quantum
//! circuits as gate lists: the DAG-backed [`QCir`] builder, the closed
//! [`gate::Operation`] catalog, and qubit/classical-bit addressing. It
//! forms the gate-list leg of the synthesis pipeline alongside the
//! ZX-diagram and stabilizer-tableau representations in sibling crates.
//!
//! # Core Components
//!
//! - **Qubits and Classical Bits**: [`QubitId`], [`ClbitId`] for addressing
//!   quantum and classical registers
//! - **Operations**: [`gate::Operation`], the closed catalog of gate kinds
//! - **Instructions**: [`Instruction`] combining an operation with its
//!   operands
//! - **DAG**: [`CircuitDag`] for the internal graph representation
//! - **Circuit**: [`QCir`] high-level builder API
//!
//! # Example: Building a Bell State
//!
//! ```rust
//! use qsynth_ir::{QCir, QubitId};
//!
//! let mut circuit = QCir::with_size("bell_state", 2, 2);
//!
//! circuit.h(QubitId(0)).unwrap();
//! circuit.cx(QubitId(0), QubitId(1)).unwrap();
//! circuit.measure_all().unwrap();
//!
//! assert_eq!(circuit.num_qubits(), 2);
//! assert!(circuit.depth() >= 2);
//! ```
//!
//! # Supported Operations
//!
//! | Operation | Qubits | Description |
//! |-----------|--------|-------------|
//! | `H` | 1 | Hadamard gate |
//! | `Pz`, `Px`, `Py` | 1 | Axis phase rotations (`X`/`Y`/`Z` are `π`-phase cases) |
//! | `Rz`, `Rx`, `Ry` | 1 | Axis rotations, differing from `Pz`/`Px`/`Py` by a global phase |
//! | `U` | 1 | Universal single-qubit gate `U(θ, φ, λ)` |
//! | `ECR` | 2 | Echoed cross-resonance gate |
//! | `Swap` | 2 | SWAP gate |
//! | `Control` | `n` + inner | `n`-controlled version of an inner operation |
//! | `Measurement` | 1 | Projective measurement onto a classical bit |
//! | `IfElse` | inner | Classically conditioned operation |

pub mod circuit;
pub mod dag;
pub mod error;
pub mod gate;
pub mod instruction;
pub mod qubit;

pub use circuit::QCir;
pub use dag::{CircuitDag, CircuitLevel, DagEdge, DagNode, NodeIndex, WireId};
pub use error::{GateError, GateResult, IrError, IrResult};
pub use gate::{ClassicalCondition, Operation};
pub use instruction::Instruction;
pub use qubit::{Clbit, ClbitId, Qubit, QubitId};
