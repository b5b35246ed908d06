//! Compilation and transpilation framework.
//!
//! This crate provides the compilation infrastructure for transforming
//! quantum circuits into an equivalent form suited to a target's native
//! gate set. It implements a pass-based architecture similar to LLVM,
//! enabling modular and extensible compilation.
//!
//! # Overview
//!
//! The compilation process transforms an input circuit through a series of
//! passes that:
//! 1. **Optimization**: Cancel and fuse gates via Pauli-frame propagation
//! 2. **Phase teleportation**: Merge same-Pauli-product rotations across Cliffords
//! 3. **Translation**: Rewrite gates into a named target's native equivalence library
//! 4. **Connectivity check**: Flag (never fix) gates that violate an abstract device model
//!
//! There is no hardware routing here: no pass ever inserts a SWAP to
//! satisfy connectivity, and there is no noise model. [`passes::ConnectivityCheck`]
//! is the full extent of device awareness this crate has.
//!
//! # Architecture
//!
//! ```text
//! Input Circuit
//!       │
//!       ▼
//! ┌─────────────┐
//! │ PassManager │ ◄── PropertySet (coupling map, basis gates, layout)
//! └─────────────┘
//!       │
//!       ├── BasicOptimizer
//!       ├── PhaseTeleport
//!       ├── Translator
//!       ├── TrivialLayout
//!       └── ConnectivityCheck
//!       │
//!       ▼
//! Output Circuit
//! ```
//!
//! # Example: Basic Compilation
//!
//! ```rust
//! use qsynth_compile::{PassManagerBuilder, CouplingMap, BasisGates};
//! use qsynth_ir::QCir;
//!
//! // Create a circuit
//! let circuit = QCir::bell().unwrap();
//!
//! // Build pass manager for a 5-qubit star-connected target
//! let (pm, mut props) = PassManagerBuilder::new()
//!     .with_optimization_level(2)
//!     .with_target(CouplingMap::star(5), BasisGates::iqm())
//!     .build();
//!
//! // Compile the circuit
//! let mut dag = circuit.into_dag();
//! pm.run(&mut dag, &mut props).unwrap();
//!
//! println!("Compiled depth: {}", dag.depth());
//! ```
//!
//! # Optimization Levels
//!
//! | Level | Passes Included |
//! |-------|-----------------|
//! | 0 | No optimization; translation/connectivity check only if configured |
//! | 1 | + [`passes::BasicOptimizer`] |
//! | 2 | + [`passes::PhaseTeleport`] |
//!
//! Translation and the connectivity check run whenever their respective
//! properties (`translation_target`, `coupling_map`) are set, independent
//! of optimization level.
//!
//! # Built-in Passes
//!
//! ## Optimization Passes
//! - [`passes::BasicOptimizer`]: Forward/backward Pauli-frame cancellation and fusion
//! - [`passes::PhaseTeleport`]: Merge same-Pauli-product rotations across Cliffords
//!
//! ## Target Passes
//! - [`passes::TrivialLayout`]: Simple 1:1 mapping of virtual to physical qubits
//! - [`passes::Translator`]: Rewrite gates into a named target's equivalence library
//! - [`passes::ConnectivityCheck`]: Flag two-qubit gates that violate device connectivity
//!
//! # Custom Passes
//!
//! Implement the [`Pass`] trait to create custom compilation passes:
//!
//! ```rust
//! use qsynth_compile::{Pass, PassKind, CompileResult, PropertySet};
//! use qsynth_ir::CircuitDag;
//!
//! struct MyCustomPass;
//!
//! impl Pass for MyCustomPass {
//!     fn name(&self) -> &str { "my_custom_pass" }
//!     fn kind(&self) -> PassKind { PassKind::Transformation }
//!
//!     fn run(&self, dag: &mut CircuitDag, props: &mut PropertySet) -> CompileResult<()> {
//!         // Your pass logic here
//!         Ok(())
//!     }
//! }
//! ```

pub mod error;
pub mod manager;
pub mod pass;
pub mod property;

// Built-in passes
pub mod passes;

pub use error::{CompileError, CompileResult};
pub use manager::{PassManager, PassManagerBuilder};
pub use pass::{AnalysisPass, Pass, PassKind, TransformationPass};
pub use property::{BasisGates, CouplingMap, Layout, PropertySet};
