//! Stabilizer-tableau and Pauli-rotation representations of a circuit, and
//! their resynthesis back into [`qsynth_ir::QCir`].
//!
//! This crate is the tableau leg of the synthesis pipeline: [`tableau`]
//! holds the symplectic [`tableau::StabilizerTableau`] and its
//! Aaronson-Gottesman extraction into Clifford generators;
//! [`pauli_rotation`] is a single non-Clifford rotation and its Clifford
//! conjugation; [`rotation_tableau`] translates a `QCir` into an
//! interleaved sequence of Clifford and rotation blocks; [`resynthesis`]
//! turns that sequence back into a `QCir` under a chosen strategy.
//!
//! ```
//! use qsynth_ir::{QCir, QubitId};
//! use qsynth_tableau::{qc_to_tableau, synthesize, Strategy};
//!
//! let mut circuit = QCir::with_size("bell", 2, 0);
//! circuit.h(QubitId(0)).unwrap();
//! circuit.cx(QubitId(0), QubitId(1)).unwrap();
//!
//! let tableau = qc_to_tableau(&circuit).unwrap();
//! let resynthesized = synthesize(&tableau, Strategy::Naive).unwrap();
//! assert_eq!(resynthesized.num_qubits(), 2);
//! ```

pub mod error;
pub mod pauli_rotation;
pub mod resynthesis;
pub mod rotation_tableau;
pub mod tableau;

pub use error::{TableauError, TableauResult};
pub use pauli_rotation::PauliRotation;
pub use resynthesis::{synthesize, Strategy};
pub use rotation_tableau::{qc_to_tableau, PauliRotationTableau, TableauBlock};
pub use tableau::{CliffordGate, StabilizerTableau};
