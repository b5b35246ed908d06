//! Error type for compilation passes.

use thiserror::Error;

/// Errors raised while building or running a pass pipeline.
#[derive(Debug, Error)]
pub enum CompileError {
    /// Propagated from the underlying circuit representation.
    #[error(transparent)]
    Ir(#[from] qsynth_ir::IrError),

    /// A pass needs `PropertySet::basis_gates` but none was set.
    #[error("no basis gates configured for translation")]
    MissingBasisGates,

    /// A pass needs `PropertySet::coupling_map` but none was set.
    #[error("no coupling map configured")]
    MissingCouplingMap,

    /// The circuit has more logical qubits than the device model has
    /// physical qubits.
    #[error("circuit requires {required} qubits, device model has {available}")]
    CircuitTooLarge { required: usize, available: u32 },

    /// A checker pass needs `PropertySet::layout` but none was set.
    #[error("no layout configured")]
    MissingLayout,

    /// A gate has no entry in the target equivalence library and no native
    /// equivalent.
    #[error("gate not translatable to target basis: {0}")]
    GateNotInBasis(String),

    /// A two-qubit gate acts on physical qubits the device model does not
    /// connect.
    #[error("gate '{gate_name}' on qubits {q0}, {q1} violates device connectivity")]
    ConnectivityViolation {
        gate_name: String,
        q0: u32,
        q1: u32,
    },

    /// An optimization or rewrite pass reordered an operation across a
    /// measurement boundary.
    #[error("operation '{gate_name}' on qubit {qubit} violates measurement ordering: {detail}")]
    MeasurementViolation {
        gate_name: String,
        qubit: usize,
        detail: String,
    },

    /// Phase teleport or QC→Tableau encountered a gate that is neither
    /// Clifford nor a single-qubit (P|R)(X|Y|Z) rotation.
    #[error("gate '{0}' is not allowed in phase teleport")]
    UnsupportedGate(String),

    /// Propagated from the tableau crate.
    #[error(transparent)]
    Tableau(#[from] qsynth_tableau::TableauError),

    /// `stop_requested()` returned true inside a long-running pass loop.
    #[error("interrupted")]
    Interrupted,
}

pub type CompileResult<T> = Result<T, CompileError>;
