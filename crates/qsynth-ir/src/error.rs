//! Error types for the IR crate.
//!
//! Every fallible [`crate::gate::Operation`] query returns one of
//! [`GateError::InvalidInput`], [`GateError::Unsupported`], or
//! [`GateError::NotDecomposable`]. Two other failure kinds exist outside
//! this enum: a cooperatively cancelled long-running synthesis loop signals
//! it through an `Option`/early-return at the call site rather than a typed
//! error, and an internal invariant violation (a bug in this crate, not a
//! user error) panics instead of unwinding through a `Result`.

use crate::qubit::{ClbitId, QubitId};
use thiserror::Error;

/// Errors that can occur in IR operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IrError {
    #[error("Qubit {qubit:?} not found in circuit{}", format_gate_context(.gate_name))]
    QubitNotFound {
        qubit: QubitId,
        gate_name: Option<String>,
    },

    #[error("Classical bit {clbit:?} not found in circuit{}", format_gate_context(.gate_name))]
    ClbitNotFound {
        clbit: ClbitId,
        gate_name: Option<String>,
    },

    #[error("Invalid DAG structure: {0}")]
    InvalidDag(String),

    #[error("Invalid node index")]
    InvalidNode,

    #[error("Gate '{gate_name}' requires {expected} qubits, got {got}")]
    QubitCountMismatch {
        gate_name: String,
        expected: u32,
        got: u32,
    },

    #[error("Duplicate qubit {qubit:?} in operation{}", format_gate_context(.gate_name))]
    DuplicateQubit {
        qubit: QubitId,
        gate_name: Option<String>,
    },
}

#[allow(clippy::ref_option)]
fn format_gate_context(gate_name: &Option<String>) -> String {
    match gate_name {
        Some(name) => format!(" (gate: {name})"),
        None => String::new(),
    }
}

pub type IrResult<T> = Result<T, IrError>;

/// Errors raised by the [`crate::gate::Operation`] catalog.
#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum GateError {
    /// Gate arity mismatch, unknown gate type, out-of-range qubit id, or an
    /// invalid phase string.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A strategy received an operation it does not support (e.g. a
    /// non-diagonal rotation fed to a strategy that requires diagonal
    /// rotations).
    #[error("unsupported operation: {0}")]
    Unsupported(String),

    /// `to_basic_gates` was called on Measurement, IfElse, or a Control with
    /// too many controls.
    #[error("gate '{0}' has no basic-gate decomposition")]
    NotDecomposable(String),
}

pub type GateResult<T> = Result<T, GateError>;
