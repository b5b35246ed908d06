//! Error types for tableau construction and rotation resynthesis.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum TableauError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("unsupported operation: {0}")]
    Unsupported(String),

    #[error("qubit count mismatch: tableau has {expected} qubits, got {got}")]
    QubitCountMismatch { expected: usize, got: usize },
}

pub type TableauResult<T> = Result<T, TableauError>;
