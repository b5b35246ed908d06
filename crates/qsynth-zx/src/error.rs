//! Error type for ZX-diagram construction and extraction.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ZxError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("unsupported: {0}")]
    Unsupported(String),

    #[error("extraction diagram is not graph-like: {0}")]
    NotGraphLike(String),

    #[error("extraction did not terminate: {0}")]
    ExtractionStalled(String),

    #[error("interrupted")]
    Interrupted,
}

pub type ZxResult<T> = Result<T, ZxError>;
