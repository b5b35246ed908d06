//! Error types shared by the core arithmetic and graph primitives.

use thiserror::Error;

/// Errors produced by [`crate::boolean_matrix`] and [`crate::digraph`] operations.
#[derive(Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum CoreError {
    #[error("row index {0} out of range (matrix has {1} rows)")]
    RowOutOfRange(usize, usize),

    #[error("matrix has no rows")]
    EmptyMatrix,

    #[error("row lengths differ: row {0} has length {1}, expected {2}")]
    RowLengthMismatch(usize, usize, usize),

    #[error("vertex {0} not found in graph")]
    VertexNotFound(usize),

    #[error("vertex {0} already exists")]
    DuplicateVertex(usize),

    #[error("graph has no vertices; arborescence is undefined")]
    EmptyGraph,
}

pub type CoreResult<T> = Result<T, CoreError>;
