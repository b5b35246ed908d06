//! ZX-diagrams: gate-wise construction from a [`qsynth_ir::QCir`], and
//! extraction of a gate list back out of a graph-like diagram.
//!
//! [`graph`] is the diagram itself (Z-/X-spiders, boundary vertices, plain
//! and Hadamard edges); [`conversion`] builds one gate by gate from a
//! circuit; [`extract`] recovers a circuit from a graph-like diagram via
//! frontier advancement and biadjacency Gaussian elimination.

pub mod conversion;
pub mod error;
pub mod extract;
pub mod graph;

pub use conversion::{qc_to_zx, CcxMode};
pub use error::{ZxError, ZxResult};
pub use extract::{extract, ExtractionConfig};
pub use graph::{EdgeKind, VertexKind, ZxGraph};
