//! Exact rational arithmetic, GF(2) linear algebra, and directed-graph
//! primitives shared by every synthesis and optimization pass in the
//! workspace.
//!
//! # Overview
//!
//! - [`Phase`] / [`Rational`]: canonical rational multiples of π used as
//!   gate angles, with mod-2π arithmetic.
//! - [`BooleanMatrix`]: a GF(2) matrix with a replayable row-operation log,
//!   used both by the biadjacency elimination in ZX extraction and by the
//!   phase-polynomial resynthesis strategies.
//! - [`Digraph`] and [`minimum_spanning_arborescence`]: a generic directed
//!   graph and the Chu–Liu/Edmonds minimum spanning arborescence algorithm,
//!   used by the MST-based rotation resynthesis strategies.
//!
//! ```
//! use qsynth_core::Phase;
//!
//! let a = Phase::new(1, 4);
//! let b = Phase::new(3, 4);
//! assert_eq!(a + b, Phase::new(-1, 1) + Phase::new(1, 1)); // wraps to pi
//! ```

pub mod boolean_matrix;
pub mod digraph;
pub mod error;
pub mod phase;
pub mod rational;

pub use boolean_matrix::{BooleanMatrix, RowOperation};
pub use digraph::{minimum_spanning_arborescence, minimum_spanning_arborescence_any_root, Digraph, Vertex};
pub use error::{CoreError, CoreResult};
pub use phase::Phase;
pub use rational::Rational;
