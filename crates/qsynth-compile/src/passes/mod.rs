//! Built-in compilation passes.
//!
//! Passes are organized into two categories:
//! - [`agnostic`]: Target-agnostic passes that operate purely on DAG structure
//! - [`target`]: Target-specific passes that require hardware properties

pub mod agnostic;
pub mod target;

pub use agnostic::{BasicOptimizer, MeasurementBarrierVerification, PhaseTeleport, VerificationResult};
pub use target::{ConnectivityCheck, Translator, TrivialLayout};
