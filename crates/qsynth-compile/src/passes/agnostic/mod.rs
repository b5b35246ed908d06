//! Target-agnostic compilation passes.
//!
//! These passes operate purely on the DAG structure without consulting
//! target-specific properties (coupling map, basis gates). They are safe
//! to run on any circuit regardless of the target hardware.

pub mod basic_optimizer;
pub mod phase_teleport;
pub mod verification;

pub use basic_optimizer::BasicOptimizer;
pub use phase_teleport::PhaseTeleport;
pub use verification::{MeasurementBarrierVerification, VerificationResult};
