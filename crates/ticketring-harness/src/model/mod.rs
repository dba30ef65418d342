//! Reference model for model-based testing.
//!
//! The model is a simplified implementation that captures the intended
//! rotation behavior of three key slots without real key material. It
//! serves as the oracle against which the real implementation is verified.
//!
//! # Design Principles
//!
//! - Simplicity: The model should be obviously correct
//! - Behavior not implementation: Captures WHAT, not HOW
//! - Deterministic: Same inputs produce same outputs

pub mod operation;
mod real;
mod ring;

pub use operation::{ModelKeyId, ModelLookup, Operation, OperationError, OperationResult};
pub use real::RealRing;
pub use ring::{ModelRing, ObservableState};
