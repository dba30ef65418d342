//! Deterministic test harness for Ticketring rotation.
//!
//! A seeded implementation of the Environment trait for reproducible key
//! generation, plus a reference model of three-slot rotation.
//!
//! # Model-Based Testing
//!
//! The `model` module provides a reference implementation for model-based
//! testing. Operations are applied to both the model and real implementation,
//! and their observable states are compared.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod model;
pub mod seeded_env;

pub use model::{
    ModelKeyId, ModelLookup, ModelRing, ObservableState, Operation, OperationError,
    OperationResult, RealRing,
};
pub use seeded_env::SeededEnv;
