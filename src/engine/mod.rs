//! Engine Module - bundle loading and inference
//!
//! The scaler and classifier are fitted elsewhere and arrive in one JSON
//! bundle. This module validates that bundle, keeps it for the process
//! lifetime and runs form values through it.

pub mod bundle;
pub mod classifier;
pub mod encoder;
pub mod inference;
pub mod loader;
pub mod scaler;

// Re-export common types
pub use bundle::{BundleError, BundleMetadata};
pub use inference::{EngineStatus, InferenceError, InferenceStats, Prediction};
pub use loader::BundleCache;
