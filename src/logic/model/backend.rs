//! Scoring Backend - capability interface
//!
//! Any predictive runtime (ONNX, remote stub, fixed heuristic) plugs in here.
//! The adapter owns the backend and serializes every call through one lock,
//! so implementations need not be reentrant.

use thiserror::Error;

use crate::logic::features::FeatureVector;

/// Errors raised by scoring backends and the adapter
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("backend unavailable: {0}")]
    BackendUnavailable(String),
    #[error("model not found: {0}")]
    ModelNotFound(String),
    #[error("model checksum mismatch: expected {expected}, got {actual}")]
    ChecksumMismatch { expected: String, actual: String },
    #[error("shape mismatch: {0}")]
    ShapeMismatch(String),
    #[error("inference failed: {0}")]
    Inference(String),
    #[error("inference timed out after {0} ms")]
    Timeout(u64),
    #[error("model not ready")]
    NotReady,
}

/// Predictive scoring capability
pub trait ScoringBackend: Send {
    /// Short name for logs and status
    fn name(&self) -> &str;

    /// Acquire the runtime and load a model with input dim 20, scalar output
    fn load(&mut self) -> Result<(), ModelError>;

    /// Malicious probability for one feature vector
    fn infer(&mut self, features: &FeatureVector) -> Result<f32, ModelError>;
}
