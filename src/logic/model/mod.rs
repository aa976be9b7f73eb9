//! Model Module - Predictive scoring
//!
//! Backends behind a capability trait, plus the adapter that falls back
//! to the rule-based scorer whenever a backend is missing or misbehaves.

pub mod backend;
pub mod heuristic;
pub mod onnx;
pub mod adapter;


pub use backend::{ModelError, ScoringBackend};
pub use heuristic::HeuristicBackend;
pub use onnx::OnnxBackend;
pub use adapter::{AdapterState, EngineStatus, PredictiveAdapter};
