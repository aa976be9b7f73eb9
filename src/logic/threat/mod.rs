//! Threat Module
//!
//! Rule-based cookie classification.
//!
//! ## Structure
//! - `types`: ClassificationResult, Method, RiskLevel
//! - `context`: page context passed into every call
//! - `rules`: weights, thresholds, default lists
//! - `classifier`: the full scorer and the quick scorer

pub mod types;
pub mod context;
pub mod rules;
pub mod classifier;

pub use types::{ClassificationResult, Method, RiskLevel};
pub use context::ScanContext;
pub use rules::{ClassificationThresholds, MALICIOUS_THRESHOLD, SUSPICIOUS_THRESHOLD};
pub use classifier::{classify, classify_quick, is_tracker_script};
