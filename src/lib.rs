//! Cookie Guard Core - Cookie Risk Classification Engine
//!
//! Classifies browser cookies by privacy/tracking risk.
//! Rule-based heuristics are always available; a predictive backend
//! supersedes them when loaded and degrades back to rules on any failure.
//!
//! ## Pipeline
//! raw cookie → `cookie::normalize` → `features::extract` → `model::PredictiveAdapter`
//!                                  ↘ `threat::classify` (fallback)
//!
//! `scan::CookieScanner` fans the pipeline out over a batch.

pub mod constants;
pub mod logic;

pub use logic::config::{RiskConfig, SafetyConfig};
pub use logic::cookie::{normalize, CookieId, CookieRecord, CookieStore, RawCookie, SameSite};
pub use logic::features::{extract, FeatureVector, LayoutInfo, FEATURE_COUNT};
pub use logic::model::{
    AdapterState, EngineStatus, HeuristicBackend, ModelError, OnnxBackend, PredictiveAdapter,
    ScoringBackend,
};
pub use logic::scan::{BatchResult, CookieScanner, ScanEntry};
pub use logic::threat::{
    classify, classify_quick, ClassificationResult, ClassificationThresholds, Method, RiskLevel,
    ScanContext,
};
