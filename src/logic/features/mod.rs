//! Features Module - Feature Extraction Engine
//!
//! Maps a normalized cookie to the fixed 20-slot vector consumed by
//! predictive backends. Slot order is defined once in `layout.rs`.

pub mod layout;
pub mod vector;
pub mod heuristics;
pub mod extractor;

#[cfg(test)]
mod tests;

// Re-export common types
pub use layout::{LayoutInfo, FEATURE_COUNT, FEATURE_LAYOUT, FEATURE_VERSION};
pub use vector::FeatureVector;
pub use extractor::extract;
