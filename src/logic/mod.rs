//! Logic Module - Classification Engine
//!
//! - `cookie/` - Cookie record normalization and store collaborator
//! - `features/` - Feature extraction (20-slot vector)
//! - `threat/` - Rule-based scoring
//! - `model/` - Predictive backends and fallback adapter
//! - `scan/` - Batch orchestration

pub mod config;
pub mod cookie;
pub mod features;
pub mod model;
pub mod scan;
pub mod threat;
