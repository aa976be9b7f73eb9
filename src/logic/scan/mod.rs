//! Scan Module - Batch orchestration
//!
//! Used by both the immediate scan path and the "block malicious" bulk action.

pub mod batch;


pub use batch::{BatchResult, CookieScanner, ScanEntry};
