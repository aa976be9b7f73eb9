//! Feature Layout - Centralized Feature Definition
//!
//! **This file controls the feature schema.** Backends key on slot position,
//! so any add/remove/reorder must bump `FEATURE_VERSION`.

use crc32fast::Hasher;
use serde::{Deserialize, Serialize};

/// Current feature layout version
pub const FEATURE_VERSION: u8 = 1;

/// Feature names in exact order they appear in the vector
pub const FEATURE_LAYOUT: &[&str] = &[
    // === Size (0-2) ===
    "name_length",          // 0: name chars / 50 (unclamped)
    "value_length",         // 1: value chars / 1000
    "domain_depth",         // 2: dots in domain / 5

    // === Scope & flags (3-5) ===
    "third_party",          // 3: page hostname does not end with domain
    "secure",               // 4: Secure flag
    "http_only",            // 5: HttpOnly flag

    // === Lifetime & patterns (6-9) ===
    "expiry_ratio",         // 6: time to expiry / 1 year, clamped, 0 for session
    "tracking_name",        // 7: name matches a tracking pattern
    "value_entropy",        // 8: Shannon entropy of value / 8
    "base64_value",         // 9: value looks like base64

    // === Name shape (10-11) ===
    "name_has_digit",       // 10
    "name_has_special",     // 11: char outside [A-Za-z0-9_-]

    // === Scope details (12-16) ===
    "path_depth",           // 12: (segments - 1) / 10
    "same_site",            // 13: none=1, lax=0.5, strict/unset=0
    "broad_domain",         // 14: domain starts with '.'
    "long_expiry",          // 15: expires more than a year from now
    "ad_network",           // 16: domain contains an ad-network substring

    // === Content (17-19) ===
    "value_has_url",        // 17: value embeds http:// or https://
    "identity_name",        // 18: name contains a user-identity substring
    "overall_suspicion",    // 19: composite heuristic, clamped 0-1
];

/// Total number of features
/// IMPORTANT: Must match FEATURE_LAYOUT.len()!
pub const FEATURE_COUNT: usize = 20;

// ============================================================================
// LAYOUT HASH
// ============================================================================

/// CRC32 of version + ordered feature names
pub fn layout_hash() -> u32 {
    let mut hasher = Hasher::new();
    hasher.update(&[FEATURE_VERSION]);

    for name in FEATURE_LAYOUT {
        hasher.update(name.as_bytes());
        hasher.update(&[0]);
    }

    hasher.finalize()
}

/// Complete layout information for serialization/logging
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutInfo {
    pub version: u8,
    pub hash: u32,
    pub feature_count: usize,
    pub feature_names: Vec<String>,
}

impl LayoutInfo {
    pub fn current() -> Self {
        Self {
            version: FEATURE_VERSION,
            hash: layout_hash(),
            feature_count: FEATURE_COUNT,
            feature_names: FEATURE_LAYOUT.iter().map(|s| s.to_string()).collect(),
        }
    }
}

// ============================================================================
// LAYOUT VALIDATION
// ============================================================================

/// Error when feature layout doesn't match expected
#[derive(Debug, Clone)]
pub struct LayoutMismatchError {
    pub expected_version: u8,
    pub expected_hash: u32,
    pub actual_version: u8,
    pub actual_hash: u32,
}

impl std::fmt::Display for LayoutMismatchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Feature layout mismatch: expected v{} (hash: {:08x}), got v{} (hash: {:08x})",
            self.expected_version, self.expected_hash, self.actual_version, self.actual_hash
        )
    }
}

impl std::error::Error for LayoutMismatchError {}

/// Validate that a version/hash pair matches the current layout
pub fn validate_layout(version: u8, hash: u32) -> Result<(), LayoutMismatchError> {
    let current_hash = layout_hash();

    if version != FEATURE_VERSION || hash != current_hash {
        return Err(LayoutMismatchError {
            expected_version: FEATURE_VERSION,
            expected_hash: current_hash,
            actual_version: version,
            actual_hash: hash,
        });
    }

    Ok(())
}

/// Get feature index by name
pub fn feature_index(name: &str) -> Option<usize> {
    FEATURE_LAYOUT.iter().position(|&n| n == name)
}
