//! Classification Rules & Thresholds
//!
//! Constants and defaults only. Scoring logic lives in `classifier.rs`.

use serde::{Deserialize, Serialize};

// ============================================================================
// THRESHOLDS
// ============================================================================

/// Above this score = Suspicious
pub const SUSPICIOUS_THRESHOLD: f32 = 0.4;

/// Above this score = Malicious
pub const MALICIOUS_THRESHOLD: f32 = 0.7;

/// Absorbs f32 rounding in rule weight sums (0.3 + 0.4 must not exceed 0.7).
/// Applied to the rule-based raw score only; model probabilities compare as-is.
pub const SCORE_EPSILON: f32 = 1e-6;

// ============================================================================
// RULE WEIGHTS (rule-based scorer, evaluated in this order)
// ============================================================================

pub const TRACKING_NAME_WEIGHT: f32 = 0.8;
pub const LONG_VALUE_WEIGHT: f32 = 0.3;
pub const THIRD_PARTY_WEIGHT: f32 = 0.4;
pub const INSECURE_WEIGHT: f32 = 0.2;

/// Values longer than this count as "unusually long"
pub const LONG_VALUE_CHARS: usize = 100;

pub const REASON_TRACKING_NAME: &str = "Known tracking cookie";
pub const REASON_LONG_VALUE: &str = "Unusually long value";
pub const REASON_THIRD_PARTY: &str = "Third-party cookie";
pub const REASON_INSECURE: &str = "Insecure third-party cookie";

// ============================================================================
// QUICK SCORER
// ============================================================================

pub const QUICK_MALICIOUS_SCORE: f32 = 0.9;
pub const QUICK_SUSPICIOUS_SCORE: f32 = 0.6;
pub const QUICK_SAFE_SCORE: f32 = 0.1;

pub const REASON_KNOWN_TRACKER: &str = "Known tracker";
pub const REASON_SUSPICIOUS_PATTERN: &str = "Suspicious pattern";
pub const REASON_NOT_SECURE: &str = "Not secure";

// ============================================================================
// DEFAULT LISTS
// ============================================================================

pub const DEFAULT_TRACKER_DOMAINS: &[&str] = &[
    "doubleclick.net",
    "googleadservices.com",
    "facebook.com",
    "scorecardresearch.com",
];

pub const DEFAULT_TRACKING_NAME_PATTERNS: &[&str] = &["_ga", "_gid", "_fbp", "_fbc", "fr", "__utm"];

pub const DEFAULT_QUICK_SUSPICIOUS_PATTERNS: &[&str] = &["_ga", "_gid", "_fbp", "__gads"];

pub const DEFAULT_AD_NETWORK_DOMAINS: &[&str] = &[
    "doubleclick",
    "googlesyndication",
    "facebook",
    "amazon-adsystem",
];

pub const DEFAULT_IDENTITY_NAME_SUBSTRINGS: &[&str] = &["user", "visitor", "session", "uid", "id"];

// ============================================================================
// CONFIGURABLE THRESHOLDS
// ============================================================================

/// Cutoffs applied to both scorers (strictly greater than)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassificationThresholds {
    pub suspicious: f32,
    pub malicious: f32,
}

impl Default for ClassificationThresholds {
    fn default() -> Self {
        Self {
            suspicious: SUSPICIOUS_THRESHOLD,
            malicious: MALICIOUS_THRESHOLD,
        }
    }
}

impl ClassificationThresholds {
    pub fn is_suspicious(&self, score: f32) -> bool {
        score > self.suspicious
    }

    pub fn is_malicious(&self, score: f32) -> bool {
        score > self.malicious
    }

    /// Both cutoffs in [0, 1] and suspicious strictly below malicious
    pub fn is_ordered(&self) -> bool {
        (0.0..=1.0).contains(&self.suspicious)
            && (0.0..=1.0).contains(&self.malicious)
            && self.suspicious < self.malicious
    }

    /// High sensitivity - lower thresholds, more alerts
    pub fn high_sensitivity() -> Self {
        Self {
            suspicious: 0.3,
            malicious: 0.6,
        }
    }

    /// Low sensitivity - higher thresholds, fewer alerts
    pub fn low_sensitivity() -> Self {
        Self {
            suspicious: 0.5,
            malicious: 0.85,
        }
    }

    /// Preset by name: `high`, `normal` or `low` (case-insensitive)
    pub fn from_sensitivity(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "high" => Some(Self::high_sensitivity()),
            "normal" | "default" => Some(Self::default()),
            "low" => Some(Self::low_sensitivity()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thresholds_are_strict() {
        let t = ClassificationThresholds::default();
        assert!(!t.is_suspicious(0.4));
        assert!(t.is_suspicious(0.41));
        assert!(!t.is_malicious(0.7));
        assert!(t.is_malicious(0.71));
    }

    #[test]
    fn test_thresholds_have_no_slack_above_cutoff() {
        let t = ClassificationThresholds::default();
        assert!(t.is_malicious(0.700_000_5));
        assert!(t.is_suspicious(0.400_000_5));
    }

    #[test]
    fn test_sensitivity_presets_ordered() {
        for t in [
            ClassificationThresholds::high_sensitivity(),
            ClassificationThresholds::default(),
            ClassificationThresholds::low_sensitivity(),
        ] {
            assert!(t.is_ordered());
        }
        assert!(!ClassificationThresholds { suspicious: 0.8, malicious: 0.5 }.is_ordered());
        assert!(!ClassificationThresholds { suspicious: 0.4, malicious: 1.5 }.is_ordered());
    }

    #[test]
    fn test_sensitivity_by_name() {
        assert_eq!(
            ClassificationThresholds::from_sensitivity("HIGH"),
            Some(ClassificationThresholds::high_sensitivity())
        );
        assert_eq!(
            ClassificationThresholds::from_sensitivity(" low "),
            Some(ClassificationThresholds::low_sensitivity())
        );
        assert_eq!(
            ClassificationThresholds::from_sensitivity("normal"),
            Some(ClassificationThresholds::default())
        );
        assert_eq!(ClassificationThresholds::from_sensitivity("paranoid"), None);
    }
}
