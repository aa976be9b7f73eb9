//! Engine Configuration
//!
//! `RiskConfig` carries every externally supplied list and threshold.
//! Loaded from a JSON file and/or env vars; anything missing falls back
//! to the built-in defaults, so configuration can never fail a scan.

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants;
use super::threat::rules::{
    ClassificationThresholds, DEFAULT_AD_NETWORK_DOMAINS, DEFAULT_IDENTITY_NAME_SUBSTRINGS,
    DEFAULT_QUICK_SUSPICIOUS_PATTERNS, DEFAULT_TRACKER_DOMAINS, DEFAULT_TRACKING_NAME_PATTERNS,
};

// ============================================================================
// KILL SWITCH
// ============================================================================

static PREDICTIVE_ENABLED: AtomicBool = AtomicBool::new(true);

/// Process-wide safety switches
pub struct SafetyConfig;

impl SafetyConfig {
    pub fn is_predictive_enabled() -> bool {
        PREDICTIVE_ENABLED.load(Ordering::Relaxed)
    }

    /// Off = every adapter answers with the rule-based scorer
    pub fn set_predictive(val: bool) {
        PREDICTIVE_ENABLED.store(val, Ordering::Relaxed);
    }
}

// ============================================================================
// RISK CONFIG
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Lists and thresholds consumed by the scorers and the feature extractor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskConfig {
    /// Static tracker domains (quick scorer, substring match)
    pub tracker_domains: Vec<String>,
    /// Tracking cookie-name patterns (rule-based scorer, feature 7)
    pub tracking_name_patterns: Vec<String>,
    /// Cookie-name patterns for the quick scorer
    pub quick_suspicious_patterns: Vec<String>,
    /// Ad-network domain substrings (feature 16)
    pub ad_network_domains: Vec<String>,
    /// User-identity name substrings, case-insensitive (feature 18)
    pub identity_name_substrings: Vec<String>,
    pub thresholds: ClassificationThresholds,
    /// Upper bound on a single predictive inference call
    pub inference_timeout_ms: u64,
}

fn to_owned_list(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            tracker_domains: to_owned_list(DEFAULT_TRACKER_DOMAINS),
            tracking_name_patterns: to_owned_list(DEFAULT_TRACKING_NAME_PATTERNS),
            quick_suspicious_patterns: to_owned_list(DEFAULT_QUICK_SUSPICIOUS_PATTERNS),
            ad_network_domains: to_owned_list(DEFAULT_AD_NETWORK_DOMAINS),
            identity_name_substrings: to_owned_list(DEFAULT_IDENTITY_NAME_SUBSTRINGS),
            thresholds: ClassificationThresholds::default(),
            inference_timeout_ms: constants::DEFAULT_INFERENCE_TIMEOUT_MS,
        }
    }
}

impl RiskConfig {
    /// Load from a JSON file; fields absent from the file keep their defaults
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let display = path.display().to_string();

        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: display.clone(),
            source,
        })?;

        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: display,
            source,
        })
    }

    /// Load from `COOKIE_GUARD_CONFIG` (if set) then apply env overrides
    pub fn from_env() -> Self {
        let config = match constants::get_config_path() {
            Some(path) => Self::from_file(&path).unwrap_or_else(|e| {
                log::warn!("{} - using default risk config", e);
                Self::default()
            }),
            None => Self::default(),
        };

        let mut config = config.validated();
        config.apply_env_overrides();
        config
    }

    /// Replace out-of-order thresholds with the defaults
    pub fn validated(mut self) -> Self {
        if !self.thresholds.is_ordered() {
            log::warn!(
                "Config thresholds out of order ({:?}) - using defaults",
                self.thresholds
            );
            self.thresholds = ClassificationThresholds::default();
        }
        self
    }

    /// Env var overrides for thresholds and timeout.
    ///
    /// A sensitivity preset is applied first, then the explicit cutoffs.
    /// If the result is not ordered (suspicious < malicious) the thresholds
    /// are left as they were.
    pub fn apply_env_overrides(&mut self) {
        let previous = self.thresholds;

        if let Some(name) = constants::get_sensitivity() {
            match ClassificationThresholds::from_sensitivity(&name) {
                Some(preset) => self.thresholds = preset,
                None => log::warn!("Unknown sensitivity '{}' - ignored", name),
            }
        }
        if let Some(v) = constants::get_threshold_override(constants::ENV_SUSPICIOUS_THRESHOLD) {
            self.thresholds.suspicious = v;
        }
        if let Some(v) = constants::get_threshold_override(constants::ENV_MALICIOUS_THRESHOLD) {
            self.thresholds.malicious = v;
        }
        if !self.thresholds.is_ordered() {
            log::warn!(
                "Threshold overrides out of order ({:?}) - keeping {:?}",
                self.thresholds,
                previous
            );
            self.thresholds = previous;
        }

        if let Some(ms) = constants::get_inference_timeout_override() {
            self.inference_timeout_ms = ms;
        }
    }

    pub fn inference_timeout(&self) -> Duration {
        Duration::from_millis(self.inference_timeout_ms.max(1))
    }

    /// Cookie name contains any tracking pattern
    pub fn matches_tracking_name(&self, name: &str) -> bool {
        self.tracking_name_patterns.iter().any(|p| name.contains(p.as_str()))
    }

    /// Cookie name contains any quick-scan pattern
    pub fn matches_quick_pattern(&self, name: &str) -> bool {
        self.quick_suspicious_patterns.iter().any(|p| name.contains(p.as_str()))
    }

    /// Domain is (or contains) a known tracker domain
    pub fn matches_tracker_domain(&self, domain: &str) -> bool {
        self.tracker_domains.iter().any(|d| domain.contains(d.as_str()))
    }

    pub fn matches_ad_network(&self, domain: &str) -> bool {
        self.ad_network_domains.iter().any(|d| domain.contains(d.as_str()))
    }

    pub fn matches_identity_name(&self, name: &str) -> bool {
        let lower = name.to_lowercase();
        self.identity_name_substrings
            .iter()
            .any(|s| lower.contains(&s.to_lowercase()))
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = RiskConfig::default();
        assert_eq!(config.thresholds.suspicious, 0.4);
        assert_eq!(config.thresholds.malicious, 0.7);
        assert!(config.tracker_domains.contains(&"doubleclick.net".to_string()));
        assert_eq!(config.tracking_name_patterns.len(), 6);
    }

    #[test]
    fn test_partial_file_merges_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{ "tracker_domains": ["evil.test"], "thresholds": {{ "suspicious": 0.5, "malicious": 0.9 }} }}"#
        )
        .unwrap();

        let config = RiskConfig::from_file(file.path()).unwrap();
        assert_eq!(config.tracker_domains, vec!["evil.test".to_string()]);
        assert_eq!(config.thresholds.malicious, 0.9);
        assert_eq!(config.tracking_name_patterns, RiskConfig::default().tracking_name_patterns);
    }

    #[test]
    fn test_bad_file_is_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert!(matches!(
            RiskConfig::from_file(file.path()),
            Err(ConfigError::Parse { .. })
        ));

        assert!(matches!(
            RiskConfig::from_file("/nonexistent/cookie-guard.json"),
            Err(ConfigError::Io { .. })
        ));
    }

    // One test owns every COOKIE_GUARD_* override var so runs never race
    #[test]
    fn test_env_overrides() {
        use crate::constants::{
            ENV_INFERENCE_TIMEOUT_MS, ENV_MALICIOUS_THRESHOLD, ENV_SENSITIVITY,
            ENV_SUSPICIOUS_THRESHOLD,
        };
        let clear = || {
            for var in [
                ENV_SENSITIVITY,
                ENV_SUSPICIOUS_THRESHOLD,
                ENV_MALICIOUS_THRESHOLD,
                ENV_INFERENCE_TIMEOUT_MS,
            ] {
                std::env::remove_var(var);
            }
        };

        clear();
        std::env::set_var(ENV_MALICIOUS_THRESHOLD, "0.9");
        std::env::set_var(ENV_INFERENCE_TIMEOUT_MS, "500");
        let mut config = RiskConfig::default();
        config.apply_env_overrides();
        assert_eq!(config.thresholds.malicious, 0.9);
        assert_eq!(config.thresholds.suspicious, 0.4);
        assert_eq!(config.inference_timeout(), Duration::from_millis(500));

        // Inverted pair is rejected as a whole
        clear();
        std::env::set_var(ENV_SUSPICIOUS_THRESHOLD, "0.8");
        std::env::set_var(ENV_MALICIOUS_THRESHOLD, "0.5");
        let mut config = RiskConfig::default();
        config.apply_env_overrides();
        assert_eq!(config.thresholds, ClassificationThresholds::default());

        // Out-of-range values never apply
        clear();
        std::env::set_var(ENV_MALICIOUS_THRESHOLD, "1.5");
        let mut config = RiskConfig::default();
        config.apply_env_overrides();
        assert_eq!(config.thresholds.malicious, 0.7);

        // Preset, then explicit cutoff on top
        clear();
        std::env::set_var(ENV_SENSITIVITY, "high");
        let mut config = RiskConfig::default();
        config.apply_env_overrides();
        assert_eq!(config.thresholds, ClassificationThresholds::high_sensitivity());

        std::env::set_var(ENV_MALICIOUS_THRESHOLD, "0.65");
        let mut config = RiskConfig::default();
        config.apply_env_overrides();
        assert_eq!(config.thresholds.suspicious, 0.3);
        assert_eq!(config.thresholds.malicious, 0.65);

        // Unknown preset is ignored
        clear();
        std::env::set_var(ENV_SENSITIVITY, "bogus");
        let mut config = RiskConfig::default();
        config.apply_env_overrides();
        assert_eq!(config.thresholds, ClassificationThresholds::default());

        clear();
    }

    #[test]
    fn test_inverted_file_thresholds_fall_back_to_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "thresholds": {{ "suspicious": 0.9, "malicious": 0.2 }} }}"#).unwrap();

        let config = RiskConfig::from_file(file.path()).unwrap();
        assert!(!config.thresholds.is_ordered());
        assert_eq!(config.validated().thresholds, ClassificationThresholds::default());
    }

    #[test]
    fn test_identity_match_is_case_insensitive() {
        let config = RiskConfig::default();
        assert!(config.matches_identity_name("VisitorToken"));
        assert!(!config.matches_identity_name("theme"));
    }
}
