//! Central Configuration Constants
//!
//! Single source of truth for env-var names and defaults.
//! Everything here can be overridden without touching code.

/// Model version reported in engine stats
pub const MODEL_VERSION: &str = "1.0.0";

/// App version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// App name
pub const APP_NAME: &str = "Cookie Guard";

/// Default per-cookie inference timeout (milliseconds)
pub const DEFAULT_INFERENCE_TIMEOUT_MS: u64 = 250;

/// Seconds in the one-year expiry normalization window
pub const ONE_YEAR_SECS: f64 = 365.0 * 24.0 * 3600.0;

pub const ENV_CONFIG_PATH: &str = "COOKIE_GUARD_CONFIG";
pub const ENV_SUSPICIOUS_THRESHOLD: &str = "COOKIE_GUARD_SUSPICIOUS_THRESHOLD";
pub const ENV_MALICIOUS_THRESHOLD: &str = "COOKIE_GUARD_MALICIOUS_THRESHOLD";
pub const ENV_INFERENCE_TIMEOUT_MS: &str = "COOKIE_GUARD_INFERENCE_TIMEOUT_MS";
pub const ENV_MODEL_PATH: &str = "COOKIE_GUARD_MODEL";
pub const ENV_SENSITIVITY: &str = "COOKIE_GUARD_SENSITIVITY";

// ============================================
// Helper functions to read from env with fallback
// ============================================

/// Get config file path from environment
pub fn get_config_path() -> Option<String> {
    std::env::var(ENV_CONFIG_PATH).ok().filter(|s| !s.is_empty())
}

/// Get ONNX model path from environment
pub fn get_model_path() -> Option<String> {
    std::env::var(ENV_MODEL_PATH).ok().filter(|s| !s.is_empty())
}

/// Get threshold preset name (`high`, `normal`, `low`) from environment
pub fn get_sensitivity() -> Option<String> {
    std::env::var(ENV_SENSITIVITY).ok().filter(|s| !s.trim().is_empty())
}

/// Get a threshold override from environment (must parse and lie in 0..=1)
pub fn get_threshold_override(var: &str) -> Option<f32> {
    std::env::var(var)
        .ok()
        .and_then(|s| s.trim().parse::<f32>().ok())
        .filter(|v| (0.0..=1.0).contains(v))
}

/// Get inference timeout override from environment
pub fn get_inference_timeout_override() -> Option<u64> {
    std::env::var(ENV_INFERENCE_TIMEOUT_MS)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .filter(|ms| *ms > 0)
}
