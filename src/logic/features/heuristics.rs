//! Value & name heuristics shared by the extractor
//!
//! Pure functions, no config. Patterns compiled once.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::logic::cookie::CookieRecord;

static BASE64_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9+/]*={0,2}$").expect("valid base64 regex"));

static HEX_ID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-f0-9]{8,}$").expect("valid hex id regex"));

static SPECIAL_CHAR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-zA-Z0-9_-]").expect("valid special char regex"));

static URL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"https?://").expect("valid url regex"));

/// Shannon entropy (bits) of the character distribution, 0 for empty input
pub fn shannon_entropy(s: &str) -> f64 {
    let mut freq: HashMap<char, usize> = HashMap::new();
    let mut total = 0usize;
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
        total += 1;
    }

    if total == 0 {
        return 0.0;
    }

    let n = total as f64;
    freq.values().fold(0.0, |acc, &count| {
        let p = count as f64 / n;
        acc - p * p.log2()
    })
}

/// Alphanumeric + `+/` body, at most two trailing `=`, min length 10
pub fn looks_like_base64(s: &str) -> bool {
    s.len() >= 10 && BASE64_RE.is_match(s)
}

/// Lowercase hex string of length >= 8
pub fn is_hex_id(s: &str) -> bool {
    HEX_ID_RE.is_match(s)
}

pub fn has_special_char(s: &str) -> bool {
    SPECIAL_CHAR_RE.is_match(s)
}

pub fn contains_url(s: &str) -> bool {
    URL_RE.is_match(s)
}

/// Composite suspicion score, clamped to [0, 1]
pub fn overall_suspicion(cookie: &CookieRecord) -> f32 {
    let mut suspicion = 0.0f32;

    if cookie.value.chars().count() > 200 {
        suspicion += 0.2;
    }
    if !cookie.secure && cookie.domain.contains('.') {
        suspicion += 0.2;
    }
    if cookie.domain.starts_with('.') {
        suspicion += 0.1;
    }
    if !cookie.name.is_empty() && cookie.name.chars().count() < 3 {
        suspicion += 0.2;
    }
    if is_hex_id(&cookie.name) {
        suspicion += 0.3;
    }

    suspicion.clamp(0.0, 1.0)
}
