//! Rule-Based Classifier
//!
//! Deterministic and always available. Two entry points:
//! - `classify`: full weighted rules, needs the page hostname
//! - `classify_quick`: coarse triage from static lists, no page context

use crate::logic::config::RiskConfig;
use crate::logic::cookie::CookieRecord;
use super::context::ScanContext;
use super::rules::{
    INSECURE_WEIGHT, LONG_VALUE_CHARS, LONG_VALUE_WEIGHT, QUICK_MALICIOUS_SCORE, QUICK_SAFE_SCORE,
    QUICK_SUSPICIOUS_SCORE, REASON_INSECURE, REASON_KNOWN_TRACKER, REASON_LONG_VALUE,
    REASON_NOT_SECURE, REASON_SUSPICIOUS_PATTERN, REASON_THIRD_PARTY, REASON_TRACKING_NAME,
    THIRD_PARTY_WEIGHT, TRACKING_NAME_WEIGHT,
};
use super::types::{ClassificationResult, Method};

// ============================================================================
// FULL RULE-BASED SCORER
// ============================================================================

/// Weighted rule scoring against the page context
pub fn classify(cookie: &CookieRecord, ctx: &ScanContext, config: &RiskConfig) -> ClassificationResult {
    let mut score = 0.0f32;
    let mut reasons = Vec::new();

    if config.matches_tracking_name(&cookie.name) {
        score += TRACKING_NAME_WEIGHT;
        reasons.push(REASON_TRACKING_NAME.to_string());
    }

    if cookie.value.chars().count() > LONG_VALUE_CHARS {
        score += LONG_VALUE_WEIGHT;
        reasons.push(REASON_LONG_VALUE.to_string());
    }

    if cookie.is_third_party(&ctx.hostname) {
        score += THIRD_PARTY_WEIGHT;
        reasons.push(REASON_THIRD_PARTY.to_string());
    }

    if !cookie.secure && cookie.domain.contains('.') {
        score += INSECURE_WEIGHT;
        reasons.push(REASON_INSECURE.to_string());
    }

    ClassificationResult::rule_based(score, reasons, &config.thresholds)
}

// ============================================================================
// QUICK SCORER
// ============================================================================

/// Coarse triage: tracker domain ⇒ malicious, tracking name ⇒ suspicious.
///
/// The two flags are independent; a malicious cookie is not necessarily
/// flagged suspicious.
pub fn classify_quick(cookie: &CookieRecord, config: &RiskConfig) -> ClassificationResult {
    let is_malicious = config.matches_tracker_domain(&cookie.domain);
    let is_suspicious = config.matches_quick_pattern(&cookie.name);

    let score = if is_malicious {
        QUICK_MALICIOUS_SCORE
    } else if is_suspicious {
        QUICK_SUSPICIOUS_SCORE
    } else {
        QUICK_SAFE_SCORE
    };

    let mut reasons = Vec::new();
    if is_malicious {
        reasons.push(REASON_KNOWN_TRACKER.to_string());
    }
    if is_suspicious {
        reasons.push(REASON_SUSPICIOUS_PATTERN.to_string());
    }
    if !cookie.secure {
        reasons.push(REASON_NOT_SECURE.to_string());
    }

    ClassificationResult {
        is_malicious,
        is_suspicious,
        confidence: score,
        raw_score: score,
        method: Method::RuleBased,
        reasons,
        features: None,
    }
}

/// Script source served from a known tracker domain
pub fn is_tracker_script(src: &str, config: &RiskConfig) -> bool {
    !src.is_empty() && config.matches_tracker_domain(src)
}

// ============================================================================
// TESTS
// ============================================================================
