//! Threat Types
//!
//! Result types for cookie classification. No logic beyond constructors.

use serde::{Deserialize, Serialize};

use crate::logic::features::FeatureVector;
use super::rules::{ClassificationThresholds, SCORE_EPSILON};

// ============================================================================
// METHOD
// ============================================================================

/// Which scorer produced a result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Method {
    RuleBased,
    Predictive,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::RuleBased => "rule-based",
            Method::Predictive => "predictive",
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// RISK LEVEL
// ============================================================================

/// Display bucket derived from a result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Safe,
    Suspicious,
    Malicious,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Safe => "safe",
            RiskLevel::Suspicious => "suspicious",
            RiskLevel::Malicious => "malicious",
        }
    }
}

// ============================================================================
// CLASSIFICATION RESULT
// ============================================================================

/// Per-cookie classification, immutable once built
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationResult {
    pub is_malicious: bool,
    pub is_suspicious: bool,
    /// Risk score in [0, 1]
    pub confidence: f32,
    /// Unclamped score (rule weights may sum past 1)
    pub raw_score: f32,
    pub method: Method,
    /// Fired rules, in evaluation order
    pub reasons: Vec<String>,
    /// Vector fed to the predictive backend
    #[serde(skip_serializing_if = "Option::is_none")]
    pub features: Option<FeatureVector>,
}

impl ClassificationResult {
    /// Rule-based result from an accumulated score
    pub fn rule_based(
        raw_score: f32,
        reasons: Vec<String>,
        thresholds: &ClassificationThresholds,
    ) -> Self {
        let compared = raw_score - SCORE_EPSILON;
        Self {
            is_malicious: thresholds.is_malicious(compared),
            is_suspicious: thresholds.is_suspicious(compared),
            confidence: raw_score.clamp(0.0, 1.0),
            raw_score,
            method: Method::RuleBased,
            reasons,
            features: None,
        }
    }

    /// Predictive result from a malicious probability
    pub fn predictive(
        probability: f32,
        features: FeatureVector,
        thresholds: &ClassificationThresholds,
    ) -> Self {
        Self {
            is_malicious: thresholds.is_malicious(probability),
            is_suspicious: thresholds.is_suspicious(probability),
            confidence: probability,
            raw_score: probability,
            method: Method::Predictive,
            reasons: Vec::new(),
            features: Some(features),
        }
    }

    pub fn risk_score(&self) -> f32 {
        self.confidence
    }

    pub fn level(&self) -> RiskLevel {
        if self.is_malicious {
            RiskLevel::Malicious
        } else if self.is_suspicious {
            RiskLevel::Suspicious
        } else {
            RiskLevel::Safe
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_serializes_kebab() {
        assert_eq!(serde_json::to_value(Method::RuleBased).unwrap(), "rule-based");
        assert_eq!(serde_json::to_value(Method::Predictive).unwrap(), "predictive");
    }

    #[test]
    fn test_rule_based_clamps_confidence() {
        let result = ClassificationResult::rule_based(1.7, vec![], &ClassificationThresholds::default());
        assert_eq!(result.confidence, 1.0);
        assert_eq!(result.raw_score, 1.7);
        assert!(result.is_malicious && result.is_suspicious);
        assert_eq!(result.level(), RiskLevel::Malicious);
    }

    #[test]
    fn test_predictive_thresholds() {
        let t = ClassificationThresholds::default();
        let mid = ClassificationResult::predictive(0.5, FeatureVector::new(), &t);
        assert!(mid.is_suspicious && !mid.is_malicious);
        assert_eq!(mid.method, Method::Predictive);
        assert!(mid.features.is_some());

        let edge = ClassificationResult::predictive(0.7, FeatureVector::new(), &t);
        assert!(!edge.is_malicious);
        assert_eq!(edge.level(), RiskLevel::Suspicious);
    }

    #[test]
    fn test_predictive_just_above_threshold_is_malicious() {
        let t = ClassificationThresholds::default();
        let result = ClassificationResult::predictive(0.700_000_5, FeatureVector::new(), &t);
        assert!(result.is_malicious);
        assert_eq!(result.level(), RiskLevel::Malicious);
    }

    #[test]
    fn test_rule_weight_sum_on_threshold_does_not_fire() {
        use super::super::rules::{INSECURE_WEIGHT, LONG_VALUE_WEIGHT, THIRD_PARTY_WEIGHT};

        let t = ClassificationThresholds::default();
        let on_edge = ClassificationResult::rule_based(LONG_VALUE_WEIGHT + THIRD_PARTY_WEIGHT, vec![], &t);
        assert!(!on_edge.is_malicious);
        assert!(on_edge.is_suspicious);

        let above = ClassificationResult::rule_based(THIRD_PARTY_WEIGHT + INSECURE_WEIGHT, vec![], &t);
        assert!(above.is_suspicious && !above.is_malicious);
        assert_eq!(above.level(), RiskLevel::Suspicious);
    }
}
