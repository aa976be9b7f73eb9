//! Heuristic Backend
//!
//! Fixed logistic model over the feature vector. Gives a working
//! predictive path on machines without an ONNX model file.

use crate::logic::features::{FeatureVector, FEATURE_COUNT};
use super::backend::{ModelError, ScoringBackend};

/// Per-slot weights, order follows `FEATURE_LAYOUT`
const DEFAULT_WEIGHTS: [f32; FEATURE_COUNT] = [
    0.2,  // name_length
    1.5,  // value_length
    0.5,  // domain_depth
    1.8,  // third_party
    -0.6, // secure
    -0.3, // http_only
    0.8,  // expiry_ratio
    2.5,  // tracking_name
    1.2,  // value_entropy
    0.4,  // base64_value
    0.2,  // name_has_digit
    0.3,  // name_has_special
    0.1,  // path_depth
    0.6,  // same_site
    0.5,  // broad_domain
    0.7,  // long_expiry
    2.0,  // ad_network
    0.8,  // value_has_url
    0.6,  // identity_name
    1.5,  // overall_suspicion
];

const DEFAULT_BIAS: f32 = -3.0;

pub struct HeuristicBackend {
    weights: Vec<f32>,
    bias: f32,
    loaded: bool,
}

impl HeuristicBackend {
    pub fn new() -> Self {
        Self::with_weights(DEFAULT_WEIGHTS.to_vec(), DEFAULT_BIAS)
    }

    /// Custom weights; length is checked against the layout at load time
    pub fn with_weights(weights: Vec<f32>, bias: f32) -> Self {
        Self {
            weights,
            bias,
            loaded: false,
        }
    }
}

impl Default for HeuristicBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn sigmoid(z: f32) -> f32 {
    1.0 / (1.0 + (-z).exp())
}

impl ScoringBackend for HeuristicBackend {
    fn name(&self) -> &str {
        "heuristic"
    }

    fn load(&mut self) -> Result<(), ModelError> {
        if self.weights.len() != FEATURE_COUNT {
            return Err(ModelError::ShapeMismatch(format!(
                "expected {} weights, got {}",
                FEATURE_COUNT,
                self.weights.len()
            )));
        }
        if self.weights.iter().any(|w| !w.is_finite()) || !self.bias.is_finite() {
            return Err(ModelError::BackendUnavailable("non-finite weights".to_string()));
        }

        self.loaded = true;
        Ok(())
    }

    fn infer(&mut self, features: &FeatureVector) -> Result<f32, ModelError> {
        if !self.loaded {
            return Err(ModelError::NotReady);
        }
        features
            .validate()
            .map_err(|e| ModelError::ShapeMismatch(e.to_string()))?;

        let z = features
            .as_slice()
            .iter()
            .zip(self.weights.iter())
            .fold(self.bias, |acc, (x, w)| acc + x * w);

        Ok(sigmoid(z))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infer_requires_load() {
        let mut backend = HeuristicBackend::new();
        assert!(matches!(backend.infer(&FeatureVector::new()), Err(ModelError::NotReady)));
    }

    #[test]
    fn test_zero_vector_is_low_risk() {
        let mut backend = HeuristicBackend::new();
        backend.load().unwrap();
        let p = backend.infer(&FeatureVector::new()).unwrap();
        assert!(p < 0.1, "p = {}", p);
    }

    #[test]
    fn test_tracking_signals_raise_probability() {
        let mut backend = HeuristicBackend::new();
        backend.load().unwrap();

        let mut v = FeatureVector::new();
        v.set(3, 1.0);
        v.set(7, 1.0);
        v.set(16, 1.0);
        let p = backend.infer(&v).unwrap();
        assert!(p > 0.7, "p = {}", p);
    }

    #[test]
    fn test_wrong_weight_count_fails_load() {
        let mut backend = HeuristicBackend::with_weights(vec![1.0; 5], 0.0);
        assert!(matches!(backend.load(), Err(ModelError::ShapeMismatch(_))));
    }

    #[test]
    fn test_foreign_layout_rejected() {
        let mut backend = HeuristicBackend::new();
        backend.load().unwrap();
        let mut v = FeatureVector::new();
        v.version += 1;
        assert!(matches!(backend.infer(&v), Err(ModelError::ShapeMismatch(_))));
    }
}
