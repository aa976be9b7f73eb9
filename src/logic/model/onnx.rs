//! ONNX Backend - ONNX Runtime Integration
//!
//! Loads a `[1, 20] -> [1, 1]` classifier from disk. The model file can be
//! pinned with a SHA-256 checksum; a tampered file never gets loaded.

use std::path::{Path, PathBuf};

use ndarray::Array2;
use ort::session::{builder::GraphOptimizationLevel, Session};
use ort::value::Value;
use sha2::{Digest, Sha256};

use crate::logic::features::{FeatureVector, FEATURE_COUNT};
use super::backend::{ModelError, ScoringBackend};

pub struct OnnxBackend {
    model_path: PathBuf,
    expected_sha256: Option<String>,
    session: Option<Session>,
}

impl OnnxBackend {
    pub fn new(model_path: impl AsRef<Path>) -> Self {
        Self {
            model_path: model_path.as_ref().to_path_buf(),
            expected_sha256: None,
            session: None,
        }
    }

    /// Require the model file to hash to `sha256_hex`
    pub fn with_checksum(mut self, sha256_hex: &str) -> Self {
        self.expected_sha256 = Some(sha256_hex.trim().to_lowercase());
        self
    }

    pub fn model_path(&self) -> &Path {
        &self.model_path
    }

    /// Run one `[1, FEATURE_COUNT]` row through the session
    fn run(&mut self, values: &[f32; FEATURE_COUNT]) -> Result<f32, ModelError> {
        let session = self.session.as_mut().ok_or(ModelError::NotReady)?;

        let input_array = Array2::<f32>::from_shape_vec((1, FEATURE_COUNT), values.to_vec())
            .map_err(|e| ModelError::ShapeMismatch(format!("Array error: {}", e)))?;

        let output_name = session
            .outputs
            .first()
            .map(|o| o.name.clone())
            .ok_or_else(|| ModelError::ShapeMismatch("No output defined".to_string()))?;

        let input_tensor = Value::from_array(input_array)
            .map_err(|e| ModelError::Inference(format!("Tensor error: {}", e)))?;

        let outputs = session
            .run(ort::inputs![input_tensor])
            .map_err(|e| ModelError::Inference(e.to_string()))?;

        let output = outputs
            .get(&output_name)
            .ok_or_else(|| ModelError::Inference("No output".to_string()))?;

        let (_, data) = output
            .try_extract_tensor::<f32>()
            .map_err(|e| ModelError::Inference(format!("Extract error: {}", e)))?;

        if data.len() != 1 {
            return Err(ModelError::ShapeMismatch(format!(
                "expected a single probability, model returned {} values",
                data.len()
            )));
        }

        Ok(data[0])
    }
}

fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

impl ScoringBackend for OnnxBackend {
    fn name(&self) -> &str {
        "onnx"
    }

    fn load(&mut self) -> Result<(), ModelError> {
        log::info!("Loading ONNX model from: {}", self.model_path.display());

        if !self.model_path.exists() {
            return Err(ModelError::ModelNotFound(self.model_path.display().to_string()));
        }

        let model_bytes = std::fs::read(&self.model_path)
            .map_err(|e| ModelError::BackendUnavailable(format!("read model: {}", e)))?;

        if let Some(expected) = &self.expected_sha256 {
            let actual = sha256_hex(&model_bytes);
            if &actual != expected {
                return Err(ModelError::ChecksumMismatch {
                    expected: expected.clone(),
                    actual,
                });
            }
        }

        let session = Session::builder()
            .map_err(|e| ModelError::BackendUnavailable(format!("Session builder error: {}", e)))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| ModelError::BackendUnavailable(format!("Optimization error: {}", e)))?
            .commit_from_memory(&model_bytes)
            .map_err(|e| ModelError::BackendUnavailable(format!("Load error: {}", e)))?;

        self.session = Some(session);

        // Probe once so a wrong-shaped model fails here, not per cookie
        if let Err(e) = self.run(&[0.0; FEATURE_COUNT]) {
            self.session = None;
            return Err(e);
        }

        log::info!("ONNX model loaded ({} bytes)", model_bytes.len());
        Ok(())
    }

    fn infer(&mut self, features: &FeatureVector) -> Result<f32, ModelError> {
        features
            .validate()
            .map_err(|e| ModelError::ShapeMismatch(e.to_string()))?;
        self.run(features.as_array())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_model_fails_load() {
        let mut backend = OnnxBackend::new("/nonexistent/cookie_model.onnx");
        assert!(matches!(backend.load(), Err(ModelError::ModelNotFound(_))));
        assert!(matches!(backend.infer(&FeatureVector::new()), Err(ModelError::NotReady)));
    }

    #[test]
    fn test_checksum_mismatch_fails_load() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"not really a model").unwrap();

        let mut backend = OnnxBackend::new(file.path()).with_checksum(&"0".repeat(64));
        assert!(matches!(backend.load(), Err(ModelError::ChecksumMismatch { .. })));
    }

    #[test]
    fn test_sha256_hex() {
        assert_eq!(
            sha256_hex(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }
}
