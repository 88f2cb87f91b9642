//! Risk Classifier - ONNX Runtime Integration
//!
//! Wraps the trained gradient-boosted model as an opaque
//! `FeatureVector -> probability` function. The session is loaded once at
//! startup into an immutable `ModelBundle`; request handlers only read it.
//! The `RiskScorer` trait is the seam that keeps the model an external
//! collaborator - the pipeline and its tests never depend on ONNX directly.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use ndarray::Array2;
use ort::session::{builder::GraphOptimizationLevel, Session};
use ort::value::Value;
use tracing::{info, warn};

use crate::core::features::UrlFeatures;
use crate::models::errors::{AppError, AppResult};
use crate::models::types::ModelMetadata;
use crate::utils::constants::{DEFAULT_THRESHOLD, FEATURE_COUNT, FEATURE_NAMES, METADATA_FILENAME};

/// Anything that maps a feature vector to a phishing probability in [0, 1].
/// Deterministic for a fixed artifact: identical vectors yield identical
/// probabilities.
pub trait RiskScorer: Send + Sync {
    fn score(&self, features: &UrlFeatures) -> AppResult<f64>;
}

/// ONNX session wrapper. `Session::run` needs `&mut`, so the session sits
/// behind a `Mutex`; nothing else about the classifier ever mutates.
#[derive(Debug)]
pub struct PhishClassifier {
    session: Mutex<Session>,
    output_names: Vec<String>,
}

impl PhishClassifier {
    /// Build a session from the artifact on disk
    pub fn load(model_path: &Path) -> AppResult<Self> {
        info!("Loading model from: {}", model_path.display());

        if !model_path.is_file() {
            return Err(AppError::model_load_failed(format!(
                "Model not found: {}",
                model_path.display()
            )));
        }

        let session = Session::builder()
            .map_err(|e| AppError::model_load_failed(format!("Session builder error: {}", e)))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| AppError::model_load_failed(format!("Optimization error: {}", e)))?
            .commit_from_file(model_path)
            .map_err(|e| AppError::model_load_failed(format!("Failed to load model: {}", e)))?;

        let output_names = session.outputs().iter().map(|o| o.name().to_string()).collect();

        Ok(Self {
            session: Mutex::new(session),
            output_names,
        })
    }
}

impl RiskScorer for PhishClassifier {
    fn score(&self, features: &UrlFeatures) -> AppResult<f64> {
        let input_array =
            Array2::<f32>::from_shape_vec((1, FEATURE_COUNT), features.to_array().to_vec())
                .map_err(|e| AppError::inference_failed(format!("Array error: {}", e)))?;

        let input_tensor = Value::from_array(input_array)
            .map_err(|e| AppError::inference_failed(format!("Tensor error: {}", e)))?;

        let mut session = self
            .session
            .lock()
            .map_err(|_| AppError::inference_failed("Classifier lock poisoned"))?;

        let outputs = session
            .run(ort::inputs![input_tensor])
            .map_err(|e| AppError::inference_failed(format!("Inference failed: {}", e)))?;

        // GBT exporters emit a label tensor followed by class probabilities;
        // scan outputs back-to-front for the first float tensor and take the
        // positive-class column (last value of the single row).
        for name in self.output_names.iter().rev() {
            let Some(value) = outputs.get(name) else {
                continue;
            };
            if let Ok((_, data)) = value.try_extract_tensor::<f32>() {
                if let Some(&probability) = data.last() {
                    return Ok((probability as f64).clamp(0.0, 1.0));
                }
            }
        }

        Err(AppError::inference_failed(
            "Model produced no float output tensor",
        ))
    }
}

/// Immutable configuration bundle constructed once at startup and passed
/// into every request-handling path. A future hot-reload must build a new
/// bundle and swap the `Arc`, never mutate fields in place.
pub struct ModelBundle {
    classifier: PhishClassifier,
    pub metadata: Option<ModelMetadata>,
    /// Base decision threshold (metadata recommendation or the default)
    pub threshold: f64,
    pub artifact_path: PathBuf,
    pub loaded_at: DateTime<Utc>,
}

impl ModelBundle {
    /// Load the artifact plus its sibling metadata file. Missing or
    /// malformed metadata degrades to the default threshold; it is never
    /// fatal.
    pub fn load(artifact_path: &Path) -> AppResult<Self> {
        let classifier = PhishClassifier::load(artifact_path)?;
        let metadata = read_sibling_metadata(artifact_path);

        if let Some(meta) = &metadata {
            check_feature_compatibility(meta);
        }

        let threshold = metadata
            .as_ref()
            .and_then(|m| m.recommended_threshold)
            .unwrap_or(DEFAULT_THRESHOLD);

        Ok(Self {
            classifier,
            metadata,
            threshold,
            artifact_path: artifact_path.to_path_buf(),
            loaded_at: Utc::now(),
        })
    }

    pub fn version(&self) -> Option<&str> {
        self.metadata.as_ref()?.version.as_deref()
    }
}

impl RiskScorer for ModelBundle {
    fn score(&self, features: &UrlFeatures) -> AppResult<f64> {
        self.classifier.score(features)
    }
}

fn read_sibling_metadata(artifact_path: &Path) -> Option<ModelMetadata> {
    let metadata_path = artifact_path.with_file_name(METADATA_FILENAME);
    let raw = match std::fs::read_to_string(&metadata_path) {
        Ok(raw) => raw,
        Err(_) => {
            info!(
                "No metadata at {}; using default threshold {:.2}",
                metadata_path.display(),
                DEFAULT_THRESHOLD
            );
            return None;
        }
    };

    match serde_json::from_str::<ModelMetadata>(&raw) {
        Ok(meta) => {
            info!(
                "Model metadata loaded: v{}",
                meta.version.as_deref().unwrap_or("unknown")
            );
            Some(meta)
        }
        Err(e) => {
            warn!("Malformed metadata at {}: {}", metadata_path.display(), e);
            None
        }
    }
}

/// The artifact's trained feature list must match the canonical order; the
/// extractor does not auto-adapt, so a divergence is surfaced loudly at
/// startup instead of silently misclassifying.
fn check_feature_compatibility(metadata: &ModelMetadata) {
    let Some(trained) = &metadata.feature_names else {
        return;
    };
    if trained.iter().map(String::as_str).ne(FEATURE_NAMES.iter().copied()) {
        warn!(
            "Model feature names diverge from the canonical list \
             (trained: {:?}); predictions may be meaningless",
            trained
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_rejects_missing_artifact() {
        let err = PhishClassifier::load(Path::new("/nonexistent/model.onnx")).unwrap_err();
        assert_eq!(err.code, crate::models::errors::ErrorCode::ModelLoadFailed);
    }

    #[test]
    fn test_metadata_read_is_nonfatal_when_absent() {
        assert!(read_sibling_metadata(Path::new("/nonexistent/model.onnx")).is_none());
    }

    #[test]
    fn test_feature_compatibility_accepts_canonical_list() {
        // Silent pass; the warning path is exercised by the mismatch case.
        let meta = ModelMetadata {
            version: None,
            recommended_threshold: None,
            feature_names: Some(FEATURE_NAMES.iter().map(|s| s.to_string()).collect()),
            extra: serde_json::Map::new(),
        };
        check_feature_compatibility(&meta);

        let mismatched = ModelMetadata {
            feature_names: Some(vec!["something_else".to_string()]),
            ..meta
        };
        check_feature_compatibility(&mismatched);
    }
}
