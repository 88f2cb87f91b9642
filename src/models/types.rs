//! Type definitions for PhishBlock
//! Core data structures shared by the pipeline and the API layer.

use serde::{Deserialize, Serialize};

use crate::core::features::UrlFeatures;

/// Risk level classification for a URL, derived from the model probability
/// via fixed cut-points. Deliberately decoupled from the phishing flag: a
/// popular domain can sit in the `High` bucket while `is_phishing` stays
/// false because its threshold is raised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    /// No significant indicators
    Safe,
    /// Minor concerns
    Low,
    /// Proceed with caution
    Medium,
    /// Strong phishing indicators
    High,
    /// Almost certainly phishing
    Critical,
    /// Classification could not be performed
    Unknown,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Safe => "safe",
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
            RiskLevel::Critical => "critical",
            RiskLevel::Unknown => "unknown",
        }
    }

    /// Bucket a probability. Lower bound inclusive: 0.20 is `Low`,
    /// 0.80 is `Critical`.
    pub fn from_probability(probability: f64) -> Self {
        if probability < 0.20 {
            RiskLevel::Safe
        } else if probability < 0.40 {
            RiskLevel::Low
        } else if probability < 0.60 {
            RiskLevel::Medium
        } else if probability < 0.80 {
            RiskLevel::High
        } else {
            RiskLevel::Critical
        }
    }
}

/// Verdict for a single URL, produced fresh per request and discarded after
/// the response is sent.
#[derive(Debug, Clone, Serialize)]
pub struct ClassificationResult {
    pub url: String,
    pub is_phishing: bool,
    /// Model probability, rounded to 4 decimal places
    pub confidence: f64,
    pub risk_level: RiskLevel,
    pub is_popular_domain: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub features: Option<UrlFeatures>,
    pub recommendation: String,
}

impl ClassificationResult {
    /// Placeholder for a batch item whose pipeline failed. Never aborts the
    /// surrounding batch.
    pub fn unavailable(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            is_phishing: false,
            confidence: 0.0,
            risk_level: RiskLevel::Unknown,
            is_popular_domain: false,
            features: None,
            recommendation: "Could not analyze this URL".to_string(),
        }
    }
}

/// Ordered batch output plus aggregate counts. `results.len()` always equals
/// the input length.
#[derive(Debug, Clone, Serialize)]
pub struct BatchSummary {
    pub results: Vec<ClassificationResult>,
    pub total_analyzed: usize,
    pub phishing_detected: usize,
}

/// Metadata shipped alongside the trained artifact. Unknown keys are kept in
/// `extra` so `GET /stats` can pass the document through untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommended_threshold: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_names: Option<Vec<String>>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bucket_boundaries_lower_bound_inclusive() {
        assert_eq!(RiskLevel::from_probability(0.0), RiskLevel::Safe);
        assert_eq!(RiskLevel::from_probability(0.19), RiskLevel::Safe);
        assert_eq!(RiskLevel::from_probability(0.20), RiskLevel::Low);
        assert_eq!(RiskLevel::from_probability(0.40), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_probability(0.60), RiskLevel::High);
        assert_eq!(RiskLevel::from_probability(0.80), RiskLevel::Critical);
        assert_eq!(RiskLevel::from_probability(1.0), RiskLevel::Critical);
    }

    #[test]
    fn test_risk_level_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&RiskLevel::Critical).unwrap(),
            "\"critical\""
        );
        assert_eq!(
            serde_json::to_string(&RiskLevel::Unknown).unwrap(),
            "\"unknown\""
        );
    }

    #[test]
    fn test_unavailable_placeholder() {
        let placeholder = ClassificationResult::unavailable("http://broken");
        assert!(!placeholder.is_phishing);
        assert_eq!(placeholder.confidence, 0.0);
        assert_eq!(placeholder.risk_level, RiskLevel::Unknown);
        assert!(placeholder.features.is_none());
    }

    #[test]
    fn test_metadata_roundtrip_keeps_unknown_keys() {
        let raw = r#"{
            "version": "1.2.0",
            "recommended_threshold": 0.55,
            "feature_names": ["domain_length"],
            "auc": 0.987,
            "trained_at": "2025-11-02"
        }"#;
        let meta: ModelMetadata = serde_json::from_str(raw).unwrap();
        assert_eq!(meta.version.as_deref(), Some("1.2.0"));
        assert_eq!(meta.recommended_threshold, Some(0.55));

        let out = serde_json::to_value(&meta).unwrap();
        assert_eq!(out["auc"], 0.987);
        assert_eq!(out["trained_at"], "2025-11-02");
    }
}
