//! PhishBlock Library
//!
//! Real-time phishing URL detection:
//! - Deterministic 16-feature extraction from raw URLs
//! - ML-backed risk scoring via an ONNX artifact acquired at startup
//! - Reputation-gated decision policy with bucketed verdicts
//! - Batch classification with per-item failure isolation

pub mod api;
pub mod config;
pub mod core;
pub mod models;
pub mod providers;
pub mod telemetry;
pub mod utils;

pub use crate::config::AppConfig;
pub use crate::core::classifier::{ModelBundle, PhishClassifier, RiskScorer};
pub use crate::core::decision::DecisionPolicy;
pub use crate::core::features::{extract_features, UrlFeatures};
pub use crate::core::reputation::is_popular_domain;
pub use crate::models::errors::{AppError, AppResult, ErrorCode};
pub use crate::models::types::{BatchSummary, ClassificationResult, ModelMetadata, RiskLevel};
pub use crate::telemetry::{TelemetryCollector, TelemetryStats};
