//! API Request Handlers

use axum::extract::{Json, State};
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

use super::types::*;
use crate::core::classifier::ModelBundle;
use crate::core::decision::DecisionPolicy;
use crate::core::engine;
use crate::models::errors::{AppError, AppResult};
use crate::models::types::{BatchSummary, ClassificationResult};
use crate::telemetry::TelemetryCollector;
use crate::utils::constants::{
    APP_NAME, APP_VERSION, FEATURE_COUNT, FEATURE_NAMES, MAX_BATCH_URLS, POPULAR_DOMAINS,
    SUSPICIOUS_KEYWORDS, SUSPICIOUS_TLDS,
};

/// Shared application state. The model bundle is immutable for the process
/// lifetime; handlers only read it.
pub struct AppState {
    pub bundle: Option<Arc<ModelBundle>>,
    pub policy: DecisionPolicy,
    pub telemetry: Arc<TelemetryCollector>,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(bundle: Option<Arc<ModelBundle>>, telemetry: Arc<TelemetryCollector>) -> Self {
        let policy = bundle
            .as_ref()
            .map(|b| DecisionPolicy::new(b.threshold))
            .unwrap_or_default();

        Self {
            bundle,
            policy,
            telemetry,
            start_time: Instant::now(),
        }
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    fn bundle(&self) -> AppResult<&Arc<ModelBundle>> {
        self.bundle.as_ref().ok_or_else(AppError::model_unavailable)
    }
}

// ============================================
// Service Info
// ============================================

pub async fn root() -> Json<ServiceInfo> {
    Json(ServiceInfo {
        name: APP_NAME,
        version: APP_VERSION,
        description: "Real-time phishing URL detection",
        endpoints: ServiceEndpoints {
            predict: "/predict",
            batch: "/predict/batch",
            health: "/health",
            features: "/features",
            stats: "/stats",
        },
    })
}

// ============================================
// Health Check
// ============================================

pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let loaded = state.bundle.is_some();

    Json(HealthResponse {
        status: if loaded { "healthy" } else { "unhealthy" },
        model_loaded: loaded,
        model_version: state
            .bundle
            .as_ref()
            .and_then(|b| b.version().map(String::from)),
        features_count: FEATURE_COUNT,
    })
}

// ============================================
// Prediction
// ============================================

pub async fn predict(
    State(state): State<Arc<AppState>>,
    Json(req): Json<UrlRequest>,
) -> Result<Json<ClassificationResult>, AppError> {
    let start = Instant::now();
    let bundle = state.bundle()?;

    let result = engine::classify_url(bundle.as_ref(), &state.policy, &req.url)?;

    state
        .telemetry
        .record_scan(start.elapsed().as_millis() as u64, result.is_phishing);

    Ok(Json(result))
}

pub async fn predict_batch(
    State(state): State<Arc<AppState>>,
    Json(req): Json<BatchUrlRequest>,
) -> Result<Json<BatchSummary>, AppError> {
    let start = Instant::now();

    // Size cap is validated before any model or extraction work
    if req.urls.len() > MAX_BATCH_URLS {
        return Err(AppError::batch_too_large(req.urls.len(), MAX_BATCH_URLS));
    }

    let bundle = state.bundle()?;
    let summary = engine::classify_batch(bundle.as_ref(), &state.policy, &req.urls)?;

    state.telemetry.record_batch(
        start.elapsed().as_millis() as u64,
        summary.total_analyzed as u64,
        summary.phishing_detected as u64,
    );

    Ok(Json(summary))
}

// ============================================
// Static Feature Description
// ============================================

pub async fn get_features() -> Json<FeaturesResponse> {
    Json(FeaturesResponse {
        feature_names: FEATURE_NAMES.to_vec(),
        feature_count: FEATURE_COUNT,
        suspicious_keywords: SUSPICIOUS_KEYWORDS.to_vec(),
        suspicious_tlds: SUSPICIOUS_TLDS.to_vec(),
    })
}

// ============================================
// Stats
// ============================================

pub async fn get_stats(State(state): State<Arc<AppState>>) -> Result<Json<StatsResponse>, AppError> {
    let bundle = state.bundle()?;
    let metadata = bundle
        .metadata
        .clone()
        .ok_or_else(AppError::metadata_unavailable)?;

    let stats = state.telemetry.get_stats();
    info!(
        total_analyzed = stats.total_analyzed,
        phishing_detected = stats.phishing_detected,
        uptime_s = state.uptime_seconds(),
        "Stats requested"
    );

    Ok(Json(StatsResponse {
        model: metadata,
        model_loaded_at: bundle.loaded_at,
        popular_domains_count: POPULAR_DOMAINS.len(),
        api_version: APP_VERSION,
    }))
}
