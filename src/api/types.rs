//! API Request/Response Types

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::models::errors::AppError;
use crate::models::types::ModelMetadata;

/// Single-URL prediction request
#[derive(Debug, Deserialize)]
pub struct UrlRequest {
    pub url: String,
}

/// Batch prediction request (max 100 URLs)
#[derive(Debug, Deserialize)]
pub struct BatchUrlRequest {
    pub urls: Vec<String>,
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub model_loaded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_version: Option<String>,
    pub features_count: usize,
}

/// Static description of the feature pipeline
#[derive(Debug, Serialize)]
pub struct FeaturesResponse {
    pub feature_names: Vec<&'static str>,
    pub feature_count: usize,
    pub suspicious_keywords: Vec<&'static str>,
    pub suspicious_tlds: Vec<&'static str>,
}

/// Model metadata passthrough plus static counts
#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub model: ModelMetadata,
    pub model_loaded_at: chrono::DateTime<chrono::Utc>,
    pub popular_domains_count: usize,
    pub api_version: &'static str,
}

/// Root endpoint: service identity and endpoint map
#[derive(Debug, Serialize)]
pub struct ServiceInfo {
    pub name: &'static str,
    pub version: &'static str,
    pub description: &'static str,
    pub endpoints: ServiceEndpoints,
}

#[derive(Debug, Serialize)]
pub struct ServiceEndpoints {
    pub predict: &'static str,
    pub batch: &'static str,
    pub health: &'static str,
    pub features: &'static str,
    pub stats: &'static str,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.code.http_status())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body = Json(serde_json::json!({
            "error": {
                "code": self.code_str(),
                "message": self.message,
            }
        }));
        (status, body).into_response()
    }
}
