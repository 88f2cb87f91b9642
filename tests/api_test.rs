//! Integration tests for the PhishBlock API surface
//!
//! These run against a live listener without a model bundle, covering the
//! degraded-service contract: health reporting, 503 on prediction, and the
//! request-validation paths that never reach the model.

use std::net::SocketAddr;
use std::sync::Arc;

use phishblock::api::{create_router, handlers::AppState};
use phishblock::telemetry::TelemetryCollector;

async fn spawn_server_without_model() -> SocketAddr {
    let state = Arc::new(AppState::new(None, Arc::new(TelemetryCollector::new())));
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    addr
}

#[tokio::test]
async fn health_reports_unhealthy_without_model() {
    let addr = spawn_server_without_model().await;

    let body: serde_json::Value = reqwest::get(format!("http://{}/health", addr))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["status"], "unhealthy");
    assert_eq!(body["model_loaded"], false);
    assert_eq!(body["features_count"], 16);
}

#[tokio::test]
async fn predict_without_model_returns_503() {
    let addr = spawn_server_without_model().await;

    let response = reqwest::Client::new()
        .post(format!("http://{}/predict", addr))
        .json(&serde_json::json!({ "url": "https://example.com" }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 503);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"]["code"], "MODEL_UNAVAILABLE");
}

#[tokio::test]
async fn oversized_batch_rejected_before_model_check() {
    let addr = spawn_server_without_model().await;

    let urls: Vec<String> = (0..101).map(|i| format!("http://site{}.com", i)).collect();
    let response = reqwest::Client::new()
        .post(format!("http://{}/predict/batch", addr))
        .json(&serde_json::json!({ "urls": urls }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 400);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"]["code"], "BATCH_TOO_LARGE");
}

#[tokio::test]
async fn features_endpoint_serves_static_lists() {
    let addr = spawn_server_without_model().await;

    let body: serde_json::Value = reqwest::get(format!("http://{}/features", addr))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let names = body["feature_names"].as_array().unwrap();
    assert_eq!(names.len(), 16);
    assert_eq!(names[0], "domain_length");
    assert_eq!(names[15], "domain_path_ratio");
    assert!(body["suspicious_keywords"]
        .as_array()
        .unwrap()
        .iter()
        .any(|k| k == "login"));
    assert!(body["suspicious_tlds"]
        .as_array()
        .unwrap()
        .iter()
        .any(|t| t == ".tk"));
}

#[tokio::test]
async fn stats_without_metadata_returns_503() {
    let addr = spawn_server_without_model().await;

    let response = reqwest::get(format!("http://{}/stats", addr)).await.unwrap();
    assert_eq!(response.status(), 503);
}

#[tokio::test]
async fn root_lists_endpoints() {
    let addr = spawn_server_without_model().await;

    let body: serde_json::Value = reqwest::get(format!("http://{}/", addr))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["name"], "PhishBlock");
    assert_eq!(body["endpoints"]["predict"], "/predict");
    assert_eq!(body["endpoints"]["batch"], "/predict/batch");
}
