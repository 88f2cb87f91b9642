//! Integration tests for bounded artifact download
//!
//! A throwaway axum listener streams blobs of known size; the download path
//! must honor its byte ceiling, clean up partial files, and publish
//! atomically.

use std::net::SocketAddr;

use axum::{routing::get, Router};
use phishblock::models::errors::ErrorCode;
use phishblock::providers::artifact::download_file;

async fn spawn_blob_server(size: usize) -> SocketAddr {
    let app = Router::new().route("/phishing_model.onnx", get(move || async move { vec![7u8; size] }));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    addr
}

#[tokio::test]
async fn download_over_ceiling_aborts_and_cleans_up() {
    // 15 MB source against a 10 MB ceiling
    let addr = spawn_blob_server(15 * 1024 * 1024).await;
    let tmp = tempfile::tempdir().unwrap();
    let dest = tmp.path().join("phishing_model.onnx");

    let client = reqwest::Client::new();
    let err = download_file(
        &client,
        &format!("http://{}/phishing_model.onnx", addr),
        &dest,
        10 * 1024 * 1024,
    )
    .await
    .unwrap_err();

    assert_eq!(err.code, ErrorCode::DownloadTooLarge);
    assert!(!dest.exists(), "destination must not be partially written");
    let part = tmp.path().join("phishing_model.onnx.part");
    assert!(!part.exists(), "partial temp file must be removed");
}

#[tokio::test]
async fn download_within_ceiling_publishes_atomically() {
    let size = 1024 * 1024;
    let addr = spawn_blob_server(size).await;
    let tmp = tempfile::tempdir().unwrap();
    let dest = tmp.path().join("phishing_model.onnx");

    let client = reqwest::Client::new();
    let total = download_file(
        &client,
        &format!("http://{}/phishing_model.onnx", addr),
        &dest,
        10 * 1024 * 1024,
    )
    .await
    .unwrap();

    assert_eq!(total, size as u64);
    assert_eq!(std::fs::metadata(&dest).unwrap().len(), size as u64);
    assert!(!tmp.path().join("phishing_model.onnx.part").exists());
}

#[tokio::test]
async fn download_404_fails_without_artifacts() {
    let addr = spawn_blob_server(16).await;
    let tmp = tempfile::tempdir().unwrap();
    let dest = tmp.path().join("phishing_model.onnx");

    let client = reqwest::Client::new();
    let err = download_file(
        &client,
        &format!("http://{}/missing.onnx", addr),
        &dest,
        1024,
    )
    .await
    .unwrap_err();

    assert_eq!(err.code, ErrorCode::DownloadFailed);
    assert!(!dest.exists());
}
