//! PhishBlock API Server
//!
//! Real-time phishing URL detection over REST
//!
//! Usage:
//!   cargo run
//!
//! Environment:
//!   PHISHBLOCK_HOST  - Server host (default: 0.0.0.0)
//!   PORT             - Server port (default: 8080)
//!   MODEL_URL        - Remote model artifact source (optional)
//!   MODEL_METADATA_URL - Remote metadata source (optional)
//!   MODEL_MAX_BYTES  - Download ceiling for the artifact (default: 250 MB)
//!   MODEL_DIR        - Local model directory (default: models)
//!   RUST_LOG         - Log level (default: info)

use std::net::SocketAddr;
use std::sync::Arc;

use phishblock::api::{create_router, handlers::AppState, start_cleanup_task};
use phishblock::config::AppConfig;
use phishblock::core::classifier::ModelBundle;
use phishblock::providers::artifact::ensure_model_available;
use phishblock::telemetry::TelemetryCollector;
use tokio::net::TcpListener;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(false)
        .compact()
        .init();

    print_banner();

    let config = AppConfig::from_env();

    // Acquisition blocks startup; the service never serves without a model.
    let artifact_path = ensure_model_available(&config).await?;
    let bundle = Arc::new(ModelBundle::load(&artifact_path)?);
    info!(
        "Model ready: {} (version {}, threshold {:.2})",
        bundle.artifact_path.display(),
        bundle.version().unwrap_or("unknown"),
        bundle.threshold
    );

    let telemetry = Arc::new(TelemetryCollector::new());
    let telemetry_for_shutdown = telemetry.clone();

    let state = Arc::new(AppState::new(Some(bundle), telemetry));

    start_cleanup_task();

    let app = create_router(state);

    let addr: SocketAddr = config.bind_addr().parse()?;

    info!("PhishBlock API starting on http://{}", addr);
    info!("");
    info!("Endpoints:");
    info!("  POST /predict        - Single URL analysis");
    info!("  POST /predict/batch  - Batch analysis (up to 100 URLs)");
    info!("  GET  /health         - Health check");
    info!("  GET  /features       - Feature pipeline description");
    info!("  GET  /stats          - Model metadata");
    info!("");
    info!("Press Ctrl+C for graceful shutdown");

    let listener = TcpListener::bind(addr).await?;

    let shutdown_signal = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await?;

    info!("");
    info!("Shutdown signal received, cleaning up...");

    let stats = telemetry_for_shutdown.get_stats();
    info!("   URLs analyzed: {}", stats.total_analyzed);
    info!("   Phishing detected: {}", stats.phishing_detected);

    match telemetry_for_shutdown.export_stats_json() {
        Ok(path) => info!("   Stats exported to: {}", path.display()),
        Err(e) => warn!("   Failed to export stats: {}", e),
    }

    info!("PhishBlock API shutdown complete");

    Ok(())
}

fn print_banner() {
    println!(
        r#"
    ╔══════════════════════════════════════════════╗
    ║                                              ║
    ║   P H I S H B L O C K   A P I   v0.1.0       ║
    ║   Real-time phishing URL detection           ║
    ║                                              ║
    ╚══════════════════════════════════════════════╝
    "#
    );
}
