//! Telemetry Module for PhishBlock
//!
//! Anonymous in-process counters: URLs analyzed, phishing verdicts, and
//! detection latency. No URLs or client identifiers are ever stored.
//! Counters are atomics; request handlers only increment.

use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

/// Aggregated statistics for reporting
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TelemetryStats {
    /// Total URLs analyzed
    pub total_analyzed: u64,
    /// URLs flagged as phishing
    pub phishing_detected: u64,
    /// Average detection latency (ms)
    pub avg_latency_ms: f64,
    /// Period start timestamp
    pub period_start: u64,
    /// Period end timestamp
    pub period_end: u64,
}

/// Main telemetry collector
pub struct TelemetryCollector {
    total_analyzed: AtomicU64,
    phishing_detected: AtomicU64,
    total_latency_ms: AtomicU64,
    /// Session start time
    session_start: u64,
    /// Export directory
    export_dir: PathBuf,
}

impl TelemetryCollector {
    /// Create new collector with default settings
    pub fn new() -> Self {
        Self::with_export_dir(PathBuf::from("./telemetry"))
    }

    /// Create collector with custom export directory
    pub fn with_export_dir(export_dir: PathBuf) -> Self {
        Self {
            total_analyzed: AtomicU64::new(0),
            phishing_detected: AtomicU64::new(0),
            total_latency_ms: AtomicU64::new(0),
            session_start: current_timestamp(),
            export_dir,
        }
    }

    /// Record a single-URL analysis
    pub fn record_scan(&self, latency_ms: u64, is_phishing: bool) {
        self.total_analyzed.fetch_add(1, Ordering::Relaxed);
        self.total_latency_ms.fetch_add(latency_ms, Ordering::Relaxed);
        if is_phishing {
            self.phishing_detected.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Record a completed batch
    pub fn record_batch(&self, latency_ms: u64, analyzed: u64, phishing: u64) {
        self.total_analyzed.fetch_add(analyzed, Ordering::Relaxed);
        self.phishing_detected.fetch_add(phishing, Ordering::Relaxed);
        self.total_latency_ms.fetch_add(latency_ms, Ordering::Relaxed);
    }

    /// Get current statistics
    pub fn get_stats(&self) -> TelemetryStats {
        let total_analyzed = self.total_analyzed.load(Ordering::Relaxed);
        let total_latency = self.total_latency_ms.load(Ordering::Relaxed);

        let avg_latency = if total_analyzed > 0 {
            total_latency as f64 / total_analyzed as f64
        } else {
            0.0
        };

        TelemetryStats {
            total_analyzed,
            phishing_detected: self.phishing_detected.load(Ordering::Relaxed),
            avg_latency_ms: avg_latency,
            period_start: self.session_start,
            period_end: current_timestamp(),
        }
    }

    /// Export current stats to JSON file (shutdown hook)
    pub fn export_stats_json(&self) -> Result<PathBuf, std::io::Error> {
        fs::create_dir_all(&self.export_dir)?;

        let stats = self.get_stats();
        let filename = format!("stats_{}.json", current_timestamp());
        let path = self.export_dir.join(filename);

        let json = serde_json::to_string_pretty(&stats)?;
        fs::write(&path, json)?;

        Ok(path)
    }
}

impl Default for TelemetryCollector {
    fn default() -> Self {
        Self::new()
    }
}

fn current_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
