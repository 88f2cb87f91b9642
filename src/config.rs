//! Configuration module for PhishBlock
//!
//! All runtime configuration comes from the environment; defaults live in
//! `utils::constants`. Parsed once at startup, read-only afterwards.

use std::path::PathBuf;

use crate::utils::constants::{
    DEFAULT_METADATA_MAX_BYTES, DEFAULT_MODEL_DIR, DEFAULT_MODEL_MAX_BYTES,
};

/// Process-wide configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Listen host
    pub host: String,
    /// Listen port
    pub port: u16,
    /// Remote artifact source; when unset, only local paths are searched
    pub model_url: Option<String>,
    /// Remote metadata source; when unset, inferred from `model_url`
    pub metadata_url: Option<String>,
    /// Byte ceiling for the artifact download
    pub model_max_bytes: u64,
    /// Byte ceiling for the metadata download
    pub metadata_max_bytes: u64,
    /// Directory downloads land in (and the first local search location)
    pub model_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            model_url: None,
            metadata_url: None,
            model_max_bytes: DEFAULT_MODEL_MAX_BYTES,
            metadata_max_bytes: DEFAULT_METADATA_MAX_BYTES,
            model_dir: PathBuf::from(DEFAULT_MODEL_DIR),
        }
    }
}

impl AppConfig {
    /// Read configuration from the environment.
    /// `PORT` wins over `PHISHBLOCK_PORT` (platform convention), everything
    /// else falls back to the defaults above.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let host = std::env::var("PHISHBLOCK_HOST").unwrap_or(defaults.host);
        let port = std::env::var("PORT")
            .or_else(|_| std::env::var("PHISHBLOCK_PORT"))
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(defaults.port);

        let model_url = std::env::var("MODEL_URL").ok().filter(|s| !s.is_empty());
        let metadata_url = std::env::var("MODEL_METADATA_URL")
            .ok()
            .filter(|s| !s.is_empty());

        let model_max_bytes = std::env::var("MODEL_MAX_BYTES")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.model_max_bytes);
        let metadata_max_bytes = std::env::var("MODEL_METADATA_MAX_BYTES")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.metadata_max_bytes);

        let model_dir = std::env::var("MODEL_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.model_dir);

        Self {
            host,
            port,
            model_url,
            metadata_url,
            model_max_bytes,
            metadata_max_bytes,
            model_dir,
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
