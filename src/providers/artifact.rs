//! Model Artifact Acquisition
//!
//! Runs once before the listener binds: find the trained artifact on disk,
//! or stream it from the configured remote under a strict byte ceiling and
//! publish it atomically (write to `<dest>.part`, then rename). Readers can
//! never observe a partially written artifact. The metadata file follows the
//! same path under its own, smaller ceiling; metadata failures are never
//! fatal.

use std::path::{Path, PathBuf};

use futures_util::StreamExt;
use tokio::io::AsyncWriteExt;
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::models::errors::{AppError, AppResult};
use crate::utils::constants::{METADATA_FILENAME, MODEL_FILENAME, USER_AGENT};

/// Priority-ordered local locations for an existing artifact
pub fn candidate_paths(config: &AppConfig) -> Vec<PathBuf> {
    vec![
        config.model_dir.join(MODEL_FILENAME),
        PathBuf::from("models").join(MODEL_FILENAME),
        PathBuf::from(MODEL_FILENAME),
        PathBuf::from("/app/models").join(MODEL_FILENAME),
    ]
}

/// Metadata URL inferred by substituting the artifact filename token
pub fn infer_metadata_url(model_url: &str) -> Option<String> {
    model_url
        .contains(MODEL_FILENAME)
        .then(|| model_url.replace(MODEL_FILENAME, METADATA_FILENAME))
}

/// Ensure a model artifact exists locally, downloading it when configured.
/// Returns the artifact path, or `ArtifactMissing` when the service cannot
/// possibly serve.
pub async fn ensure_model_available(config: &AppConfig) -> AppResult<PathBuf> {
    for path in candidate_paths(config) {
        if path.is_file() {
            info!("Found existing model at {}", path.display());
            return Ok(path);
        }
    }

    let Some(model_url) = config.model_url.as_deref() else {
        return Err(AppError::artifact_missing(
            "No local model artifact and MODEL_URL not provided",
        ));
    };

    tokio::fs::create_dir_all(&config.model_dir).await?;
    let dest = config.model_dir.join(MODEL_FILENAME);

    let client = reqwest::Client::builder().user_agent(USER_AGENT).build()?;

    info!(
        "Downloading model from {} to {} (max {} bytes)",
        model_url,
        dest.display(),
        config.model_max_bytes
    );
    download_file(&client, model_url, &dest, config.model_max_bytes).await?;

    let metadata_dest = config.model_dir.join(METADATA_FILENAME);
    let metadata_url = config
        .metadata_url
        .clone()
        .or_else(|| infer_metadata_url(model_url));

    match metadata_url {
        Some(url) => {
            info!("Fetching model metadata from {}", url);
            if let Err(e) =
                download_file(&client, &url, &metadata_dest, config.metadata_max_bytes).await
            {
                warn!("Metadata download failed (non-fatal): {}", e);
            }
        }
        None => info!("No metadata URL configured or inferable"),
    }

    Ok(dest)
}

/// Stream `url` to `dest` with a cumulative size limit.
///
/// The body lands in `<dest>.part` first; exceeding `max_bytes` aborts the
/// transfer, removes the partial file, and leaves `dest` untouched. On
/// success the temp file is renamed over `dest` in one step.
pub async fn download_file(
    client: &reqwest::Client,
    url: &str,
    dest: &Path,
    max_bytes: u64,
) -> AppResult<u64> {
    let response = client.get(url).send().await?.error_for_status()?;

    let tmp = part_path(dest);
    let mut file = tokio::fs::File::create(&tmp).await?;
    let mut stream = response.bytes_stream();
    let mut total: u64 = 0;

    while let Some(chunk) = stream.next().await {
        let chunk = match chunk {
            Ok(chunk) => chunk,
            Err(e) => {
                drop(file);
                let _ = tokio::fs::remove_file(&tmp).await;
                return Err(e.into());
            }
        };

        total += chunk.len() as u64;
        if total > max_bytes {
            drop(file);
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(AppError::download_too_large(url, total, max_bytes));
        }

        if let Err(e) = file.write_all(&chunk).await {
            drop(file);
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(e.into());
        }
    }

    file.flush().await?;
    drop(file);

    // Atomic publish: readers see the old state or the full file, never a
    // partial write.
    tokio::fs::rename(&tmp, dest).await?;
    info!("Downloaded {} ({} bytes)", dest.display(), total);

    Ok(total)
}

fn part_path(dest: &Path) -> PathBuf {
    let mut os = dest.as_os_str().to_owned();
    os.push(".part");
    PathBuf::from(os)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::errors::ErrorCode;

    fn config_with_model_dir(dir: &Path) -> AppConfig {
        AppConfig {
            model_dir: dir.to_path_buf(),
            ..AppConfig::default()
        }
    }

    #[tokio::test]
    async fn test_existing_artifact_short_circuits_download() {
        let tmp = tempfile::tempdir().unwrap();
        let artifact = tmp.path().join(MODEL_FILENAME);
        std::fs::write(&artifact, b"model-bytes").unwrap();

        let config = config_with_model_dir(tmp.path());
        let found = ensure_model_available(&config).await.unwrap();
        assert_eq!(found, artifact);
    }

    #[tokio::test]
    async fn test_missing_artifact_without_url_is_fatal() {
        let tmp = tempfile::tempdir().unwrap();
        let config = config_with_model_dir(tmp.path());

        let err = ensure_model_available(&config).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ArtifactMissing);
    }

    #[test]
    fn test_infer_metadata_url() {
        assert_eq!(
            infer_metadata_url("https://cdn.example.com/releases/phishing_model.onnx").as_deref(),
            Some("https://cdn.example.com/releases/model_metadata.json")
        );
        assert!(infer_metadata_url("https://cdn.example.com/some_other_file.bin").is_none());
    }

    #[test]
    fn test_candidate_paths_prefer_configured_dir() {
        let config = config_with_model_dir(Path::new("/var/lib/phishblock"));
        let paths = candidate_paths(&config);
        assert_eq!(
            paths[0],
            Path::new("/var/lib/phishblock").join(MODEL_FILENAME)
        );
        assert!(paths.len() >= 3);
    }

    #[test]
    fn test_part_path_appends_suffix() {
        assert_eq!(
            part_path(Path::new("models/phishing_model.onnx")),
            Path::new("models/phishing_model.onnx.part")
        );
    }
}
