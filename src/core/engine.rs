//! Classification Pipeline
//!
//! Single-URL flow (reputation gate -> feature extraction -> model ->
//! decision policy) and the batch orchestrator that fans it out per item.
//! Batch items share nothing mutable; one item's failure becomes a
//! placeholder result and never aborts the rest.

use tracing::debug;

use crate::core::classifier::RiskScorer;
use crate::core::decision::DecisionPolicy;
use crate::core::features::extract_features;
use crate::core::reputation::is_popular_domain;
use crate::models::errors::{AppError, AppResult};
use crate::models::types::{BatchSummary, ClassificationResult};
use crate::utils::constants::MAX_BATCH_URLS;

fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

/// Run the full pipeline for one URL
pub fn classify_url(
    scorer: &dyn RiskScorer,
    policy: &DecisionPolicy,
    url: &str,
) -> AppResult<ClassificationResult> {
    let url = url.trim();

    let popular = is_popular_domain(url);
    let features = extract_features(url)?;
    let probability = scorer.score(&features)?;
    let decision = policy.decide(probability, popular);

    Ok(ClassificationResult {
        url: url.to_string(),
        is_phishing: decision.is_phishing,
        confidence: round4(probability),
        risk_level: decision.risk_level,
        is_popular_domain: popular,
        features: Some(features),
        recommendation: decision.recommendation,
    })
}

/// Classify an ordered list of URLs.
///
/// Rejects the whole call before any extraction when the list exceeds the
/// cap. Output length always equals input length, in input order; failed
/// items are replaced with an `unknown` placeholder.
pub fn classify_batch(
    scorer: &dyn RiskScorer,
    policy: &DecisionPolicy,
    urls: &[String],
) -> AppResult<BatchSummary> {
    if urls.len() > MAX_BATCH_URLS {
        return Err(AppError::batch_too_large(urls.len(), MAX_BATCH_URLS));
    }

    let mut results = Vec::with_capacity(urls.len());
    let mut phishing_detected = 0;

    for url in urls {
        match classify_url(scorer, policy, url) {
            Ok(result) => {
                if result.is_phishing {
                    phishing_detected += 1;
                }
                results.push(result);
            }
            Err(e) => {
                debug!("Batch item failed ({}): {}", url, e);
                results.push(ClassificationResult::unavailable(url.as_str()));
            }
        }
    }

    Ok(BatchSummary {
        total_analyzed: results.len(),
        phishing_detected,
        results,
    })
}
