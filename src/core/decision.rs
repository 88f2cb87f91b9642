//! Decision Policy
//!
//! Combines the model probability with the reputation gate into the final
//! verdict: phishing flag, risk bucket, and a single human-readable
//! recommendation. The bucket is derived from the probability alone; the
//! flag compares against an effective threshold that is raised for popular
//! domains.

use crate::models::types::RiskLevel;
use crate::utils::constants::{DEFAULT_THRESHOLD, POPULAR_DOMAIN_THRESHOLD};

const RECOMMENDATION_POPULAR: &str = "This appears to be a legitimate popular website.";
const RECOMMENDATION_PHISHING: &str =
    "WARNING: This URL shows strong phishing indicators. Do not enter any personal information.";
const RECOMMENDATION_CAUTION: &str =
    "Exercise caution. Verify the website's authenticity before proceeding.";
const RECOMMENDATION_NEUTRAL: &str = "No significant phishing indicators detected.";

/// Outcome of the policy, minus the url/feature passthrough fields
#[derive(Debug, Clone)]
pub struct Decision {
    pub is_phishing: bool,
    pub risk_level: RiskLevel,
    pub recommendation: String,
}

/// Fixed decision policy, built once at startup from model metadata
#[derive(Debug, Clone, Copy)]
pub struct DecisionPolicy {
    /// Threshold applied to non-popular domains
    pub base_threshold: f64,
}

impl Default for DecisionPolicy {
    fn default() -> Self {
        Self {
            base_threshold: DEFAULT_THRESHOLD,
        }
    }
}

impl DecisionPolicy {
    pub fn new(base_threshold: f64) -> Self {
        Self { base_threshold }
    }

    /// Popular domains must clear a higher bar before being flagged
    pub fn effective_threshold(&self, is_popular: bool) -> f64 {
        if is_popular {
            POPULAR_DOMAIN_THRESHOLD
        } else {
            self.base_threshold
        }
    }

    /// Render the verdict for a probability and reputation result.
    ///
    /// Recommendation priority: popular-and-clean wins over everything,
    /// then the phishing warning, then the medium-bucket caution, then
    /// neutral. Exactly one message is produced.
    pub fn decide(&self, probability: f64, is_popular: bool) -> Decision {
        let is_phishing = probability >= self.effective_threshold(is_popular);
        let risk_level = RiskLevel::from_probability(probability);

        let recommendation = if is_popular && !is_phishing {
            RECOMMENDATION_POPULAR
        } else if is_phishing {
            RECOMMENDATION_PHISHING
        } else if risk_level == RiskLevel::Medium {
            RECOMMENDATION_CAUTION
        } else {
            RECOMMENDATION_NEUTRAL
        };

        Decision {
            is_phishing,
            risk_level,
            recommendation: recommendation.to_string(),
        }
    }
}
