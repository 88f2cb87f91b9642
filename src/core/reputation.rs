//! Reputation Gate
//!
//! Static allow-list check on a URL's registrable domain. Membership raises
//! the decision threshold for well-known domains; it never bypasses the
//! classifier. Matching is exact on `domain.suffix`: `mail.google.com`
//! resolves to the same registrable domain as `google.com`, but an unlisted
//! sibling (`google.co.uk`) is not matched by the `google.com` entry.

use std::collections::HashSet;

use lazy_static::lazy_static;
use tldextract::{TldExtractor, TldOption};

use crate::core::features::normalize_url;
use crate::utils::constants::POPULAR_DOMAINS;

lazy_static! {
    static ref POPULAR_SET: HashSet<&'static str> = POPULAR_DOMAINS.iter().copied().collect();
    static ref TLD_EXTRACTOR: TldExtractor = TldExtractor::new(TldOption::default());
}

/// Registrable domain (`domain.suffix`, lower-cased) of a URL, or `None`
/// when the URL has no extractable domain.
pub fn registrable_domain(url: &str) -> Option<String> {
    let normalized = normalize_url(url);
    let parts = TLD_EXTRACTOR.extract(&normalized).ok()?;
    match (parts.domain, parts.suffix) {
        (Some(domain), Some(suffix)) if !domain.is_empty() && !suffix.is_empty() => {
            Some(format!("{}.{}", domain, suffix).to_lowercase())
        }
        _ => None,
    }
}

/// Check whether a URL belongs to a popular legitimate domain.
/// Any parse failure fails closed to `false` - an error never grants trust.
pub fn is_popular_domain(url: &str) -> bool {
    registrable_domain(url)
        .map(|domain| POPULAR_SET.contains(domain.as_str()))
        .unwrap_or(false)
}
