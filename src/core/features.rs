//! Feature Extraction Module
//!
//! Turns a raw URL into the fixed 16-element numeric vector the model was
//! trained on. This is the single place where cross-surface parity is
//! load-bearing: the browser-side runtime computes the same map, and any
//! divergence silently breaks detection. Pure function of the input URL and
//! the fixed lists in `utils::constants` - no I/O, no shared mutable state.

use std::borrow::Cow;

use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use tldextract::{TldExtractor, TldOption, TldResult};
use url::Url;

use crate::models::errors::{AppError, AppResult};
use crate::utils::constants::{FEATURE_COUNT, SUSPICIOUS_KEYWORDS, SUSPICIOUS_TLDS};

lazy_static! {
    /// Four dot-separated groups of 1-3 digits. Octets are NOT range-checked
    /// (999.999.999.999 counts as an IP) - known limitation of the trained
    /// feature, preserved for model compatibility.
    static ref IP_PATTERN: Regex =
        Regex::new(r"^\d{1,3}\.\d{1,3}\.\d{1,3}\.\d{1,3}$").unwrap();

    static ref TLD_EXTRACTOR: TldExtractor = TldExtractor::new(TldOption::default());
}

/// The 16 URL features, declared in canonical order. Serialization order is
/// the declaration order, so the name->value map on the wire matches the
/// order the model consumes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UrlFeatures {
    pub domain_length: u32,
    pub qty_dot_domain: u32,
    pub qty_hyphen_domain: u32,
    pub domain_entropy: f64,
    pub is_ip: u32,
    pub path_length: u32,
    pub qty_slash_path: u32,
    pub qty_hyphen_path: u32,
    pub sus_keywords_count: u32,
    pub qty_double_slash: u32,
    pub has_suspicious_tld: u32,
    pub is_https: u32,
    pub subdomain_depth: u32,
    pub digit_ratio: f64,
    pub special_char_count: u32,
    pub domain_path_ratio: f64,
}

impl UrlFeatures {
    /// Model input vector in canonical feature order
    pub fn to_array(&self) -> [f32; FEATURE_COUNT] {
        [
            self.domain_length as f32,
            self.qty_dot_domain as f32,
            self.qty_hyphen_domain as f32,
            self.domain_entropy as f32,
            self.is_ip as f32,
            self.path_length as f32,
            self.qty_slash_path as f32,
            self.qty_hyphen_path as f32,
            self.sus_keywords_count as f32,
            self.qty_double_slash as f32,
            self.has_suspicious_tld as f32,
            self.is_https as f32,
            self.subdomain_depth as f32,
            self.digit_ratio as f32,
            self.special_char_count as f32,
            self.domain_path_ratio as f32,
        ]
    }
}

/// Prepend `http://` when the input carries no scheme. Idempotent; the
/// prefix check is case-sensitive (HTTPS detection is separate and
/// case-insensitive, against the original string).
pub fn normalize_url(raw: &str) -> Cow<'_, str> {
    if raw.starts_with("http://") || raw.starts_with("https://") {
        Cow::Borrowed(raw)
    } else {
        Cow::Owned(format!("http://{}", raw))
    }
}

/// Shannon entropy in bits over the byte-value histogram of `text`.
/// Empty input has entropy 0.
pub fn shannon_entropy(text: &str) -> f64 {
    if text.is_empty() {
        return 0.0;
    }
    let mut histogram = [0u32; 256];
    for byte in text.bytes() {
        histogram[byte as usize] += 1;
    }
    let len = text.len() as f64;
    histogram
        .iter()
        .filter(|&&count| count > 0)
        .map(|&count| {
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Split the normalized URL into (host, path) by string position: the path
/// starts at the first `/` after the authority and stops at `?` or `#`.
/// A bare host yields an empty path - `Url::path()` would report "/" there
/// and silently skew path_length, qty_slash_path, and domain_path_ratio
/// relative to the client-side extractor.
fn split_host_path(normalized: &str) -> (&str, &str) {
    let rest = normalized
        .split_once("://")
        .map(|(_, rest)| rest)
        .unwrap_or(normalized);
    let end = rest.find(|c| c == '?' || c == '#').unwrap_or(rest.len());
    let rest = &rest[..end];
    match rest.find('/') {
        Some(idx) => (&rest[..idx], &rest[idx..]),
        None => (rest, ""),
    }
}

fn join_domain_parts(parts: &TldResult) -> String {
    [
        parts.subdomain.as_deref(),
        parts.domain.as_deref(),
        parts.suffix.as_deref(),
    ]
    .into_iter()
    .flatten()
    .filter(|part| !part.is_empty())
    .collect::<Vec<_>>()
    .join(".")
}

/// Extract all 16 features from a URL.
///
/// Returns `ErrorCode::UrlUnparseable` for malformed input; the caller never
/// observes a partial vector. A structurally valid URL with empty domain
/// parts is not a failure - it produces a vector of zeros for the domain
/// features.
pub fn extract_features(raw_url: &str) -> AppResult<UrlFeatures> {
    let normalized = normalize_url(raw_url);

    match Url::parse(&normalized) {
        Ok(_) => {}
        // Dotted-digit hosts with out-of-range octets must still classify
        // (the IP pattern skips the 0-255 check), so they pass the gate.
        Err(url::ParseError::InvalidIpv4Address) => {}
        Err(e) => {
            return Err(AppError::url_unparseable(format!("{}: {}", raw_url, e)));
        }
    }

    let (host, path) = split_host_path(&normalized);

    // IP hosts have no registrable domain; the host itself is the domain.
    let (full_domain, subdomain, suffix) = if IP_PATTERN.is_match(host) {
        (host.to_string(), None, None)
    } else {
        let parts = TLD_EXTRACTOR
            .extract(&normalized)
            .map_err(|e| AppError::url_unparseable(format!("{}: {}", raw_url, e)))?;
        let full = join_domain_parts(&parts);
        (full, parts.subdomain, parts.suffix)
    };

    let lower_url = normalized.to_lowercase();

    let domain_length = full_domain.chars().count() as u32;
    let path_length = path.chars().count() as u32;

    let suffix_with_dot = suffix
        .as_deref()
        .filter(|s| !s.is_empty())
        .map(|s| format!(".{}", s.to_lowercase()));
    let has_suspicious_tld = suffix_with_dot
        .as_deref()
        .map(|tld| SUSPICIOUS_TLDS.contains(&tld))
        .unwrap_or(false) as u32;

    let digit_ratio = if domain_length == 0 {
        0.0
    } else {
        full_domain.chars().filter(|c| c.is_ascii_digit()).count() as f64 / domain_length as f64
    };

    Ok(UrlFeatures {
        domain_length,
        qty_dot_domain: full_domain.matches('.').count() as u32,
        qty_hyphen_domain: full_domain.matches('-').count() as u32,
        domain_entropy: shannon_entropy(&full_domain),
        is_ip: IP_PATTERN.is_match(&full_domain) as u32,
        path_length,
        qty_slash_path: path.matches('/').count() as u32,
        qty_hyphen_path: path.matches('-').count() as u32,
        sus_keywords_count: SUSPICIOUS_KEYWORDS
            .iter()
            .filter(|keyword| lower_url.contains(*keyword))
            .count() as u32,
        qty_double_slash: path.matches("//").count() as u32,
        has_suspicious_tld,
        // Scheme check runs on the original string: normalization already
        // stamped http:// onto everything else.
        is_https: raw_url
            .get(..8)
            .map(|prefix| prefix.eq_ignore_ascii_case("https://"))
            .unwrap_or(false) as u32,
        subdomain_depth: subdomain
            .as_deref()
            .filter(|s| !s.is_empty())
            .map(|s| s.split('.').count())
            .unwrap_or(0) as u32,
        digit_ratio,
        special_char_count: full_domain
            .chars()
            .filter(|c| !c.is_alphanumeric() && *c != '.')
            .count() as u32,
        // +1 keeps the ratio defined for empty paths
        domain_path_ratio: domain_length as f64 / (path_length as f64 + 1.0),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::constants::FEATURE_NAMES;

    #[test]
    fn test_normalize_is_idempotent() {
        let once = normalize_url("example.com/login");
        let twice = normalize_url(&once);
        assert_eq!(once, twice);
        assert_eq!(once, "http://example.com/login");

        assert_eq!(normalize_url("https://example.com"), "https://example.com");
    }

    #[test]
    fn test_entropy_empty_and_uniform() {
        assert_eq!(shannon_entropy(""), 0.0);
        assert_eq!(shannon_entropy("aaaaaa"), 0.0);
    }

    #[test]
    fn test_entropy_permutation_invariant() {
        let a = shannon_entropy("google.com");
        let b = shannon_entropy("com.googel");
        assert!((a - b).abs() < 1e-12);
    }

    #[test]
    fn test_entropy_two_symbols_is_one_bit() {
        assert!((shannon_entropy("abab") - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_ip_pattern_matches_without_octet_range_check() {
        let ip = extract_features("192.168.1.1").unwrap();
        assert_eq!(ip.is_ip, 1);

        let not_ip = extract_features("not-an-ip.com").unwrap();
        assert_eq!(not_ip.is_ip, 0);

        // Documented limitation: octets are not range-validated.
        let overflow = extract_features("999.999.999.999").unwrap();
        assert_eq!(overflow.is_ip, 1);
    }

    #[test]
    fn test_ip_host_scenario() {
        let features = extract_features("http://192.168.1.1/admin").unwrap();
        assert_eq!(features.is_ip, 1);
        assert_eq!(features.domain_length, 11);
        assert_eq!(features.qty_dot_domain, 3);
        assert!(features.sus_keywords_count >= 1, "matches 'admin'");
        assert_eq!(features.path_length, 6);
        assert_eq!(features.qty_slash_path, 1);
        assert_eq!(features.subdomain_depth, 0);
    }

    #[test]
    fn test_bare_host_has_empty_path() {
        let features = extract_features("https://google.com").unwrap();
        assert_eq!(features.path_length, 0);
        assert_eq!(features.qty_slash_path, 0);
        // +1 in the denominator: no division by zero on empty paths
        assert_eq!(features.domain_path_ratio, 10.0);
        assert_eq!(features.is_https, 1);
    }

    #[test]
    fn test_https_detection_uses_original_string() {
        assert_eq!(extract_features("http://example.com").unwrap().is_https, 0);
        assert_eq!(extract_features("example.com").unwrap().is_https, 0);
        assert_eq!(extract_features("HTTPS://example.com").unwrap().is_https, 1);
    }

    #[test]
    fn test_suspicious_tld_and_keywords() {
        let features = extract_features("http://secure-login.example.tk/verify-account").unwrap();
        assert_eq!(features.has_suspicious_tld, 1);
        // secure, login, verify, account
        assert_eq!(features.sus_keywords_count, 4);
        assert_eq!(features.qty_hyphen_domain, 1);
        assert_eq!(features.qty_hyphen_path, 1);
    }

    #[test]
    fn test_subdomain_depth() {
        let flat = extract_features("http://example.com").unwrap();
        assert_eq!(flat.subdomain_depth, 0);

        let one = extract_features("http://mail.example.com").unwrap();
        assert_eq!(one.subdomain_depth, 1);

        let two = extract_features("http://a.b.example.com").unwrap();
        assert_eq!(two.subdomain_depth, 2);
    }

    #[test]
    fn test_double_slash_counted_in_path_only() {
        let features = extract_features("https://example.com/a//b//c").unwrap();
        // The scheme's // never counts; only the path's.
        assert_eq!(features.qty_double_slash, 2);
    }

    #[test]
    fn test_query_and_fragment_excluded_from_path() {
        let features = extract_features("http://example.com/watch?v=abc#frag").unwrap();
        assert_eq!(features.path_length, 6); // "/watch"
        let bare_query = extract_features("http://example.com?admin=1").unwrap();
        assert_eq!(bare_query.path_length, 0);
    }

    #[test]
    fn test_digit_ratio_and_special_chars() {
        let features = extract_features("http://abc123.com").unwrap();
        // full_domain "abc123.com": 3 digits of 10 chars
        assert!((features.digit_ratio - 0.3).abs() < 1e-12);
        assert_eq!(features.special_char_count, 0);

        let hyphenated = extract_features("http://my-site.com").unwrap();
        assert_eq!(hyphenated.special_char_count, 1);
    }

    #[test]
    fn test_malformed_url_is_rejected_whole() {
        assert!(extract_features("http://exa mple.com/path").is_err());
        assert!(extract_features("http://").is_err());
    }

    #[test]
    fn test_vector_order_matches_canonical_names() {
        let features = extract_features("https://mail.google.com/inbox").unwrap();
        let array = features.to_array();
        assert_eq!(array.len(), FEATURE_NAMES.len());

        // Serialized field order is the canonical order.
        let json = serde_json::to_string(&features).unwrap();
        let positions: Vec<usize> = FEATURE_NAMES
            .iter()
            .map(|name| json.find(&format!("\"{}\"", name)).unwrap())
            .collect();
        assert!(
            positions.windows(2).all(|pair| pair[0] < pair[1]),
            "feature keys serialized out of canonical order"
        );
    }
}
