//! Constants Module - Single Source of Truth
//!
//! Every fixed list the classifier depends on lives here: the canonical
//! feature order the model was trained on, the keyword/TLD heuristics, the
//! popular-domain allow list, and the artifact acquisition defaults.
//! No hardcoded copies in other modules.

// ============================================
// APPLICATION CONSTANTS
// ============================================

/// Application name
pub const APP_NAME: &str = "PhishBlock";

/// Application version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// User-Agent for HTTP requests
pub const USER_AGENT: &str = "PhishBlock/0.1.0";

// ============================================
// CANONICAL FEATURE ORDER
// ============================================

/// Number of features the model consumes
pub const FEATURE_COUNT: usize = 16;

/// Feature names in the exact order the model was trained on.
/// This order is an invariant: the server, the client runtime, and the
/// trained artifact must all agree on it. Reordering silently breaks
/// detection.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "domain_length",
    "qty_dot_domain",
    "qty_hyphen_domain",
    "domain_entropy",
    "is_ip",
    "path_length",
    "qty_slash_path",
    "qty_hyphen_path",
    "sus_keywords_count",
    "qty_double_slash",
    "has_suspicious_tld",
    "is_https",
    "subdomain_depth",
    "digit_ratio",
    "special_char_count",
    "domain_path_ratio",
];

// ============================================
// HEURISTIC LISTS
// ============================================

/// Keywords that frequently appear in credential-harvesting URLs.
/// Matched case-insensitively as substrings of the full URL.
pub const SUSPICIOUS_KEYWORDS: [&str; 13] = [
    "login", "verify", "update", "account", "secure", "banking", "confirm",
    "signin", "password", "wallet", "crypto", "admin", "service",
];

/// TLDs with disproportionate abuse rates (free or near-free registrations)
pub const SUSPICIOUS_TLDS: [&str; 10] = [
    ".tk", ".ml", ".ga", ".cf", ".gq", ".xyz", ".top", ".club", ".work",
    ".buzz",
];

/// Popular legitimate registrable domains. Membership raises the decision
/// threshold; it never bypasses classification.
pub const POPULAR_DOMAINS: [&str; 28] = [
    "google.com",
    "youtube.com",
    "facebook.com",
    "twitter.com",
    "x.com",
    "instagram.com",
    "linkedin.com",
    "github.com",
    "microsoft.com",
    "apple.com",
    "amazon.com",
    "netflix.com",
    "reddit.com",
    "wikipedia.org",
    "stackoverflow.com",
    "medium.com",
    "twitch.tv",
    "discord.com",
    "whatsapp.com",
    "telegram.org",
    "zoom.us",
    "dropbox.com",
    "paypal.com",
    "stripe.com",
    "shopify.com",
    "wordpress.com",
    "blogger.com",
    "tumblr.com",
];

// ============================================
// DECISION POLICY
// ============================================

/// Decision threshold when metadata does not recommend one
pub const DEFAULT_THRESHOLD: f64 = 0.50;

/// Raised threshold applied to popular domains
pub const POPULAR_DOMAIN_THRESHOLD: f64 = 0.80;

/// Maximum URLs accepted per batch request
pub const MAX_BATCH_URLS: usize = 100;

// ============================================
// MODEL ARTIFACT ACQUISITION
// ============================================

/// Filename of the trained model artifact
pub const MODEL_FILENAME: &str = "phishing_model.onnx";

/// Filename of the sibling metadata file
pub const METADATA_FILENAME: &str = "model_metadata.json";

/// Directory the artifact is downloaded into when absent locally
pub const DEFAULT_MODEL_DIR: &str = "models";

/// Ceiling for the streamed artifact download (250 MB)
pub const DEFAULT_MODEL_MAX_BYTES: u64 = 250 * 1024 * 1024;

/// Ceiling for the metadata download (1 MB)
pub const DEFAULT_METADATA_MAX_BYTES: u64 = 1024 * 1024;
