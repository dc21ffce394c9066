//! Configuration options for recipe resolution.
//!
//! The `Options` struct controls how pages are retrieved and which
//! alternate retrieval variants the resolver may fall back to.

use std::time::Duration;

/// Browser-like user agent sent with every direct request.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124 Safari/537.36";

/// Public reader passthrough used for proxied retrieval.
pub const DEFAULT_PROXY_PREFIX: &str = "https://r.jina.ai/";

/// Configuration options for recipe resolution.
///
/// All fields are public for easy configuration. Use `Default::default()`
/// for standard settings.
///
/// # Example
///
/// ```rust
/// use recipe_resolver::Options;
/// use std::time::Duration;
///
/// let options = Options {
///     use_amp: false,
///     timeout: Duration::from_secs(5),
///     ..Options::default()
/// };
/// assert!(options.use_proxy);
/// ```
#[derive(Debug, Clone)]
pub struct Options {
    /// `User-Agent` header for every request.
    ///
    /// Default: a desktop Chrome user agent
    pub user_agent: String,

    /// `Accept-Language` header for every request.
    ///
    /// Default: `"en-US,en;q=0.9,cs;q=0.8"`
    pub accept_language: String,

    /// Upper bound for a single retrieval attempt, body included.
    ///
    /// A retrieval exceeding it is treated as a failed variant.
    ///
    /// Default: 20 seconds
    pub timeout: Duration,

    /// Prefix of the reader passthrough used by proxied retrieval.
    ///
    /// The target is appended as `scheme://host/path?query`.
    ///
    /// Default: `"https://r.jina.ai/"`
    pub proxy_prefix: String,

    /// Try the reader proxy when the direct variant under-extracts.
    ///
    /// Default: `true`
    pub use_proxy: bool,

    /// Try the `/amp/` variant when earlier variants under-extract.
    ///
    /// Default: `true`
    pub use_amp: bool,

    /// Maximum number of redirects followed per request.
    ///
    /// Default: `10`
    pub max_redirects: usize,

    /// Response bodies longer than this (bytes) are truncated.
    ///
    /// Default: `8 * 1024 * 1024`
    pub max_body_bytes: usize,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            accept_language: "en-US,en;q=0.9,cs;q=0.8".to_string(),
            timeout: Duration::from_secs(20),
            proxy_prefix: DEFAULT_PROXY_PREFIX.to_string(),
            use_proxy: true,
            use_amp: true,
            max_redirects: 10,
            max_body_bytes: 8 * 1024 * 1024,
        }
    }
}
