//! URL Utility Functions
//!
//! Validation of the inbound URL, derivation of the alternate retrieval
//! targets (reader proxy, AMP) and resolution of relative references.

use url::Url;

use crate::{Error, Result};

/// Check if a string is a valid absolute http(s) URL.
///
/// # Returns
/// * `(is_absolute, parsed_url)` - Whether URL is absolute and the parsed URL if valid
#[must_use]
pub fn is_absolute_url(s: &str) -> (bool, Option<Url>) {
    let s = s.trim();

    if !s.starts_with("http://") && !s.starts_with("https://") {
        return (false, None);
    }

    match Url::parse(s) {
        Ok(url) if url.host().is_some() => (true, Some(url)),
        _ => (false, None),
    }
}

/// Parse the inbound request URL, rejecting anything that is not absolute http(s).
pub fn parse_target(s: &str) -> Result<Url> {
    match is_absolute_url(s) {
        (true, Some(url)) => Ok(url),
        _ => Err(Error::InvalidUrl(s.trim().to_string())),
    }
}

/// Convert a relative or absolute URL to absolute form.
///
/// # Returns
/// * The absolute URL string, or the original if resolution fails
#[must_use]
pub fn create_absolute_url(url_str: &str, base: &Url) -> String {
    let url_str = url_str.trim();

    if url_str.is_empty() {
        return String::new();
    }

    // Preserve special URLs unchanged
    if url_str.starts_with("data:") {
        return url_str.to_string();
    }

    let (is_abs, _) = is_absolute_url(url_str);
    if is_abs {
        return url_str.to_string();
    }

    match base.join(url_str) {
        Ok(resolved) => resolved.to_string(),
        Err(_) => url_str.to_string(),
    }
}

/// Origin of a URL with a trailing slash, used as the `Referer` header.
///
/// `https://example.com:8080/a/b?c` becomes `https://example.com:8080/`.
#[must_use]
pub fn referer_for(url: &Url) -> String {
    format!("{}/", url.origin().ascii_serialization())
}

/// Reader-proxy target: `prefix` followed by `scheme://host/path?query`.
///
/// The host keeps its explicit port, the fragment is dropped.
#[must_use]
pub fn proxy_url(prefix: &str, url: &Url) -> String {
    let host = match (url.host_str(), url.port()) {
        (Some(h), Some(p)) => format!("{h}:{p}"),
        (Some(h), None) => h.to_string(),
        (None, _) => String::new(),
    };
    let query = url.query().map(|q| format!("?{q}")).unwrap_or_default();

    format!("{prefix}{}://{host}{}{query}", url.scheme(), url.path())
}

/// AMP variant of a URL: trailing slash stripped from the path, `/amp/` appended.
///
/// Returns `None` when the URL already points at an AMP page.
#[must_use]
pub fn amp_url(url: &Url) -> Option<Url> {
    let path = url.path().trim_end_matches('/');
    if path.ends_with("/amp") {
        return None;
    }

    let mut amp = url.clone();
    amp.set_path(&format!("{path}/amp/"));
    amp.set_fragment(None);
    Some(amp)
}
