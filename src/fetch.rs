//! Document retrieval.
//!
//! A [`Fetch`] implementation turns a target URL and a [`RetrievalMode`] into
//! a [`Fetched`] document. Retrieval never returns an error: network
//! failures, timeouts and non-success statuses all come back as
//! `succeeded == false` so the resolver can move on to the next variant.

use std::fmt;
use std::future::Future;
use std::time::Instant;

use reqwest::header::{
    HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CACHE_CONTROL, CONTENT_TYPE, PRAGMA, REFERER,
    UPGRADE_INSECURE_REQUESTS,
};
use reqwest::redirect::Policy;
use serde::Serialize;
use tracing::{info, warn};
use url::Url;

use crate::encoding::decode_body;
use crate::error::{Error, Result};
use crate::options::Options;
use crate::url_utils;

const ACCEPT_HTML: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,*/*;q=0.8";

/// How a document variant is obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RetrievalMode {
    /// The target URL itself.
    Direct,
    /// The target through the reader passthrough.
    Proxied,
    /// The target's `/amp/` variant.
    Amp,
}

impl RetrievalMode {
    /// Lowercase name used in logs and reports.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Direct => "direct",
            Self::Proxied => "proxied",
            Self::Amp => "amp",
        }
    }
}

impl fmt::Display for RetrievalMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// URL actually requested for `mode`, or `None` when the variant does not
/// exist (the target is already an AMP page).
#[must_use]
pub fn variant_url(target: &Url, mode: RetrievalMode, proxy_prefix: &str) -> Option<String> {
    match mode {
        RetrievalMode::Direct => Some(target.to_string()),
        RetrievalMode::Proxied => Some(url_utils::proxy_url(proxy_prefix, target)),
        RetrievalMode::Amp => url_utils::amp_url(target).map(String::from),
    }
}

/// Outcome of one retrieval attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fetched {
    /// Variant that was requested.
    pub mode: RetrievalMode,
    /// URL actually requested.
    pub url: String,
    /// A success status arrived and the body was read.
    pub succeeded: bool,
    /// HTTP status; `None` when no response arrived.
    pub status: Option<u16>,
    /// Decoded body; empty unless `succeeded`.
    pub text: String,
    /// Why the attempt failed.
    pub error: Option<String>,
}

impl Fetched {
    /// Successful retrieval.
    #[must_use]
    pub fn ok(mode: RetrievalMode, url: impl Into<String>, status: u16, text: impl Into<String>) -> Self {
        Self {
            mode,
            url: url.into(),
            succeeded: true,
            status: Some(status),
            text: text.into(),
            error: None,
        }
    }

    /// Failed retrieval, with the status when a response arrived.
    #[must_use]
    pub fn failed(
        mode: RetrievalMode,
        url: impl Into<String>,
        status: Option<u16>,
        error: impl Into<String>,
    ) -> Self {
        Self {
            mode,
            url: url.into(),
            succeeded: false,
            status,
            text: String::new(),
            error: Some(error.into()),
        }
    }
}

/// Retrieval of one document variant.
///
/// Implementations must not fail: every problem is reported through
/// [`Fetched::succeeded`].
pub trait Fetch: Send + Sync {
    fn fetch(&self, target: &Url, mode: RetrievalMode) -> impl Future<Output = Fetched> + Send;
}

/// [`Fetch`] over HTTP with browser-like headers.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    options: Options,
}

impl HttpFetcher {
    /// Build the HTTP client for `options`.
    pub fn new(options: &Options) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_HTML));
        headers.insert(UPGRADE_INSECURE_REQUESTS, HeaderValue::from_static("1"));
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));
        headers.insert(PRAGMA, HeaderValue::from_static("no-cache"));
        let accept_language =
            HeaderValue::from_str(&options.accept_language).map_err(|e| Error::Client(e.to_string()))?;
        headers.insert(ACCEPT_LANGUAGE, accept_language);

        let client = reqwest::Client::builder()
            .user_agent(options.user_agent.as_str())
            .default_headers(headers)
            .redirect(Policy::limited(options.max_redirects))
            .timeout(options.timeout)
            .build()
            .map_err(|e| Error::Client(e.to_string()))?;

        Ok(Self { client, options: options.clone() })
    }

    /// Options the fetcher was built with.
    #[must_use]
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// GET `url` on behalf of `target`; the `Referer` is always the target's origin.
    async fn request(&self, url: &Url, target: &Url) -> std::result::Result<(u16, String), (Option<u16>, String)> {
        let response = self
            .client
            .get(url.as_str())
            .header(REFERER, url_utils::referer_for(target))
            .send()
            .await
            .map_err(|e| (e.status().map(|s| s.as_u16()), describe(&e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err((Some(status.as_u16()), format!("HTTP {status}")));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let body = self.read_body(response).await.map_err(|e| (Some(status.as_u16()), describe(&e)))?;
        Ok((status.as_u16(), decode_body(&body, content_type.as_deref())))
    }

    /// Read the body chunk by chunk, stopping at `max_body_bytes`.
    async fn read_body(&self, mut response: reqwest::Response) -> reqwest::Result<Vec<u8>> {
        let limit = self.options.max_body_bytes;
        let mut body = Vec::new();
        while let Some(chunk) = response.chunk().await? {
            let room = limit.saturating_sub(body.len());
            if chunk.len() > room {
                body.extend_from_slice(&chunk[..room]);
                warn!(limit, "response body truncated");
                break;
            }
            body.extend_from_slice(&chunk);
        }
        Ok(body)
    }
}

fn describe(e: &reqwest::Error) -> String {
    if e.is_timeout() {
        format!("timeout: {e}")
    } else if e.is_connect() {
        format!("connect error: {e}")
    } else if e.is_redirect() {
        format!("redirect error: {e}")
    } else {
        format!("request error: {e}")
    }
}

impl Fetch for HttpFetcher {
    async fn fetch(&self, target: &Url, mode: RetrievalMode) -> Fetched {
        let Some(request_url) = variant_url(target, mode, &self.options.proxy_prefix) else {
            return Fetched::failed(mode, target.as_str(), None, "no such variant");
        };
        let url = match Url::parse(&request_url) {
            Ok(url) => url,
            Err(e) => return Fetched::failed(mode, request_url, None, format!("invalid variant URL: {e}")),
        };

        let started = Instant::now();
        let attempt = tokio::time::timeout(self.options.timeout, self.request(&url, target)).await;
        let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

        match attempt {
            Ok(Ok((status, text))) => {
                info!(url = %request_url, %mode, status, elapsed_ms, bytes = text.len(), "retrieved");
                Fetched::ok(mode, request_url, status, text)
            }
            Ok(Err((status, message))) => {
                warn!(url = %request_url, %mode, ?status, elapsed_ms, error = %message, "retrieval failed");
                Fetched::failed(mode, request_url, status, message)
            }
            Err(_) => {
                warn!(url = %request_url, %mode, elapsed_ms, "retrieval timed out");
                Fetched::failed(mode, request_url, None, "timed out")
            }
        }
    }
}
