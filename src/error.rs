//! Error types for recipe resolution.
//!
//! This module defines the errors surfaced to the caller of a resolution
//! request. Per-variant retrieval failures and per-strategy failures never
//! reach this type; they are absorbed by the resolver.

use serde::Serialize;

/// Error type for resolution operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The input was not an absolute http(s) URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Every attempted retrieval variant failed.
    #[error("Fetch failed: {message}")]
    Fetch {
        /// Status code of the last attempted variant, if any response arrived.
        status: Option<u16>,
        /// Human-readable description of the last failure.
        message: String,
    },

    /// The page was reachable but no ingredients or steps were found.
    #[error("No recipe content found")]
    NoContent,

    /// The HTTP client could not be constructed.
    #[error("HTTP client error: {0}")]
    Client(String),
}

impl Error {
    /// Machine-readable failure reason.
    #[must_use]
    pub fn reason(&self) -> &'static str {
        match self {
            Self::InvalidUrl(_) => "invalid_url",
            Self::Fetch { .. } => "fetch_failed",
            Self::NoContent => "no_content",
            Self::Client(_) => "client_error",
        }
    }

    /// Underlying HTTP status, when one is known.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Fetch { status, .. } => *status,
            _ => None,
        }
    }

    /// Structured `{error, status?}` payload for the request boundary.
    #[must_use]
    pub fn to_payload(&self) -> ErrorPayload {
        ErrorPayload {
            error: self.reason().to_string(),
            message: self.to_string(),
            status: self.status(),
        }
    }
}

/// Serializable failure payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorPayload {
    /// Machine-readable reason (see [`Error::reason`]).
    pub error: String,
    /// Human-readable message.
    pub message: String,
    /// HTTP status of the last retrieval attempt, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
}

/// Result type alias for resolution operations.
pub type Result<T> = std::result::Result<T, Error>;
