//! Error types for imageset-dl
//!
//! Two layers of error handling:
//! - [`Error`] — crate-wide operational errors (parsing, packaging, I/O,
//!   factory misuse)
//! - [`FetchError`] — the closed per-item failure taxonomy attached to batch
//!   results and surfaced through item-error events

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for imageset-dl operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for imageset-dl
#[derive(Debug, Error)]
pub enum Error {
    /// CSV parse or serialize failure
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Zip packaging failure
    #[error("archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// Image decode or encode failure outside the per-item path
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// HTTP client construction or other non-item-level network failure
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Caller requested an unknown record-store variant
    #[error("unsupported source: {0}")]
    UnsupportedSource(String),

    /// Caller requested an unknown exporter variant
    #[error("unsupported target: {0}")]
    UnsupportedTarget(String),

    /// Other error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Short machine-readable name of the error variant, used as the
    /// error-kind field when failures are routed to the logging channel.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Csv(_) => "csv",
            Error::Io(_) => "io",
            Error::Archive(_) => "archive",
            Error::Image(_) => "image",
            Error::Network(_) => "network",
            Error::Serialization(_) => "serialization",
            Error::UnsupportedSource(_) => "unsupported_source",
            Error::UnsupportedTarget(_) => "unsupported_target",
            Error::Other(_) => "other",
        }
    }
}

/// Status text substituted for an HTTP 429 response with a blank reason phrase
const TOO_MANY_REQUESTS: &str = "Too many requests";

/// Fixed status text for transport-level failures where no response was obtained
const NETWORK_STATUS_TEXT: &str = "Network or CORS error";

/// Per-item retrieval failure, classified once at the point of failure.
///
/// The taxonomy is closed: a failure is either transport-level ([`Network`]),
/// a response with a failing status ([`HttpStatus`]), or anything else passed
/// through unchanged ([`Generic`]). Instances are immutable once constructed
/// and are never re-derived from a message string.
///
/// [`Network`]: FetchError::Network
/// [`HttpStatus`]: FetchError::HttpStatus
/// [`Generic`]: FetchError::Generic
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FetchError {
    /// The transport failed before any response was obtained
    #[error("failed to fetch {url}: Network or CORS error")]
    Network {
        /// The seed URL that could not be reached
        url: String,
    },

    /// A response was obtained but its status indicates failure
    #[error("failed to fetch {url}: HTTP {status} {status_text}")]
    HttpStatus {
        /// HTTP status code of the failing response
        status: u16,
        /// Reason phrase of the failing response
        status_text: String,
        /// The seed URL that was fetched
        url: String,
    },

    /// Any other failure, passed through unchanged
    #[error("{message}")]
    Generic {
        /// The original failure message
        message: String,
    },
}

impl FetchError {
    /// Transport-level failure for the given seed URL.
    pub fn network(url: impl Into<String>) -> Self {
        FetchError::Network { url: url.into() }
    }

    /// Failing-status response for the given seed URL.
    ///
    /// A blank reason phrase paired with status 429 is rewritten to a fixed
    /// human-readable text at construction time.
    pub fn http_status(status: u16, status_text: impl Into<String>, url: impl Into<String>) -> Self {
        let mut status_text = status_text.into();
        if status_text.is_empty() && status == 429 {
            status_text = TOO_MANY_REQUESTS.to_string();
        }
        FetchError::HttpStatus {
            status,
            status_text,
            url: url.into(),
        }
    }

    /// Unclassified failure carrying the original message.
    pub fn generic(message: impl Into<String>) -> Self {
        FetchError::Generic {
            message: message.into(),
        }
    }

    /// Display name of the failure class.
    pub fn kind_name(&self) -> &'static str {
        match self {
            FetchError::Network { .. } => "NetworkError",
            FetchError::HttpStatus { .. } => "HTTPError",
            FetchError::Generic { .. } => "Error",
        }
    }

    /// HTTP status code, present only for failing-status responses.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            FetchError::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Status text, present for transport failures (fixed) and failing-status
    /// responses (from the response, after the 429 rewrite).
    pub fn status_text(&self) -> Option<&str> {
        match self {
            FetchError::Network { .. } => Some(NETWORK_STATUS_TEXT),
            FetchError::HttpStatus { status_text, .. } => Some(status_text),
            FetchError::Generic { .. } => None,
        }
    }

    /// The seed URL the failure relates to, when known.
    pub fn url(&self) -> Option<&str> {
        match self {
            FetchError::Network { url } | FetchError::HttpStatus { url, .. } => Some(url),
            FetchError::Generic { .. } => None,
        }
    }

    /// Label written into a row's status column when the item fails.
    pub fn row_status(&self) -> String {
        match self {
            FetchError::Network { .. } => {
                format!("{} {}", self.kind_name(), NETWORK_STATUS_TEXT)
            }
            FetchError::HttpStatus {
                status, status_text, ..
            } => format!("{} {} {}", self.kind_name(), status, status_text),
            FetchError::Generic { message } => format!("{} {}", self.kind_name(), message),
        }
    }
}
