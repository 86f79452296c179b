//! Error type shared by the scraper core and the exporters.
//!
//! Every variant raised by a remote call carries the endpoint that failed,
//! so a run that aborts tells the operator which request broke.

use thiserror::Error;

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, ScraperError>;

/// Everything that can abort a scraping run or an export.
///
/// Per-leader article failures never surface here; they are recorded on the
/// leader instead.
#[derive(Debug, Error)]
pub enum ScraperError {
    /// Connection failure, timeout, or body read failure.
    #[error("request to {endpoint} failed: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{endpoint} returned HTTP {status}")]
    Status { endpoint: String, status: u16 },

    /// The API kept rejecting the credential after one refresh.
    #[error("{endpoint} rejected the session credential")]
    Unauthorized { endpoint: String },

    /// The upstream API answered with JSON that doesn't match the expected shape.
    #[error("could not decode response from {endpoint}: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("{endpoint} did not set a session cookie")]
    MissingCredential { endpoint: String },

    #[error("invalid base URL {0:?}")]
    BaseUrl(String),

    #[error("enrichment was cancelled")]
    Cancelled,

    #[error("failed to load config {path}: {source}")]
    Config {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),
}

impl ScraperError {
    pub(crate) fn transport(endpoint: impl Into<String>, source: reqwest::Error) -> Self {
        ScraperError::Transport {
            endpoint: endpoint.into(),
            source,
        }
    }

    /// True for failures that a credential refresh might fix.
    pub fn is_auth_rejection(&self) -> bool {
        matches!(self, ScraperError::Status { status: 401 | 403, .. })
    }
}
