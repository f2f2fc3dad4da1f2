//! Error types shared by the fetcher, extractors and assemblers.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ScrapeError>;

/// A single page GET that did not produce a body.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("GET {url} returned HTTP {status}")]
    Status { url: String, status: u16 },
    #[error("GET {url} failed: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("precondition failed: {0}")]
    Precondition(String),
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error("failed to extract {field}: {reason}")]
    Extraction { field: &'static str, reason: String },
    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("HTTP client setup failed: {0}")]
    Client(#[from] reqwest::Error),
}

impl ScrapeError {
    /// Mandatory marker absent from otherwise valid markup.
    pub fn missing(field: &'static str) -> Self {
        ScrapeError::Extraction {
            field,
            reason: "marker not found on page".to_string(),
        }
    }
}
