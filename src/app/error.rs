use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FeedRelayError {
    #[error("Feed unavailable at {url}: {reason}")]
    FeedUnavailable { url: String, reason: String },

    #[error("Status file {path} is corrupt: {source}")]
    WatermarkCorrupt {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Delivery failed: {0}")]
    Delivery(String),

    #[error("Enrichment failed: {0}")]
    Enrichment(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Feed parsing error: {0}")]
    FeedParse(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl FeedRelayError {
    /// Whether the error ends the run rather than being absorbed by a stage.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::Delivery(_) | Self::Enrichment(_))
    }
}

pub type Result<T> = std::result::Result<T, FeedRelayError>;
