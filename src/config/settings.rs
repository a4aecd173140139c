use std::fmt;
use std::path::PathBuf;

use crate::app::{FeedRelayError, Result};

/// Validated settings for one sync run.
#[derive(Clone, Default)]
pub struct SyncSettings {
    pub feed_url: String,
    pub bot_token: String,
    pub channel_id: String,
    /// Watermark file; without it every run delivers the whole feed
    pub status_file: Option<PathBuf>,
    pub excluded_categories: Vec<String>,
    pub exclude_paywalled: bool,
}

impl SyncSettings {
    pub fn validate(&self) -> Result<()> {
        let url = url::Url::parse(&self.feed_url)?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(FeedRelayError::Config(format!(
                "Invalid news feed URL: '{}'",
                self.feed_url
            )));
        }
        if self.bot_token.trim().is_empty() {
            return Err(FeedRelayError::Config("Bot token is empty".into()));
        }
        if self.channel_id.trim().is_empty() {
            return Err(FeedRelayError::Config("Channel ID is empty".into()));
        }
        if let Some(path) = &self.status_file {
            // A status file that does not exist yet is created on the first delivery
            if path.is_dir() {
                return Err(FeedRelayError::Config(format!(
                    "'{}' is a directory",
                    path.display()
                )));
            }
        }
        Ok(())
    }
}

impl fmt::Debug for SyncSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyncSettings")
            .field("feed_url", &self.feed_url)
            .field("bot_token", &"<redacted>")
            .field("channel_id", &self.channel_id)
            .field("status_file", &self.status_file)
            .field("excluded_categories", &self.excluded_categories)
            .field("exclude_paywalled", &self.exclude_paywalled)
            .finish()
    }
}
