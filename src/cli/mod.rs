use std::path::PathBuf;

use clap::Parser;

use crate::config::{Config, SyncSettings};

pub const DEFAULT_FEED_URL: &str = "https://www.apollo.lv/rss";

#[derive(Parser, Debug)]
#[command(name = "feedrelay", version)]
#[command(
    about = "Post new articles from an RSS feed to a Telegram channel",
    long_about = None
)]
pub struct Cli {
    /// News feed URL
    #[arg(
        short = 'u',
        long,
        env = "FEEDRELAY_URL",
        default_value = DEFAULT_FEED_URL
    )]
    pub url: String,

    /// Telegram bot token
    #[arg(short = 't', long, env = "FEEDRELAY_TOKEN", hide_env_values = true)]
    pub token: String,

    /// Channel to post to, e.g. @news or a numeric chat id
    #[arg(short = 'c', long, env = "FEEDRELAY_CHANNEL_ID")]
    pub channel_id: String,

    /// File that remembers the last posted article between runs
    #[arg(short = 's', long, env = "FEEDRELAY_STATUS_FILE")]
    pub status_file: Option<PathBuf>,

    /// Label of the button that opens the article
    #[arg(short = 'r', long, env = "FEEDRELAY_READ_BUTTON_LABEL")]
    pub read_button_label: Option<String>,

    /// Skip articles in these categories (comma separated, case insensitive)
    #[arg(
        short = 'e',
        long,
        env = "FEEDRELAY_EXCLUDE_CATEGORIES",
        value_delimiter = ','
    )]
    pub exclude_categories: Vec<String>,

    /// Skip articles behind a paywall
    #[arg(short = 'p', long, env = "FEEDRELAY_EXCLUDE_PAYWALLED")]
    pub exclude_paywalled: bool,

    /// Configuration file (default: ~/.config/feedrelay/config.toml)
    #[arg(long, env = "FEEDRELAY_CONFIG")]
    pub config: Option<PathBuf>,

    /// Verbose logging
    #[arg(short = 'd', long, env = "FEEDRELAY_DEBUG")]
    pub debug: bool,
}

impl Cli {
    pub fn into_settings(self) -> SyncSettings {
        SyncSettings {
            feed_url: self.url,
            bot_token: self.token,
            channel_id: self.channel_id,
            status_file: self.status_file,
            excluded_categories: self
                .exclude_categories
                .into_iter()
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty())
                .collect(),
            exclude_paywalled: self.exclude_paywalled,
        }
    }

    /// Command-line values take precedence over the configuration file.
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(label) = &self.read_button_label {
            config.delivery.read_button_label = label.clone();
        }
    }
}
