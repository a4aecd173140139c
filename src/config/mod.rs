//! Configuration for a sync run.
//!
//! Tuning knobs are read from an optional TOML file (`--config`, otherwise
//! `~/.config/feedrelay/config.toml` when it exists). Missing sections and
//! fields fall back to defaults. Run settings (feed URL, credentials, status
//! file, exclusions) come from the command line, see [`SyncSettings`].

pub mod settings;

pub use settings::SyncSettings;

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::enrich::PaywallMatcher;
use crate::fetcher::RetryPolicy;

/// Main configuration struct.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub http: HttpConfig,
    pub retry: RetryConfig,
    pub delivery: DeliveryConfig,
    pub paywall: PaywallConfig,
    pub enrichment: EnrichmentConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Connection and request timeout in seconds (default: 10)
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            user_agent: concat!("feedrelay/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl HttpConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    pub max_attempts: u32,
    pub delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        let policy = RetryPolicy::default();
        Self {
            max_attempts: policy.max_attempts,
            delay_ms: policy.delay.as_millis() as u64,
        }
    }
}

impl RetryConfig {
    pub fn policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_attempts, Duration::from_millis(self.delay_ms))
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DeliveryConfig {
    /// Sustained send rate (default: 20)
    pub messages_per_minute: u32,
    /// Label of the inline button that opens the article
    pub read_button_label: String,
    pub api_base_url: String,
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            messages_per_minute: 20,
            read_button_label: "Read".to_string(),
            api_base_url: "https://api.telegram.org".to_string(),
        }
    }
}

/// How subscriber-only pages are recognized.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PaywallConfig {
    pub selector: String,
    /// Text the selected element must contain; any match counts when empty
    pub text: Option<String>,
}

impl Default for PaywallConfig {
    fn default() -> Self {
        Self {
            selector: "li".to_string(),
            text: Some("ABONENTIEM".to_string()),
        }
    }
}

impl PaywallConfig {
    pub fn matcher(&self) -> Result<PaywallMatcher, ConfigError> {
        PaywallMatcher::new(&self.selector, self.text.clone()).map_err(|e| ConfigError::Invalid {
            field: "paywall.selector",
            reason: e.to_string(),
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EnrichmentConfig {
    /// Maximum links resolved and checked at the same time (default: 10)
    pub workers: usize,
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self { workers: 10 }
    }
}

impl Config {
    /// Load configuration.
    ///
    /// An explicit path must exist. Without one, the default path is used
    /// when present and built-in defaults otherwise.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load_from(path);
        }

        match Self::default_config_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })?;

        config.validate()?;
        Ok(config)
    }

    /// `~/.config/feedrelay/config.toml`
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("feedrelay").join("config.toml"))
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.delivery.messages_per_minute == 0 {
            return Err(ConfigError::Invalid {
                field: "delivery.messages_per_minute",
                reason: "must be greater than zero".into(),
            });
        }
        if self.enrichment.workers == 0 {
            return Err(ConfigError::Invalid {
                field: "enrichment.workers",
                reason: "must be greater than zero".into(),
            });
        }
        url::Url::parse(&self.delivery.api_base_url).map_err(|e| ConfigError::Invalid {
            field: "delivery.api_base_url",
            reason: e.to_string(),
        })?;
        self.paywall.matcher()?;
        Ok(())
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_full_config() {
        let content = r#"
[http]
timeout_secs = 5
user_agent = "relay-test"

[retry]
max_attempts = 5
delay_ms = 250

[delivery]
messages_per_minute = 10
read_button_label = "Lasīt"
api_base_url = "http://localhost:8081"

[paywall]
selector = ".badge"
text = ""

[enrichment]
workers = 4
"#;
        let config: Config = toml::from_str(content).expect("Full config should work");

        assert_eq!(config.http.timeout(), Duration::from_secs(5));
        assert_eq!(config.http.user_agent, "relay-test");
        assert_eq!(
            config.retry.policy(),
            RetryPolicy::new(5, Duration::from_millis(250))
        );
        assert_eq!(config.delivery.messages_per_minute, 10);
        assert_eq!(config.delivery.api_base_url, "http://localhost:8081");
        assert_eq!(config.paywall.selector, ".badge");
        assert_eq!(config.paywall.text.as_deref(), Some(""));
        assert!(config.paywall.matcher().is_ok());
        assert_eq!(config.enrichment.workers, 4);
    }

    #[test]
    fn test_partial_config() {
        let content = r#"
[delivery]
read_button_label = "Lasīt"
"#;
        let config: Config = toml::from_str(content).expect("Partial config should work");

        assert_eq!(config.delivery.read_button_label, "Lasīt");
        assert_eq!(config.delivery.messages_per_minute, 20);
        assert_eq!(config.http.timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_empty_config() {
        let config: Config = toml::from_str("").expect("Empty config should work");
        assert_eq!(config.retry.policy(), RetryPolicy::default());
        assert_eq!(config.paywall.selector, "li");
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[paywall]\nselector = \".paywall-badge\"").unwrap();

        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.paywall.selector, ".paywall-badge");
    }

    #[test]
    fn test_load_missing_explicit_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let result = Config::load(Some(&dir.path().join("missing.toml")));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn test_rejects_invalid_selector() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[paywall]\nselector = \"li[[\"").unwrap();

        let result = Config::load(Some(file.path()));
        assert!(matches!(
            result,
            Err(ConfigError::Invalid {
                field: "paywall.selector",
                ..
            })
        ));
    }

    #[test]
    fn test_rejects_zero_rate() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[delivery]\nmessages_per_minute = 0").unwrap();

        assert!(Config::load(Some(file.path())).is_err());
    }
}
