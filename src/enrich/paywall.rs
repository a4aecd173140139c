use async_trait::async_trait;
use reqwest::Client;
use scraper::{Html, Selector};
use tracing::{debug, error};

use crate::app::Result;
use crate::config::HttpConfig;
use crate::enrich::PaywallDetector;

#[derive(Debug, thiserror::Error)]
pub enum MatcherError {
    #[error("Invalid CSS selector '{selector}': {reason}")]
    InvalidSelector { selector: String, reason: String },
}

/// Recognizes the subscriber-only marker in an article page.
///
/// Sites change their markup, so the rule comes from configuration: a CSS
/// selector, optionally narrowed to elements whose text contains a fragment.
/// The text comparison ignores case.
#[derive(Debug, Clone)]
pub struct PaywallMatcher {
    selector: Selector,
    text: Option<String>,
}

impl PaywallMatcher {
    pub fn new(selector: &str, text: Option<String>) -> std::result::Result<Self, MatcherError> {
        let parsed = Selector::parse(selector).map_err(|e| MatcherError::InvalidSelector {
            selector: selector.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            selector: parsed,
            text: text.filter(|t| !t.is_empty()).map(|t| t.to_lowercase()),
        })
    }

    pub fn matches(&self, html: &str) -> bool {
        let document = Html::parse_document(html);
        let mut elements = document.select(&self.selector);

        match &self.text {
            Some(needle) => elements.any(|el| {
                let text: String = el.text().collect();
                text.to_lowercase().contains(needle.as_str())
            }),
            None => elements.next().is_some(),
        }
    }
}

pub struct PaywallChecker {
    client: Client,
    matcher: PaywallMatcher,
}

impl PaywallChecker {
    pub fn new(http: &HttpConfig, matcher: PaywallMatcher) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(http.timeout())
            .timeout(http.timeout())
            .gzip(true)
            .brotli(true)
            .user_agent(http.user_agent.as_str())
            .build()?;

        Ok(Self { client, matcher })
    }

    async fn fetch_page(&self, link: &str) -> Result<String> {
        let response = self.client.get(link).send().await?;
        response.error_for_status_ref()?;
        Ok(response.text().await?)
    }
}

#[async_trait]
impl PaywallDetector for PaywallChecker {
    async fn is_paywalled(&self, link: &str) -> bool {
        if link.is_empty() {
            return false;
        }

        match self.fetch_page(link).await {
            Ok(html) => {
                let paywalled = self.matcher.matches(&html);
                if paywalled {
                    debug!(link, "Article is paywalled");
                }
                paywalled
            }
            Err(e) => {
                error!(link, error = %e, "Failed to check article for a paywall");
                false
            }
        }
    }
}
