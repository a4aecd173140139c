use async_trait::async_trait;
use reqwest::header::LOCATION;
use reqwest::{redirect, Client};
use tracing::{debug, error, warn};
use url::Url;

use crate::app::{FeedRelayError, Result};
use crate::config::HttpConfig;
use crate::enrich::LinkResolver;

pub const MAX_REDIRECTS: usize = 10;

/// Follows redirect chains hop by hop with HEAD requests.
pub struct RedirectResolver {
    client: Client,
    max_redirects: usize,
}

impl RedirectResolver {
    pub fn new(http: &HttpConfig) -> Result<Self> {
        let client = Client::builder()
            .redirect(redirect::Policy::none())
            .connect_timeout(http.timeout())
            .timeout(http.timeout())
            .user_agent(http.user_agent.as_str())
            .build()?;

        Ok(Self {
            client,
            max_redirects: MAX_REDIRECTS,
        })
    }

    async fn follow(&self, link: &str) -> Result<String> {
        let mut current = Url::parse(link)?;

        for _ in 0..self.max_redirects {
            let response = self.client.head(current.clone()).send().await?;

            if !response.status().is_redirection() {
                return Ok(current.into());
            }

            let Some(location) = response.headers().get(LOCATION) else {
                warn!(url = %current, "Redirect location not found in headers");
                return Ok(current.into());
            };

            let location = location
                .to_str()
                .map_err(|e| FeedRelayError::Enrichment(e.to_string()))?;
            current = current.join(location)?;
        }

        warn!(
            link,
            reached = %current,
            "Too many redirects, potential loop; stopping after {} hops",
            self.max_redirects
        );
        Ok(current.into())
    }
}

#[async_trait]
impl LinkResolver for RedirectResolver {
    async fn resolve(&self, link: &str) -> String {
        if link.is_empty() {
            return String::new();
        }

        match self.follow(link).await {
            Ok(resolved) => {
                debug!(link, %resolved, "Resolved link");
                resolved
            }
            Err(e) => {
                error!(
                    link,
                    error = %e,
                    "Could not look up the redirect, keeping the original link"
                );
                link.to_string()
            }
        }
    }
}
