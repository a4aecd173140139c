use async_trait::async_trait;
use reqwest::Client;
use tracing::{error, info};

use crate::app::{FeedRelayError, Result};
use crate::config::HttpConfig;
use crate::domain::RawItem;
use crate::fetcher::{FeedSource, RetryPolicy};
use crate::normalizer::Normalizer;

pub struct HttpFeedSource {
    client: Client,
    normalizer: Normalizer,
    retry: RetryPolicy,
}

impl HttpFeedSource {
    pub fn new(http: &HttpConfig, retry: RetryPolicy) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(http.timeout())
            .timeout(http.timeout())
            .gzip(true)
            .brotli(true)
            .user_agent(http.user_agent.as_str())
            .build()?;

        Ok(Self::with_client(client, retry))
    }

    pub fn with_client(client: Client, retry: RetryPolicy) -> Self {
        Self {
            client,
            normalizer: Normalizer::new(),
            retry,
        }
    }

    async fn fetch_once(&self, url: &str) -> Result<Vec<RawItem>> {
        let response = self.client.get(url).send().await?;
        response.error_for_status_ref()?;
        let body = response.bytes().await?;
        self.normalizer.parse(&body)
    }
}

#[async_trait]
impl FeedSource for HttpFeedSource {
    async fn fetch(&self, url: &str) -> Result<Vec<RawItem>> {
        let items = self
            .retry
            .run("load feed", || self.fetch_once(url))
            .await
            .map_err(|e| {
                error!(url, error = %e, "Could not load the feed");
                FeedRelayError::FeedUnavailable {
                    url: url.to_string(),
                    reason: e.to_string(),
                }
            })?;

        info!("Received {} items", items.len());
        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const RSS_SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>Test Feed</title>
    <item><title>Item 2</title><link>http://example.com/2</link><pubDate>Mon, 21 Oct 2024 08:00:00 GMT</pubDate></item>
    <item><title>Item 1</title><link>http://example.com/1</link><pubDate>Mon, 21 Oct 2024 07:28:00 GMT</pubDate></item>
  </channel>
</rss>"#;

    fn source() -> HttpFeedSource {
        HttpFeedSource::with_client(
            Client::new(),
            RetryPolicy::new(3, Duration::from_millis(10)),
        )
    }

    #[tokio::test]
    async fn test_fetch_preserves_feed_order() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rss"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "application/rss+xml")
                    .set_body_string(RSS_SAMPLE),
            )
            .mount(&server)
            .await;

        let items = source()
            .fetch(&format!("{}/rss", server.uri()))
            .await
            .unwrap();

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].title.as_deref(), Some("Item 2"));
        assert_eq!(items[1].title.as_deref(), Some("Item 1"));
    }

    #[tokio::test]
    async fn test_fetch_follows_redirects() {
        let server = MockServer::start().await;
        let target = format!("{}/rss", server.uri());
        Mock::given(method("GET"))
            .and(path("/old"))
            .respond_with(ResponseTemplate::new(301).insert_header("location", target))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/rss"))
            .respond_with(ResponseTemplate::new(200).set_body_string(RSS_SAMPLE))
            .mount(&server)
            .await;

        let items = source()
            .fetch(&format!("{}/old", server.uri()))
            .await
            .unwrap();
        assert_eq!(items.len(), 2);
    }

    #[tokio::test]
    async fn test_fetch_gives_up_after_three_attempts() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rss"))
            .respond_with(ResponseTemplate::new(503))
            .expect(3)
            .mount(&server)
            .await;

        let result = source().fetch(&format!("{}/rss", server.uri())).await;
        assert!(matches!(
            result,
            Err(FeedRelayError::FeedUnavailable { .. })
        ));
    }

    #[tokio::test]
    async fn test_unparseable_feed_is_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rss"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>nope</html>"))
            .expect(3)
            .mount(&server)
            .await;

        let result = source().fetch(&format!("{}/rss", server.uri())).await;
        assert!(matches!(
            result,
            Err(FeedRelayError::FeedUnavailable { .. })
        ));
    }
}
