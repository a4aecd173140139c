pub mod http_fetcher;
pub mod retry;

use async_trait::async_trait;

use crate::app::Result;
use crate::domain::RawItem;

pub use http_fetcher::HttpFeedSource;
pub use retry::RetryPolicy;

#[async_trait]
pub trait FeedSource {
    /// Fetch the feed and return its items in feed order.
    async fn fetch(&self, url: &str) -> Result<Vec<RawItem>>;
}
