//! Posting articles to the channel.
//!
//! Articles go out oldest first, one at a time, paced by a token bucket.
//! Articles with an image are uploaded as photos; when the image cannot be
//! fetched the article is posted as text instead. A send that still fails
//! after retries skips the article and the batch carries on.

pub mod caption;
pub mod image;
pub mod rate_limit;
pub mod telegram;

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, error, info, warn};
use url::Url;

use crate::app::Result;
use crate::domain::{oldest_first, Article};
use crate::fetcher::RetryPolicy;

pub use caption::{escape_markdown, PHOTO_CAPTION_LIMIT, TEXT_MESSAGE_LIMIT};
pub use image::{ImageFetcher, Photo};
pub use rate_limit::TokenBucket;
pub use telegram::TelegramChannel;

/// Inline URL button under a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    pub label: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMessage {
    pub chat_id: String,
    /// MarkdownV2 text, used as the caption when sent with a photo
    pub body: String,
    pub button: Option<Button>,
    /// Deliver without a notification sound
    pub silent: bool,
}

#[async_trait]
pub trait Channel {
    async fn send_text(&self, message: &OutgoingMessage) -> Result<()>;

    async fn send_photo(&self, message: &OutgoingMessage, photo: &Photo) -> Result<()>;
}

/// Outcome of one delivery batch.
#[derive(Debug, Clone, Default)]
pub struct DeliveryReport {
    pub attempted: usize,
    pub delivered: usize,
    /// Last article posted, in send order
    pub last_delivered: Option<Article>,
}

pub struct Deliverer {
    channel: Arc<dyn Channel + Send + Sync>,
    images: ImageFetcher,
    limiter: TokenBucket,
    retry: RetryPolicy,
    chat_id: String,
    read_label: String,
}

impl Deliverer {
    pub fn new(
        channel: Arc<dyn Channel + Send + Sync>,
        images: ImageFetcher,
        limiter: TokenBucket,
        chat_id: impl Into<String>,
        read_label: impl Into<String>,
    ) -> Self {
        Self {
            channel,
            images,
            limiter,
            retry: RetryPolicy::default(),
            chat_id: chat_id.into(),
            read_label: read_label.into(),
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub async fn deliver(&mut self, mut articles: Vec<Article>) -> DeliveryReport {
        articles.sort_by(oldest_first);

        let mut report = DeliveryReport {
            attempted: articles.len(),
            ..Default::default()
        };

        for article in articles {
            self.limiter.acquire().await;

            if !article.is_deliverable() {
                warn!(title = %article.title, "Article is missing the title or link, skipping");
                continue;
            }

            debug!(title = %article.title, link = %article.link, "Posting article");
            match self.post(&article).await {
                Ok(()) => {
                    debug!("Article posted successfully");
                    report.delivered += 1;
                    report.last_delivered = Some(article);
                }
                Err(e) => {
                    error!(title = %article.title, error = %e, "Failed to send message");
                }
            }
        }

        info!(
            "Successfully posted {} out of {} articles",
            report.delivered, report.attempted
        );
        report
    }

    async fn post(&self, article: &Article) -> Result<()> {
        match image_url(article) {
            Some(url) => self.post_with_image(article, &url).await,
            None => self.post_text(article).await,
        }
    }

    async fn post_with_image(&self, article: &Article, url: &Url) -> Result<()> {
        let images = &self.images;
        let photo = match self.retry.run("fetch image", || images.fetch(url)).await {
            Ok(photo) => photo,
            Err(e) => {
                info!(
                    %url,
                    error = %e,
                    "Failed to prepare the image, posting a text-only article instead"
                );
                return self.post_text(article).await;
            }
        };

        let message = self.message(article, PHOTO_CAPTION_LIMIT);
        self.retry
            .run("send photo", || self.channel.send_photo(&message, &photo))
            .await
    }

    async fn post_text(&self, article: &Article) -> Result<()> {
        let message = self.message(article, TEXT_MESSAGE_LIMIT);
        self.retry
            .run("send message", || self.channel.send_text(&message))
            .await
    }

    fn message(&self, article: &Article, limit: usize) -> OutgoingMessage {
        OutgoingMessage {
            chat_id: self.chat_id.clone(),
            body: caption::render(article, limit),
            button: Some(Button {
                label: self.read_label.clone(),
                url: article.link.clone(),
            }),
            silent: true,
        }
    }
}

/// The article's image, when it is an absolute http(s) URL.
fn image_url(article: &Article) -> Option<Url> {
    let url = Url::parse(&article.image_url).ok()?;
    matches!(url.scheme(), "http" | "https").then_some(url)
}
