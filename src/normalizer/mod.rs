use feed_rs::model::Entry;
use feed_rs::parser;
use html_escape::decode_html_entities;
use tracing::{debug, info};

use crate::app::{FeedRelayError, Result};
use crate::domain::{split_title, Article, Enclosure, RawItem};

#[derive(Clone)]
pub struct Normalizer;

impl Default for Normalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Normalizer {
    pub fn new() -> Self {
        Self
    }

    /// Parse a feed document into raw items, preserving feed order.
    pub fn parse(&self, body: &[u8]) -> Result<Vec<RawItem>> {
        let feed = parser::parse(body).map_err(|e| FeedRelayError::FeedParse(e.to_string()))?;

        Ok(feed.entries.into_iter().map(Self::raw_item).collect())
    }

    fn raw_item(entry: Entry) -> RawItem {
        let enclosures = entry
            .media
            .iter()
            .flat_map(|media| media.content.iter())
            .filter_map(|content| {
                content.url.as_ref().map(|url| Enclosure {
                    url: url.to_string(),
                    media_type: content.content_type.as_ref().map(|m| m.to_string()),
                })
            })
            .collect();

        RawItem {
            title: entry
                .title
                .map(|t| decode_html_entities(&t.content).to_string()),
            description: entry
                .summary
                .map(|s| decode_html_entities(&s.content).to_string()),
            link: entry.links.first().map(|l| l.href.clone()),
            enclosures,
            categories: entry.categories.into_iter().map(|c| c.term).collect(),
            published_at: entry.published.or(entry.updated),
        }
    }

    /// Convert a raw item into an article. Items without a title are dropped.
    pub fn normalize(&self, item: RawItem) -> Option<Article> {
        let Some(raw_title) = item.title.as_deref() else {
            debug!(link = ?item.link, "Dropping feed item without a title");
            return None;
        };

        let (marker, title) = split_title(raw_title);
        let image_url = item.image_url().unwrap_or_default().to_string();

        Some(Article {
            title,
            marker,
            description: item.description.unwrap_or_default(),
            link: item.link.unwrap_or_default(),
            image_url,
            published_at: item.published_at,
            paywalled: false,
        })
    }

    pub fn normalize_all(&self, items: Vec<RawItem>) -> Vec<Article> {
        let received = items.len();
        let articles: Vec<Article> = items
            .into_iter()
            .filter_map(|item| self.normalize(item))
            .collect();
        info!(
            "Converted {} feed items to {} articles",
            received,
            articles.len()
        );
        articles
    }
}
