use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::CategoryMarker;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub title: String,
    pub marker: CategoryMarker,
    pub description: String,
    pub link: String,
    /// Empty when the feed item carried no image enclosure.
    pub image_url: String,
    pub published_at: Option<DateTime<Utc>>,
    pub paywalled: bool,
}

impl Article {
    pub fn new(title: impl Into<String>, link: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            link: link.into(),
            ..Default::default()
        }
    }

    pub fn with_published_at(mut self, published_at: DateTime<Utc>) -> Self {
        self.published_at = Some(published_at);
        self
    }

    /// Publication date used for ordering; a missing date sorts first.
    pub fn sort_key(&self) -> DateTime<Utc> {
        self.published_at.unwrap_or(DateTime::<Utc>::MIN_UTC)
    }

    pub fn is_deliverable(&self) -> bool {
        !self.title.trim().is_empty() && !self.link.trim().is_empty()
    }
}

/// Oldest article first.
pub fn oldest_first(a: &Article, b: &Article) -> Ordering {
    a.sort_key().cmp(&b.sort_key())
}
