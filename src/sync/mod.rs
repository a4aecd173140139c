//! One sync run, from feed to channel to watermark.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use crate::app::Result;
use crate::config::SyncSettings;
use crate::delivery::Deliverer;
use crate::domain::{Article, SyncStatus};
use crate::enrich::Enricher;
use crate::fetcher::FeedSource;
use crate::filter::{drop_paywalled, exclude_categories, prune_delivered};
use crate::normalizer::Normalizer;
use crate::store::WatermarkStore;

/// What a completed run did.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SyncReport {
    /// Items in the feed
    pub fetched: usize,
    /// Articles handed to delivery
    pub candidates: usize,
    pub delivered: usize,
    /// Watermark written at the end of the run, if any
    pub watermark: Option<SyncStatus>,
}

pub struct SyncService {
    settings: SyncSettings,
    source: Arc<dyn FeedSource + Send + Sync>,
    normalizer: Normalizer,
    enricher: Enricher,
    deliverer: Deliverer,
    store: Option<Box<dyn WatermarkStore + Send + Sync>>,
}

impl SyncService {
    pub fn new(
        settings: SyncSettings,
        source: Arc<dyn FeedSource + Send + Sync>,
        enricher: Enricher,
        deliverer: Deliverer,
    ) -> Self {
        Self {
            settings,
            source,
            normalizer: Normalizer::new(),
            enricher,
            deliverer,
            store: None,
        }
    }

    pub fn with_store(mut self, store: Box<dyn WatermarkStore + Send + Sync>) -> Self {
        self.store = Some(store);
        self
    }

    /// Post every article newer than the watermark, then advance the watermark.
    ///
    /// Fails when the feed cannot be fetched or the status file cannot be
    /// read or written. Articles that fail to post are skipped.
    pub async fn run(&mut self) -> Result<SyncReport> {
        info!(url = %self.settings.feed_url, "Starting sync");

        let items = self.source.fetch(&self.settings.feed_url).await?;
        let mut report = SyncReport {
            fetched: items.len(),
            ..Default::default()
        };
        info!(count = items.len(), "Fetched feed items");

        let items = exclude_categories(items, &self.settings.excluded_categories);
        let mut articles = self.normalizer.normalize_all(items);

        if let Some(store) = &self.store {
            let status = store.load()?;
            articles = prune_delivered(articles, &status);
        }

        if articles.is_empty() {
            info!("No new articles to post");
            return Ok(report);
        }

        self.enricher.enrich(&mut articles).await;

        if self.settings.exclude_paywalled {
            articles = drop_paywalled(articles);
        }

        report.candidates = articles.len();
        let delivery = self.deliverer.deliver(articles).await;
        report.delivered = delivery.delivered;

        match (&self.store, delivery.last_delivered) {
            (Some(store), Some(last)) => {
                let status = watermark_for(&last);
                store.save(&status)?;
                info!(
                    title = ?status.last_title,
                    date = ?status.last_publication_date,
                    "Saved sync status"
                );
                report.watermark = Some(status);
            }
            (Some(_), None) => info!("Nothing was posted, sync status left unchanged"),
            (None, _) => {}
        }

        Ok(report)
    }
}

fn watermark_for(article: &Article) -> SyncStatus {
    let date = article.published_at.unwrap_or_else(|| {
        warn!(
            title = %article.title,
            "Last posted article has no publication date, using the current time"
        );
        Utc::now()
    });
    SyncStatus::new(date, article.title.clone())
}
