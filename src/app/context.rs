use std::sync::Arc;

use crate::app::error::{FeedRelayError, Result};
use crate::config::{Config, SyncSettings};
use crate::delivery::{Channel, Deliverer, ImageFetcher, TelegramChannel, TokenBucket};
use crate::enrich::{Enricher, LinkResolver, PaywallChecker, PaywallDetector, RedirectResolver};
use crate::fetcher::{FeedSource, HttpFeedSource};
use crate::store::JsonStatusFile;
use crate::sync::SyncService;

pub struct AppContext {
    pub settings: SyncSettings,
    pub config: Config,
    pub source: Arc<dyn FeedSource + Send + Sync>,
    pub resolver: Arc<dyn LinkResolver + Send + Sync>,
    pub detector: Arc<dyn PaywallDetector + Send + Sync>,
    pub channel: Arc<dyn Channel + Send + Sync>,
    pub images: ImageFetcher,
}

impl AppContext {
    pub fn new(settings: SyncSettings, config: Config) -> Result<Self> {
        settings.validate()?;

        let retry = config.retry.policy();
        let matcher = config
            .paywall
            .matcher()
            .map_err(|e| FeedRelayError::Config(e.to_string()))?;

        let source: Arc<dyn FeedSource + Send + Sync> =
            Arc::new(HttpFeedSource::new(&config.http, retry)?);
        let resolver: Arc<dyn LinkResolver + Send + Sync> =
            Arc::new(RedirectResolver::new(&config.http)?);
        let detector: Arc<dyn PaywallDetector + Send + Sync> =
            Arc::new(PaywallChecker::new(&config.http, matcher)?);
        let channel: Arc<dyn Channel + Send + Sync> = Arc::new(TelegramChannel::new(
            &config.http,
            settings.bot_token.clone(),
            config.delivery.api_base_url.clone(),
        )?);
        let images = ImageFetcher::new(&config.http)?;

        Ok(Self {
            settings,
            config,
            source,
            resolver,
            detector,
            channel,
            images,
        })
    }

    /// A sync run over the wired components, with a fresh rate limiter.
    pub fn sync_service(&self) -> SyncService {
        let enricher = Enricher::with_workers(
            self.resolver.clone(),
            self.detector.clone(),
            self.config.enrichment.workers,
        );
        let deliverer = Deliverer::new(
            self.channel.clone(),
            self.images.clone(),
            TokenBucket::per_minute(self.config.delivery.messages_per_minute),
            self.settings.channel_id.clone(),
            self.config.delivery.read_button_label.clone(),
        )
        .with_retry(self.config.retry.policy());

        let service = SyncService::new(
            self.settings.clone(),
            self.source.clone(),
            enricher,
            deliverer,
        );

        match &self.settings.status_file {
            Some(path) => service.with_store(Box::new(JsonStatusFile::new(path))),
            None => service,
        }
    }
}
