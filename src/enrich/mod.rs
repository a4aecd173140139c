//! Per-article enrichment: canonical links and paywall flags.
//!
//! Both lookups fail open. A broken resolver keeps the original link and a
//! broken check reports "not paywalled", so enrichment never blocks delivery.

pub mod paywall;
pub mod redirect;

use std::sync::Arc;

use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use tracing::info;

use crate::domain::Article;

pub use paywall::{MatcherError, PaywallChecker, PaywallMatcher};
pub use redirect::RedirectResolver;

pub const DEFAULT_WORKERS: usize = 10;

#[async_trait]
pub trait LinkResolver {
    /// Final location of `link`, or `link` itself when it cannot be resolved.
    async fn resolve(&self, link: &str) -> String;
}

#[async_trait]
pub trait PaywallDetector {
    async fn is_paywalled(&self, link: &str) -> bool;
}

pub struct Enricher {
    resolver: Arc<dyn LinkResolver + Send + Sync>,
    detector: Arc<dyn PaywallDetector + Send + Sync>,
    workers: usize,
}

impl Enricher {
    pub fn new(
        resolver: Arc<dyn LinkResolver + Send + Sync>,
        detector: Arc<dyn PaywallDetector + Send + Sync>,
    ) -> Self {
        Self::with_workers(resolver, detector, DEFAULT_WORKERS)
    }

    pub fn with_workers(
        resolver: Arc<dyn LinkResolver + Send + Sync>,
        detector: Arc<dyn PaywallDetector + Send + Sync>,
        workers: usize,
    ) -> Self {
        Self {
            resolver,
            detector,
            workers: workers.max(1),
        }
    }

    /// Resolve every link, then check the resolved link, concurrently across articles.
    ///
    /// Each unit of work touches only its own article. Returns once all are done.
    pub async fn enrich(&self, articles: &mut [Article]) {
        info!(
            "Resolving links and checking paywalls for {} articles",
            articles.len()
        );

        stream::iter(articles.iter_mut())
            .for_each_concurrent(self.workers, |article| async move {
                article.link = self.resolver.resolve(&article.link).await;
                article.paywalled = self.detector.is_paywalled(&article.link).await;
            })
            .await;

        let paywalled = articles.iter().filter(|a| a.paywalled).count();
        info!(paywalled, "Enrichment finished");
    }
}
