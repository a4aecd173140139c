//! # feedrelay
//!
//! Posts new articles from a news feed to a Telegram channel, each one once.
//!
//! ## Architecture
//!
//! A run is a single pipeline:
//!
//! ```text
//! Fetcher → Filter → Normalizer → Store (prune) → Enrich → Delivery → Store (persist)
//! ```
//!
//! A JSON status file remembers the newest article posted so far. Articles at
//! or before that watermark are skipped on the next run.
//!
//! ## Quick Start
//!
//! ```bash
//! feedrelay -t "$BOT_TOKEN" -c @my_channel -s ~/.local/state/feedrelay.json
//!
//! # Skip sports and paywalled articles
//! feedrelay -t "$BOT_TOKEN" -c @my_channel -e sports -p
//! ```
//!
//! ## Modules
//!
//! - [`app`]: Application context and error types
//! - [`cli`]: Command-line interface definitions
//! - [`config`]: Tuning knobs and run settings
//! - [`domain`]: Core domain models (RawItem, Article, SyncStatus)
//! - [`fetcher`]: Feed download with retries
//! - [`normalizer`]: Feed parsing and title tag handling
//! - [`filter`]: Category exclusion and watermark pruning
//! - [`enrich`]: Redirect resolution and paywall detection
//! - [`delivery`]: Rate-limited posting to Telegram
//! - [`store`]: Watermark persistence
//! - [`sync`]: The run orchestrator

/// Application context and error handling.
///
/// The [`AppContext`](app::AppContext) struct wires together all components:
/// feed source, enrichers, channel, image fetcher.
pub mod app;

/// Command-line interface using clap.
///
/// Every option can also be set through a `FEEDRELAY_*` environment variable.
pub mod cli;

/// Configuration.
///
/// Loads from `~/.config/feedrelay/config.toml` when present:
/// - HTTP timeouts and user agent
/// - Retry attempts and delay
/// - Delivery rate, button label and API base URL
/// - Paywall marker selector
pub mod config;

/// Delivery to the channel.
///
/// - [`Channel`](delivery::Channel): Async trait for sending messages
/// - [`TelegramChannel`](delivery::TelegramChannel): Bot API implementation
/// - [`Deliverer`](delivery::Deliverer): Ordered, rate-limited posting
/// - [`TokenBucket`](delivery::TokenBucket): Send rate limiter
pub mod delivery;

/// Core domain models.
///
/// - [`RawItem`](domain::RawItem): A feed item as published
/// - [`Article`](domain::Article): A normalized item ready to post
/// - [`SyncStatus`](domain::SyncStatus): The delivery watermark
pub mod domain;

/// Per-article enrichment.
///
/// - [`RedirectResolver`](enrich::RedirectResolver): Follows link redirects
/// - [`PaywallChecker`](enrich::PaywallChecker): Detects subscriber-only pages
/// - [`Enricher`](enrich::Enricher): Runs both concurrently across articles
pub mod enrich;

/// Feed download.
///
/// - [`FeedSource`](fetcher::FeedSource): Async trait for feed fetching
/// - [`HttpFeedSource`](fetcher::HttpFeedSource): reqwest-based implementation
/// - [`RetryPolicy`](fetcher::RetryPolicy): Fixed-delay retries
pub mod fetcher;

/// Category exclusion, watermark pruning and paywall removal.
pub mod filter;

/// Feed parsing and normalization.
///
/// Converts RSS documents into [`RawItem`](domain::RawItem)s and those into
/// [`Article`](domain::Article)s, splitting the category tag off the title.
pub mod normalizer;

/// Watermark persistence.
///
/// - [`WatermarkStore`](store::WatermarkStore): Trait for loading and saving the watermark
/// - [`JsonStatusFile`](store::JsonStatusFile): JSON file implementation
pub mod store;

/// The sync run.
pub mod sync;
