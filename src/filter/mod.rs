use std::collections::HashSet;

use tracing::{debug, info, warn};

use crate::domain::{oldest_first, Article, RawItem, SyncStatus};

fn plural(count: usize) -> &'static str {
    if count == 1 {
        ""
    } else {
        "s"
    }
}

/// Drop items tagged with any excluded category. Comparison ignores case.
pub fn exclude_categories(items: Vec<RawItem>, excluded: &[String]) -> Vec<RawItem> {
    if excluded.is_empty() {
        return items;
    }

    let excluded: HashSet<String> = excluded.iter().map(|c| c.to_lowercase()).collect();
    let initial = items.len();
    let kept: Vec<RawItem> = items
        .into_iter()
        .filter(|item| {
            !item
                .categories
                .iter()
                .any(|c| excluded.contains(&c.to_lowercase()))
        })
        .collect();

    let removed = initial - kept.len();
    info!(
        "Excluded {} item{} in unwanted categories, {} remaining",
        removed,
        plural(removed),
        kept.len()
    );
    kept
}

/// Remove articles already delivered according to the watermark.
///
/// The result is sorted oldest first. Articles published exactly at the
/// watermark are treated as delivered.
pub fn prune_delivered(mut articles: Vec<Article>, status: &SyncStatus) -> Vec<Article> {
    let Some(watermark) = status.last_publication_date else {
        warn!("Last sync status lacks a publication date, will not remove any articles");
        return articles;
    };

    let initial = articles.len();
    articles.sort_by(oldest_first);
    articles.retain(|article| article.published_at.is_some_and(|date| date > watermark));
    debug!(?articles, "Remaining articles");

    let removed = initial - articles.len();
    info!(
        "Removed {} old article{}, {} remaining",
        removed,
        plural(removed),
        articles.len()
    );
    articles
}

pub fn drop_paywalled(articles: Vec<Article>) -> Vec<Article> {
    let initial = articles.len();
    let kept: Vec<Article> = articles.into_iter().filter(|a| !a.paywalled).collect();

    let removed = initial - kept.len();
    info!(
        "Removed {} paywalled article{}, {} remaining",
        removed,
        plural(removed),
        kept.len()
    );
    kept
}
