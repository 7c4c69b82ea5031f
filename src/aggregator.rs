use chrono::Utc;
use futures::future;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::article::Article;
use crate::fetcher::{FetchError, Fetcher};
use crate::parser::{self, ParseError};
use crate::registry::{CategorySelector, FeedRegistry, FeedSource};

/// Why one feed contributed zero articles. Never surfaces to external
/// callers; the aggregator logs it and moves on.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// One page window over the ranked corpus.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub articles: Vec<Article>,
    pub total: usize,
    pub has_more: bool,
}

/// Fans fetch+parse out over the selected feeds and merges the survivors.
pub struct Aggregator {
    registry: FeedRegistry,
    fetcher: Fetcher,
}

impl Aggregator {
    pub fn new(registry: FeedRegistry) -> Self {
        Self::with_fetcher(registry, Fetcher::new())
    }

    pub fn with_fetcher(registry: FeedRegistry, fetcher: Fetcher) -> Self {
        Self { registry, fetcher }
    }

    /// Fetch and parse every selected feed concurrently, waiting for all of
    /// them to settle, then concatenate the successful feeds' articles in
    /// registry enumeration order. A failed feed is logged and contributes
    /// zero articles; it never fails the aggregation or cancels its siblings.
    pub async fn aggregate(&self, selector: CategorySelector) -> Vec<Article> {
        let sources = self.registry.select(selector);
        let settled = future::join_all(sources.iter().map(|source| self.load_feed(source))).await;

        let mut merged = Vec::new();
        for (source, outcome) in sources.iter().zip(settled) {
            match outcome {
                Ok(mut articles) => {
                    debug!(url = %source.url, count = articles.len(), "Feed contributed articles");
                    merged.append(&mut articles);
                }
                Err(e) => {
                    warn!(url = %source.url, error = %e, "Skipping failed feed");
                }
            }
        }
        merged
    }

    async fn load_feed(&self, source: &FeedSource) -> Result<Vec<Article>, FeedError> {
        let bytes = self.fetcher.fetch(&source.url).await?;
        let parsed = parser::parse(&bytes)?;
        Ok(parser::normalize(
            parsed,
            &source.url,
            source.category,
            Utc::now(),
        ))
    }
}

/// Sort by publication time, most recent first. The sort is stable, so
/// timestamp ties keep feed-enumeration-then-item-index order.
pub fn rank(articles: &mut [Article]) {
    articles.sort_by(|a, b| b.published_at.cmp(&a.published_at));
}

/// Slice the 1-indexed page window `[start, end)` clamped to the corpus
/// bounds. A page past the end is an empty slice, not an error.
pub fn paginate(articles: Vec<Article>, page: usize, limit: usize) -> Page {
    let total = articles.len();
    let start = page.saturating_sub(1).saturating_mul(limit);
    let has_more = start.saturating_add(limit) < total;

    Page {
        articles: articles.into_iter().skip(start).take(limit).collect(),
        total,
        has_more,
    }
}

/// Case-insensitive substring match over title, description, and source.
/// Operates on the full merged corpus and returns every match, unpaginated.
pub fn search(articles: Vec<Article>, term: &str) -> Vec<Article> {
    let term = term.to_lowercase();
    articles
        .into_iter()
        .filter(|article| {
            article.title.to_lowercase().contains(&term)
                || article.description.to_lowercase().contains(&term)
                || article.source.to_lowercase().contains(&term)
        })
        .collect()
}
