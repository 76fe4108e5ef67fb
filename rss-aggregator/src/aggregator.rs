use crate::sources::default_sources;
use crate::traits::ArticleSource;
use crate::types::{Article, BatchDocument, FetchConfig, LookbackWindow, Result};
use crate::Fetcher;
use interfaces::dedup::finish_batch;
use tracing::{info, warn};

/// Default per-category cap for a finished batch.
pub const DEFAULT_MAX_PER_CATEGORY: usize = 12;

/// Visits every source in turn and assembles one batch document.
pub struct FeedCollector {
    fetcher: Fetcher,
    sources: Vec<Box<dyn ArticleSource>>,
}

impl FeedCollector {
    pub fn new(fetch_config: FetchConfig, sources: Vec<Box<dyn ArticleSource>>) -> Result<Self> {
        Ok(Self {
            fetcher: Fetcher::new(fetch_config)?,
            sources,
        })
    }

    pub fn with_default_sources(fetch_config: FetchConfig) -> Result<Self> {
        Self::new(fetch_config, default_sources())
    }

    /// Raw records from every source that answered. Failing sources are skipped.
    pub async fn collect_all(&self, window: &LookbackWindow) -> Vec<Article> {
        let mut articles = Vec::new();
        let mut failed = 0;

        for source in &self.sources {
            match source.collect(&self.fetcher, window).await {
                Ok(mut collected) => articles.append(&mut collected),
                Err(e) => {
                    failed += 1;
                    warn!("Skipping {}: {}", source.name(), e);
                }
            }
        }

        info!(
            "Collected {} raw articles from {}/{} sources",
            articles.len(),
            self.sources.len() - failed,
            self.sources.len()
        );
        articles
    }

    /// Collect, dedup, cap and sort into a batch document.
    pub async fn run(&self, window: &LookbackWindow, max_per_category: usize) -> BatchDocument {
        let raw = self.collect_all(window).await;
        let raw_count = raw.len();
        let articles = finish_batch(raw, max_per_category);
        info!("After dedup and cap: {} of {} articles", articles.len(), raw_count);
        BatchDocument::new(window.hours, articles)
    }
}
