use crate::fetcher::Fetcher;
use crate::types::{Article, LookbackWindow, Result};
use async_trait::async_trait;

/// Anything the collector can pull article records from.
#[async_trait]
pub trait ArticleSource: Send + Sync {
    /// Human-readable publisher name, used in records and logs.
    fn name(&self) -> &str;

    /// Records published inside `window` (or undated).
    ///
    /// An error means the whole source is unavailable for this run; the
    /// collector logs it and moves on.
    async fn collect(&self, fetcher: &Fetcher, window: &LookbackWindow) -> Result<Vec<Article>>;
}
