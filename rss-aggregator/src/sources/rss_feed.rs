use crate::parser::FeedParser;
use crate::traits::ArticleSource;
use crate::types::{AggregatorError, Article, Category, LookbackWindow, ParsedFeed, Result};
use crate::Fetcher;
use async_trait::async_trait;
use interfaces::text::{clean_html, excerpt_from_html};
use tracing::{debug, info};

/// A syndication feed whose items all belong to one category.
pub struct RssFeedSource {
    pub name: String,
    pub url: String,
    pub category: Category,
}

impl RssFeedSource {
    pub fn new(name: impl Into<String>, url: impl Into<String>, category: Category) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            category,
        }
    }

    /// Turn parsed entries into records, applying the title and window rules.
    pub fn articles_from_feed(&self, feed: &ParsedFeed, window: &LookbackWindow) -> Vec<Article> {
        feed.entries
            .iter()
            .filter_map(|entry| {
                let title = clean_html(&entry.title);
                if title.is_empty() {
                    return None;
                }
                if !window.admits(entry.published_at) {
                    debug!("{}: outside window: {}", self.name, title);
                    return None;
                }
                Some(
                    Article::new(title, entry.url.clone(), self.name.clone(), self.category)
                        .with_excerpt(excerpt_from_html(entry.richest_body()))
                        .with_published(entry.published_at),
                )
            })
            .collect()
    }
}

/// Fetch and parse `url`, treating an entry-less feed as a failure.
pub(crate) async fn fetch_parsed(fetcher: &Fetcher, url: &str) -> Result<ParsedFeed> {
    let fetch_result = fetcher.fetch_feed(url).await?;
    let mut parser = FeedParser::new();
    let parsed = parser.parse_feed(&fetch_result.content)?;
    if parsed.entries.is_empty() {
        return Err(AggregatorError::EmptyFeed { url: fetch_result.url });
    }
    Ok(parsed)
}

#[async_trait]
impl ArticleSource for RssFeedSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn collect(&self, fetcher: &Fetcher, window: &LookbackWindow) -> Result<Vec<Article>> {
        let parsed = fetch_parsed(fetcher, &self.url).await?;
        let articles = self.articles_from_feed(&parsed, window);
        info!("{}: {} articles", self.name, articles.len());
        Ok(articles)
    }
}
