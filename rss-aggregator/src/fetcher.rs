use crate::types::{AggregatorError, FetchConfig, FetchResult, Result};
use reqwest::Client;
use std::time::{Duration, Instant};
use tracing::debug;
use url::Url;

/// Single-attempt HTTP access for feed sources. Nothing is retried.
pub struct Fetcher {
    client: Client,
    config: FetchConfig,
}

impl Fetcher {
    pub fn new(config: FetchConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_seconds))
            .gzip(true)
            .deflate(true)
            .brotli(true)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .build()?;

        Ok(Self { client, config })
    }

    pub async fn fetch_feed(&self, url: &str) -> Result<FetchResult> {
        let start_time = Instant::now();
        Url::parse(url)?;

        debug!("Fetching feed: {}", url);

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(AggregatorError::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let limit = self.config.max_feed_size_mb * 1024 * 1024;
        if let Some(content_length) = response.content_length() {
            if content_length as usize > limit {
                return Err(AggregatorError::FeedTooLarge {
                    size_mb: content_length as usize / (1024 * 1024),
                });
            }
        }

        let content = response.text().await?;
        if content.len() > limit {
            return Err(AggregatorError::FeedTooLarge {
                size_mb: content.len() / (1024 * 1024),
            });
        }

        let response_time_ms = start_time.elapsed().as_millis() as u64;
        debug!("Fetched {} ({} bytes, {}ms)", url, content.len(), response_time_ms);

        Ok(FetchResult {
            url: url.to_string(),
            content,
        })
    }

    /// HEAD `url` with the short probe timeout; true only on `200 OK`.
    pub async fn probe(&self, url: &str) -> Result<bool> {
        Url::parse(url)?;
        let response = self
            .client
            .head(url)
            .timeout(Duration::from_secs(self.config.probe_timeout_seconds))
            .send()
            .await?;
        let status = response.status();
        debug!("Probe {} -> {}", url, status);
        Ok(status == reqwest::StatusCode::OK)
    }
}
