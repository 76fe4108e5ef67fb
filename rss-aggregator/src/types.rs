use chrono::{DateTime, Utc};

pub use interfaces::defs::{Article, BatchDocument, Category, LookbackWindow};

#[derive(Debug, Clone)]
pub struct FetchResult {
    pub url: String,
    pub content: String, // RSS/Atom XML
}

#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub user_agent: String,
    pub timeout_seconds: u64,
    pub probe_timeout_seconds: u64,
    pub max_feed_size_mb: usize,
    pub max_redirects: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: "Mozilla/5.0 (compatible; NewsIngest/1.0)".to_string(),
            timeout_seconds: 30,
            probe_timeout_seconds: 15,
            max_feed_size_mb: 10,
            max_redirects: 5,
        }
    }
}

#[derive(Debug)]
pub struct ParsedFeed {
    pub title: Option<String>,
    pub entries: Vec<ParsedEntry>,
}

#[derive(Debug, Clone)]
pub struct ParsedEntry {
    pub guid: Option<String>,
    pub url: String,
    /// Raw title markup; may be empty.
    pub title: String,
    pub summary: Option<String>,
    pub content: Option<String>,
    /// Publish time, falling back to the update time.
    pub published_at: Option<DateTime<Utc>>,
}

impl ParsedEntry {
    /// Full content when the feed carries it, otherwise the summary.
    pub fn richest_body(&self) -> &str {
        self.content
            .as_deref()
            .filter(|c| !c.trim().is_empty())
            .or(self.summary.as_deref())
            .unwrap_or("")
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AggregatorError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Feed parse error: {0}")]
    Parse(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("HTTP {status} from {url}")]
    HttpStatus { status: u16, url: String },

    #[error("Feed returned no entries: {url}")]
    EmptyFeed { url: String },

    #[error("Feed size exceeds limit: {size_mb}MB")]
    FeedTooLarge { size_mb: usize },

    #[error("General error: {0}")]
    General(String),
}

pub type Result<T> = std::result::Result<T, AggregatorError>;
