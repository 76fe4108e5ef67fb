pub mod aggregator;
pub mod fetcher;
pub mod parser;
pub mod sources;
pub mod traits;
pub mod types;

pub use aggregator::{FeedCollector, DEFAULT_MAX_PER_CATEGORY};
pub use fetcher::Fetcher;
pub use parser::FeedParser;
pub use traits::ArticleSource;
pub use types::*;
