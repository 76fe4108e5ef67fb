pub mod catalog;
pub mod rss_feed;
pub mod search_proxy;
pub mod weekly_probe;

pub use catalog::default_sources;
pub use rss_feed::RssFeedSource;
pub use search_proxy::SearchProxySource;
pub use weekly_probe::WeeklyProbeSource;
