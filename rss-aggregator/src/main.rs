use clap::Parser;
use rss_aggregator::{FeedCollector, FetchConfig, LookbackWindow, DEFAULT_MAX_PER_CATEGORY};
use std::path::PathBuf;
use tracing::{error, info};

/// Collect recent articles from the configured news sources.
#[derive(Parser, Debug)]
#[command(name = "rss-aggregator", version)]
struct Cli {
    /// Output path (stdout when omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Lookback window in hours
    #[arg(long, default_value_t = 24)]
    hours: u32,

    /// Maximum articles kept per category
    #[arg(long, default_value_t = DEFAULT_MAX_PER_CATEGORY)]
    max_per_category: usize,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    interfaces::init_logging();
    let cli = Cli::parse();

    info!("Starting RSS Aggregator ({}h window)", cli.hours);

    let collector = FeedCollector::with_default_sources(FetchConfig::default()).map_err(|e| {
        error!("Failed to build HTTP client: {}", e);
        e
    })?;

    let window = LookbackWindow::new(cli.hours);
    let batch = collector.run(&window, cli.max_per_category).await;

    batch.write_to(cli.output.as_deref())?;
    info!("RSS Aggregator finished: {} articles", batch.article_count);
    Ok(())
}
