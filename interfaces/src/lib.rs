pub mod baseline;
pub mod classify;
pub mod dedup;
pub mod defs;
pub mod merge;
pub mod redirect;
pub mod state;
pub mod text;

pub use classify::Classifier;
pub use defs::{Article, BatchDocument, Category, DigestType, LookbackWindow};
pub use redirect::RedirectResolver;
pub use state::{FileLedger, LedgerStore, MemoryLedger, ProcessedLedger};

/// Log to stderr so stdout stays free for the batch document.
pub fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
