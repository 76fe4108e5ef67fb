use clap::Parser;
use email_ingestion::email_ingester::{BATCH_SOURCE_TAG, DEFAULT_MAILBOX_URI};
use email_ingestion::{EmailIngester, EmailIngesterConfig, ImapCredentials};
use interfaces::{BatchDocument, FileLedger, LookbackWindow};
use std::path::PathBuf;
use tracing::{info, warn};

/// Extract stories from newsletter and alert emails in an IMAP mailbox.
#[derive(Parser, Debug)]
#[command(name = "email-ingestion", version)]
struct Cli {
    /// Output path (stdout when omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Lookback window in hours
    #[arg(long, default_value_t = 28)]
    hours: u32,

    /// Mailbox URI, e.g. email://imap.gmail.com:993/INBOX
    #[arg(long, env = "IMAP_URI", default_value = DEFAULT_MAILBOX_URI)]
    mailbox: String,

    /// Mailbox user
    #[arg(long, env = "IMAP_USER")]
    user: Option<String>,

    /// App password or token
    #[arg(long, env = "IMAP_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// File holding already processed Message-IDs
    #[arg(long, env = "AP_PROCESSED_IDS", default_value = ".ap_processed_ids")]
    ledger: PathBuf,
}

fn main() -> anyhow::Result<()> {
    interfaces::init_logging();
    let cli = Cli::parse();

    info!("Starting email ingestion ({}h window)", cli.hours);
    let window = LookbackWindow::new(cli.hours);

    let articles = match (cli.user, cli.token) {
        (Some(username), Some(password)) => {
            let credentials = ImapCredentials { username, password };
            match EmailIngesterConfig::from_uri_and_credentials(&cli.mailbox, &credentials) {
                Ok(config) => EmailIngester::new(config).run(&window, &FileLedger::new(&cli.ledger)),
                Err(e) => {
                    warn!("{}", e);
                    Vec::new()
                }
            }
        }
        _ => {
            warn!("IMAP_USER or IMAP_TOKEN not set, writing an empty batch");
            Vec::new()
        }
    };

    let batch = BatchDocument::new(cli.hours, articles).with_source(BATCH_SOURCE_TAG);
    batch.write_to(cli.output.as_deref())?;
    info!("Email ingestion finished: {} articles", batch.article_count);
    Ok(())
}
