use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::error;

use interfaces::merge::merge_files;

/// Merge supplemental article batches into a primary batch.
#[derive(Parser, Debug)]
#[command(name = "merge-articles", version)]
struct Cli {
    /// Primary batch document
    primary: PathBuf,

    /// Supplemental batch documents, merged in order
    supplementals: Vec<PathBuf>,

    /// Output path (stdout when omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() -> ExitCode {
    interfaces::init_logging();
    let cli = Cli::parse();

    let merged = match merge_files(&cli.primary, &cli.supplementals) {
        Ok(doc) => doc,
        Err(e) => {
            error!("{:#}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = merged.write_to(cli.output.as_deref()) {
        error!("{:#}", e);
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
