//! Artsync Ingest - provider ingestion tool

use anyhow::Result;
use artsync_common::logging::{init_logging, LogConfig, LogLevel};
use artsync_ingest::cleveland::{self, StopReason};
use clap::Parser;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "artsync-ingest")]
#[command(author, version, about = "Openly licensed artwork ingestion tool")]
struct Cli {
    /// Provider to ingest
    #[command(subcommand)]
    source: Source,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Parser, Debug)]
enum Source {
    /// Ingest CC0 artworks from the Cleveland Museum of Art
    Cleveland {
        /// Directory for the TSV output
        #[arg(short, long, default_value = "./output")]
        output_dir: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        LogLevel::Debug
    } else {
        LogLevel::Info
    };

    // LOG_* variables take precedence over the flag
    let log_config = LogConfig::builder()
        .level(log_level)
        .log_file_prefix("artsync-ingest")
        .build()
        .merge_env()?;

    let _log_guard = init_logging(&log_config)?;

    match cli.source {
        Source::Cleveland { output_dir } => {
            info!(output_dir = %output_dir, "Ingesting Cleveland Museum of Art");
            let summary = cleveland::ingest(&output_dir).await?;

            if summary.stop_reason == StopReason::RetriesExhausted {
                warn!(
                    offset = summary.final_offset,
                    "Stopped early: the API kept failing at this offset"
                );
            }

            info!(
                pages = summary.pages,
                seen = summary.stats.records_seen,
                committed = summary.total_committed,
                rejected_license = summary.stats.rejected_license,
                rejected_no_image = summary.stats.rejected_no_image,
                rejected_malformed = summary.stats.rejected_malformed,
                "Cleveland ingestion finished"
            );
        },
    }

    info!("Ingestion complete");
    Ok(())
}
