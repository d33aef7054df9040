//! csvsift: a standalone tool for cleaning directories of CSV files.
//!
//! Scans a directory, determines per file which columns contain at least
//! one non-empty value, and rewrites each file into a `filtered`
//! subdirectory keeping only those columns and dropping rows left
//! entirely empty.

mod discover;
mod error;
mod filter;
mod pipeline;
mod rewrite;

use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use error::PipelineError;
use pipeline::{DEFAULT_MAX_CONCURRENT, Options, run_pipeline};

const LONG_ABOUT: &str = "\
Removes columns or entries that only contain null values (e.g. NULL, empty strings, 0) \
from every CSV file in a directory.

The filtered files are saved inside a `filtered` folder within the provided folder path.";

/// CSV empty-column and empty-row removal tool.
#[derive(Parser, Debug)]
#[command(name = "csvsift")]
#[command(author, version, about, long_about = LONG_ABOUT)]
struct Args {
    /// Path to the folder containing the CSV files.
    path: PathBuf,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Maximum number of files processed concurrently in each pass.
    #[arg(long, default_value_t = DEFAULT_MAX_CONCURRENT)]
    max_concurrent: usize,
}

#[snafu::report]
#[tokio::main]
async fn main() -> Result<(), PipelineError> {
    let args = Args::parse();

    // Initialize logging
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let options = Options::new(args.path).with_max_concurrent(args.max_concurrent);

    let stats = run_pipeline(options).await?;

    info!("Filtering completed successfully");
    info!("  Files processed: {}", stats.files_processed);
    info!("  Files skipped: {}", stats.files_skipped);
    info!("  Records read: {}", stats.records_read);
    info!("  Records written: {}", stats.records_written);
    info!("  Rows dropped: {}", stats.rows_dropped);
    info!("done!");

    Ok(())
}
