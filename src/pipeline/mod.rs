//! The two-pass directory pipeline.
//!
//! Pass one streams every candidate file and discovers, per file, the set
//! of columns holding at least one non-empty value. Pass two streams each
//! file again, projects records onto the kept columns, drops rows that
//! become entirely empty, and writes the result to the `filtered`
//! subdirectory. All discovery must finish before any rewrite starts: the
//! rewrite needs the complete kept-column set for a file, never a partial
//! one.
//!
//! # Architecture
//!
//! Per-file pipelines are interleaved cooperatively on the runtime via
//! `buffer_unordered`; each task owns its own streams, returns its own
//! result, and the orchestrator joins them after the barrier. The
//! kept-column map is therefore written only between the passes and
//! read-only during the rewrite.

mod tasks;

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use snafu::prelude::*;
use tokio::fs;
use tracing::{info, warn};

use crate::error::{DirCreateSnafu, FilesFailedSnafu, ListingSnafu, PipelineError};

use tasks::{DiscoveryKind, RewriteKind, discover_file, rewrite_file};

/// Name of the output subdirectory created inside the input directory.
pub const OUTPUT_SUBDIR: &str = "filtered";

/// Default bound on simultaneously open per-file pipelines.
pub const DEFAULT_MAX_CONCURRENT: usize = 64;

/// Options for a pipeline run.
#[derive(Debug, Clone)]
pub struct Options {
    /// Directory containing the CSV files to filter.
    pub dir: PathBuf,
    /// Maximum number of files processed concurrently in each pass.
    pub max_concurrent: usize,
}

impl Options {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            max_concurrent: DEFAULT_MAX_CONCURRENT,
        }
    }

    pub fn with_max_concurrent(mut self, max_concurrent: usize) -> Self {
        self.max_concurrent = max_concurrent;
        self
    }
}

/// Statistics about the pipeline run.
#[derive(Debug, Clone, Default)]
pub struct RunStats {
    pub files_processed: usize,
    pub files_skipped: usize,
    pub files_failed: usize,
    pub records_read: usize,
    pub records_written: usize,
    pub rows_dropped: usize,
}

/// Run the full two-pass pipeline over a directory.
///
/// Succeeds only if every candidate file reaches `done`; per-file failures
/// are logged as they occur and aggregated into a single
/// [`PipelineError::FilesFailed`] after all files reach a terminal state.
pub async fn run_pipeline(options: Options) -> Result<RunStats, PipelineError> {
    let dir = fs::canonicalize(&options.dir).await.context(ListingSnafu {
        path: options.dir.display().to_string(),
    })?;

    info!("Reading all csv files in {}...", dir.display());

    // One listing, reused by both passes.
    let names = list_entries(&dir).await?;
    let mut stats = RunStats::default();

    // Pass one: discovery fan-out, then join. No rewrite starts until every
    // file has a terminal discovery state.
    let mut kept_columns: HashMap<String, Vec<String>> = HashMap::new();
    let mut discovery_failures = 0usize;
    {
        let mut discoveries = stream::iter(names)
            .map(|name| discover_file(&dir, name))
            .buffer_unordered(options.max_concurrent);

        while let Some(outcome) = discoveries.next().await {
            match outcome.kind {
                DiscoveryKind::Discovered { kept } => {
                    kept_columns.insert(outcome.name, kept);
                }
                DiscoveryKind::Skipped => stats.files_skipped += 1,
                DiscoveryKind::Failed { error } => {
                    warn!(
                        "An error occurred when reading file {}: {error}",
                        outcome.name
                    );
                    discovery_failures += 1;
                }
            }
        }
    }
    stats.files_failed += discovery_failures;

    let out_dir = dir.join(OUTPUT_SUBDIR);
    create_output_dir(&out_dir).await?;

    // Pass two: rewrite fan-out over the same listing, using the complete
    // kept-column map. One progress tick per candidate reaching a terminal
    // state; files that already failed in discovery tick up front.
    let candidates = kept_columns.len() + discovery_failures;
    let bar = ProgressBar::new(candidates as u64);
    bar.set_style(
        ProgressStyle::with_template("[{bar:20}] {pos}/{len} -- ")
            .expect("static progress template")
            .progress_chars("= "),
    );
    bar.inc(discovery_failures as u64);

    let mut rewrites = stream::iter(kept_columns.iter())
        .map(|(name, kept)| rewrite_file(&dir, &out_dir, name, kept))
        .buffer_unordered(options.max_concurrent);

    while let Some(outcome) = rewrites.next().await {
        bar.inc(1);
        match outcome.kind {
            RewriteKind::Done { stats: file_stats } => {
                stats.files_processed += 1;
                stats.records_read += file_stats.records_read;
                stats.records_written += file_stats.records_written;
                stats.rows_dropped += file_stats.records_read - file_stats.records_written;
            }
            RewriteKind::Failed { error } => {
                warn!(
                    "An error occurred when writing file {}: {error}",
                    outcome.name
                );
                stats.files_failed += 1;
            }
        }
    }
    bar.finish();

    if stats.files_failed > 0 {
        warn!(
            "Run completed with {} failed file(s) out of {} candidate(s)",
            stats.files_failed, candidates
        );
        return FilesFailedSnafu {
            count: stats.files_failed,
        }
        .fail();
    }

    Ok(stats)
}

/// List the input directory once, as entry names.
async fn list_entries(dir: &Path) -> Result<Vec<String>, PipelineError> {
    let path = dir.display().to_string();
    let mut entries = fs::read_dir(dir).await.context(ListingSnafu {
        path: path.as_str(),
    })?;

    let mut names = Vec::new();
    while let Some(entry) = entries.next_entry().await.context(ListingSnafu {
        path: path.as_str(),
    })? {
        names.push(entry.file_name().to_string_lossy().into_owned());
    }
    Ok(names)
}

/// Create the output subdirectory. "Already exists" is tolerated; any other
/// creation error is fatal, rather than letting every subsequent write fail
/// one by one.
async fn create_output_dir(out_dir: &Path) -> Result<(), PipelineError> {
    match fs::create_dir(out_dir).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::AlreadyExists => Ok(()),
        Err(e) => Err(e).context(DirCreateSnafu {
            path: out_dir.display().to_string(),
        }),
    }
}
