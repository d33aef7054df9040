//! Per-file pipeline tasks.
//!
//! Each task owns its own reader and writer streams exclusively and reports
//! a terminal outcome. Errors are caught here, at the file boundary, so a
//! failing file never aborts its siblings.

use std::path::Path;

use snafu::prelude::*;
use tokio::fs;
use tracing::debug;

use crate::discover::discover_columns;
use crate::error::{FileError, IoSnafu, OpenSnafu, StatSnafu};
use crate::rewrite::{RewriteStats, rewrite_stream};

/// Terminal outcome of the discovery pass for one directory entry.
pub(super) struct DiscoveryOutcome {
    pub name: String,
    pub kind: DiscoveryKind,
}

pub(super) enum DiscoveryKind {
    /// Candidate file fully streamed; kept columns are final.
    Discovered { kept: Vec<String> },
    /// Directory or non-`.csv` entry; never opened.
    Skipped,
    Failed { error: FileError },
}

/// Terminal outcome of the rewrite pass for one candidate file.
pub(super) struct RewriteOutcome {
    pub name: String,
    pub kind: RewriteKind,
}

pub(super) enum RewriteKind {
    Done { stats: RewriteStats },
    Failed { error: FileError },
}

/// Returns true if the entry is a candidate: a non-directory whose name
/// ends in `.csv`. Candidates are the only entries ever opened.
async fn is_candidate(path: &Path, name: &str) -> Result<bool, FileError> {
    let meta = fs::metadata(path).await.context(StatSnafu { path: name })?;
    Ok(!meta.is_dir() && name.ends_with(".csv"))
}

/// Run column discovery for one directory entry.
pub(super) async fn discover_file(dir: &Path, name: String) -> DiscoveryOutcome {
    let kind = match discover_file_inner(dir, &name).await {
        Ok(Some(kept)) => DiscoveryKind::Discovered { kept },
        Ok(None) => DiscoveryKind::Skipped,
        Err(error) => DiscoveryKind::Failed { error },
    };
    DiscoveryOutcome { name, kind }
}

async fn discover_file_inner(dir: &Path, name: &str) -> Result<Option<Vec<String>>, FileError> {
    let path = dir.join(name);
    if !is_candidate(&path, name).await? {
        return Ok(None);
    }

    let file = fs::File::open(&path).await.context(OpenSnafu { path: name })?;
    let discovery = discover_columns(file, name).await?;
    debug!(
        "Finished parsing file {name}: {} records, {} kept columns",
        discovery.records,
        discovery.kept.len()
    );
    Ok(Some(discovery.kept))
}

/// Rewrite one candidate file into the output directory.
///
/// Completion is reported only after the output file handle is fsynced, so
/// truncated output due to slow I/O is never reported as success.
pub(super) async fn rewrite_file(
    dir: &Path,
    out_dir: &Path,
    name: &str,
    kept: &[String],
) -> RewriteOutcome {
    let kind = match rewrite_file_inner(dir, out_dir, name, kept).await {
        Ok(stats) => {
            debug!("Finished writing file {}/{name}", out_dir.display());
            RewriteKind::Done { stats }
        }
        Err(error) => RewriteKind::Failed { error },
    };
    RewriteOutcome {
        name: name.to_string(),
        kind,
    }
}

async fn rewrite_file_inner(
    dir: &Path,
    out_dir: &Path,
    name: &str,
    kept: &[String],
) -> Result<RewriteStats, FileError> {
    let input = fs::File::open(dir.join(name))
        .await
        .context(OpenSnafu { path: name })?;

    let output = fs::File::create(out_dir.join(name))
        .await
        .context(IoSnafu { path: name })?;
    // A second handle to the same file, so we can fsync after the writer
    // consumes the first one.
    let sync_handle = output.try_clone().await.context(IoSnafu { path: name })?;

    let stats = rewrite_stream(input, output, kept, name).await?;

    sync_handle.sync_all().await.context(IoSnafu { path: name })?;

    Ok(stats)
}
