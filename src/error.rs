//! Error types for csvsift using snafu.
//!
//! Per-file errors (`FileError`) are caught at the file-pipeline boundary
//! and recorded as that file's terminal state; they never abort sibling
//! files. Run-level errors (`PipelineError`) abort the whole process.

use snafu::prelude::*;

/// Errors that fail a single file without aborting the run.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum FileError {
    /// Entry metadata could not be read.
    #[snafu(display("Failed to read metadata for {path}"))]
    Stat {
        path: String,
        source: std::io::Error,
    },

    /// Input file could not be opened.
    #[snafu(display("Failed to open {path}"))]
    Open {
        path: String,
        source: std::io::Error,
    },

    /// Malformed CSV encountered mid-stream.
    #[snafu(display("Failed to decode CSV in {path}"))]
    Decode {
        path: String,
        source: csv_async::Error,
    },

    /// CSV serialization to the output stream failed.
    #[snafu(display("Failed to encode CSV for {path}"))]
    Encode {
        path: String,
        source: csv_async::Error,
    },

    /// Filesystem-level failure mid-stream (create, write, flush, sync).
    #[snafu(display("IO error for {path}"))]
    Io {
        path: String,
        source: std::io::Error,
    },
}

/// Top-level errors that abort the whole run.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum PipelineError {
    /// The input directory cannot be resolved or listed.
    #[snafu(display("Failed to read directory {path}"))]
    Listing {
        path: String,
        source: std::io::Error,
    },

    /// Output directory creation failed for a reason other than
    /// "already exists".
    #[snafu(display("Failed to create output directory {path}"))]
    DirCreate {
        path: String,
        source: std::io::Error,
    },

    /// One or more files reached the `failed` terminal state.
    #[snafu(display("{count} file(s) failed"))]
    FilesFailed { count: usize },
}
