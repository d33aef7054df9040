//! csvsift: a library for stripping empty columns and rows from CSV files.
//!
//! This library provides the two-pass streaming pipeline behind the
//! `csvsift` binary: a discovery pass that finds, per file, the columns
//! holding at least one non-empty value, and a rewrite pass that projects
//! each file onto those columns and drops rows left entirely empty.
//!
//! # Example
//!
//! ```ignore
//! use csvsift::{Options, run_pipeline, error::PipelineError};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), PipelineError> {
//!     let stats = run_pipeline(Options::new("./data")).await?;
//!     println!("Processed {} files", stats.files_processed);
//!     Ok(())
//! }
//! ```

pub mod discover;
pub mod error;
pub mod filter;
pub mod pipeline;
pub mod rewrite;

// Re-export main types
pub use pipeline::{OUTPUT_SUBDIR, Options, RunStats, run_pipeline};
