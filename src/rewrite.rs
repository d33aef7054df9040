//! File rewriting: the second streaming pass.
//!
//! Streams records from one file, projects them onto the kept columns
//! discovered for that file, drops rows that become entirely empty, and
//! serializes the survivors to the output stream. The header row (exactly
//! the kept columns) is written once before any data row.

use csv_async::{AsyncReaderBuilder, AsyncWriterBuilder, StringRecord, Trim};
use snafu::prelude::*;
use tokio::io::{AsyncRead, AsyncWrite};

use crate::error::{DecodeSnafu, EncodeSnafu, FileError, IoSnafu};
use crate::filter::{is_row_empty, kept_indices, project};

/// Per-file counters from the rewrite pass.
#[derive(Debug, Clone, Copy, Default)]
pub struct RewriteStats {
    /// Records streamed from the input.
    pub records_read: usize,
    /// Records serialized to the output (read minus dropped).
    pub records_written: usize,
}

/// Stream records from `reader`, filter them, and serialize to `writer`.
///
/// Input rows keep their relative order, minus dropped rows. The output
/// header is exactly `kept`; an empty kept set yields an empty output file,
/// since every projected row is then empty and dropped. The internal write
/// buffer is flushed before returning, but durability of the destination is
/// the caller's concern (see `pipeline::tasks`).
///
/// `path` is used for error messages and logging only.
pub async fn rewrite_stream<R, W>(
    reader: R,
    writer: W,
    kept: &[String],
    path: &str,
) -> Result<RewriteStats, FileError>
where
    R: AsyncRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    let mut rdr = AsyncReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .create_reader(reader);
    let mut wtr = AsyncWriterBuilder::new().create_writer(writer);

    let header = rdr
        .headers()
        .await
        .context(DecodeSnafu { path })?
        .clone();
    let indices = kept_indices(&header, kept);

    // The codec serializes a zero-field record as a single quoted empty
    // field, not an empty line; an empty kept set writes no header at all.
    if !kept.is_empty() {
        wtr.write_record(kept).await.context(EncodeSnafu { path })?;
    }

    let mut stats = RewriteStats::default();
    let mut record = StringRecord::new();

    while rdr
        .read_record(&mut record)
        .await
        .context(DecodeSnafu { path })?
    {
        stats.records_read += 1;

        let filtered = project(&record, &indices);
        if is_row_empty(&filtered) {
            continue;
        }

        wtr.write_record(&filtered)
            .await
            .context(EncodeSnafu { path })?;
        stats.records_written += 1;
    }

    wtr.flush().await.context(IoSnafu { path })?;

    Ok(stats)
}
