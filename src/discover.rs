//! Column discovery: the first streaming pass.
//!
//! Streams every record of one file and accumulates the ordered set of
//! columns that hold at least one non-empty value. The result drives the
//! rewrite pass; it is final once end-of-stream is reached.

use csv_async::{AsyncReaderBuilder, StringRecord, Trim};
use snafu::prelude::*;
use tokio::io::AsyncRead;

use crate::error::{DecodeSnafu, FileError};
use crate::filter::is_empty;

/// Result of the discovery pass over one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Discovery {
    /// Columns worth keeping, in first-seen order of their first non-empty
    /// value. No duplicates.
    pub kept: Vec<String>,
    /// Number of records streamed.
    pub records: usize,
}

/// Stream one file and collect its kept columns.
///
/// For every record, every field whose value is non-empty appends its
/// column name to the kept set if not already present. The full record
/// stream is consumed; a decode error aborts this file and surfaces as a
/// per-file failure.
///
/// `path` is used for error messages and logging only.
pub async fn discover_columns<R>(reader: R, path: &str) -> Result<Discovery, FileError>
where
    R: AsyncRead + Unpin + Send,
{
    let mut rdr = AsyncReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .create_reader(reader);

    let header = rdr
        .headers()
        .await
        .context(DecodeSnafu { path })?
        .clone();

    let mut kept: Vec<String> = Vec::new();
    let mut records = 0;
    let mut record = StringRecord::new();

    while rdr
        .read_record(&mut record)
        .await
        .context(DecodeSnafu { path })?
    {
        records += 1;
        for (i, value) in record.iter().enumerate() {
            if is_empty(Some(value)) {
                continue;
            }
            let Some(name) = header.get(i) else {
                continue;
            };
            if !kept.iter().any(|k| k == name) {
                kept.push(name.to_string());
            }
        }
    }

    Ok(Discovery { kept, records })
}
