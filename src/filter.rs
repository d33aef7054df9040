//! The emptiness predicate and record projection.
//!
//! Both streaming passes (column discovery and the rewrite) must agree on
//! what "empty" means; the predicate lives here so it is defined exactly
//! once and never re-derived.

use csv_async::StringRecord;

/// Field values considered empty, in addition to an absent field.
///
/// Fields are compared after the reader's whitespace trim, so `" 0 "`
/// arrives here as `"0"`.
pub const EMPTY_VALUES: [&str; 3] = ["", "NULL", "0"];

/// Returns true iff the field is absent or a member of [`EMPTY_VALUES`].
pub fn is_empty(value: Option<&str>) -> bool {
    match value {
        None => true,
        Some(v) => EMPTY_VALUES.contains(&v),
    }
}

/// Resolve each kept column name to its index in the input header.
///
/// A kept name missing from the header resolves to `None`; projection then
/// substitutes the missing-value marker instead of erroring.
pub fn kept_indices(header: &StringRecord, kept: &[String]) -> Vec<Option<usize>> {
    kept.iter()
        .map(|name| header.iter().position(|h| h == name))
        .collect()
}

/// Project a record onto the kept columns, in kept order, values verbatim.
///
/// `indices` comes from [`kept_indices`] for this file's header. Absent
/// fields project to the empty string.
pub fn project<'r>(record: &'r StringRecord, indices: &[Option<usize>]) -> Vec<&'r str> {
    indices
        .iter()
        .map(|idx| idx.and_then(|i| record.get(i)).unwrap_or(""))
        .collect()
}

/// Returns true iff every projected value is empty; such rows are dropped.
pub fn is_row_empty(fields: &[&str]) -> bool {
    fields.iter().all(|v| is_empty(Some(v)))
}
