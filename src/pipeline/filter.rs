// src/pipeline/filter.rs

//! Post-fetch filtering and limiting of collected vacancies.

use crate::models::{ColumnarResult, FilterSpec};

/// Keep rows matching `filter`, then at most `limit` of them, in order.
///
/// Runs on every call, cached or not; its output is never cached.
pub fn apply(
    result: &ColumnarResult,
    filter: Option<&FilterSpec>,
    limit: Option<usize>,
) -> ColumnarResult {
    let filter = filter.filter(|f| !f.is_empty());
    let rows = result
        .records()
        .filter(|record| filter.is_none_or(|f| f.matches(record)))
        .take(limit.unwrap_or(usize::MAX));
    ColumnarResult::from_records(rows)
}
