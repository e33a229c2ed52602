use std::cmp::Reverse;

use crate::work::WorkRecord;

/// Numeric sort key for a year string. Unknown and malformed years both count as 0.
pub fn year_key(year: &str) -> i64 {
    year.trim().parse().unwrap_or(0)
}

/// Newest first. Stable, so works from the same year keep their registry order.
pub fn sort_descending_by_year(mut records: Vec<WorkRecord>) -> Vec<WorkRecord> {
    records.sort_by_key(|r| Reverse(year_key(&r.year)));
    records
}
