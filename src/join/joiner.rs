use crate::Result;
use crate::join::Index;
use crate::table::{Record, Table};
use log::warn;
use ohno::bail;
use std::collections::BTreeSet;

/// A primary-table row whose key found no match in the index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnmatchedRow {
    pub key: String,
    pub row: Record,
}

/// The complete result of a join pass.
///
/// Invariants:
/// - `joined.len() + unmatched_primary.len()` equals the primary table's length.
/// - Every joined row's length equals primary row length + secondary row length - 1.
/// - Every key in `matched` exists in both the primary table and the index.
#[derive(Debug, Default)]
pub struct JoinOutcome {
    /// Matched rows, each a primary row concatenated with its index value,
    /// in primary-table order.
    pub joined: Table,

    /// Primary rows whose key missed the index, in primary-table order.
    pub unmatched_primary: Vec<UnmatchedRow>,

    /// Index keys never referenced by any primary row, in sorted key order.
    pub unmatched_index: Vec<String>,

    /// Keys matched at least once.
    pub matched: BTreeSet<String>,
}

impl JoinOutcome {
    /// Returns `true` if both anomaly classes are empty.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.unmatched_primary.is_empty() && self.unmatched_index.is_empty()
    }
}

/// Join `primary` against `index`, keying each primary row by the field at
/// `primary_key_column`.
///
/// Misses on either side are recoverable anomalies: they are logged and
/// collected, and the pass always runs to completion. The only fatal
/// condition is a primary row too short to contain its key column.
///
/// Pure function of its inputs: neither table is mutated and re-running on
/// the same inputs yields an identical outcome.
pub fn join(primary: &Table, index: &Index, primary_key_column: usize) -> Result<JoinOutcome> {
    let mut outcome = JoinOutcome::default();

    for (row_number, row) in primary.iter().enumerate() {
        if row.len() <= primary_key_column {
            bail!(
                "row {} has {} field(s), too short to contain key column {primary_key_column}",
                row_number + 1,
                row.len()
            );
        }

        let key = &row[primary_key_column];
        if let Some(value) = index.get(key) {
            let mut joined_row = row.clone();
            joined_row.extend(value.iter().cloned());
            outcome.joined.push(joined_row);
            let _ = outcome.matched.insert(key.clone());
        } else {
            warn!("primary row {row:?} has no match in the secondary table (key {key})");
            outcome.unmatched_primary.push(UnmatchedRow {
                key: key.clone(),
                row: row.clone(),
            });
        }
    }

    // Requires the complete matched set, so it runs after the full pass.
    // Sorted order comes from the index's key order.
    for key in index.keys() {
        if !outcome.matched.contains(key) {
            warn!("secondary key {key} is never referenced by the primary table");
            outcome.unmatched_index.push(key.clone());
        }
    }

    Ok(outcome)
}
