use crate::Result;
use crate::table::{Record, Table};
use ohno::bail;
use std::collections::BTreeMap;

/// Mapping from key to the remainder of its record.
///
/// A `BTreeMap` so key iteration is sorted, which makes the order of
/// unmatched-key reporting deterministic across runs.
pub type Index = BTreeMap<String, Record>;

/// Build an index from `table`, keyed by the field at `key_column`.
///
/// The value stored for each key is the row with the field at `key_column`
/// removed. Removal is positional, so a row that happens to repeat the key
/// value in another column keeps that other occurrence intact.
///
/// If two rows share a key, the later row overwrites the earlier entry
/// (last-write-wins). Input tables are expected to carry unique keys; the
/// policy only determines what happens when they don't.
///
/// A row too short to contain `key_column` is a precondition violation and
/// fails the whole build.
pub fn build_index(table: &Table, key_column: usize) -> Result<Index> {
    let mut index = Index::new();

    for (row_number, row) in table.iter().enumerate() {
        if row.len() <= key_column {
            bail!(
                "row {} has {} field(s), too short to contain key column {key_column}",
                row_number + 1,
                row.len()
            );
        }

        let mut value = row.clone();
        let key = value.remove(key_column);
        let _ = index.insert(key, value);
    }

    Ok(index)
}
