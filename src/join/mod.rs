//! Key-based table join and reconciliation.
//!
//! The secondary table is first turned into an index keyed by one designated
//! column, then the primary table is joined against it row by row. Keys that
//! exist on only one side are the expected result of historical FIPS churn
//! (county creation, dissolution, renaming) and are collected and reported,
//! never silently dropped.

mod index;
mod joiner;

pub use index::{Index, build_index};
pub use joiner::{JoinOutcome, UnmatchedRow, join};
