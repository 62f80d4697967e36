//! Positional tables.
//!
//! Both input files are headerless CSV where column meaning is established
//! by fixed integer offsets agreed upon by caller and callee. Rows are kept
//! as ordered string fields; insertion order is preserved throughout.

mod csv_io;

pub use csv_io::{read_table, write_table};

/// A single row: ordered fields, positionally addressed.
pub type Record = Vec<String>;

/// An ordered sequence of records. The primary table's order determines
/// the order of the joined output.
pub type Table = Vec<Record>;
