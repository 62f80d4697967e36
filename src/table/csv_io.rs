use crate::Result;
use crate::table::Table;
use camino::Utf8Path;
use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use ohno::IntoAppError;

/// Read a comma-separated file into a table.
///
/// The whole file is read into memory before processing begins. No header
/// row is assumed and rows may have differing field counts; quoting follows
/// the standard CSV rules.
pub fn read_table(path: &Utf8Path) -> Result<Table> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .into_app_err_with(|| format!("unable to open table file: {path}"))?;

    let mut table = Table::new();
    let mut record = StringRecord::new();
    while reader
        .read_record(&mut record)
        .into_app_err_with(|| format!("reading CSV record {} from {path}", table.len() + 1))?
    {
        table.push(record.iter().map(str::to_owned).collect());
    }

    Ok(table)
}

/// Write a table as a comma-separated file, minimal quoting, rows in table order.
pub fn write_table(table: &Table, path: &Utf8Path) -> Result<()> {
    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .into_app_err_with(|| format!("unable to create table file: {path}"))?;

    for row in table {
        writer
            .write_record(row)
            .into_app_err_with(|| format!("writing CSV record to {path}"))?;
    }

    writer.flush().into_app_err_with(|| format!("flushing table file: {path}"))?;
    Ok(())
}
