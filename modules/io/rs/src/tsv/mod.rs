// Tab-separated tables with a header line.
//
// Layout:
// 1. The header names the index column first, followed by the data columns.
// 2. Every record has exactly as many fields as the header.
// 3. Empty fields and the `NA`/`NaN` literals are missing values.
// 4. Blank lines and lines starting with '#' are ignored.

mod reader;
mod record;
mod writer;

pub use reader::Reader;
pub use record::Record;
pub use writer::Writer;

use crate::compression::{decode, encode};
use epimap_core_rs::Table;
use eyre::{Result, WrapErr};
use std::path::Path;

pub const DELIMITER: u8 = b'\t';
pub const MISSING: [&str; 3] = ["", "NA", "NaN"];

/// Reads the whole table from the file. Compression is inferred automatically.
pub fn read_table(path: impl AsRef<Path>) -> Result<Table> {
    let path = path.as_ref();
    let config = decode::Config::infer_from_path(path)?;
    let table = Reader::from_path(path, &config)?
        .read_table()
        .wrap_err_with(|| format!("Failed to read the table from {}", path.display()))?;
    log::debug!(
        "Loaded {} rows x {} columns from {} ({config:?})",
        table.len(),
        table.columns().len(),
        path.display()
    );
    Ok(table)
}

/// Writes the table to the file. Compression is inferred from the file extension.
pub fn write_table(path: impl AsRef<Path>, table: &Table) -> Result<()> {
    let path = path.as_ref();
    let config = encode::Config::infer_from_path(path);
    let mut writer = Writer::from_path(path, &config, table.index_name(), table.columns())?;
    writer
        .write_table(table)
        .wrap_err_with(|| format!("Failed to write the table to {}", path.display()))?;
    writer.finish()
}
