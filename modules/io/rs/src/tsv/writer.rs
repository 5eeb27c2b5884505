use super::Record;
use crate::compression::encode;
use crate::traits::WriteRecord;
use epimap_core_rs::Table;
use eyre::{ensure, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// TSV writer. Missing cells are written as empty fields.
pub struct Writer<W> {
    writer: W,
    columns: usize,
}

impl Writer<()> {
    pub fn from_path(
        path: impl AsRef<Path>,
        config: &encode::Config,
        index_name: &str,
        columns: &[impl AsRef<str>],
    ) -> Result<Writer<encode::Stream<BufWriter<File>>>> {
        Writer::new(encode::create(path, config)?, index_name, columns)
    }
}

impl<W: Write> Writer<W> {
    /// Creates the writer and immediately writes the header line.
    pub fn new(mut writer: W, index_name: &str, columns: &[impl AsRef<str>]) -> Result<Self> {
        field(index_name)?;
        write!(writer, "{index_name}")?;
        for column in columns {
            let column = column.as_ref();
            field(column)?;
            write!(writer, "\t{column}")?;
        }
        writeln!(writer)?;

        Ok(Self {
            writer,
            columns: columns.len(),
        })
    }

    /// Writes all rows of the table. The table must have the same number of columns as the header.
    pub fn write_table(&mut self, table: &Table) -> Result<()> {
        ensure!(
            table.columns().len() == self.columns,
            "Table has {} columns, but the writer expects {}",
            table.columns().len(),
            self.columns
        );
        for row in table.rows() {
            self.write_row(row.index(), row.cells())?;
        }
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write_row(&mut self, index: &str, cells: &[Option<String>]) -> Result<()> {
        ensure!(
            cells.len() == self.columns,
            "Record '{index}' has {} cells, but the header has {} columns",
            cells.len(),
            self.columns
        );
        field(index)?;
        write!(self.writer, "{index}")?;
        for cell in cells {
            let cell = cell.as_deref().unwrap_or("");
            field(cell)?;
            write!(self.writer, "\t{cell}")?;
        }
        writeln!(self.writer)?;
        Ok(())
    }
}

impl<W: Write> Writer<encode::Stream<W>> {
    /// Flushes the data and finalizes the compression stream.
    pub fn finish(self) -> Result<()> {
        self.writer.finish()?;
        Ok(())
    }
}

impl<W: Write> WriteRecord for Writer<W> {
    type Record = Record;

    fn write_record(&mut self, record: &Self::Record) -> Result<()> {
        self.write_row(record.index(), record.cells())
    }

    fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

fn field(value: &str) -> Result<()> {
    ensure!(
        !value.contains(['\t', '\n', '\r']),
        "TSV fields can't contain tabs or line breaks, got: {value:?}"
    );
    Ok(())
}
