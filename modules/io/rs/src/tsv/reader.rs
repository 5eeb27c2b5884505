use super::{Record, DELIMITER, MISSING};
use crate::compression::decode;
use crate::traits::ReadRecord;
use epimap_core_rs::Table;
use eyre::{ensure, Result, WrapErr};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// A strict TSV reader. Ignores carriage returns at the end of lines (Windows line endings).
///
/// Returns an error if:
/// - the input has no header line
/// - the header contains duplicated column names
/// - a record has a different number of fields than the header
#[derive(Debug)]
pub struct Reader<R> {
    reader: R,
    header: Vec<String>,
    line: String,
    line_no: usize,
}

impl Reader<()> {
    pub fn from_path(
        path: impl AsRef<Path>,
        config: &decode::Config,
    ) -> Result<Reader<BufReader<decode::Stream<File>>>> {
        Reader::new(decode::open(path, config)?)
    }
}

impl<R: BufRead> Reader<R> {
    pub fn new(reader: R) -> Result<Self> {
        let mut slf = Self {
            reader,
            header: Vec::new(),
            line: String::new(),
            line_no: 0,
        };
        ensure!(
            slf.next_line()?,
            "TSV input is empty, expected a header line"
        );
        slf.header = split(&slf.line).into_iter().map(str::to_owned).collect();
        Ok(slf)
    }

    pub fn index_name(&self) -> &str {
        &self.header[0]
    }

    pub fn columns(&self) -> &[String] {
        &self.header[1..]
    }

    /// Consumes the reader and collects all remaining records into a table.
    pub fn read_table(mut self) -> Result<Table> {
        let mut table = Table::new(self.index_name(), self.columns().iter().cloned())?;
        let mut record = Record::default();
        while self.read_record(&mut record)? {
            let (index, cells) = std::mem::take(&mut record).dissolve();
            table.push(index, cells)?;
        }
        Ok(table)
    }

    // Loads the next meaningful line into the buffer. Returns false at EOF.
    fn next_line(&mut self) -> Result<bool> {
        loop {
            self.line.clear();
            let read = self
                .reader
                .read_line(&mut self.line)
                .wrap_err_with(|| format!("Failed to read TSV line {}", self.line_no + 1))?;
            if read == 0 {
                return Ok(false);
            }
            self.line_no += 1;

            while self.line.ends_with('\n') || self.line.ends_with('\r') {
                self.line.pop();
            }
            if self.line.trim().is_empty() || self.line.starts_with('#') {
                continue;
            }
            return Ok(true);
        }
    }
}

impl<R: BufRead> ReadRecord for Reader<R> {
    type Record = Record;

    fn read_record(&mut self, into: &mut Self::Record) -> Result<bool> {
        if !self.next_line()? {
            return Ok(false);
        }

        let fields = split(&self.line);
        ensure!(
            fields.len() == self.header.len(),
            "TSV line {} has {} fields, expected {} (header: {:?})",
            self.line_no,
            fields.len(),
            self.header.len(),
            self.header
        );

        let (index, cells) = into.fields();
        index.clear();
        index.push_str(fields[0]);
        cells.clear();
        cells.extend(
            fields[1..]
                .iter()
                .map(|x| (!MISSING.contains(x)).then(|| x.to_string())),
        );
        Ok(true)
    }
}

fn split(line: &str) -> Vec<&str> {
    let mut fields = Vec::new();
    let mut start = 0;
    for pos in memchr::memchr_iter(DELIMITER, line.as_bytes()) {
        fields.push(&line[start..pos]);
        start = pos + 1;
    }
    fields.push(&line[start..]);
    fields
}
