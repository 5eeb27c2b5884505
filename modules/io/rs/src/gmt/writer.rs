use super::Record;
use crate::compression::encode;
use crate::traits::WriteRecord;
use eyre::Result;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

pub struct Writer<W> {
    writer: W,
}

impl Writer<()> {
    pub fn from_path(
        path: impl AsRef<Path>,
        config: &encode::Config,
    ) -> Result<Writer<encode::Stream<BufWriter<File>>>> {
        Ok(Writer::new(encode::create(path, config)?))
    }
}

impl<W: Write> Writer<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> Writer<encode::Stream<W>> {
    pub fn finish(self) -> Result<()> {
        self.writer.finish()?;
        Ok(())
    }
}

impl<W: Write> WriteRecord for Writer<W> {
    type Record = Record;

    fn write_record(&mut self, record: &Self::Record) -> Result<()> {
        write!(self.writer, "{}\t{}", record.name(), record.description())?;
        for member in record.members() {
            write!(self.writer, "\t{member}")?;
        }
        writeln!(self.writer)?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
