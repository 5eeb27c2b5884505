use crate::compression::encode;
use crate::tsv;
use epimap_core_rs::num::Float;
use epimap_core_rs::{Matrix, MatrixSink};
use eyre::{ensure, Result, WrapErr};
use std::fmt::Display;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Default name of the index column, i.e. the column with row labels.
pub const INDEX_NAME: &str = "ID";

/// Reads a dense labelled matrix, e.g. sample x peptide z-scores, from a TSV file.
/// Missing cells are loaded as NaN.
pub fn read<T: Float>(path: impl AsRef<Path>) -> Result<Matrix<T>> {
    let path = path.as_ref();
    let table = tsv::read_table(path)?;
    Matrix::from_table(&table).wrap_err_with(|| format!("Invalid matrix in {}", path.display()))
}

/// Matrix sink that stores a single matrix as a dense TSV table.
pub struct TsvSink<W> {
    writer: Option<W>,
    index_name: String,
    written: bool,
}

impl TsvSink<()> {
    pub fn from_path(
        path: impl AsRef<Path>,
        config: &encode::Config,
    ) -> Result<TsvSink<encode::Stream<BufWriter<File>>>> {
        Ok(TsvSink::new(encode::create(path, config)?))
    }
}

impl<W: Write> TsvSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Some(writer),
            index_name: INDEX_NAME.to_string(),
            written: false,
        }
    }

    pub fn with_index_name(mut self, index_name: impl Into<String>) -> Self {
        self.index_name = index_name.into();
        self
    }

    pub fn into_inner(self) -> Option<W> {
        self.writer
    }
}

impl<W: Write> TsvSink<encode::Stream<W>> {
    pub fn finish(self) -> Result<()> {
        if let Some(writer) = self.writer {
            writer.finish()?;
        }
        Ok(())
    }
}

impl<T: Float + Display, W: Write> MatrixSink<T> for TsvSink<W> {
    fn sink(&mut self, matrix: &Matrix<T>) -> Result<()> {
        ensure!(
            !self.written,
            "TSV matrix sink can store only a single matrix"
        );
        ensure!(
            matrix.missing() == 0,
            "Matrix sink received {} missing values",
            matrix.missing()
        );
        let writer = self
            .writer
            .take()
            .ok_or_else(|| eyre::eyre!("TSV matrix sink has no output stream"))?;

        let table = matrix.to_table(&self.index_name)?;
        let mut writer = tsv::Writer::new(writer, table.index_name(), table.columns())?;
        writer.write_table(&table)?;

        let mut writer = writer.into_inner();
        writer.flush()?;
        self.writer = Some(writer);
        self.written = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tsv_sink() -> Result<()> {
        let matrix = Matrix::new(
            vec!["e1".into(), "e2".into()],
            vec!["s1".into()],
            vec![-5.0f64, 0.25],
        )?;

        let mut sink = TsvSink::new(Vec::<u8>::new());
        sink.sink(&matrix)?;
        let produced = sink.into_inner().unwrap_or_default();
        assert_eq!(
            String::from_utf8(produced)?,
            "ID\ts1\ne1\t-5\ne2\t0.25\n"
        );
        Ok(())
    }

    #[test]
    fn test_tsv_sink_rejects_second_matrix() -> Result<()> {
        let matrix = Matrix::new(vec!["e1".into()], vec!["s1".into()], vec![1.0f64])?;

        let mut sink = TsvSink::new(Vec::<u8>::new());
        sink.sink(&matrix)?;
        let err = sink.sink(&matrix).unwrap_err();
        assert!(err.to_string().contains("single matrix"));

        let produced = sink.into_inner().unwrap_or_default();
        let table = tsv::Reader::new(produced.as_slice())?.read_table()?;
        assert_eq!(table.index(), ["e1"]);
        Ok(())
    }

    #[test]
    fn test_tsv_sink_rejects_missing() -> Result<()> {
        let matrix = Matrix::new(vec!["e1".into()], vec!["s1".into()], vec![f64::NAN])?;
        assert!(TsvSink::new(Vec::<u8>::new()).sink(&matrix).is_err());
        Ok(())
    }
}
