use derive_getters::{Dissolve, Getters};
use eyre::{ensure, Result, WrapErr};
use impl_tools::autoimpl;
use std::fmt::Display;

use crate::num::Float;
use crate::parse;
use crate::table::Table;

/// Dense row-major numeric matrix with labelled rows and columns.
#[derive(Clone, PartialEq, Debug, Default, Dissolve, Getters)]
pub struct Matrix<T> {
    rows: Vec<String>,
    columns: Vec<String>,
    data: Vec<T>,
}

impl<T: Float> Matrix<T> {
    /// Creates a matrix from row-major data. Labels must be unique along each axis.
    pub fn new(rows: Vec<String>, columns: Vec<String>, data: Vec<T>) -> Result<Self> {
        ensure!(
            data.len() == rows.len() * columns.len(),
            "Matrix data has {} values, expected {} rows x {} columns",
            data.len(),
            rows.len(),
            columns.len()
        );
        parse::unique("Matrix row", rows.iter().map(String::as_str))?;
        parse::unique("Matrix column", columns.iter().map(String::as_str))?;
        Ok(Self {
            rows,
            columns,
            data,
        })
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows.len(), self.columns.len())
    }

    pub fn get(&self, row: usize, column: usize) -> T {
        self.data[row * self.columns.len() + column]
    }

    pub fn row(&self, row: usize) -> &[T] {
        let width = self.columns.len();
        &self.data[row * width..(row + 1) * width]
    }

    /// Number of NaN (missing) values in the matrix.
    pub fn missing(&self) -> usize {
        self.data.iter().filter(|x| x.is_nan()).count()
    }

    /// Replaces all NaN (missing) values with the given value.
    pub fn fill_missing(&mut self, value: T) -> &mut Self {
        for x in self.data.iter_mut().filter(|x| x.is_nan()) {
            *x = value;
        }
        self
    }

    /// Parses a numeric matrix from a table. Missing cells become NaN.
    pub fn from_table(table: &Table) -> Result<Self> {
        let mut data = Vec::with_capacity(table.len() * table.columns().len());
        for row in table.rows() {
            for (column, cell) in table.columns().iter().zip(row.cells()) {
                let value = match cell {
                    None => T::nan(),
                    Some(cell) => cell.trim().parse::<T>().map_err(|_| {
                        eyre::eyre!(
                            "Invalid numeric value '{cell}' (row '{}', column '{column}')",
                            row.index()
                        )
                    })?,
                };
                data.push(value);
            }
        }
        Self::new(table.index().to_vec(), table.columns().to_vec(), data)
            .wrap_err("Failed to convert the table into a numeric matrix")
    }
}

impl<T: Float + Display> Matrix<T> {
    /// Renders the matrix as a table with the given index name. NaN values become missing cells.
    pub fn to_table(&self, index_name: &str) -> Result<Table> {
        let mut table = Table::new(index_name, self.columns.iter().cloned())?;
        for (ind, label) in self.rows.iter().enumerate() {
            let cells = self
                .row(ind)
                .iter()
                .map(|x| (!x.is_nan()).then(|| x.to_string()))
                .collect();
            table.push(label.clone(), cells)?;
        }
        Ok(table)
    }
}

/// Destination for dense matrices produced by the pipeline, e.g. a file or a container format.
///
/// Implementations receive matrices without missing values and must preserve the row and
/// column order of the labels.
#[autoimpl(for<S: trait + ?Sized> &mut S, Box<S>)]
pub trait MatrixSink<T: Float> {
    fn sink(&mut self, matrix: &Matrix<T>) -> Result<()>;
}

impl<T: Float> MatrixSink<T> for Vec<Matrix<T>> {
    fn sink(&mut self, matrix: &Matrix<T>) -> Result<()> {
        self.push(matrix.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(prefix: &str, n: usize) -> Vec<String> {
        (0..n).map(|x| format!("{prefix}{x}")).collect()
    }

    #[test]
    fn test_matrix_layout() -> Result<()> {
        let matrix = Matrix::new(labels("r", 2), labels("c", 3), vec![1., 2., 3., 4., 5., 6.])?;
        assert_eq!(matrix.shape(), (2, 3));
        assert_eq!(matrix.get(1, 0), 4.);
        assert_eq!(matrix.row(0), [1., 2., 3.]);
        Ok(())
    }

    #[test]
    fn test_matrix_fill_missing() -> Result<()> {
        let data = vec![f64::NAN, 2., f64::NAN];
        let mut matrix = Matrix::new(labels("r", 1), labels("c", 3), data)?;
        assert_eq!(matrix.missing(), 2);
        matrix.fill_missing(0.);
        assert_eq!(matrix.missing(), 0);
        assert_eq!(matrix.row(0), [0., 2., 0.]);
        Ok(())
    }

    #[test]
    fn test_matrix_rejects_bad_shapes() {
        assert!(Matrix::new(labels("r", 2), labels("c", 2), vec![1f32; 3]).is_err());
        let duplicated = vec!["r".to_string(), "r".to_string()];
        assert!(Matrix::new(duplicated, labels("c", 1), vec![1f32; 2]).is_err());
    }

    #[test]
    fn test_matrix_table_conversion() -> Result<()> {
        let mut table = Table::new("sample", ["p1", "p2"])?;
        table.push("s1", vec![Some("-1.5".into()), None])?;
        table.push("s2", vec![Some(" 2".into()), Some("0".into())])?;

        let matrix = Matrix::<f64>::from_table(&table)?;
        assert_eq!(matrix.shape(), (2, 2));
        assert_eq!(matrix.get(0, 0), -1.5);
        assert!(matrix.get(0, 1).is_nan());
        assert_eq!(matrix.row(1), [2., 0.]);

        let restored = matrix.to_table("sample")?;
        assert_eq!(restored.cell(0, 0), Some("-1.5"));
        assert_eq!(restored.cell(0, 1), None);
        assert_eq!(restored.cell(1, 0), Some("2"));

        table.push("s3", vec![Some("x".into()), None])?;
        let err = Matrix::<f64>::from_table(&table).unwrap_err().to_string();
        assert!(err.contains("'x'"));
        Ok(())
    }

    #[test]
    fn test_vec_sink() -> Result<()> {
        let matrix = Matrix::new(labels("r", 1), labels("c", 1), vec![1f64])?;
        let mut sink: Vec<Matrix<f64>> = Vec::new();
        let mut boxed: Box<dyn MatrixSink<f64> + '_> = Box::new(&mut sink);
        boxed.sink(&matrix)?;
        drop(boxed);
        assert_eq!(sink, vec![matrix]);
        Ok(())
    }
}
