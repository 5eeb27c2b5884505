#[cfg(feature = "bitcode")]
use bitcode::{Decode, Encode};
use eyre::{ensure, eyre, Result};
use std::fmt::{Debug, Formatter};

use crate::parse;

/// In-memory table of string cells with named columns and a labelled index.
///
/// This is the exchange format between the pipeline stages and whatever persists the data.
/// Cells are optional: `None` marks a missing value, which is distinct from an empty string.
#[cfg_attr(feature = "bitcode", derive(Encode, Decode))]
#[derive(Clone, PartialEq, Eq, Default)]
pub struct Table {
    index_name: String,
    columns: Vec<String>,
    index: Vec<String>,
    rows: Vec<Vec<Option<String>>>,
}

impl Table {
    /// Creates an empty table. Column names must be unique and non-empty.
    pub fn new(
        index_name: impl Into<String>,
        columns: impl IntoIterator<Item = impl Into<String>>,
    ) -> Result<Self> {
        let columns: Vec<String> = columns.into_iter().map(Into::into).collect();
        for column in &columns {
            ensure!(!column.is_empty(), "Table column names must not be empty");
        }
        parse::unique("Table column", columns.iter().map(String::as_str))?;

        Ok(Self {
            index_name: index_name.into(),
            columns,
            index: Vec::new(),
            rows: Vec::new(),
        })
    }

    /// Appends a row. The number of cells must match the number of columns.
    pub fn push(&mut self, index: impl Into<String>, cells: Vec<Option<String>>) -> Result<()> {
        let index = index.into();
        ensure!(
            cells.len() == self.columns.len(),
            "Row '{}' has {} cells, but the table has {} columns",
            index,
            cells.len(),
            self.columns.len()
        );
        self.index.push(index);
        self.rows.push(cells);
        Ok(())
    }

    pub fn index_name(&self) -> &str {
        &self.index_name
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Row labels in row order.
    pub fn index(&self) -> &[String] {
        &self.index
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of the column, if it exists.
    pub fn position(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|x| x == column)
    }

    /// Position of the column or a schema error enumerating the available columns.
    pub fn require(&self, column: &str) -> Result<usize> {
        self.position(column).ok_or_else(|| {
            eyre!(
                "Required column '{column}' does not exist. Valid columns are: {:?}",
                self.columns
            )
        })
    }

    /// Positions of all requested columns. Fails on the first missing one.
    pub fn require_all<const N: usize>(&self, columns: [&str; N]) -> Result<[usize; N]> {
        let mut result = [0; N];
        for (slot, column) in result.iter_mut().zip(columns) {
            *slot = self.require(column)?;
        }
        Ok(result)
    }

    pub fn cell(&self, row: usize, column: usize) -> Option<&str> {
        self.rows[row][column].as_deref()
    }

    pub fn rows(&self) -> impl ExactSizeIterator<Item = Row<'_>> {
        (0..self.rows.len()).map(move |ind| Row { table: self, ind })
    }
}

/// Borrowed view of a single table row.
#[derive(Clone, Copy)]
pub struct Row<'a> {
    table: &'a Table,
    ind: usize,
}

impl<'a> Row<'a> {
    pub fn index(&self) -> &'a str {
        &self.table.index[self.ind]
    }

    pub fn get(&self, column: usize) -> Option<&'a str> {
        self.table.rows[self.ind][column].as_deref()
    }

    /// Value of a column that must not be missing.
    pub fn required(&self, column: usize) -> Result<&'a str> {
        self.get(column).ok_or_else(|| {
            eyre!(
                "Row '{}' has a missing value in the column '{}'",
                self.index(),
                self.table.columns[column]
            )
        })
    }

    pub fn cells(&self) -> &'a [Option<String>] {
        &self.table.rows[self.ind]
    }
}

impl Debug for Table {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Table({} x {}, index: {}, columns: {:?})",
            self.rows.len(),
            self.columns.len(),
            self.index_name,
            self.columns
        )
    }
}

#[cfg(test)]
impl Table {
    pub fn dummy() -> Self {
        let mut table = Table::new("ID", ["A", "B"]).unwrap();
        table.push("r1", vec![Some("a1".into()), None]).unwrap();
        table
            .push("r2", vec![Some("a2".into()), Some("b2".into())])
            .unwrap();
        table
    }
}
