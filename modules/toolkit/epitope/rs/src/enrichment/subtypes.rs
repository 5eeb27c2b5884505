use ahash::AHashMap;
use derive_getters::Getters;
use epimap_core_rs::{parse, Table};
use eyre::{ensure, eyre, Result};
use itertools::Itertools;

use crate::annotation::columns;
use crate::map::EpitopeMap;

/// Stratum value reported for entries with a missing cell in the split column.
pub const MISSING_STRATUM: &str = "NA";

/// Subtype annotation of a single epitope identity.
///
/// `values` holds the parsed cells of every table column. A one-element list is a scalar that
/// applies to all peptides of the entry, longer lists are aligned with `code_names`.
#[derive(Clone, PartialEq, Eq, Debug, Getters)]
pub struct SubtypeEntry {
    identity: String,
    code_names: Vec<String>,
    subtypes: Vec<String>,
    values: Vec<Vec<String>>,
}

impl SubtypeEntry {
    /// Value of the column for the peptide at the given position.
    pub fn stratum(&self, column: usize, position: usize) -> &str {
        match self.values[column].as_slice() {
            [] => MISSING_STRATUM,
            [value] => stratum_label(value),
            values => stratum_label(&values[position]),
        }
    }
}

fn stratum_label(value: &str) -> &str {
    if value.is_empty() {
        MISSING_STRATUM
    } else {
        value
    }
}

/// Epitope identities with their per-peptide subtypes, indexed for enrichment lookups.
#[derive(Clone, Debug, Default)]
pub struct SubtypeTable {
    columns: Vec<String>,
    entries: Vec<SubtypeEntry>,
    by_identity: AHashMap<String, usize>,
    // peptide -> (entry, first position of the peptide in the entry)
    by_peptide: AHashMap<String, Vec<(usize, usize)>>,
}

impl SubtypeTable {
    pub fn from_map(map: &EpitopeMap) -> Result<Self> {
        Self::from_table(&map.to_table()?)
    }

    /// Parses an epitope map table. `CodeName` and `Subtype` are required, every other
    /// column is kept as a potential split column.
    pub fn from_table(table: &Table) -> Result<Self> {
        let [code_name, subtype] = table.require_all([columns::CODE_NAME, columns::SUBTYPE])?;
        parse::unique("Epitope", table.index().iter().map(String::as_str))?;

        let mut entries = Vec::with_capacity(table.len());
        for row in table.rows() {
            let code_names = parse::list(row.required(code_name)?);
            let subtypes = parse::list(row.required(subtype)?);
            ensure!(
                subtypes.len() == code_names.len(),
                "Epitope '{}' lists {} peptides but {} subtypes",
                row.index(),
                code_names.len(),
                subtypes.len()
            );

            let values = row
                .cells()
                .iter()
                .map(|cell| {
                    cell.as_deref()
                        .filter(|x| !x.is_empty())
                        .map(parse::list)
                        .unwrap_or_default()
                })
                .collect_vec();
            for (column, list) in table.columns().iter().zip(&values) {
                ensure!(
                    list.len() <= 1 || list.len() == code_names.len(),
                    "Column '{column}' of the epitope '{}' has {} values, expected 1 or {}",
                    row.index(),
                    list.len(),
                    code_names.len()
                );
            }

            entries.push(SubtypeEntry {
                identity: row.index().to_owned(),
                code_names,
                subtypes,
                values,
            });
        }

        let by_identity = entries
            .iter()
            .enumerate()
            .map(|(ind, entry)| (entry.identity.clone(), ind))
            .collect();

        let mut by_peptide: AHashMap<String, Vec<(usize, usize)>> = AHashMap::new();
        for (ind, entry) in entries.iter().enumerate() {
            for (position, peptide) in entry.code_names.iter().enumerate() {
                let matches = by_peptide.entry(peptide.clone()).or_default();
                if !matches.iter().any(|(x, _)| *x == ind) {
                    matches.push((ind, position));
                }
            }
        }

        Ok(Self {
            columns: table.columns().to_vec(),
            entries,
            by_identity,
            by_peptide,
        })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn entries(&self) -> &[SubtypeEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, identity: &str) -> Option<&SubtypeEntry> {
        self.by_identity.get(identity).map(|ind| &self.entries[*ind])
    }

    /// Entries listing the peptide, each with the first position of the peptide in it.
    pub fn containing<'a>(
        &'a self,
        peptide: &str,
    ) -> impl Iterator<Item = (&'a SubtypeEntry, usize)> + 'a {
        self.by_peptide
            .get(peptide)
            .into_iter()
            .flatten()
            .map(|(ind, position)| (&self.entries[*ind], *position))
    }

    /// Position of a split column or a schema error listing the valid columns.
    pub fn column(&self, name: &str) -> Result<usize> {
        self.columns.iter().position(|x| x == name).ok_or_else(|| {
            eyre!(
                "The requested split column '{name}' does not exist. Valid columns are: {:?}",
                self.columns
            )
        })
    }

    /// Distinct values of the column in the order they are first seen.
    pub fn stratum_values(&self, column: usize) -> Vec<&str> {
        self.entries
            .iter()
            .flat_map(|entry| match entry.values[column].as_slice() {
                [] => vec![MISSING_STRATUM],
                values => values.iter().map(|x| stratum_label(x)).collect(),
            })
            .unique()
            .collect()
    }
}

#[cfg(test)]
impl SubtypeTable {
    /// Two collapsed epitopes sharing the peptide `p2` and a single raw peptide.
    pub fn dummy() -> Self {
        let mut table = Table::new(
            columns::EPITOPE_ID,
            [columns::CODE_NAME, columns::SUBTYPE, "Group"],
        )
        .unwrap();
        for (identity, code_names, subtypes, group) in [
            ("10_c1_w1", "p1;p2", "A;B", "A"),
            ("11_c2_w2", "p3;p2", "C;D", "B;A"),
            ("b1", "b1", "subtypeNA", "B"),
        ] {
            table
                .push(
                    identity,
                    vec![
                        Some(code_names.into()),
                        Some(subtypes.into()),
                        Some(group.into()),
                    ],
                )
                .unwrap();
        }
        SubtypeTable::from_table(&table).unwrap()
    }
}
