use derive_getters::{Dissolve, Getters};
use epimap_core_rs::{parse, Table};
use eyre::{Result, WrapErr};

/// Column names of the epitope metadata and epitope map tables.
pub mod columns {
    pub const CODE_NAME: &str = "CodeName";
    pub const SPECIES: &str = "Species";
    pub const SUBTYPE: &str = "Subtype";
    pub const SPECIES_ID: &str = "SpeciesID";
    pub const CLUSTER_ID: &str = "ClusterID";
    pub const WINDOW: &str = "EpitopeWindow";
    pub const CATEGORY: &str = "Category";
    pub const SPECIES_SUBTYPE: &str = "SpeciesSubtype";
    pub const EPITOPE_ID: &str = "EpitopeID";
}

/// Raw epitope metadata for a single peptide.
///
/// A peptide can be shared by several biological assignments. In that case the list fields
/// (`species`, `subtype`, `species_id`, `cluster_id`, `window`) hold semicolon-delimited
/// values, positionally aligned with each other.
#[derive(Clone, PartialEq, Eq, Hash, Debug, Dissolve, Getters)]
pub struct AnnotationRow {
    code_name: String,
    species: Option<String>,
    subtype: Option<String>,
    species_id: Option<String>,
    cluster_id: Option<String>,
    window: Option<String>,
    category: String,
}

impl AnnotationRow {
    pub fn new(code_name: impl Into<String>, category: impl Into<String>) -> Result<Self> {
        Ok(Self {
            code_name: parse::non_empty_string("Peptide code name", code_name)?,
            species: None,
            subtype: None,
            species_id: None,
            cluster_id: None,
            window: None,
            category: category.into(),
        })
    }

    pub fn with_species(mut self, species: impl Into<String>) -> Self {
        self.species = Some(species.into());
        self
    }

    pub fn with_subtype(mut self, subtype: impl Into<String>) -> Self {
        self.subtype = Some(subtype.into());
        self
    }

    pub fn with_species_id(mut self, species_id: impl Into<String>) -> Self {
        self.species_id = Some(species_id.into());
        self
    }

    pub fn with_cluster_id(mut self, cluster_id: impl Into<String>) -> Self {
        self.cluster_id = Some(cluster_id.into());
        self
    }

    pub fn with_window(mut self, window: impl Into<String>) -> Self {
        self.window = Some(window.into());
        self
    }

    /// Extracts annotation rows from a metadata table.
    ///
    /// The peptide code name is taken from the `CodeName` column or, if there is no such
    /// column, from the table index when it is named `CodeName`. All other annotation columns
    /// must be present, although individual cells may be missing (except for `Category`).
    pub fn from_table(table: &Table) -> Result<Vec<Self>> {
        let code_name = match table.position(columns::CODE_NAME) {
            Some(column) => Some(column),
            None if table.index_name() == columns::CODE_NAME => None,
            None => Some(table.require(columns::CODE_NAME)?),
        };
        let [species, subtype, species_id, cluster_id, window, category] = table.require_all([
            columns::SPECIES,
            columns::SUBTYPE,
            columns::SPECIES_ID,
            columns::CLUSTER_ID,
            columns::WINDOW,
            columns::CATEGORY,
        ])?;

        table
            .rows()
            .map(|row| {
                let name = match code_name {
                    Some(column) => row.required(column)?,
                    None => row.index(),
                };
                let owned = |column: usize| row.get(column).map(str::to_owned);
                Ok(Self {
                    code_name: parse::non_empty_string("Peptide code name", name)
                        .wrap_err_with(|| format!("Invalid metadata row '{}'", row.index()))?,
                    species: owned(species),
                    subtype: owned(subtype),
                    species_id: owned(species_id),
                    cluster_id: owned(cluster_id),
                    window: owned(window),
                    category: row.required(category)?.to_owned(),
                })
            })
            .collect()
    }
}

#[cfg(test)]
impl AnnotationRow {
    pub fn dummy(code_name: &str, category: &str) -> Self {
        AnnotationRow::new(code_name, category)
            .unwrap()
            .with_species("X")
            .with_subtype("1")
            .with_species_id("10")
            .with_cluster_id("c1")
            .with_window("w1")
    }
}
