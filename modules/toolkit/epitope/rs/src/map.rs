use ahash::AHashMap;
use derive_getters::{Dissolve, Getters};
use epimap_core_rs::{parse, Collapse, Table};
use eyre::{bail, Result};
use itertools::Itertools;
use std::collections::{BTreeMap, BTreeSet};

use crate::annotation::{columns, AnnotationRow};
use crate::normalize::{Assignment, Normalizer};

/// All peptides that resolve to a single composite identity.
///
/// List fields are positionally aligned: the i-th element of each list describes the
/// assignment that mapped the i-th code name into this identity.
#[derive(Clone, PartialEq, Eq, Debug, Dissolve, Getters)]
pub struct EpitopeMapEntry {
    identity: String,
    code_names: Vec<String>,
    species: Vec<String>,
    subtypes: Vec<String>,
    species_ids: Vec<String>,
    cluster_ids: Vec<String>,
    windows: Vec<String>,
    species_subtype: Option<Vec<String>>,
    category: String,
}

impl EpitopeMapEntry {
    pub fn len(&self) -> usize {
        self.code_names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.code_names.is_empty()
    }

    /// First position of the peptide in the entry, if any.
    pub fn position(&self, code_name: &str) -> Option<usize> {
        self.code_names.iter().position(|x| x == code_name)
    }
}

/// Epitope map: composite identity -> peptides, ordered by identity.
#[derive(Clone, Debug, Default)]
pub struct EpitopeMap {
    entries: Vec<EpitopeMapEntry>,
    index: AHashMap<String, usize>,
    collapse: Collapse,
}

impl EpitopeMap {
    pub fn builder() -> MapBuilder {
        MapBuilder::default()
    }

    /// Builds the map straight from an epitope metadata table.
    pub fn from_table(table: &Table, collapse: Collapse) -> Result<Self> {
        let rows = AnnotationRow::from_table(table)?;
        MapBuilder::default().with_collapse(collapse).build(&rows)
    }

    pub fn entries(&self) -> &[EpitopeMapEntry] {
        &self.entries
    }

    pub fn collapse(&self) -> Collapse {
        self.collapse
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, identity: &str) -> Option<&EpitopeMapEntry> {
        self.index.get(identity).map(|ind| &self.entries[*ind])
    }

    pub fn identities(&self) -> impl ExactSizeIterator<Item = &str> {
        self.entries.iter().map(|x| x.identity.as_str())
    }

    /// Reverse map: peptide -> identities it belongs to (in map order).
    pub fn peptide_index(&self) -> AHashMap<&str, Vec<&str>> {
        let mut index: AHashMap<&str, Vec<&str>> = AHashMap::new();
        for entry in &self.entries {
            for code_name in entry.code_names.iter().unique() {
                index
                    .entry(code_name.as_str())
                    .or_default()
                    .push(entry.identity.as_str());
            }
        }
        index
    }

    /// Renders the map as a table indexed by `EpitopeID` with semicolon-joined list columns.
    /// `SpeciesSubtype` is included only if the map was built with species/subtype labels.
    pub fn to_table(&self) -> Result<Table> {
        let with_species_subtype = self
            .entries
            .first()
            .map(|x| x.species_subtype.is_some())
            .unwrap_or(false);

        let mut header = vec![
            columns::CODE_NAME,
            columns::SPECIES,
            columns::SUBTYPE,
            columns::SPECIES_ID,
            columns::CLUSTER_ID,
            columns::WINDOW,
        ];
        if with_species_subtype {
            header.push(columns::SPECIES_SUBTYPE);
        }
        header.push(columns::CATEGORY);

        let mut table = Table::new(columns::EPITOPE_ID, header)?;
        for entry in &self.entries {
            let mut cells = vec![
                Some(parse::join(&entry.code_names)),
                Some(parse::join(&entry.species)),
                Some(parse::join(&entry.subtypes)),
                Some(parse::join(&entry.species_ids)),
                Some(parse::join(&entry.cluster_ids)),
                Some(parse::join(&entry.windows)),
            ];
            if with_species_subtype {
                cells.push(entry.species_subtype.as_deref().map(parse::join));
            }
            cells.push(Some(entry.category.clone()));
            table.push(entry.identity.clone(), cells)?;
        }
        Ok(table)
    }
}

/// Groups normalized assignments into an [`EpitopeMap`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct MapBuilder {
    collapse: Collapse,
    species_subtype: bool,
}

impl MapBuilder {
    pub fn with_collapse(mut self, collapse: Collapse) -> Self {
        self.collapse = collapse;
        self
    }

    /// Also collect `species:subtype` labels for every peptide of each entry.
    pub fn with_species_subtype(mut self, species_subtype: bool) -> Self {
        self.species_subtype = species_subtype;
        self
    }

    /// Normalizes the raw annotation rows and groups them by composite identity.
    pub fn build<'a>(
        &self,
        rows: impl IntoIterator<Item = &'a AnnotationRow>,
    ) -> Result<EpitopeMap> {
        let assignments = Normalizer::new(self.collapse).normalize(rows)?;
        self.group(&assignments)
    }

    /// Groups already normalized assignments. Fails if a single identity mixes categories.
    pub fn group(&self, assignments: &[Assignment]) -> Result<EpitopeMap> {
        let mut groups: BTreeMap<&str, Vec<&Assignment>> = BTreeMap::new();
        for assignment in assignments {
            groups
                .entry(assignment.identity().as_str())
                .or_default()
                .push(assignment);
        }

        let mut entries = Vec::with_capacity(groups.len());
        for (identity, members) in groups {
            let categories: BTreeSet<&str> =
                members.iter().map(|x| x.category().as_str()).collect();
            if categories.len() > 1 {
                bail!(
                    "Collapsed epitope '{identity}' maps peptides to more than one category: {:?}",
                    categories
                );
            }

            let collect = |field: fn(&Assignment) -> &String| -> Vec<String> {
                members.iter().map(|x| field(*x).clone()).collect()
            };
            entries.push(EpitopeMapEntry {
                identity: identity.to_owned(),
                code_names: collect(Assignment::code_name),
                species: collect(Assignment::species),
                subtypes: collect(Assignment::subtype),
                species_ids: collect(Assignment::species_id),
                cluster_ids: collect(Assignment::cluster_id),
                windows: collect(Assignment::window),
                species_subtype: self
                    .species_subtype
                    .then(|| members.iter().map(|x| x.species_subtype()).collect()),
                category: members[0].category().clone(),
            });
        }

        let index = entries
            .iter()
            .enumerate()
            .map(|(ind, entry)| (entry.identity.clone(), ind))
            .collect();

        log::debug!(
            "Built an epitope map with {} identities from {} assignments",
            entries.len(),
            assignments.len()
        );
        Ok(EpitopeMap {
            entries,
            index,
            collapse: self.collapse,
        })
    }
}
