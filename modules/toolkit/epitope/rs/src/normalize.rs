use derive_getters::{Dissolve, Getters};
use epimap_core_rs::{parse, Collapse};
use eyre::{ensure, Result};
use itertools::Itertools;

use crate::annotation::AnnotationRow;

pub const SPECIES_NA: &str = "speciesNA";
pub const SPECIES_ID_NA: &str = "speciesIDNA";
pub const SUBTYPE_NA: &str = "subtypeNA";
pub const CLUSTER_NA: &str = "clusterNA";
pub const WINDOW_NA: &str = "Peptide_NA";

/// A single biological assignment of a peptide, i.e. one position of an exploded
/// [`AnnotationRow`], together with its composite identity.
#[derive(Clone, PartialEq, Eq, Hash, Debug, Dissolve, Getters)]
pub struct Assignment {
    identity: String,
    code_name: String,
    species: String,
    subtype: String,
    species_id: String,
    cluster_id: String,
    window: String,
    category: String,
}

impl Assignment {
    /// `species:subtype` label of the assignment.
    pub fn species_subtype(&self) -> String {
        format!("{}:{}", self.species, self.subtype)
    }
}

/// Composite identity of a peptide assignment.
///
/// Peptides from categories collapsed by the policy are identified by
/// `speciesId_clusterId_window`, all other peptides keep their code name.
pub fn identity(
    collapse: Collapse,
    code_name: &str,
    category: &str,
    species_id: &str,
    cluster_id: &str,
    window: &str,
) -> String {
    if collapse.applies_to(category) {
        format!("{species_id}_{cluster_id}_{window}")
    } else {
        code_name.to_owned()
    }
}

/// Explodes multi-valued annotation rows into single assignments.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct Normalizer {
    collapse: Collapse,
}

impl Normalizer {
    pub fn new(collapse: Collapse) -> Self {
        Self { collapse }
    }

    pub fn collapse(&self) -> Collapse {
        self.collapse
    }

    /// Zips the semicolon-delimited fields of the row into separate assignments.
    ///
    /// Every list field present on the row must have the same number of elements. Missing
    /// fields are treated as missing at every position and replaced by their placeholders.
    pub fn explode(&self, row: &AnnotationRow) -> Result<Vec<Assignment>> {
        let fields = [
            ("Species", row.species()),
            ("Subtype", row.subtype()),
            ("SpeciesID", row.species_id()),
            ("ClusterID", row.cluster_id()),
            ("EpitopeWindow", row.window()),
        ];
        let lists = fields.map(|(_, value)| value.as_deref().map(parse::list));

        let lengths = lists.iter().flatten().map(Vec::len).collect_vec();
        let size = lengths.first().copied().unwrap_or(1);
        ensure!(
            lengths.iter().all(|x| *x == size),
            "Annotation lists of the peptide '{}' have different lengths: {}",
            row.code_name(),
            fields
                .iter()
                .zip(&lists)
                .filter_map(|((name, _), list)| {
                    list.as_ref().map(|x| format!("{name}={}", x.len()))
                })
                .join(", ")
        );

        let at = |field: usize, ind: usize| lists[field].as_ref().map(|x| x[ind].as_str());

        let assignments = (0..size)
            .map(|ind| {
                let species = at(0, ind).unwrap_or(SPECIES_NA);
                let subtype = match at(1, ind) {
                    None | Some("") => SUBTYPE_NA,
                    Some(subtype) => subtype,
                };
                let species_id = at(2, ind).unwrap_or(SPECIES_ID_NA);
                let cluster_id = at(3, ind).unwrap_or(CLUSTER_NA);
                let window = at(4, ind).unwrap_or(WINDOW_NA);

                Assignment {
                    identity: identity(
                        self.collapse,
                        row.code_name(),
                        row.category(),
                        species_id,
                        cluster_id,
                        window,
                    ),
                    code_name: row.code_name().to_owned(),
                    species: species.to_owned(),
                    subtype: subtype.to_owned(),
                    species_id: species_id.to_owned(),
                    cluster_id: cluster_id.to_owned(),
                    window: window.to_owned(),
                    category: row.category().to_owned(),
                }
            })
            .collect();
        Ok(assignments)
    }

    /// Explodes all rows and drops exact duplicates, keeping the first occurrence.
    pub fn normalize<'a>(
        &self,
        rows: impl IntoIterator<Item = &'a AnnotationRow>,
    ) -> Result<Vec<Assignment>> {
        let mut total = 0;
        let mut exploded = Vec::new();
        for row in rows {
            total += 1;
            exploded.extend(self.explode(row)?);
        }

        let before = exploded.len();
        let assignments = exploded.into_iter().unique().collect_vec();
        log::debug!(
            "Normalized {total} annotation rows into {} assignments \
             ({} duplicates dropped, collapse: {})",
            assignments.len(),
            before - assignments.len(),
            self.collapse
        );
        Ok(assignments)
    }
}
