use derive_getters::{Dissolve, Getters};
use itertools::Itertools;
use std::collections::BTreeMap;

use crate::normalize::Assignment;

/// Epitope identities observed for a single taxon.
#[derive(Clone, PartialEq, Eq, Hash, Debug, Dissolve, Getters)]
pub struct TaxonSet {
    species_id: String,
    species: String,
    identities: Vec<String>,
}

/// Groups assignments by species ID (ascending). Identities are unique and listed in the
/// order they are first encountered. `species` is the first species name seen for the ID.
pub fn taxa_to_epitopes(assignments: &[Assignment]) -> Vec<TaxonSet> {
    let mut groups: BTreeMap<&str, Vec<&Assignment>> = BTreeMap::new();
    for assignment in assignments {
        groups
            .entry(assignment.species_id().as_str())
            .or_default()
            .push(assignment);
    }

    groups
        .into_iter()
        .map(|(species_id, members)| TaxonSet {
            species_id: species_id.to_owned(),
            species: members[0].species().clone(),
            identities: members
                .iter()
                .map(|x| x.identity().clone())
                .unique()
                .collect(),
        })
        .collect()
}
