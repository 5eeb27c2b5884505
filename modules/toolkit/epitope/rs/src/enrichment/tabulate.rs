use ahash::AHashMap;
use eyre::{eyre, Result};
use std::fmt::Display;

use super::config::TabulateConfig;
use super::counts::{Counter, Tabulation};
use super::event::{EnrichmentEvent, EventTable};
use super::subtypes::{SubtypeEntry, SubtypeTable};

/// Kind of a count table produced by the tabulation.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum Bucket {
    /// `{taxon}-{peptide}`
    SpeciesPeptide,
    /// `{taxon}-{epitope}`
    SpeciesEpitope,
    /// `{taxon}:{subtype}-{peptide}`
    SubspeciesPeptide,
}

impl Bucket {
    pub const ALL: [Bucket; 3] = [
        Bucket::SpeciesPeptide,
        Bucket::SpeciesEpitope,
        Bucket::SubspeciesPeptide,
    ];

    pub fn symbol(&self) -> &'static str {
        match self {
            Bucket::SpeciesPeptide => "species-peptide",
            Bucket::SpeciesEpitope => "species-epitope",
            Bucket::SubspeciesPeptide => "subspecies-peptide",
        }
    }
}

impl Display for Bucket {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// A contributing element resolved to a single peptide of a subtype table entry.
struct Hit<'a> {
    entry: &'a SubtypeEntry,
    position: usize,
}

/// Running state of the tabulation fold.
struct Accumulator {
    counters: Vec<Counter>,
    events: usize,
    unresolved: usize,
}

struct Tabulator<'a> {
    subtypes: &'a SubtypeTable,
    config: &'a TabulateConfig,
    split: Option<usize>,
    strata: AHashMap<&'a str, usize>,
}

impl<'a> Tabulator<'a> {
    fn resolve(&self, element: &str) -> Vec<Hit<'a>> {
        if self.config.is_peptide(element) {
            self.subtypes
                .containing(element)
                .map(|(entry, position)| Hit { entry, position })
                .collect()
        } else {
            self.subtypes
                .get(element)
                .map(|entry| {
                    (0..entry.code_names().len())
                        .map(|position| Hit { entry, position })
                        .collect()
                })
                .unwrap_or_default()
        }
    }

    fn fold(&self, mut acc: Accumulator, event: &EnrichmentEvent) -> Result<Accumulator> {
        acc.events += 1;
        let species = event.species_name();

        for element in event.core_enrichment() {
            let hits = self.resolve(element);
            if hits.is_empty() {
                log::debug!(
                    "Element '{element}' of the event '{}' is absent from the subtype table",
                    event.id()
                );
                acc.unresolved += 1;
                continue;
            }

            for Hit { entry, position } in hits {
                let peptide = &entry.code_names()[position];
                let subtype = &entry.subtypes()[position];
                let epitope = entry.identity();

                let (offset, prefix) = match self.split {
                    None => (0, String::new()),
                    Some(column) => {
                        let stratum = entry.stratum(column, position);
                        let ind = self.strata.get(stratum).ok_or_else(|| {
                            eyre!("Unknown stratum '{stratum}' of the epitope '{epitope}'")
                        })?;
                        (ind * Bucket::ALL.len(), format!("{stratum}-"))
                    }
                };

                for bucket in Bucket::ALL {
                    let key = match bucket {
                        Bucket::SpeciesPeptide => format!("{prefix}{species}-{peptide}"),
                        Bucket::SpeciesEpitope => format!("{prefix}{species}-{epitope}"),
                        Bucket::SubspeciesPeptide => {
                            format!("{prefix}{species}:{subtype}-{peptide}")
                        }
                    };
                    acc.counters[offset + bucket as usize].increment(key);
                }
            }
        }
        Ok(acc)
    }
}

/// Counts taxon/peptide, taxon/epitope and taxon:subtype/peptide occurrences across all
/// significant enrichment events.
///
/// With a split column, every bucket is repeated for each distinct value of the column and
/// named `{stratum}-{bucket}`. Contributing elements without a match in the subtype table are
/// skipped and reported via [`Tabulation::unresolved`].
pub fn tabulate(
    events: &[EventTable],
    subtypes: &SubtypeTable,
    config: &TabulateConfig,
) -> Result<Tabulation> {
    let split = config
        .split_column()
        .as_deref()
        .map(|column| subtypes.column(column))
        .transpose()?;

    let (names, strata) = match split {
        None => (
            Bucket::ALL.iter().map(|x| x.to_string()).collect::<Vec<_>>(),
            AHashMap::new(),
        ),
        Some(column) => {
            let values = subtypes.stratum_values(column);
            let names = values
                .iter()
                .flat_map(|value| Bucket::ALL.iter().map(move |x| format!("{value}-{x}")))
                .collect();
            let strata = values.into_iter().enumerate().map(|(i, v)| (v, i)).collect();
            (names, strata)
        }
    };

    let tabulator = Tabulator {
        subtypes,
        config,
        split,
        strata,
    };
    let initial = Accumulator {
        counters: vec![Counter::default(); names.len()],
        events: 0,
        unresolved: 0,
    };
    let acc = events
        .iter()
        .flat_map(|table| table.events())
        .filter(|event| config.passes(event))
        .try_fold(initial, |acc, event| tabulator.fold(acc, event))?;

    if acc.unresolved > 0 {
        log::warn!(
            "{} contributing elements of significant events were not found in the subtype table",
            acc.unresolved
        );
    }
    log::debug!(
        "Tabulated {} significant events into {} buckets",
        acc.events,
        names.len()
    );

    let tables = names
        .into_iter()
        .zip(acc.counters)
        .map(|(name, counter)| counter.into_table(name))
        .collect();
    Ok(Tabulation::new(tables, acc.events, acc.unresolved))
}

#[cfg(test)]
mod tests {
    use super::*;
    use itertools::Itertools;

    fn event(id: &str, p_adjust: f64, score: f64, elements: &[&str]) -> EnrichmentEvent {
        EnrichmentEvent::new(
            id.to_owned(),
            p_adjust,
            score,
            elements.iter().map(|x| x.to_string()).collect(),
            "Flu".to_owned(),
        )
    }

    fn events(events: Vec<EnrichmentEvent>) -> Vec<EventTable> {
        vec![EventTable::new("sample".to_owned(), events)]
    }

    fn config(split_column: Option<&str>) -> TabulateConfig {
        let mut config = TabulateConfig::new();
        config
            .set_library_prefix("p")
            .set_split_column(split_column.map(str::to_owned));
        config
    }

    fn counts(tabulation: &Tabulation, bucket: &str) -> Vec<(String, usize)> {
        tabulation.get(bucket).unwrap().counts().clone()
    }

    #[test]
    fn test_significance_filter() -> Result<()> {
        let events = events(vec![
            event("e1", 0.06, 5.0, &["p1"]),
            event("e2", 0.05, 2.0, &["p1"]),
        ]);
        let result = tabulate(&events, &SubtypeTable::dummy(), &config(None))?;
        assert_eq!(*result.events(), 1);
        assert_eq!(
            counts(&result, "species-peptide"),
            [("Flu-p1".to_owned(), 1)]
        );
        Ok(())
    }

    #[test]
    fn test_negative_enrichment() -> Result<()> {
        let events = events(vec![event("e1", 0.01, -2.0, &["p3"])]);
        let subtypes = SubtypeTable::dummy();

        let mut config = config(None);
        let result = tabulate(&events, &subtypes, &config)?;
        assert_eq!(counts(&result, "species-peptide"), [("Flu-p3".to_owned(), 1)]);

        config.set_include_negative(false);
        let result = tabulate(&events, &subtypes, &config)?;
        assert_eq!(*result.events(), 0);
        assert!(result.tables().iter().all(|x| x.is_empty()));
        Ok(())
    }

    #[test]
    fn test_raw_peptides_and_collapsed_epitopes() -> Result<()> {
        let events = events(vec![event("e1", 0.01, 3.0, &["p2", "10_c1_w1", "b1"])]);
        let result = tabulate(&events, &SubtypeTable::dummy(), &config(None))?;
        assert_eq!(result.buckets().collect_vec(), Bucket::ALL.map(|x| x.symbol()));

        // p2 is listed by two epitopes, 10_c1_w1 contributes both of its peptides
        assert_eq!(
            counts(&result, "species-peptide"),
            [
                ("Flu-p2".to_owned(), 3),
                ("Flu-p1".to_owned(), 1),
                ("Flu-b1".to_owned(), 1)
            ]
        );
        assert_eq!(
            counts(&result, "species-epitope"),
            [
                ("Flu-10_c1_w1".to_owned(), 3),
                ("Flu-11_c2_w2".to_owned(), 1),
                ("Flu-b1".to_owned(), 1)
            ]
        );
        let subspecies = result.get("subspecies-peptide").unwrap();
        assert_eq!(subspecies.get("Flu:B-p2"), Some(2));
        assert_eq!(subspecies.get("Flu:D-p2"), Some(1));
        assert_eq!(subspecies.get("Flu:A-p1"), Some(1));
        assert_eq!(subspecies.get("Flu:subtypeNA-b1"), Some(1));
        assert_eq!(*result.unresolved(), 0);
        Ok(())
    }

    #[test]
    fn test_stratified_buckets() -> Result<()> {
        let events = events(vec![event("e1", 0.01, 3.0, &["p2", "11_c2_w2"])]);
        let result = tabulate(&events, &SubtypeTable::dummy(), &config(Some("Group")))?;
        assert_eq!(
            result.buckets().collect_vec(),
            [
                "A-species-peptide",
                "A-species-epitope",
                "A-subspecies-peptide",
                "B-species-peptide",
                "B-species-epitope",
                "B-subspecies-peptide"
            ]
        );

        assert_eq!(
            counts(&result, "A-species-peptide"),
            [("A-Flu-p2".to_owned(), 3)]
        );
        assert_eq!(
            counts(&result, "B-species-peptide"),
            [("B-Flu-p3".to_owned(), 1)]
        );
        let epitopes = result.get("A-species-epitope").unwrap();
        assert_eq!(epitopes.get("A-Flu-10_c1_w1"), Some(1));
        assert_eq!(epitopes.get("A-Flu-11_c2_w2"), Some(2));
        assert_eq!(
            result.get("B-subspecies-peptide").unwrap().get("B-Flu:C-p3"),
            Some(1)
        );
        Ok(())
    }

    #[test]
    fn test_unknown_split_column() {
        let events = events(vec![event("e1", 0.01, 3.0, &["p1"])]);
        let err = tabulate(&events, &SubtypeTable::dummy(), &config(Some("Unknown")))
            .unwrap_err()
            .to_string();
        assert!(err.contains("'Unknown'"));
        assert!(err.contains("Valid columns"));
    }

    #[test]
    fn test_unresolved_elements() -> Result<()> {
        let events = events(vec![event("e1", 0.01, 3.0, &["p1", "p9", "zz"])]);
        let result = tabulate(&events, &SubtypeTable::dummy(), &config(None))?;
        assert_eq!(*result.unresolved(), 2);
        assert_eq!(counts(&result, "species-peptide"), [("Flu-p1".to_owned(), 1)]);
        Ok(())
    }
}
