use ahash::AHashMap;
use derive_getters::{Dissolve, Getters};
use epimap_core_rs::Table;
use eyre::Result;

pub const COUNTS_COLUMN: &str = "Counts";
pub const INDEX_NAME: &str = "Key";

/// Ranked occurrence counts of a single tabulation bucket.
#[derive(Clone, PartialEq, Eq, Debug, Default, Dissolve, Getters)]
pub struct CountTable {
    bucket: String,
    counts: Vec<(String, usize)>,
}

impl CountTable {
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<usize> {
        self.counts.iter().find(|(x, _)| x == key).map(|(_, count)| *count)
    }

    pub fn to_table(&self) -> Result<Table> {
        let mut table = Table::new(INDEX_NAME, [COUNTS_COLUMN])?;
        for (key, count) in &self.counts {
            table.push(key.clone(), vec![Some(count.to_string())])?;
        }
        Ok(table)
    }
}

/// Insertion-ordered counter.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub(super) struct Counter {
    keys: AHashMap<String, usize>,
    counts: Vec<(String, usize)>,
}

impl Counter {
    pub fn increment(&mut self, key: String) {
        match self.keys.get(&key) {
            Some(ind) => self.counts[*ind].1 += 1,
            None => {
                self.keys.insert(key.clone(), self.counts.len());
                self.counts.push((key, 1));
            }
        }
    }

    /// Sorts by count, descending. Ties keep their first-insertion order.
    pub fn into_table(self, bucket: String) -> CountTable {
        let mut counts = self.counts;
        counts.sort_by(|a, b| b.1.cmp(&a.1));
        CountTable { bucket, counts }
    }
}

/// Result of the enrichment tabulation: one count table per bucket, in bucket order.
#[derive(Clone, PartialEq, Eq, Debug, Default, Dissolve, Getters)]
pub struct Tabulation {
    tables: Vec<CountTable>,
    /// Number of events that passed the significance filters.
    events: usize,
    /// Number of contributing elements without a match in the subtype table.
    unresolved: usize,
}

impl Tabulation {
    pub(super) fn new(tables: Vec<CountTable>, events: usize, unresolved: usize) -> Self {
        Self {
            tables,
            events,
            unresolved,
        }
    }

    pub fn get(&self, bucket: &str) -> Option<&CountTable> {
        self.tables.iter().find(|x| x.bucket == bucket)
    }

    pub fn buckets(&self) -> impl Iterator<Item = &str> {
        self.tables.iter().map(|x| x.bucket.as_str())
    }
}
