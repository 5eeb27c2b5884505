use derive_getters::{Dissolve, Getters};
use derive_more::Constructor;
use epimap_core_rs::{Row, Table};
use eyre::{eyre, Result, WrapErr};

/// Column names of an enrichment-test result table.
pub mod columns {
    pub const P_ADJUST: &str = "p.adjust";
    pub const ENRICHMENT_SCORE: &str = "enrichmentScore";
    pub const CORE_ENRICHMENT: &str = "core_enrichment";
    pub const SPECIES_NAME: &str = "species_name";
}

/// Delimiter of the contributing elements in `core_enrichment` cells.
pub const ELEMENT_DELIMITER: char = '/';

/// A single row of an enrichment-test result.
#[derive(Clone, PartialEq, Debug, Constructor, Dissolve, Getters)]
pub struct EnrichmentEvent {
    id: String,
    p_adjust: f64,
    enrichment_score: f64,
    core_enrichment: Vec<String>,
    species_name: String,
}

impl EnrichmentEvent {
    /// Whether the event passes the significance and effect size cutoffs.
    pub fn is_significant(
        &self,
        p_value: f64,
        enrichment_score: f64,
        include_negative: bool,
    ) -> bool {
        let score = if include_negative {
            self.enrichment_score.abs()
        } else {
            self.enrichment_score
        };
        self.p_adjust <= p_value && score >= enrichment_score
    }
}

/// Enrichment events of a single sample or group.
#[derive(Clone, PartialEq, Debug, Default, Constructor, Dissolve, Getters)]
pub struct EventTable {
    name: String,
    events: Vec<EnrichmentEvent>,
}

impl EventTable {
    pub fn from_table(name: impl Into<String>, table: &Table) -> Result<Self> {
        let name = name.into();
        let [p_adjust, score, core, species] = table
            .require_all([
                columns::P_ADJUST,
                columns::ENRICHMENT_SCORE,
                columns::CORE_ENRICHMENT,
                columns::SPECIES_NAME,
            ])
            .wrap_err_with(|| format!("Invalid enrichment table '{name}'"))?;

        let number = |row: &Row<'_>, column: usize| -> Result<f64> {
            let value = row.required(column)?;
            value.trim().parse().map_err(|_| {
                eyre!(
                    "Invalid number '{value}' in the column '{}' (row '{}')",
                    table.columns()[column],
                    row.index()
                )
            })
        };

        let events = table
            .rows()
            .map(|row| {
                let core_enrichment = row
                    .get(core)
                    .map(|x| {
                        x.split(ELEMENT_DELIMITER)
                            .filter(|x| !x.is_empty())
                            .map(str::to_owned)
                            .collect()
                    })
                    .unwrap_or_default();
                Ok(EnrichmentEvent {
                    id: row.index().to_owned(),
                    p_adjust: number(&row, p_adjust)?,
                    enrichment_score: number(&row, score)?,
                    core_enrichment,
                    species_name: row.required(species)?.to_owned(),
                })
            })
            .collect::<Result<Vec<_>>>()
            .wrap_err_with(|| format!("Invalid enrichment table '{name}'"))?;
        Ok(Self { name, events })
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> Table {
        let mut table = Table::new(
            "ID",
            [
                columns::P_ADJUST,
                columns::ENRICHMENT_SCORE,
                columns::CORE_ENRICHMENT,
                columns::SPECIES_NAME,
            ],
        )
        .unwrap();
        table
            .push(
                "set1",
                vec![
                    Some("0.01".into()),
                    Some("-2.5".into()),
                    Some("p1/10_c1_w1".into()),
                    Some("Influenza".into()),
                ],
            )
            .unwrap();
        table
    }

    #[test]
    fn test_event_table_from_table() -> Result<()> {
        let events = EventTable::from_table("sample1", &table())?;
        assert_eq!(events.name(), "sample1");
        assert_eq!(events.len(), 1);

        let event = &events.events()[0];
        assert_eq!(event.id(), "set1");
        assert_eq!(*event.p_adjust(), 0.01);
        assert_eq!(*event.enrichment_score(), -2.5);
        assert_eq!(event.core_enrichment(), &["p1", "10_c1_w1"]);
        assert_eq!(event.species_name(), "Influenza");
        Ok(())
    }

    #[test]
    fn test_event_table_rejects_bad_numbers() {
        let mut table = table();
        table
            .push(
                "set2",
                vec![Some("x".into()), Some("1".into()), None, Some("Y".into())],
            )
            .unwrap();
        let err = EventTable::from_table("sample1", &table).unwrap_err();
        assert!(format!("{err:?}").contains("'set2'"));
    }

    #[test]
    fn test_is_significant() {
        let event = |p, score| EnrichmentEvent::new("e".into(), p, score, vec![], "X".into());
        assert!(event(0.05, 1.0).is_significant(0.05, 1.0, false));
        assert!(!event(0.06, 5.0).is_significant(0.05, 1.0, true));
        assert!(event(0.01, -2.0).is_significant(0.05, 1.0, true));
        assert!(!event(0.01, -2.0).is_significant(0.05, 1.0, false));
        assert!(!event(0.01, -0.5).is_significant(0.05, 1.0, true));
    }
}
