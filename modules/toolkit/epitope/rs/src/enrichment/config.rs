#[cfg(feature = "bitcode")]
use bitcode::{Decode, Encode};
use derive_getters::{Dissolve, Getters};
use eyre::{ensure, Result};

use super::event::EnrichmentEvent;

/// Parameters of the enrichment tabulation.
#[cfg_attr(feature = "bitcode", derive(Encode, Decode))]
#[derive(Clone, PartialEq, Debug, Dissolve, Getters)]
pub struct TabulateConfig {
    /// Maximum adjusted p-value of a retained event.
    p_value: f64,
    /// Minimum enrichment score (or its magnitude, see `include_negative`).
    enrichment_score: f64,
    include_negative: bool,
    /// Subtype table column used to stratify every count bucket.
    split_column: Option<String>,
    /// Contributing elements starting with the prefix are raw peptides, everything else is
    /// treated as a collapsed epitope identity.
    library_prefix: String,
}

impl Default for TabulateConfig {
    fn default() -> Self {
        Self {
            p_value: 0.05,
            enrichment_score: 1.0,
            include_negative: true,
            split_column: None,
            library_prefix: String::new(),
        }
    }
}

impl TabulateConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_p_value(&mut self, p_value: f64) -> Result<&mut Self> {
        ensure!(
            p_value.is_finite() && (0.0..=1.0).contains(&p_value),
            "P-value threshold must be within [0, 1], got {p_value}"
        );
        self.p_value = p_value;
        Ok(self)
    }

    pub fn set_enrichment_score(&mut self, enrichment_score: f64) -> Result<&mut Self> {
        ensure!(
            enrichment_score.is_finite() && enrichment_score >= 0.0,
            "Enrichment score threshold must be a finite non-negative number, got {enrichment_score}"
        );
        self.enrichment_score = enrichment_score;
        Ok(self)
    }

    pub fn set_include_negative(&mut self, include_negative: bool) -> &mut Self {
        self.include_negative = include_negative;
        self
    }

    pub fn set_split_column(&mut self, split_column: Option<String>) -> &mut Self {
        self.split_column = split_column;
        self
    }

    pub fn set_library_prefix(&mut self, library_prefix: impl Into<String>) -> &mut Self {
        self.library_prefix = library_prefix.into();
        self
    }

    pub fn passes(&self, event: &EnrichmentEvent) -> bool {
        event.is_significant(self.p_value, self.enrichment_score, self.include_negative)
    }

    /// Whether the contributing element is a raw (uncollapsed) peptide code name.
    pub fn is_peptide(&self, element: &str) -> bool {
        element.starts_with(&self.library_prefix)
    }
}
