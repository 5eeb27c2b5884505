pub use enrichment::{tabulate, TabulateConfig, Tabulation};
pub use map::{EpitopeMap, EpitopeMapEntry, MapBuilder};
pub use normalize::{Assignment, Normalizer};
pub use signal::{aggregate, aggregate_into};
pub use taxa::{taxa_to_epitopes, TaxonSet};

pub mod annotation;
pub mod enrichment;
pub mod map;
pub mod normalize;
pub mod signal;
pub mod taxa;
