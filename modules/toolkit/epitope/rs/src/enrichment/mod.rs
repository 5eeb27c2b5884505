pub use config::TabulateConfig;
pub use counts::{CountTable, Tabulation};
pub use event::{EnrichmentEvent, EventTable};
pub use subtypes::{SubtypeEntry, SubtypeTable};
pub use tabulate::{tabulate, Bucket};

mod config;
mod counts;
mod event;
mod subtypes;
mod tabulate;
