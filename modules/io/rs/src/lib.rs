pub mod compression;
pub mod gmt;
pub mod matrix;
pub mod tsv;
mod traits;

pub use traits::{ReadRecord, WriteRecord};
