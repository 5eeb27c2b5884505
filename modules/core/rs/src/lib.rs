pub use collapse::Collapse;
pub use matrix::{Matrix, MatrixSink};
pub use table::{Row, Table};

pub mod collapse;
mod matrix;
pub mod num;
pub mod parse;
mod table;
