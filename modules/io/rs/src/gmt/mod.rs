// Gene Matrix Transposed (GMT) format: one set per line.
// 1. name: non-empty, no tabs
// 2. description: free text without tabs, may be empty
// 3+. members: one per field, at least zero

mod record;
mod writer;

pub use record::Record;
pub use writer::Writer;
