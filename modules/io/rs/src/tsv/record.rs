use derive_getters::{Dissolve, Getters};
use derive_more::Constructor;

/// A single TSV line: the index label and the data cells (`None` for missing values).
#[derive(Clone, PartialEq, Eq, Debug, Default, Constructor, Dissolve, Getters)]
pub struct Record {
    index: String,
    cells: Vec<Option<String>>,
}

impl Record {
    pub(super) fn fields(&mut self) -> (&mut String, &mut Vec<Option<String>>) {
        (&mut self.index, &mut self.cells)
    }
}
