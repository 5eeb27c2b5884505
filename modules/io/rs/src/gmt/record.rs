use derive_getters::{Dissolve, Getters};
use epimap_core_rs::parse;
use eyre::{ensure, Result};

/// A named set of members, e.g. all epitopes observed for a single species.
#[derive(Clone, PartialEq, Eq, Debug, Default, Dissolve, Getters)]
pub struct Record {
    name: String,
    description: String,
    members: Vec<String>,
}

impl Record {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        members: impl IntoIterator<Item = impl Into<String>>,
    ) -> Result<Self> {
        let name = parse::non_empty_string("GMT set name", name)?;
        let description = description.into();
        let members: Vec<String> = members.into_iter().map(Into::into).collect();
        for value in std::iter::once(&name)
            .chain(std::iter::once(&description))
            .chain(members.iter())
        {
            ensure!(
                !value.contains(['\t', '\n', '\r']),
                "GMT fields can't contain tabs or line breaks, got: {value:?}"
            );
        }
        Ok(Self {
            name,
            description,
            members,
        })
    }
}
