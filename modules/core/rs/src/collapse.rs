#[cfg(feature = "bitcode")]
use bitcode::{Decode, Encode};
use eyre::{eyre, Report};
use std::fmt::Display;
use std::str::FromStr;

/// Category label used for viral peptides in epitope metadata.
pub const VIRAL: &str = "Viral";
/// Category label used for bacterial peptides in epitope metadata.
pub const BACTERIAL: &str = "Bacterial";

/// Which peptide categories are collapsed into composite `speciesId_clusterId_window`
/// identities. Peptides outside the selected category keep their own code name as identity.
#[cfg_attr(feature = "bitcode", derive(Encode, Decode))]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
pub enum Collapse {
    /// Collapse only peptides from the `Viral` category.
    #[default]
    Viral,
    /// Collapse only peptides from the `Bacterial` category.
    Bacterial,
    /// Collapse every peptide regardless of its category.
    Both,
}

impl Collapse {
    pub const ALL: [Collapse; 3] = [Collapse::Viral, Collapse::Bacterial, Collapse::Both];

    /// Returns the label used to select this policy.
    pub fn symbol(&self) -> &'static str {
        match self {
            Collapse::Viral => VIRAL,
            Collapse::Bacterial => BACTERIAL,
            Collapse::Both => "Both",
        }
    }

    /// Returns `true` if peptides of the given category are collapsed under this policy.
    pub fn applies_to(&self, category: &str) -> bool {
        match self {
            Collapse::Both => true,
            Collapse::Viral => category == VIRAL,
            Collapse::Bacterial => category == BACTERIAL,
        }
    }
}

impl Display for Collapse {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

impl FromStr for Collapse {
    type Err = Report;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Collapse::ALL
            .into_iter()
            .find(|x| x.symbol() == value)
            .ok_or_else(|| {
                eyre!(
                    "Unknown collapse policy '{value}'. Valid choices are: {:?}",
                    Collapse::ALL.map(|x| x.symbol())
                )
            })
    }
}

impl TryFrom<&str> for Collapse {
    type Error = Report;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        value.parse()
    }
}
