use super::file::Diff;

/// One commit of a `git format-patch` export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Patch {
    /// Sha from the `From <sha> ...` line
    pub commit_sha: String,
    /// Verbatim text of the first `Date:` header, if any
    pub timestamp: Option<String>,
    pub diffs: Vec<Diff>,
}

/// Result of parsing diff text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Parsed {
    /// Plain diff output, no commit headers seen
    Diffs(Vec<Diff>),
    /// Format-patch output, one entry per `From <sha>` header
    Patches(Vec<Patch>),
}

impl Parsed {
    /// Every diff, across patches when present
    pub fn diffs(&self) -> Box<dyn Iterator<Item = &Diff> + '_> {
        match self {
            Parsed::Diffs(diffs) => Box::new(diffs.iter()),
            Parsed::Patches(patches) => {
                Box::new(patches.iter().flat_map(|patch| patch.diffs.iter()))
            }
        }
    }

    #[must_use]
    pub fn into_diffs(self) -> Vec<Diff> {
        match self {
            Parsed::Diffs(diffs) => diffs,
            Parsed::Patches(patches) => patches.into_iter().flat_map(|patch| patch.diffs).collect(),
        }
    }

    /// Patches of a format-patch export, empty for plain diffs
    pub fn patches(&self) -> &[Patch] {
        match self {
            Parsed::Diffs(_) => &[],
            Parsed::Patches(patches) => patches,
        }
    }
}
