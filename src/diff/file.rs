use super::hunk::{Hunk, Line};

/// Whether a diff creates, deletes or edits its file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum FileMode {
    #[default]
    Unchanged,
    /// Set by a `new file mode` header
    New,
    /// Set by a `deleted file mode` header
    Deleted,
}

/// The changes made to a single file.
///
/// Opened by a `diff --git` header and filled in by the index, mode and
/// range headers that follow it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diff {
    /// Path from the `a/` side of the diff header
    pub previous_filename: String,
    /// Path from the `b/` side of the diff header
    pub new_filename: String,
    /// Object id before the change, from the `index` header
    pub previous_index: Option<String>,
    /// Object id after the change, from the `index` header
    pub new_index: Option<String>,
    pub file_mode: FileMode,
    /// Hunks in the order their range headers appeared
    pub hunks: Vec<Hunk>,
}

impl Diff {
    #[must_use]
    pub fn new(previous_filename: impl Into<String>, new_filename: impl Into<String>) -> Self {
        Diff {
            previous_filename: previous_filename.into(),
            new_filename: new_filename.into(),
            previous_index: None,
            new_index: None,
            file_mode: FileMode::default(),
            hunks: Vec::new(),
        }
    }

    /// The file is stored under a different path after the change
    pub fn is_rename(&self) -> bool {
        self.previous_filename != self.new_filename
    }

    /// `new` for plain edits, `previous -> new` for renames
    pub fn display_name(&self) -> String {
        if self.is_rename() {
            format!("{} -> {}", self.previous_filename, self.new_filename)
        } else {
            self.new_filename.clone()
        }
    }

    /// All hunk lines in order
    pub fn lines(&self) -> impl Iterator<Item = &Line> {
        self.hunks.iter().flat_map(|hunk| hunk.lines.iter())
    }

    pub fn additions(&self) -> usize {
        self.hunks.iter().map(Hunk::additions).sum()
    }

    pub fn deletions(&self) -> usize {
        self.hunks.iter().map(Hunk::deletions).sum()
    }
}
