use std::fmt;

use crate::classify::HunkRange;

/// How a hunk line relates the previous and new version of a file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineKind {
    /// `+` line, only present in the new version
    Addition,
    /// `-` line, only present in the previous version
    Deletion,
    /// ` ` line, unchanged and present in both versions
    Context,
}

impl LineKind {
    /// The unified-diff marker character for this kind
    pub fn marker(self) -> char {
        match self {
            LineKind::Addition => '+',
            LineKind::Deletion => '-',
            LineKind::Context => ' ',
        }
    }

    /// Whether lines of this kind carry a previous-side line number
    pub fn in_previous(self) -> bool {
        self != LineKind::Addition
    }

    /// Whether lines of this kind carry a new-side line number
    pub fn in_new(self) -> bool {
        self != LineKind::Deletion
    }
}

/// One line of hunk content with its derived line numbers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub kind: LineKind,
    /// Text without the leading marker
    pub content: String,
    /// Line number in the previous version, `None` for additions
    pub previous_lino: Option<u32>,
    /// Line number in the new version, `None` for deletions
    pub new_lino: Option<u32>,
    /// Followed by a `\ No newline at end of file` marker
    pub missing_newline: bool,
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.kind.marker(), self.content)
    }
}

/// A contiguous change region anchored at a start line on both sides
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hunk {
    pub previous_line_start: u32,
    pub previous_line_count: u32,
    pub new_line_start: u32,
    pub new_line_count: u32,
    /// Text after the closing `@@`, usually the enclosing function
    pub section: Option<String>,
    pub lines: Vec<Line>,
}

impl Hunk {
    pub(crate) fn from_range(range: &HunkRange<'_>) -> Self {
        Hunk {
            previous_line_start: range.previous_start,
            previous_line_count: range.previous_count,
            new_line_start: range.new_start,
            new_line_count: range.new_count,
            section: (!range.section.is_empty()).then(|| range.section.to_string()),
            lines: Vec::new(),
        }
    }

    /// Render the `@@ -a,b +c,d @@` header, omitting counts of 1 like git does
    pub fn header(&self) -> String {
        let side = |start: u32, count: u32| match count {
            1 => start.to_string(),
            n => format!("{},{}", start, n),
        };

        let mut header = format!(
            "@@ -{} +{} @@",
            side(self.previous_line_start, self.previous_line_count),
            side(self.new_line_start, self.new_line_count)
        );
        if let Some(section) = &self.section {
            header.push(' ');
            header.push_str(section);
        }
        header
    }

    pub fn additions(&self) -> usize {
        self.count(LineKind::Addition)
    }

    pub fn deletions(&self) -> usize {
        self.count(LineKind::Deletion)
    }

    fn count(&self, kind: LineKind) -> usize {
        self.lines.iter().filter(|line| line.kind == kind).count()
    }
}

impl fmt::Display for Hunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.header())?;

        for line in &self.lines {
            writeln!(f, "{}", line)?;
            if line.missing_newline {
                writeln!(f, "\\ No newline at end of file")?;
            }
        }

        Ok(())
    }
}
