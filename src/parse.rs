//! Line-by-line state machine turning diff text into [`Parsed`].
//!
//! Each line is classified once (see [`crate::classify`]) and applied to the
//! structure that is currently open: the last diff opened by a `diff --git`
//! header and, inside it, the last hunk opened by an `@@` range header. Lines
//! that need an open diff, hunk or commit and find none abort the parse with
//! [`ParseError::OutOfContext`].
//!
//! Open structures are tracked as indices into the growing result, together
//! with the running line numbers of the open hunk.
//!
//! # Examples
//!
//! ```
//! use git_diff_parser::{parse, LineKind};
//!
//! let text = "\
//! diff --git a/a.txt b/a.txt
//! index d3d..ac0 100644
//! --- a/a.txt
//! +++ b/a.txt
//! @@ -1,2 +1,3 @@
//!  line1
//! +line2
//!  line3
//! ";
//! let diffs = parse(text).unwrap().into_diffs();
//! let added = &diffs[0].hunks[0].lines[1];
//! assert_eq!(added.kind, LineKind::Addition);
//! assert_eq!(added.previous_lino, None);
//! assert_eq!(added.new_lino, Some(2));
//! ```

use error_set::error_set;
use std::fmt;

use crate::classify::{Classified, HunkRange, classify};
use crate::diff::{Diff, Hunk, Line, LineKind, Parsed, Patch};

/// What a line needed to be open before it could be applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Context {
    Diff,
    Hunk,
    Commit,
}

impl fmt::Display for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Context::Diff => write!(f, "diff (no 'diff --git' header before it)"),
            Context::Hunk => write!(f, "hunk (no '@@' range header before it)"),
            Context::Commit => write!(f, "commit (no 'From <sha>' header before it)"),
        }
    }
}

error_set! {
    /// Errors from parsing diff text
    ParseError := {
        /// A header or content line appeared with nothing open to attach it to
        #[display("line {line_number}: '{line}' requires an open {missing}")]
        OutOfContext {
            line_number: usize,
            line: String,
            missing: Context,
        },
    }
}

fn out_of_context(line_number: usize, line: &str, missing: Context) -> ParseError {
    ParseError::OutOfContext {
        line_number,
        line: line.to_string(),
        missing,
    }
}

/// Parse unified diff or format-patch text.
///
/// Returns [`Parsed::Patches`] when the text contains `From <sha>` commit
/// headers and [`Parsed::Diffs`] otherwise.
///
/// # Errors
///
/// Returns [`ParseError::OutOfContext`] for the first line that needs an open
/// diff, hunk or commit while none is open. No partial result is returned.
pub fn parse(text: &str) -> Result<Parsed, ParseError> {
    let mut parser = DiffParser::default();

    for (index, line) in text.lines().enumerate() {
        parser.feed(index + 1, line)?;
    }

    Ok(parser.finish())
}

/// Part of a format-patch email being read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    /// Mail headers, commit message and diffstat before the first diff
    Preamble,
    Body,
    /// Everything after the `-- ` signature line
    Trailer,
}

#[derive(Debug)]
struct PatchHeader {
    commit_sha: String,
    timestamp: Option<String>,
    /// Index of the first diff belonging to this patch
    first_diff: usize,
}

/// Running line numbers of the open hunk.
#[derive(Debug, Clone, Copy)]
struct HunkCursor {
    /// Position within the owning diff's hunks
    index: usize,
    previous_lino: u32,
    new_lino: u32,
    previous_remaining: u32,
    new_remaining: u32,
}

impl HunkCursor {
    fn new(index: usize, range: &HunkRange<'_>) -> Self {
        HunkCursor {
            index,
            previous_lino: range.previous_start,
            new_lino: range.new_start,
            previous_remaining: range.previous_count,
            new_remaining: range.new_count,
        }
    }

    /// Take the line numbers for the next line of `kind` and advance
    fn advance(&mut self, kind: LineKind) -> (Option<u32>, Option<u32>) {
        let previous = kind.in_previous().then(|| {
            let lino = self.previous_lino;
            self.previous_lino = lino.saturating_add(1);
            self.previous_remaining = self.previous_remaining.saturating_sub(1);
            lino
        });
        let new = kind.in_new().then(|| {
            let lino = self.new_lino;
            self.new_lino = lino.saturating_add(1);
            self.new_remaining = self.new_remaining.saturating_sub(1);
            lino
        });
        (previous, new)
    }

    /// The header's counts still leave room for a line of `kind`
    fn expects(&self, kind: LineKind) -> bool {
        (!kind.in_previous() || self.previous_remaining > 0)
            && (!kind.in_new() || self.new_remaining > 0)
    }

    fn is_exhausted(&self) -> bool {
        self.previous_remaining == 0 && self.new_remaining == 0
    }
}

#[derive(Debug, Clone, Copy)]
struct DiffCursor {
    index: usize,
    hunk: Option<HunkCursor>,
}

#[derive(Debug, Default)]
struct DiffParser {
    diffs: Vec<Diff>,
    current: Option<DiffCursor>,
    patches: Vec<PatchHeader>,
    /// `Some` once a commit header switched to patch mode
    section: Option<Section>,
}

impl DiffParser {
    fn feed(&mut self, line_number: usize, line: &str) -> Result<(), ParseError> {
        let classified = classify(line);

        // Commit messages and signatures may quote diff headers
        let diff_only = matches!(
            classified,
            Classified::IndexHeader { .. } | Classified::ModeHeader(_) | Classified::RangeHeader(_)
        );
        if diff_only && self.in_mail_text() {
            log::trace!("ignoring mail line {}: {:?}", line_number, line);
            return Ok(());
        }

        match classified {
            Classified::DiffHeader {
                previous_filename,
                new_filename,
            } => {
                self.open_diff(previous_filename, new_filename);
                Ok(())
            }
            Classified::IndexHeader {
                previous_index,
                new_index,
            } => {
                let diff = self.current_diff(line_number, line)?;
                diff.previous_index = Some(previous_index.to_string());
                diff.new_index = Some(new_index.to_string());
                Ok(())
            }
            Classified::ModeHeader(mode) => {
                self.current_diff(line_number, line)?.file_mode = mode;
                Ok(())
            }
            Classified::OriginalFileHeader => {
                self.file_header(line_number, line, LineKind::Deletion)
            }
            Classified::NewFileHeader => self.file_header(line_number, line, LineKind::Addition),
            Classified::RangeHeader(range) => self.open_hunk(line_number, line, &range),
            Classified::Content { kind, text } => self.content(line_number, line, kind, text),
            Classified::Blank => {
                if self.hunk_expects(LineKind::Context) {
                    self.push_line(line_number, line, LineKind::Context, "")
                } else {
                    log::trace!("ignoring blank line {}", line_number);
                    Ok(())
                }
            }
            Classified::NoNewlineMarker => {
                self.mark_missing_newline();
                Ok(())
            }
            Classified::PatchCommit { commit } => {
                self.open_patch(commit);
                Ok(())
            }
            Classified::PatchTimestamp { timestamp } => {
                self.set_timestamp(line_number, line, timestamp)
            }
            Classified::Unmatched => {
                log::trace!("ignoring line {}: {:?}", line_number, line);
                Ok(())
            }
        }
    }

    fn finish(self) -> Parsed {
        if self.patches.is_empty() {
            return Parsed::Diffs(self.diffs);
        }

        let total = self.diffs.len();
        let ends: Vec<usize> = self
            .patches
            .iter()
            .skip(1)
            .map(|header| header.first_diff)
            .chain(std::iter::once(total))
            .collect();

        // Diffs seen before the first commit header go to the first patch
        let mut diffs = self.diffs.into_iter();
        let mut taken = 0;
        let patches = self
            .patches
            .into_iter()
            .zip(ends)
            .map(|(header, end)| {
                let patch_diffs: Vec<Diff> = diffs.by_ref().take(end - taken).collect();
                taken = end;
                Patch {
                    commit_sha: header.commit_sha,
                    timestamp: header.timestamp,
                    diffs: patch_diffs,
                }
            })
            .collect();

        Parsed::Patches(patches)
    }

    fn open_diff(&mut self, previous_filename: &str, new_filename: &str) {
        log::debug!("diff a/{} b/{}", previous_filename, new_filename);

        self.diffs.push(Diff::new(previous_filename, new_filename));
        self.current = Some(DiffCursor {
            index: self.diffs.len() - 1,
            hunk: None,
        });

        if self.section.is_some() {
            self.section = Some(Section::Body);
        }
    }

    fn current_diff(&mut self, line_number: usize, line: &str) -> Result<&mut Diff, ParseError> {
        match self.current {
            Some(cursor) => Ok(&mut self.diffs[cursor.index]),
            None => Err(out_of_context(line_number, line, Context::Diff)),
        }
    }

    fn open_hunk(
        &mut self,
        line_number: usize,
        line: &str,
        range: &HunkRange<'_>,
    ) -> Result<(), ParseError> {
        let Some(cursor) = self.current.as_mut() else {
            return Err(out_of_context(line_number, line, Context::Diff));
        };

        let hunks = &mut self.diffs[cursor.index].hunks;
        hunks.push(Hunk::from_range(range));
        cursor.hunk = Some(HunkCursor::new(hunks.len() - 1, range));

        log::debug!(
            "hunk -{},{} +{},{} at line {}",
            range.previous_start,
            range.previous_count,
            range.new_start,
            range.new_count,
            line_number
        );
        Ok(())
    }

    fn hunk(&self) -> Option<&HunkCursor> {
        self.current.as_ref().and_then(|cursor| cursor.hunk.as_ref())
    }

    fn hunk_expects(&self, kind: LineKind) -> bool {
        self.hunk().is_some_and(|hunk| hunk.expects(kind))
    }

    /// Reading mail text of a format-patch rather than a diff
    fn in_mail_text(&self) -> bool {
        matches!(self.section, Some(Section::Preamble | Section::Trailer))
    }

    /// `--- ` and `+++ ` lines are content while the open hunk still expects
    /// lines on that side, and file headers otherwise.
    fn file_header(
        &mut self,
        line_number: usize,
        line: &str,
        kind: LineKind,
    ) -> Result<(), ParseError> {
        if self.hunk_expects(kind) {
            return self.push_line(line_number, line, kind, &line[1..]);
        }
        if self.in_mail_text() {
            log::trace!("ignoring mail line {}: {:?}", line_number, line);
            return Ok(());
        }

        self.current_diff(line_number, line)?;
        Ok(())
    }

    fn content(
        &mut self,
        line_number: usize,
        line: &str,
        kind: LineKind,
        text: &str,
    ) -> Result<(), ParseError> {
        if self.in_mail_text() {
            log::trace!("ignoring mail line {}: {:?}", line_number, line);
            return Ok(());
        }

        let signature = kind == LineKind::Deletion && text.trim_end() == "-";
        let hunk_done = self.hunk().is_none_or(HunkCursor::is_exhausted);
        if self.section.is_some() && signature && hunk_done {
            log::debug!("patch trailer starts at line {}", line_number);
            self.current = None;
            self.section = Some(Section::Trailer);
            return Ok(());
        }

        self.push_line(line_number, line, kind, text)
    }

    fn push_line(
        &mut self,
        line_number: usize,
        line: &str,
        kind: LineKind,
        text: &str,
    ) -> Result<(), ParseError> {
        let Some(DiffCursor {
            index,
            hunk: Some(cursor),
        }) = self.current.as_mut()
        else {
            return Err(out_of_context(line_number, line, Context::Hunk));
        };

        let (previous_lino, new_lino) = cursor.advance(kind);
        self.diffs[*index].hunks[cursor.index].lines.push(Line {
            kind,
            content: text.to_string(),
            previous_lino,
            new_lino,
            missing_newline: false,
        });
        Ok(())
    }

    fn mark_missing_newline(&mut self) {
        if let Some(DiffCursor {
            index,
            hunk: Some(cursor),
        }) = self.current
        {
            if let Some(last) = self.diffs[index].hunks[cursor.index].lines.last_mut() {
                last.missing_newline = true;
            }
        }
    }

    fn open_patch(&mut self, commit: &str) {
        log::debug!("patch for commit {}", commit);

        self.current = None;
        self.patches.push(PatchHeader {
            commit_sha: commit.to_string(),
            timestamp: None,
            first_diff: self.diffs.len(),
        });
        self.section = Some(Section::Preamble);
    }

    fn set_timestamp(
        &mut self,
        line_number: usize,
        line: &str,
        timestamp: &str,
    ) -> Result<(), ParseError> {
        let Some(patch) = self.patches.last_mut() else {
            return Err(out_of_context(line_number, line, Context::Commit));
        };

        if patch.timestamp.is_none() {
            patch.timestamp = Some(timestamp.to_string());
        } else {
            log::trace!("ignoring repeated date on line {}", line_number);
        }
        Ok(())
    }
}
