//! Classification of single diff lines against the fixed unified-diff grammar.
//!
//! The grammar is a closed, ordered table of nom matchers ([`GRAMMAR`]). Each
//! line is tried against the table top to bottom and the first match wins, so
//! the specific headers (`diff --git`, `index`, `---`, `+++`, `@@`) shadow the
//! permissive content-line pattern that sits at the end of the table.
//!
//! # Examples
//!
//! ```
//! use git_diff_parser::classify::{classify, Classified};
//! use git_diff_parser::LineKind;
//!
//! assert_eq!(classify("+++ b/src/lib.rs"), Classified::NewFileHeader);
//! assert_eq!(
//!     classify("+let x = 1;"),
//!     Classified::Content { kind: LineKind::Addition, text: "let x = 1;" }
//! );
//! ```

use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{tag, take_until, take_while_m_n, take_while1},
    character::complete::{char, digit1, space1, u32 as line_number},
    combinator::{all_consuming, eof, map, opt, rest, value},
    sequence::{preceded, separated_pair, terminated},
};

use crate::diff::{FileMode, LineKind};

/// Line numbers and counts captured from an `@@ -a,b +c,d @@` header.
///
/// Counts default to 1 when omitted, as in `@@ -5 +5 @@`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HunkRange<'a> {
    pub previous_start: u32,
    pub previous_count: u32,
    pub new_start: u32,
    pub new_count: u32,
    /// Text after the closing `@@`, usually the enclosing function
    pub section: &'a str,
}

/// The grammar pattern a line matched, with its captured fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classified<'a> {
    /// `diff --git a/<previous> b/<new>`
    DiffHeader {
        previous_filename: &'a str,
        new_filename: &'a str,
    },
    /// `index <previous>..<new>[ <mode>]`
    IndexHeader {
        previous_index: &'a str,
        new_index: &'a str,
    },
    /// `new file mode <bits>` or `deleted file mode <bits>`
    ModeHeader(FileMode),
    /// `--- <path>`
    OriginalFileHeader,
    /// `+++ <path>`
    NewFileHeader,
    /// `@@ -<start>[,<count>] +<start>[,<count>] @@[ <section>]`
    RangeHeader(HunkRange<'a>),
    /// `From <sha> <anything>` with a full SHA-1 or SHA-256 object id,
    /// first line of a format-patch email
    PatchCommit { commit: &'a str },
    /// `Date: <timestamp>`
    PatchTimestamp { timestamp: &'a str },
    /// `\ No newline at end of file`
    NoNewlineMarker,
    /// A zero-length line
    Blank,
    /// A line starting with `+`, `-` or a space
    Content { kind: LineKind, text: &'a str },
    Unmatched,
}

type Matcher = for<'a> fn(&'a str) -> IResult<&'a str, Classified<'a>>;

/// A named entry of the grammar table.
struct Pattern {
    name: &'static str,
    matcher: Matcher,
}

/// Patterns in priority order. Content must stay last.
const GRAMMAR: &[Pattern] = &[
    Pattern {
        name: "diff header",
        matcher: diff_header,
    },
    Pattern {
        name: "index header",
        matcher: index_header,
    },
    Pattern {
        name: "mode header",
        matcher: mode_header,
    },
    Pattern {
        name: "original file header",
        matcher: original_file_header,
    },
    Pattern {
        name: "new file header",
        matcher: new_file_header,
    },
    Pattern {
        name: "range header",
        matcher: range_header,
    },
    Pattern {
        name: "patch commit",
        matcher: patch_commit,
    },
    Pattern {
        name: "patch timestamp",
        matcher: patch_timestamp,
    },
    Pattern {
        name: "no newline marker",
        matcher: no_newline_marker,
    },
    Pattern {
        name: "blank",
        matcher: blank,
    },
    Pattern {
        name: "content",
        matcher: content_line,
    },
];

/// Prefixes of lines that look like headers. Used only to log rejected headers.
const HEADER_PREFIXES: &[&str] = &[
    "diff --git ",
    "index ",
    "new file mode",
    "deleted file mode",
    "@@",
    "From ",
];

/// Classify one line (without its trailing newline).
///
/// Never fails: lines matching no pattern are [`Classified::Unmatched`].
pub fn classify(line: &str) -> Classified<'_> {
    let matched = GRAMMAR.iter().find_map(|pattern| {
        (pattern.matcher)(line).ok().map(|(_, classified)| {
            log::trace!("{} matched {:?}", pattern.name, line);
            classified
        })
    });

    matched.unwrap_or_else(|| {
        if HEADER_PREFIXES.iter().any(|prefix| line.starts_with(prefix)) {
            log::debug!("malformed header treated as unmatched: {:?}", line);
        }
        Classified::Unmatched
    })
}

fn diff_header(input: &str) -> IResult<&str, Classified<'_>> {
    map(
        preceded(
            tag("diff --git a/"),
            separated_pair(take_until(" b/"), tag(" b/"), rest),
        ),
        |(previous_filename, new_filename)| Classified::DiffHeader {
            previous_filename,
            new_filename,
        },
    )
    .parse(input)
}

fn is_object_id(c: char) -> bool {
    c.is_ascii_alphanumeric()
}

fn index_header(input: &str) -> IResult<&str, Classified<'_>> {
    map(
        all_consuming((
            tag("index "),
            take_while1(is_object_id),
            tag(".."),
            take_while1(is_object_id),
            opt(preceded(space1, digit1)),
        )),
        |(_, previous_index, _, new_index, _)| Classified::IndexHeader {
            previous_index,
            new_index,
        },
    )
    .parse(input)
}

fn mode_header(input: &str) -> IResult<&str, Classified<'_>> {
    map(
        all_consuming(terminated(
            alt((
                value(FileMode::New, tag("new")),
                value(FileMode::Deleted, tag("deleted")),
            )),
            (tag(" file mode "), digit1),
        )),
        Classified::ModeHeader,
    )
    .parse(input)
}

fn original_file_header(input: &str) -> IResult<&str, Classified<'_>> {
    value(Classified::OriginalFileHeader, tag("--- ")).parse(input)
}

fn new_file_header(input: &str) -> IResult<&str, Classified<'_>> {
    value(Classified::NewFileHeader, tag("+++ ")).parse(input)
}

/// `<start>[,<count>]`
fn line_range(input: &str) -> IResult<&str, (u32, u32)> {
    map(
        (line_number, opt(preceded(char(','), line_number))),
        |(start, count)| (start, count.unwrap_or(1)),
    )
    .parse(input)
}

fn range_header(input: &str) -> IResult<&str, Classified<'_>> {
    map(
        (
            tag("@@ -"),
            line_range,
            tag(" +"),
            line_range,
            tag(" @@"),
            rest,
        ),
        |(_, (previous_start, previous_count), _, (new_start, new_count), _, section)| {
            Classified::RangeHeader(HunkRange {
                previous_start,
                previous_count,
                new_start,
                new_count,
                section: section.trim_start(),
            })
        },
    )
    .parse(input)
}

fn patch_commit(input: &str) -> IResult<&str, Classified<'_>> {
    map(
        (
            tag("From "),
            take_while_m_n(40, 64, |c: char| c.is_ascii_hexdigit()),
            char(' '),
            rest,
        ),
        |(_, commit, _, _)| Classified::PatchCommit { commit },
    )
    .parse(input)
}

fn patch_timestamp(input: &str) -> IResult<&str, Classified<'_>> {
    map(preceded(tag("Date: "), rest), |timestamp| {
        Classified::PatchTimestamp { timestamp }
    })
    .parse(input)
}

fn no_newline_marker(input: &str) -> IResult<&str, Classified<'_>> {
    value(Classified::NoNewlineMarker, tag("\\ ")).parse(input)
}

fn blank(input: &str) -> IResult<&str, Classified<'_>> {
    value(Classified::Blank, eof).parse(input)
}

fn content_line(input: &str) -> IResult<&str, Classified<'_>> {
    map(
        (
            alt((
                value(LineKind::Addition, char('+')),
                value(LineKind::Deletion, char('-')),
                value(LineKind::Context, char(' ')),
            )),
            rest,
        ),
        |(kind, text)| Classified::Content { kind, text },
    )
    .parse(input)
}
