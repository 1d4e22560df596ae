use error_set::error_set;
use std::io::Read;
use std::path::Path;

pub mod classify;
mod diff;
mod parse;

pub use diff::{
    Diff, FileMode, Hunk, Line, LineKind, Parsed, Patch, format_listing, format_summary,
};
pub use parse::{Context, ParseError, parse};

error_set! {
    /// Top-level error for git-diff-parser operations
    DiffParserError := {
        #[display("Failed to read {source_name}: {message}")]
        ReadFailed { source_name: String, message: String },
        ParseError(ParseError),
    }
}

/// Read and parse a diff or format-patch file
///
/// # Examples
/// ```no_run
/// # use git_diff_parser::parse_file;
/// let parsed = parse_file("0001-add-feature.patch").unwrap();
/// for diff in parsed.diffs() {
///     println!("{}: +{} -{}", diff.display_name(), diff.additions(), diff.deletions());
/// }
/// ```
pub fn parse_file(path: impl AsRef<Path>) -> Result<Parsed, DiffParserError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|e| DiffParserError::ReadFailed {
        source_name: path.display().to_string(),
        message: e.to_string(),
    })?;

    Ok(parse(&text)?)
}

/// Read all of `reader` and parse it. `source_name` is only used in errors.
pub fn parse_reader(reader: impl Read, source_name: &str) -> Result<Parsed, DiffParserError> {
    let text = std::io::read_to_string(reader).map_err(|e| DiffParserError::ReadFailed {
        source_name: source_name.to_string(),
        message: e.to_string(),
    })?;

    Ok(parse(&text)?)
}
