//! Classification of raw unified-diff text into typed line records.
//!
//! The classifier turns the diff for a single file into an ordered sequence
//! of [`LineRecord`]s. Everything before the first hunk header is a
//! [`LineRecord::PlainHeader`] (the `diff --git`, `index`, `---`/`+++`
//! preamble). From the first hunk header on, each line is tagged as context,
//! removal, or addition, and carries the index of the hunk header record it
//! belongs to.
//!
//! # Hunk header grammar
//!
//! ```text
//! @@ -oldStart[,oldLen] +newStart[,newLen] @@ [heading]
//! ```
//!
//! An omitted length means 1, matching what `git diff` emits for
//! single-line ranges. A line that opens with the `@@` delimiter but does
//! not match this grammar is a hard parse failure
//! ([`ClassifyError::MalformedHunkHeader`]), never silently treated as
//! context.

use error_set::error_set;
use nom::{
    Parser,
    bytes::complete::tag,
    character::complete::{char, u32 as number},
    combinator::{opt, rest},
    sequence::preceded,
};

error_set! {
    /// Errors from classifying raw diff text
    ClassifyError := {
        /// Line opens with `@@` but does not match the hunk header grammar
        #[display("Malformed hunk header '{line}'")]
        MalformedHunkHeader { line: String },
    }
}

/// One classified line of a single-file unified diff.
///
/// Body records (`Context`, `Removed`, `Added`) keep the raw line text
/// including its leading marker character, so an unmodified line can be
/// emitted verbatim. `hunk` is the index of the owning [`LineRecord::HunkHeader`]
/// within the classified sequence; it always points at an earlier record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineRecord {
    /// Preamble line before the first hunk header, copied verbatim
    PlainHeader { text: String },
    /// Parsed `@@ -a,b +c,d @@ heading` header opening a hunk
    HunkHeader {
        old_start: u32,
        old_len: u32,
        new_start: u32,
        new_len: u32,
        /// Trailing heading text after the closing `@@`, empty if absent
        heading: String,
    },
    /// Line present in both old and new file content
    Context { text: String, hunk: usize },
    /// Line removed from the old file (leading `-`)
    Removed { text: String, hunk: usize },
    /// Line added to the new file (leading `+`)
    Added { text: String, hunk: usize },
}

impl LineRecord {
    /// Whether this record is a unit of selection (an added or removed line)
    #[must_use]
    pub fn is_selectable(&self) -> bool {
        matches!(self, Self::Removed { .. } | Self::Added { .. })
    }

    /// Index of the owning hunk header record, if this is a hunk body line
    #[must_use]
    pub fn owning_hunk(&self) -> Option<usize> {
        match self {
            Self::Context { hunk, .. } | Self::Removed { hunk, .. } | Self::Added { hunk, .. } => {
                Some(*hunk)
            }
            Self::PlainHeader { .. } | Self::HunkHeader { .. } => None,
        }
    }
}

/// Classify the unified diff of one file into an ordered record sequence.
///
/// # Examples
///
/// ```
/// use diff_select::{LineRecord, classify_diff};
///
/// let diff = "\
/// --- a/notes.txt
/// +++ b/notes.txt
/// @@ -1,2 +1,3 @@
///  first
/// +second
///  third
/// ";
/// let records = classify_diff(diff).unwrap();
/// assert_eq!(records.len(), 6);
/// assert_eq!(
///     records[4],
///     LineRecord::Added { text: "+second".to_string(), hunk: 2 }
/// );
/// ```
///
/// # Errors
///
/// Returns [`ClassifyError::MalformedHunkHeader`] if a line carrying the
/// `@@` delimiter fails the header grammar.
pub fn classify_diff(text: &str) -> Result<Vec<LineRecord>, ClassifyError> {
    let mut records = Vec::new();
    let mut current_hunk = None;

    for line in text.lines() {
        if line.starts_with("@@") {
            let (old_start, old_len, new_start, new_len, heading) =
                parse_hunk_header(line).ok_or_else(|| ClassifyError::MalformedHunkHeader {
                    line: line.to_string(),
                })?;
            current_hunk = Some(records.len());
            records.push(LineRecord::HunkHeader {
                old_start,
                old_len,
                new_start,
                new_len,
                heading,
            });
        } else if let Some(hunk) = current_hunk {
            let text = line.to_string();
            records.push(if line.starts_with('-') {
                LineRecord::Removed { text, hunk }
            } else if line.starts_with('+') {
                LineRecord::Added { text, hunk }
            } else {
                LineRecord::Context { text, hunk }
            });
        } else {
            records.push(LineRecord::PlainHeader {
                text: line.to_string(),
            });
        }
    }

    Ok(records)
}

/// Parse `@@ -a[,b] +c[,d] @@ [heading]` into its numeric fields and heading.
fn parse_hunk_header(line: &str) -> Option<(u32, u32, u32, u32, String)> {
    let mut parser = (
        tag("@@ -"),
        number,
        opt(preceded(char(','), number)),
        tag(" +"),
        number,
        opt(preceded(char(','), number)),
        tag(" @@"),
        opt(preceded(char(' '), rest)),
    );

    let parsed: nom::IResult<&str, _> = parser.parse(line);
    let (remaining, (_, old_start, old_len, _, new_start, new_len, _, heading)) = parsed.ok()?;
    if !remaining.is_empty() {
        return None;
    }

    Some((
        old_start,
        old_len.unwrap_or(1),
        new_start,
        new_len.unwrap_or(1),
        heading.unwrap_or_default().to_string(),
    ))
}
