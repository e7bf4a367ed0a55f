//! Human-readable listing of a diff's selectable lines.
//!
//! Each added/removed line is printed with its toggle ordinal and its
//! new-file or old-file line number, so a selection can be named on the
//! command line without counting lines by hand:
//!
//! ```text
//! gtk.nix:
//!   [0] -10:	    gtk.theme.name = "Adwaita";
//!   [1] +10:	    # Theme managed by Stylix
//! ```

use crate::classify::LineRecord;

/// Render the selectable lines of a classified sequence with their ordinals.
///
/// Old-file line numbers are shown for removals, new-file numbers for
/// additions, both derived by walking the hunk headers. Hunks are separated
/// by a blank line.
#[must_use]
pub fn format_listing(records: &[LineRecord]) -> String {
    let mut out = String::new();

    if let Some(path) = records.iter().find_map(|record| match record {
        LineRecord::PlainHeader { text } => text.strip_prefix("+++ b/"),
        _ => None,
    }) {
        out.push_str(path);
        out.push_str(":\n");
    }

    let mut old_line = 0u32;
    let mut new_line = 0u32;
    let mut ordinal = 0usize;
    let mut first_hunk = true;

    for record in records {
        match record {
            LineRecord::PlainHeader { .. } => {}
            LineRecord::HunkHeader {
                old_start,
                new_start,
                ..
            } => {
                if !first_hunk {
                    out.push('\n');
                }
                first_hunk = false;
                old_line = *old_start;
                new_line = *new_start;
            }
            LineRecord::Context { text, .. } => {
                if !text.starts_with('\\') {
                    old_line += 1;
                    new_line += 1;
                }
            }
            LineRecord::Removed { text, .. } => {
                let content = text.strip_prefix('-').unwrap_or(text.as_str());
                out.push_str(&format!("  [{ordinal}] -{old_line}:\t{content}\n"));
                ordinal += 1;
                old_line += 1;
            }
            LineRecord::Added { text, .. } => {
                let content = text.strip_prefix('+').unwrap_or(text.as_str());
                out.push_str(&format!("  [{ordinal}] +{new_line}:\t{content}\n"));
                ordinal += 1;
                new_line += 1;
            }
        }
    }

    out
}
