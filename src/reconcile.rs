//! Reconstruction of a valid unified diff from a line selection.
//!
//! The reconciler streams the classified sequence hunk by hunk. Context lines
//! are kept verbatim. A selected addition or removal is kept verbatim; an
//! unselected addition is dropped, and an unselected removal is *downgraded*
//! to a context line (its leading `-` rewritten to a space) so the old file
//! content it names survives in the output.
//!
//! Dropping and downgrading shift new-file line numbering for everything that
//! follows, so a signed running offset is carried across hunk boundaries:
//! −1 per dropped addition, +1 per downgraded removal. A hunk's rewritten
//! header applies only the offset accumulated strictly before the hunk began.
//! The old-file side is never touched by a partial selection, so old starts
//! are emitted unchanged.
//!
//! A hunk in which no selectable line was retained is discarded entirely,
//! header and body. If no hunk survives, the result is `None` — a valid
//! terminal state, not an error.

use crate::classify::LineRecord;
use crate::select::SelectionState;

/// Accumulated state for the hunk currently being rebuilt.
struct OpenHunk {
    old_start: u32,
    new_start: u32,
    heading: String,
    lines: Vec<String>,
    retained_old: u32,
    retained_new: u32,
    active: bool,
    /// Cross-hunk offset snapshot taken when this hunk was opened
    shift_before: i64,
}

impl OpenHunk {
    fn open(old_start: u32, new_start: u32, heading: &str, shift_before: i64) -> Self {
        Self {
            old_start,
            new_start,
            heading: heading.to_string(),
            lines: Vec::new(),
            retained_old: 0,
            retained_new: 0,
            active: false,
            shift_before,
        }
    }

    /// Emit this hunk's rewritten header and retained body, or nothing if no
    /// selectable line was retained.
    fn finish(self, out: &mut Vec<String>) {
        if !self.active {
            return;
        }

        let new_start = i64::from(self.new_start) + self.shift_before;
        debug_assert!(new_start >= 0, "new-side start shifted below zero");
        let new_start = u32::try_from(new_start).unwrap_or(0);

        // The streamed counters must agree with the body actually retained.
        let (old_recount, new_recount) = recount(&self.lines);
        debug_assert_eq!(old_recount, self.retained_old, "old-side count drift");
        debug_assert_eq!(new_recount, self.retained_new, "new-side count drift");

        out.push(render_header(
            self.old_start,
            self.retained_old,
            new_start,
            self.retained_new,
            &self.heading,
        ));
        out.extend(self.lines);
    }
}

/// Rebuild the diff retaining only the selected added/removed lines.
///
/// Returns the output lines of a standalone, grammatically valid unified
/// diff, or `None` if zero hunks survived the selection. Every output line
/// is either verbatim from the input or a removal downgraded to context;
/// within a hunk the input order is preserved.
#[must_use]
pub fn reconcile(records: &[LineRecord], selection: &SelectionState) -> Option<Vec<String>> {
    let mut preamble = Vec::new();
    let mut hunks = Vec::new();
    let mut open: Option<OpenHunk> = None;
    let mut shift: i64 = 0;
    let mut ordinal = 0usize;
    // Whether the previous body line was emitted verbatim; decides if a
    // trailing `\ No newline at end of file` marker still has an anchor.
    let mut prev_kept = true;

    for record in records {
        match record {
            LineRecord::PlainHeader { text } => preamble.push(text.clone()),
            LineRecord::HunkHeader {
                old_start,
                new_start,
                heading,
                ..
            } => {
                if let Some(hunk) = open.take() {
                    hunk.finish(&mut hunks);
                }
                open = Some(OpenHunk::open(*old_start, *new_start, heading, shift));
                prev_kept = true;
            }
            LineRecord::Context { text, .. } => {
                debug_assert!(open.is_some(), "body line before any hunk header");
                if let Some(hunk) = open.as_mut() {
                    if text.starts_with('\\') {
                        // No-newline marker: belongs to the preceding line and
                        // counts toward neither side.
                        if prev_kept {
                            hunk.lines.push(text.clone());
                        }
                        continue;
                    }
                    hunk.lines.push(text.clone());
                    hunk.retained_old += 1;
                    hunk.retained_new += 1;
                    prev_kept = true;
                }
            }
            LineRecord::Added { text, .. } => {
                let selected = selection.is_selected(ordinal);
                ordinal += 1;
                debug_assert!(open.is_some(), "body line before any hunk header");
                if let Some(hunk) = open.as_mut() {
                    if selected {
                        hunk.lines.push(text.clone());
                        hunk.retained_new += 1;
                        hunk.active = true;
                        prev_kept = true;
                    } else {
                        shift -= 1;
                        prev_kept = false;
                    }
                }
            }
            LineRecord::Removed { text, .. } => {
                let selected = selection.is_selected(ordinal);
                ordinal += 1;
                debug_assert!(open.is_some(), "body line before any hunk header");
                if let Some(hunk) = open.as_mut() {
                    if selected {
                        hunk.lines.push(text.clone());
                        hunk.retained_old += 1;
                        hunk.active = true;
                        prev_kept = true;
                    } else {
                        // Downgrade: the unselected removal stays in the file,
                        // so it rejoins the output as context.
                        let content = text.strip_prefix('-').unwrap_or(text.as_str());
                        hunk.lines.push(format!(" {content}"));
                        hunk.retained_old += 1;
                        hunk.retained_new += 1;
                        shift += 1;
                        prev_kept = true;
                    }
                }
            }
        }
    }

    if let Some(hunk) = open.take() {
        hunk.finish(&mut hunks);
    }

    if hunks.is_empty() {
        return None;
    }

    preamble.extend(hunks);
    Some(preamble)
}

fn render_header(old_start: u32, old_len: u32, new_start: u32, new_len: u32, heading: &str) -> String {
    if heading.is_empty() {
        format!("@@ -{old_start},{old_len} +{new_start},{new_len} @@")
    } else {
        format!("@@ -{old_start},{old_len} +{new_start},{new_len} @@ {heading}")
    }
}

/// Count how many retained body lines land on each side of the hunk.
fn recount(lines: &[String]) -> (u32, u32) {
    let mut old = 0;
    let mut new = 0;
    for line in lines {
        match line.as_bytes().first() {
            Some(b'\\') => {}
            Some(b'+') => new += 1,
            Some(b'-') => old += 1,
            _ => {
                old += 1;
                new += 1;
            }
        }
    }
    (old, new)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::classify::classify_diff;
    use similar_asserts::assert_eq;

    fn select(records: &[LineRecord], ordinals: &[usize]) -> SelectionState {
        let mut state = SelectionState::for_records(records);
        for &ordinal in ordinals {
            state.toggle(ordinal).unwrap();
        }
        state
    }

    fn reconcile_text(diff: &str, ordinals: &[usize]) -> Option<String> {
        let records = classify_diff(diff).unwrap();
        let selection = select(&records, ordinals);
        reconcile(&records, &selection).map(|lines| lines.join("\n") + "\n")
    }

    const SINGLE_HUNK: &str = "\
--- a/notes.txt
+++ b/notes.txt
@@ -1,3 +1,4 @@
 alpha
 beta
+gamma
 delta
";

    #[test]
    fn full_selection_reproduces_input() {
        assert_eq!(
            reconcile_text(SINGLE_HUNK, &[0]).unwrap(),
            SINGLE_HUNK.to_string()
        );
    }

    #[test]
    fn empty_selection_yields_no_patch() {
        assert_eq!(reconcile_text(SINGLE_HUNK, &[]), None);
    }

    #[test]
    fn inactive_second_hunk_is_discarded() {
        let diff = "\
--- a/f
+++ b/f
@@ -2,2 +2,3 @@
 two
+TWO-AND-A-HALF
 three
@@ -8,2 +9,3 @@
 eight
+EIGHT-AND-A-HALF
 nine
";
        let output = reconcile_text(diff, &[0]).unwrap();
        assert_eq!(
            output,
            "\
--- a/f
+++ b/f
@@ -2,2 +2,3 @@
 two
+TWO-AND-A-HALF
 three
"
        );
    }

    #[test]
    fn unselected_removal_is_downgraded_to_context() {
        let diff = "\
--- a/f
+++ b/f
@@ -1,3 +1,3 @@
 one
-two
+TWO
 three
";
        // keep the addition, leave the removal unselected
        let output = reconcile_text(diff, &[1]).unwrap();
        assert_eq!(
            output,
            "\
--- a/f
+++ b/f
@@ -1,3 +1,4 @@
 one
 two
+TWO
 three
"
        );
    }

    #[test]
    fn selected_removal_alone_shrinks_new_side() {
        let diff = "\
--- a/f
+++ b/f
@@ -1,3 +1,3 @@
 one
-two
+TWO
 three
";
        let output = reconcile_text(diff, &[0]).unwrap();
        assert_eq!(
            output,
            "\
--- a/f
+++ b/f
@@ -1,3 +1,2 @@
 one
-two
 three
"
        );
    }

    #[test]
    fn dropped_addition_shifts_next_hunk_back() {
        let diff = "\
--- a/f
+++ b/f
@@ -3,2 +3,4 @@
 three
+FIRST
+SECOND
 four
@@ -9,2 +11,3 @@
 nine
+THIRD
 ten
";
        // drop SECOND (ordinal 1), keep FIRST and THIRD
        let output = reconcile_text(diff, &[0, 2]).unwrap();
        assert_eq!(
            output,
            "\
--- a/f
+++ b/f
@@ -3,2 +3,3 @@
 three
+FIRST
 four
@@ -9,2 +10,3 @@
 nine
+THIRD
 ten
"
        );
    }

    #[test]
    fn downgraded_removal_shifts_next_hunk_forward() {
        let diff = "\
--- a/f
+++ b/f
@@ -3,3 +3,2 @@
 three
-four
 five
@@ -9,2 +8,3 @@
 nine
+NEW
 ten
";
        // leave the removal unselected, keep the later addition
        let output = reconcile_text(diff, &[1]).unwrap();
        assert_eq!(
            output,
            "\
--- a/f
+++ b/f
@@ -9,2 +9,3 @@
 nine
+NEW
 ten
"
        );
    }

    #[test]
    fn discarded_hunk_still_contributes_offset() {
        // Hunk 1 is dropped entirely, but its dropped insertion must still
        // pull hunk 2's new start back by one.
        let diff = "\
--- a/f
+++ b/f
@@ -2,2 +2,3 @@
 two
+INSERTED
 three
@@ -8,2 +9,3 @@
 eight
+KEPT
 nine
";
        let output = reconcile_text(diff, &[1]).unwrap();
        assert_eq!(
            output,
            "\
--- a/f
+++ b/f
@@ -8,2 +8,3 @@
 eight
+KEPT
 nine
"
        );
    }

    #[test]
    fn mixed_drops_and_downgrades_in_one_hunk() {
        let diff = "\
--- a/f
+++ b/f
@@ -1,4 +1,4 @@
 one
-two
+TWO
-three
+THREE
 four
@@ -10,2 +10,3 @@
 ten
+ELEVEN
 eleven
";
        // keep TWO (1), leave -two (0); drop THREE (3), keep -three (2);
        // keep ELEVEN (4)
        let output = reconcile_text(diff, &[1, 2, 4]).unwrap();
        // offset within hunk 1: +1 (downgrade of two) -1 (drop of THREE) = 0
        assert_eq!(
            output,
            "\
--- a/f
+++ b/f
@@ -1,4 +1,4 @@
 one
 two
+TWO
-three
 four
@@ -10,2 +10,3 @@
 ten
+ELEVEN
 eleven
"
        );
    }

    #[test]
    fn heading_survives_header_rewrite() {
        let diff = "\
--- a/f
+++ b/f
@@ -1,2 +1,3 @@ fn main() {
 one
+two
 three
";
        let output = reconcile_text(diff, &[0]).unwrap();
        assert!(output.contains("@@ -1,2 +1,3 @@ fn main() {"));
    }

    #[test]
    fn no_newline_marker_follows_its_line() {
        let diff = "\
--- a/f
+++ b/f
@@ -1,2 +1,2 @@
 one
-two
+TWO
\\ No newline at end of file
";
        // keep both: marker stays attached to the kept addition
        let kept = reconcile_text(diff, &[0, 1]).unwrap();
        assert!(kept.ends_with("+TWO\n\\ No newline at end of file\n"));

        // drop the addition: the marker loses its anchor and goes with it
        let dropped = reconcile_text(diff, &[0]).unwrap();
        assert!(!dropped.contains("No newline"));
    }

    #[test]
    fn output_reparses_as_valid_diff() {
        let diff = "\
--- a/f
+++ b/f
@@ -1,4 +1,4 @@
 one
-two
+TWO
-three
+THREE
 four
";
        let output = reconcile_text(diff, &[0, 3]).unwrap();
        let records = classify_diff(&output).unwrap();
        assert!(records.iter().any(|r| r.is_selectable()));
    }

    // Scenario: single hunk, one addition selected -> identity; deselected -> empty.
    #[test]
    fn single_addition_toggles_between_identity_and_empty() {
        let diff = "\
--- a/f
+++ b/f
@@ -1,2 +1,3 @@
 a
+b
 c
";
        assert_eq!(reconcile_text(diff, &[0]).unwrap(), diff.to_string());
        assert_eq!(reconcile_text(diff, &[]), None);
    }
}
