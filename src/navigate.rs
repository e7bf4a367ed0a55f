//! Cursor targets for stepping through the selectable lines of a diff.

use crate::classify::LineRecord;

/// One jump target per selectable line.
///
/// `line_index` is the position of the Removed/Added record within the
/// classified sequence; `scroll_offset` is the first visible line a viewport
/// of the given height should scroll to so the target is on screen. It is a
/// forward-scroll hint, not a keep-centered guarantee.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavigationEntry {
    pub scroll_offset: usize,
    pub line_index: usize,
}

/// Build the ordered jump-target list for a classified sequence.
///
/// Returns one entry per Removed/Added record, ascending by `line_index`,
/// with `scroll_offset = max(0, line_index - viewport_height)`.
#[must_use]
pub fn navigation_targets(records: &[LineRecord], viewport_height: usize) -> Vec<NavigationEntry> {
    records
        .iter()
        .enumerate()
        .filter(|(_, record)| record.is_selectable())
        .map(|(line_index, _)| NavigationEntry {
            scroll_offset: line_index.saturating_sub(viewport_height),
            line_index,
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::classify::classify_diff;
    use similar_asserts::assert_eq;

    fn fixture() -> Vec<LineRecord> {
        let diff = "\
--- a/f
+++ b/f
@@ -1,4 +1,4 @@
 one
-two
+TWO
 three
 four
@@ -10,2 +10,3 @@
 ten
+eleven
";
        classify_diff(diff).unwrap()
    }

    #[test]
    fn one_entry_per_selectable_line() {
        let records = fixture();
        let selectable = records.iter().filter(|r| r.is_selectable()).count();
        let targets = navigation_targets(&records, 5);
        assert_eq!(targets.len(), selectable);
    }

    #[test]
    fn entries_ascend_by_line_index() {
        let records = fixture();
        let targets = navigation_targets(&records, 5);
        assert_eq!(
            targets.iter().map(|t| t.line_index).collect::<Vec<_>>(),
            vec![4, 5, 10]
        );
        for pair in targets.windows(2) {
            assert!(pair[0].line_index < pair[1].line_index);
        }
    }

    #[test]
    fn scroll_offset_clamps_at_zero_near_top() {
        let records = fixture();
        let targets = navigation_targets(&records, 20);
        assert!(targets.iter().all(|t| t.scroll_offset == 0));
    }

    #[test]
    fn scroll_offset_trails_target_by_viewport() {
        let records = fixture();
        let targets = navigation_targets(&records, 3);
        assert_eq!(
            targets,
            vec![
                NavigationEntry {
                    scroll_offset: 1,
                    line_index: 4
                },
                NavigationEntry {
                    scroll_offset: 2,
                    line_index: 5
                },
                NavigationEntry {
                    scroll_offset: 7,
                    line_index: 10
                },
            ]
        );
    }
}
