//! Per-line selection flags, addressed by selectable ordinal.
//!
//! Ordinals count only the Removed/Added records of the classified sequence,
//! in document order. The state holds one boolean per ordinal, default off;
//! the only mutation is an explicit, bounds-checked toggle from the caller.

use crate::classify::LineRecord;
use error_set::error_set;

error_set! {
    /// Errors from selection toggles
    SelectError := {
        /// Toggle referenced an ordinal beyond the selectable-line count
        #[display("Selectable line {index} out of range (diff has {count})")]
        IndexOutOfRange { index: usize, count: usize },
    }
}

/// Selection flags for the selectable lines of one classified diff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionState {
    flags: Vec<bool>,
}

impl SelectionState {
    /// Create a state with `count` deselected lines
    #[must_use]
    pub fn new(count: usize) -> Self {
        Self {
            flags: vec![false; count],
        }
    }

    /// Create a state sized to the selectable records of a classified sequence
    #[must_use]
    pub fn for_records(records: &[LineRecord]) -> Self {
        Self::new(records.iter().filter(|r| r.is_selectable()).count())
    }

    /// Flip the flag at `ordinal`, returning its new value.
    ///
    /// # Errors
    ///
    /// Returns [`SelectError::IndexOutOfRange`] if `ordinal` is not a valid
    /// selectable-line ordinal.
    pub fn toggle(&mut self, ordinal: usize) -> Result<bool, SelectError> {
        let count = self.flags.len();
        let flag = self
            .flags
            .get_mut(ordinal)
            .ok_or(SelectError::IndexOutOfRange {
                index: ordinal,
                count,
            })?;
        *flag = !*flag;
        Ok(*flag)
    }

    /// Whether the line at `ordinal` is selected (false for unknown ordinals)
    #[must_use]
    pub fn is_selected(&self, ordinal: usize) -> bool {
        self.flags.get(ordinal).copied().unwrap_or(false)
    }

    /// Number of selectable lines tracked
    #[must_use]
    pub fn len(&self) -> usize {
        self.flags.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }

    /// Whether any line is currently selected
    #[must_use]
    pub fn any_selected(&self) -> bool {
        self.flags.iter().any(|&f| f)
    }

    /// Select every line
    pub fn select_all(&mut self) {
        self.flags.fill(true);
    }

    /// Deselect every line
    pub fn clear(&mut self) {
        self.flags.fill(false);
    }
}
