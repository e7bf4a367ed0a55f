//! Line-level selection and reconstruction of unified diffs.
//!
//! Given the diff of one file, this crate classifies it into typed line
//! records, lets a caller toggle individual added/removed lines, and rebuilds
//! a standalone, independently valid unified diff containing only the
//! selected subset. The rebuilt patch applies with the usual one-directory-
//! strip convention (`git apply -p1`).

use error_set::error_set;
use std::process::Command;

mod classify;
mod listing;
mod navigate;
mod ordinal;
mod reconcile;
mod select;

pub use classify::{ClassifyError, LineRecord, classify_diff};
pub use listing::format_listing;
pub use navigate::{NavigationEntry, navigation_targets};
pub use ordinal::{OrdinalParseError, parse_ordinals};
pub use reconcile::reconcile;
pub use select::{SelectError, SelectionState};

error_set! {
    /// Top-level error for diff-select operations
    DiffSelectError := {
        #[display("No changes found in {file}")]
        NoChanges { file: String },
        #[display("No lines selected in {file}: nothing to stage")]
        NothingSelected { file: String },
        ClassifyError(ClassifyError),
        SelectError(SelectError),
        OrdinalParseError(OrdinalParseError),
    } || GitCommandError

    /// Errors from git command execution
    GitCommandError := {
        #[display("Failed to run git diff: {message}")]
        DiffFailed { message: String },
        #[display("git diff failed: {stderr}")]
        DiffExitError { stderr: String },
        #[display("Invalid UTF-8 in git diff output: {message}")]
        InvalidUtf8 { message: String },
        #[display("Failed to spawn git apply: {message}")]
        ApplySpawnFailed { message: String },
        #[display("Failed to get stdin handle for git apply")]
        ApplyStdinFailed,
        #[display("Failed to write patch to git apply: {message}")]
        ApplyWriteFailed { message: String },
        #[display("Failed to wait for git apply: {message}")]
        ApplyWaitFailed { message: String },
        #[display("git apply failed: {stderr}")]
        ApplyExitError { stderr: String },
    }
}

/// One selection session over the classified diff of a single file.
///
/// The classified records are built once from the input text and never
/// mutated; only the selection flags change, and the reconciled patch is
/// recomputed from scratch on demand.
///
/// # Examples
///
/// ```
/// use diff_select::FileSelection;
///
/// let diff = "\
/// --- a/notes.txt
/// +++ b/notes.txt
/// @@ -1,2 +1,3 @@
///  first
/// +second
///  third
/// ";
/// let mut selection = FileSelection::parse(diff).unwrap();
/// assert_eq!(selection.selectable_count(), 1);
/// assert_eq!(selection.reconcile(), None);
///
/// selection.toggle(0).unwrap();
/// let patch = selection.reconcile().unwrap();
/// assert!(patch.contains("@@ -1,2 +1,3 @@"));
/// ```
#[derive(Debug, Clone)]
pub struct FileSelection {
    records: Vec<LineRecord>,
    selection: SelectionState,
}

impl FileSelection {
    /// Classify `diff_text` and start with every line deselected.
    ///
    /// # Errors
    ///
    /// Returns [`ClassifyError`] if the diff contains a malformed hunk header.
    pub fn parse(diff_text: &str) -> Result<Self, ClassifyError> {
        let records = classify_diff(diff_text)?;
        let selection = SelectionState::for_records(&records);
        Ok(Self { records, selection })
    }

    /// The classified line records, in document order
    #[must_use]
    pub fn records(&self) -> &[LineRecord] {
        &self.records
    }

    /// Number of selectable (added/removed) lines
    #[must_use]
    pub fn selectable_count(&self) -> usize {
        self.selection.len()
    }

    /// Flip the selection flag for the given selectable-line ordinal.
    ///
    /// # Errors
    ///
    /// Returns [`SelectError::IndexOutOfRange`] for an unknown ordinal.
    pub fn toggle(&mut self, ordinal: usize) -> Result<bool, SelectError> {
        self.selection.toggle(ordinal)
    }

    /// Whether the line at `ordinal` is currently selected
    #[must_use]
    pub fn is_selected(&self, ordinal: usize) -> bool {
        self.selection.is_selected(ordinal)
    }

    /// Select every selectable line
    pub fn select_all(&mut self) {
        self.selection.select_all();
    }

    /// Deselect every selectable line
    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Jump targets for cursor movement over the selectable lines
    #[must_use]
    pub fn navigation(&self, viewport_height: usize) -> Vec<NavigationEntry> {
        navigation_targets(&self.records, viewport_height)
    }

    /// Rebuild the diff from the current selection.
    ///
    /// Returns the patch text with a trailing newline, or `None` if no hunk
    /// retained a selected line ("nothing to export", not an error).
    #[must_use]
    pub fn reconcile(&self) -> Option<String> {
        reconcile(&self.records, &self.selection).map(|lines| lines.join("\n") + "\n")
    }
}

/// Main interface for staging selected diff lines through git
pub struct DiffSelect<'a> {
    repo_path: &'a str,
}

impl<'a> DiffSelect<'a> {
    /// Create a new DiffSelect for the given repository path
    #[must_use]
    pub fn new(repo_path: &'a str) -> Self {
        Self { repo_path }
    }

    /// List a file's selectable lines with their toggle ordinals.
    ///
    /// # Examples
    /// ```no_run
    /// # use diff_select::DiffSelect;
    /// let select = DiffSelect::new(".");
    /// let listing = select.show("flake.nix").unwrap();
    /// print!("{listing}");
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`DiffSelectError::NoChanges`] if the file has no unstaged
    /// changes, or the underlying git/classification error.
    pub fn show(&self, file: &str) -> Result<String, DiffSelectError> {
        let raw = self.raw_diff(file)?;
        if raw.trim().is_empty() {
            return Err(DiffSelectError::NoChanges {
                file: file.to_string(),
            });
        }
        Ok(format_listing(&classify_diff(&raw)?))
    }

    /// Stage the listed selectable lines of `file`.
    ///
    /// `lines` uses the ordinal syntax printed by [`DiffSelect::show`], e.g.
    /// `"0,2..5"`. Each occurrence is a toggle, so a repeated ordinal flips
    /// its line back off. The reconciled patch is applied to the index with
    /// `git apply --cached -p1`.
    ///
    /// # Examples
    /// ```no_run
    /// # use diff_select::DiffSelect;
    /// let select = DiffSelect::new(".");
    /// select.stage("flake.nix", "0").unwrap();
    /// select.stage("config.nix", "1..3,6").unwrap();
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`DiffSelectError::NothingSelected`] if the selection retains
    /// no hunk, plus any parse, toggle, or git error.
    pub fn stage(&self, file: &str, lines: &str) -> Result<(), DiffSelectError> {
        let ordinals = parse_ordinals(lines)?;

        let raw = self.raw_diff(file)?;
        if raw.trim().is_empty() {
            return Err(DiffSelectError::NoChanges {
                file: file.to_string(),
            });
        }

        let mut selection = FileSelection::parse(&raw)?;
        for ordinal in ordinals {
            selection.toggle(ordinal)?;
        }

        let patch = selection
            .reconcile()
            .ok_or_else(|| DiffSelectError::NothingSelected {
                file: file.to_string(),
            })?;

        Ok(self.apply_patch(&patch)?)
    }

    /// Get the raw single-file diff of unstaged changes
    fn raw_diff(&self, file: &str) -> Result<String, GitCommandError> {
        let output = Command::new("git")
            .args([
                "-C",
                self.repo_path,
                "diff",
                "--no-ext-diff",
                "--no-color",
                "--",
                file,
            ])
            .output()
            .map_err(|e| GitCommandError::DiffFailed {
                message: e.to_string(),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(GitCommandError::DiffExitError {
                stderr: stderr.into_owned(),
            });
        }

        String::from_utf8(output.stdout).map_err(|e| GitCommandError::InvalidUtf8 {
            message: e.to_string(),
        })
    }

    /// Apply a reconciled patch to the git index
    fn apply_patch(&self, patch: &str) -> Result<(), GitCommandError> {
        use std::io::Write;

        let mut child = Command::new("git")
            .args(["-C", self.repo_path, "apply", "--cached", "-p1", "-"])
            .stdin(std::process::Stdio::piped())
            .stdout(std::process::Stdio::piped())
            .stderr(std::process::Stdio::piped())
            .spawn()
            .map_err(|e| GitCommandError::ApplySpawnFailed {
                message: e.to_string(),
            })?;

        child
            .stdin
            .take()
            .ok_or(GitCommandError::ApplyStdinFailed)?
            .write_all(patch.as_bytes())
            .map_err(|e| GitCommandError::ApplyWriteFailed {
                message: e.to_string(),
            })?;

        let output = child
            .wait_with_output()
            .map_err(|e| GitCommandError::ApplyWaitFailed {
                message: e.to_string(),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(GitCommandError::ApplyExitError {
                stderr: stderr.into_owned(),
            });
        }

        Ok(())
    }
}
