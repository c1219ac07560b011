//! Run summary types.

use super::result::ProcessingResult;

/// Summary of a complete run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Number of work items read from CodePlex.
    pub issues_discovered: usize,

    /// Number of GitHub issues created.
    pub issues_created: usize,

    /// Number of GitHub comments created.
    pub comments_created: usize,

    /// Number of GitHub issues closed.
    pub issues_closed: usize,

    /// Number of work items skipped (e.g., closed items in open-only mode).
    pub issues_skipped: usize,

    /// Number of work items previewed in a dry run.
    pub issues_previewed: usize,

    /// Number of throttle pauses taken.
    pub throttle_pauses: u64,

    /// Whether this was a dry run.
    pub dry_run: bool,
}

impl RunSummary {
    /// Creates a new empty summary.
    #[must_use]
    pub fn new(dry_run: bool) -> Self {
        Self {
            dry_run,
            ..Default::default()
        }
    }

    /// Updates the summary with a processing result.
    pub fn record_result(&mut self, result: &ProcessingResult) {
        self.issues_discovered += 1;
        match result {
            ProcessingResult::Replayed(replayed) => {
                self.issues_created += 1;
                self.comments_created += replayed.comments_created;
                if replayed.closed {
                    self.issues_closed += 1;
                }
            }
            ProcessingResult::Skipped { .. } => self.issues_skipped += 1,
            ProcessingResult::Previewed { .. } => self.issues_previewed += 1,
        }
    }

    /// Total number of GitHub API write calls made.
    #[must_use]
    pub fn github_calls(&self) -> usize {
        self.issues_created + self.comments_created + self.issues_closed
    }
}
