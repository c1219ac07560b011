//! Processing result types.

use crate::github::ReplayedIssue;

/// Result of processing a single work item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessingResult {
    /// The work item was replayed on GitHub.
    Replayed(ReplayedIssue),

    /// The work item was left out of the migration.
    Skipped {
        /// CodePlex work item identifier.
        source_id: u32,
        /// Reason for skipping.
        reason: String,
    },

    /// The work item was formatted and printed but not sent (dry run).
    Previewed {
        /// CodePlex work item identifier.
        source_id: u32,
        /// Number of comments that would be posted.
        comments: usize,
        /// Whether the issue would be closed.
        closed: bool,
    },
}

impl ProcessingResult {
    /// CodePlex work item identifier.
    #[must_use]
    pub fn source_id(&self) -> u32 {
        match self {
            Self::Replayed(replayed) => replayed.source_id,
            Self::Skipped { source_id, .. } | Self::Previewed { source_id, .. } => *source_id,
        }
    }
}
