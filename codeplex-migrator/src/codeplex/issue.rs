//! Work item records recovered from CodePlex.

use chrono::{DateTime, Utc};

/// Status value that marks a work item as closed on CodePlex.
pub const CLOSED_STATUS: &str = "Closed";

/// A CodePlex work item with its discussion thread.
#[derive(Debug, Clone, PartialEq)]
pub struct Issue {
    /// CodePlex work item identifier.
    pub id: u32,

    /// Plain text title.
    pub title: String,

    /// Description converted to Markdown.
    pub description: String,

    /// Status such as "Active", "Resolved" or "Closed".
    ///
    /// `None` when the item was fetched on its own rather than from the listing.
    pub status: Option<String>,

    /// Work item type such as "Feature", "Issue" or "Unassigned".
    pub kind: Option<String>,

    /// Impact (severity) such as "Low", "Medium" or "High".
    pub impact: Option<String>,

    /// Display name of the reporter.
    pub reported_by: String,

    /// When the item was reported.
    pub reported_at: DateTime<Utc>,

    /// Discussion thread in display order.
    pub comments: Vec<Comment>,
}

impl Issue {
    /// Returns true if the work item was closed on CodePlex.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.status.as_deref() == Some(CLOSED_STATUS)
    }
}

/// A single entry in a work item's discussion thread.
///
/// Comments are built once during extraction and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    author: String,
    time: DateTime<Utc>,
    content: String,
}

impl Comment {
    /// Creates a comment.
    #[must_use]
    pub fn new(author: impl Into<String>, time: DateTime<Utc>, content: impl Into<String>) -> Self {
        Self {
            author: author.into(),
            time,
            content: content.into(),
        }
    }

    /// Display name of the author.
    #[must_use]
    pub fn author(&self) -> &str {
        &self.author
    }

    /// When the comment was posted.
    #[must_use]
    pub fn time(&self) -> DateTime<Utc> {
        self.time
    }

    /// Comment body as Markdown.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }
}

/// A row of the advanced work item listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListedIssue {
    /// CodePlex work item identifier.
    pub id: u32,
    /// Plain text title.
    pub title: String,
    /// Status column.
    pub status: Option<String>,
    /// Type column.
    pub kind: Option<String>,
    /// Severity column.
    pub impact: Option<String>,
}
