//! Replay of formatted issues on GitHub.
//!
//! Each issue is replayed as one creation call, one call per comment in
//! thread order and a final close call when the source item was closed.
//! Every call goes through the worker's [`CallThrottle`].

mod error;
mod tracker;

pub use error::ReplayError;
pub use tracker::{CreatedIssue, IssueTracker, OctocrabTracker};

use crate::formatter::FormattedIssue;
use crate::rate_limit::CallThrottle;
use tracing::{debug, info, info_span, Instrument};

/// How a source thread is laid out on GitHub.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ThreadStyle {
    /// Opening post as the issue body, each source comment as a GitHub comment.
    #[default]
    Comments,
    /// Whole thread in the issue body.
    Inline,
}

/// Outcome of replaying one issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplayedIssue {
    /// CodePlex work item identifier.
    pub source_id: u32,
    /// GitHub issue number.
    pub number: u64,
    /// GitHub issue URL.
    pub url: String,
    /// Number of comments posted.
    pub comments_created: usize,
    /// Whether the issue was closed.
    pub closed: bool,
}

/// Replays formatted issues through an [`IssueTracker`].
pub struct ReplayWorker<T> {
    tracker: T,
    throttle: CallThrottle,
    thread_style: ThreadStyle,
}

impl<T: IssueTracker> ReplayWorker<T> {
    /// Creates a worker.
    pub fn new(tracker: T, throttle: CallThrottle) -> Self {
        Self {
            tracker,
            throttle,
            thread_style: ThreadStyle::default(),
        }
    }

    /// Sets the thread layout.
    #[must_use]
    pub fn with_thread_style(mut self, thread_style: ThreadStyle) -> Self {
        self.thread_style = thread_style;
        self
    }

    /// Returns the destination tracker.
    pub fn tracker(&self) -> &T {
        &self.tracker
    }

    /// Returns the call throttle.
    pub fn throttle(&self) -> &CallThrottle {
        &self.throttle
    }

    /// Replays one issue.
    ///
    /// # Errors
    ///
    /// Returns [`ReplayError`] on the first failed call. An issue that was
    /// already created stays on GitHub.
    pub async fn replay_one(&mut self, issue: &FormattedIssue) -> Result<ReplayedIssue, ReplayError> {
        let span = info_span!("replay_issue", source_id = issue.source_id);

        async {
            let (body, comments) = match self.thread_style {
                ThreadStyle::Comments => (issue.opening.clone(), issue.comments.as_slice()),
                ThreadStyle::Inline => (issue.body(), &[][..]),
            };

            let created = self
                .tracker
                .create_issue(&issue.title, &body, &issue.labels)
                .await?;
            self.throttle.record_call().await;
            info!(number = created.number, url = %created.url, "Issue created");

            for (index, comment) in comments.iter().enumerate() {
                self.tracker.create_comment(created.number, comment).await?;
                self.throttle.record_call().await;
                debug!(number = created.number, index, "Comment created");
            }

            if issue.closed {
                self.tracker.close_issue(created.number).await?;
                self.throttle.record_call().await;
                info!(number = created.number, "Issue closed");
            }

            Ok(ReplayedIssue {
                source_id: issue.source_id,
                number: created.number,
                url: created.url,
                comments_created: comments.len(),
                closed: issue.closed,
            })
        }
        .instrument(span)
        .await
    }

    /// Replays issues in order, stopping at the first failure.
    ///
    /// # Errors
    ///
    /// Returns [`ReplayError`] from the first issue that fails.
    pub async fn replay_all<I>(&mut self, issues: I) -> Result<Vec<ReplayedIssue>, ReplayError>
    where
        I: IntoIterator<Item = FormattedIssue>,
    {
        let mut replayed = Vec::new();
        for issue in issues {
            replayed.push(self.replay_one(&issue).await?);
        }
        Ok(replayed)
    }
}
