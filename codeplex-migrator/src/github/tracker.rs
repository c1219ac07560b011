//! Destination issue tracker.

use super::ReplayError;
use async_trait::async_trait;
use octocrab::models::IssueState;
use octocrab::Octocrab;

/// Issue created on the destination tracker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedIssue {
    /// Destination issue number.
    pub number: u64,
    /// Web URL of the issue.
    pub url: String,
}

/// Write operations the replay needs from an issue tracker.
#[async_trait]
pub trait IssueTracker: Send + Sync {
    /// Opens a new issue.
    async fn create_issue(
        &self,
        title: &str,
        body: &str,
        labels: &[String],
    ) -> Result<CreatedIssue, ReplayError>;

    /// Appends a comment to an issue.
    async fn create_comment(&self, number: u64, body: &str) -> Result<(), ReplayError>;

    /// Closes an issue.
    async fn close_issue(&self, number: u64) -> Result<(), ReplayError>;
}

/// [`IssueTracker`] backed by the GitHub REST API.
#[derive(Clone)]
pub struct OctocrabTracker {
    octocrab: Octocrab,
    owner: String,
    repository: String,
}

impl OctocrabTracker {
    /// Creates a tracker for `owner/repository`.
    pub fn new(octocrab: Octocrab, owner: impl Into<String>, repository: impl Into<String>) -> Self {
        Self {
            octocrab,
            owner: owner.into(),
            repository: repository.into(),
        }
    }

    /// Returns the `owner/repository` name.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.repository)
    }
}

#[async_trait]
impl IssueTracker for OctocrabTracker {
    async fn create_issue(
        &self,
        title: &str,
        body: &str,
        labels: &[String],
    ) -> Result<CreatedIssue, ReplayError> {
        let issue = self
            .octocrab
            .issues(&self.owner, &self.repository)
            .create(title)
            .body(body)
            .labels(labels.to_vec())
            .send()
            .await?;

        Ok(CreatedIssue {
            number: issue.number,
            url: issue.html_url.to_string(),
        })
    }

    async fn create_comment(&self, number: u64, body: &str) -> Result<(), ReplayError> {
        self.octocrab
            .issues(&self.owner, &self.repository)
            .create_comment(number, body)
            .await?;
        Ok(())
    }

    async fn close_issue(&self, number: u64) -> Result<(), ReplayError> {
        let issue = self
            .octocrab
            .issues(&self.owner, &self.repository)
            .update(number)
            .state(IssueState::Closed)
            .send()
            .await?;

        if issue.state != IssueState::Closed {
            return Err(ReplayError::NotClosed { number });
        }
        Ok(())
    }
}
