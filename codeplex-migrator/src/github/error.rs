//! Replay error types.

use thiserror::Error;

/// Errors that can occur while replaying issues on GitHub.
#[derive(Debug, Error)]
pub enum ReplayError {
    /// GitHub API error.
    #[error("GitHub API error: {0}")]
    GitHub(#[from] octocrab::Error),

    /// The close request succeeded but the issue is still open.
    #[error("Issue #{number} is still open after closing it")]
    NotClosed { number: u64 },
}
