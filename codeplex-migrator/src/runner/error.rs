//! Runner error types.

/// Errors that can occur while running a migration.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// Configuration file errors.
    #[error(transparent)]
    Config(#[from] crate::config::ConfigError),

    /// CodePlex scraping errors.
    #[error(transparent)]
    Source(#[from] crate::codeplex::SourceError),

    /// Issue formatting errors.
    #[error(transparent)]
    Format(#[from] crate::formatter::FormatError),

    /// GitHub replay errors.
    #[error(transparent)]
    Replay(#[from] crate::github::ReplayError),

    /// GitHub API client initialization errors.
    #[error(transparent)]
    Octocrab(#[from] octocrab::Error),

    /// The project name does not form a valid CodePlex address.
    #[error("Invalid CodePlex project name '{project}': {source}")]
    InvalidProject {
        project: String,
        #[source]
        source: url::ParseError,
    },
}
