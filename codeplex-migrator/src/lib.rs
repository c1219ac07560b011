#![doc = include_str!(concat!("../", env!("CARGO_PKG_README")))]

pub mod codeplex;
pub mod config;
pub mod formatter;
pub mod github;
pub mod html;
pub mod rate_limit;
pub mod runner;
pub mod summary;

pub use codeplex::{
    CodePlexReader, Comment, HttpFetcher, Issue, ListedIssue, PageFetcher, ProjectUrls,
    SourceError,
};
pub use config::{ConfigError, MigratorConfig};
pub use formatter::{FormatError, FormattedIssue, Formatter, LabelRules, ProvenanceTemplates};
pub use github::{
    CreatedIssue, IssueTracker, OctocrabTracker, ReplayError, ReplayWorker, ReplayedIssue,
    ThreadStyle,
};
pub use html::{find_all, find_first, to_markdown};
pub use rate_limit::CallThrottle;
pub use runner::{Runner, RunnerConfig, RunnerError};
pub use summary::{ProcessingResult, RunSummary};
