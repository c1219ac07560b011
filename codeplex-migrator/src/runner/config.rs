//! Runner configuration.

use crate::codeplex::DEFAULT_PAGE_SIZE;
use crate::github::ThreadStyle;
use crate::rate_limit::DEFAULT_PAUSE;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Configuration for one migration run.
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// CodePlex project name.
    project: String,
    /// Owner of the destination repository.
    owner: String,
    /// Destination repository name.
    repository: String,
    /// GitHub token used for API calls.
    token: String,
    /// Migrate only this work item.
    issue_id: Option<u32>,
    /// GitHub calls allowed before pausing (0 disables throttling).
    rate_limit: u32,
    /// Pause once the call budget is spent.
    pause: Duration,
    /// Whether to add the source label.
    source_label: bool,
    /// Listing page size.
    page_size: u32,
    /// Maximum concurrent detail page downloads.
    concurrency: usize,
    /// Whether to preview without calling GitHub.
    dry_run: bool,
    /// How comments are laid out on GitHub.
    thread_style: ThreadStyle,
    /// Whether to leave closed work items behind.
    skip_closed: bool,
    /// Optional TOML configuration file.
    config_path: Option<PathBuf>,
}

impl RunnerConfig {
    /// Creates a configuration with default options.
    pub fn new(
        project: impl Into<String>,
        owner: impl Into<String>,
        repository: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        Self {
            project: project.into(),
            owner: owner.into(),
            repository: repository.into(),
            token: token.into(),
            issue_id: None,
            rate_limit: 0,
            pause: DEFAULT_PAUSE,
            source_label: true,
            page_size: DEFAULT_PAGE_SIZE,
            concurrency: 1,
            dry_run: false,
            thread_style: ThreadStyle::default(),
            skip_closed: false,
            config_path: None,
        }
    }

    /// Restricts the run to a single work item.
    pub fn with_issue_id(mut self, issue_id: Option<u32>) -> Self {
        self.issue_id = issue_id;
        self
    }

    /// Sets the call budget and pause of the GitHub throttle.
    pub fn with_rate_limit(mut self, rate_limit: u32, pause: Duration) -> Self {
        self.rate_limit = rate_limit;
        self.pause = pause;
        self
    }

    /// Enables or disables the source label.
    pub fn with_source_label(mut self, source_label: bool) -> Self {
        self.source_label = source_label;
        self
    }

    /// Sets the listing page size.
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    /// Sets the detail page download concurrency.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    /// Enables or disables dry-run mode.
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Sets the thread layout.
    pub fn with_thread_style(mut self, thread_style: ThreadStyle) -> Self {
        self.thread_style = thread_style;
        self
    }

    /// Enables or disables skipping of closed work items.
    pub fn with_skip_closed(mut self, skip_closed: bool) -> Self {
        self.skip_closed = skip_closed;
        self
    }

    /// Sets the TOML configuration file.
    pub fn with_config_path(mut self, config_path: Option<PathBuf>) -> Self {
        self.config_path = config_path;
        self
    }

    /// Returns the CodePlex project name.
    pub fn project(&self) -> &str {
        &self.project
    }

    /// Returns the destination repository owner.
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Returns the destination repository name.
    pub fn repository(&self) -> &str {
        &self.repository
    }

    /// Returns the configured GitHub token.
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Returns the single work item to migrate, if any.
    pub fn issue_id(&self) -> Option<u32> {
        self.issue_id
    }

    /// Returns the GitHub call budget.
    pub fn rate_limit(&self) -> u32 {
        self.rate_limit
    }

    /// Returns the throttle pause.
    pub fn pause(&self) -> Duration {
        self.pause
    }

    /// Returns whether the source label is added.
    pub fn source_label(&self) -> bool {
        self.source_label
    }

    /// Returns the listing page size.
    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Returns the detail page download concurrency.
    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Returns whether dry-run mode is enabled.
    pub fn dry_run(&self) -> bool {
        self.dry_run
    }

    /// Returns the thread layout.
    pub fn thread_style(&self) -> ThreadStyle {
        self.thread_style
    }

    /// Returns whether closed work items are skipped.
    pub fn skip_closed(&self) -> bool {
        self.skip_closed
    }

    /// Returns the TOML configuration file path.
    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }
}
