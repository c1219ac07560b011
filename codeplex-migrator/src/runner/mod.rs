//! Orchestrates a CodePlex to GitHub migration run.

mod config;
mod error;

pub use config::RunnerConfig;
pub use error::RunnerError;

use crate::codeplex::{CodePlexReader, HttpFetcher, Issue, PageFetcher, ProjectUrls};
use crate::config::MigratorConfig;
use crate::formatter::{FormattedIssue, Formatter};
use crate::github::{IssueTracker, OctocrabTracker, ReplayWorker};
use crate::rate_limit::CallThrottle;
use crate::summary::{ProcessingResult, RunSummary};
use futures::TryStreamExt;
use octocrab::Octocrab;
use std::pin::pin;
use tracing::info;

/// Number of body lines shown per issue in a dry run.
const PREVIEW_LINES: usize = 10;

/// Drives work items from a [`CodePlexReader`] through a [`Formatter`] into a
/// [`ReplayWorker`], one item at a time.
pub struct Runner<F, T> {
    reader: CodePlexReader<F>,
    formatter: Formatter,
    worker: ReplayWorker<T>,
    issue_id: Option<u32>,
    skip_closed: bool,
    dry_run: bool,
}

impl Runner<HttpFetcher, OctocrabTracker> {
    /// Builds a runner that scrapes CodePlex over HTTP and writes to GitHub.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError`] if the configuration file is invalid, the
    /// project name is not a valid host name, or a client cannot be built.
    pub fn from_config(config: &RunnerConfig) -> Result<Self, RunnerError> {
        let file = match config.config_path() {
            Some(path) => MigratorConfig::load(path)?,
            None => MigratorConfig::default(),
        };

        let urls = ProjectUrls::new(config.project()).map_err(|e| RunnerError::InvalidProject {
            project: config.project().to_string(),
            source: e,
        })?;
        let reader = CodePlexReader::new(HttpFetcher::new()?, urls)
            .with_page_size(config.page_size())
            .with_concurrency(config.concurrency());

        let formatter = Formatter::new(
            config.project(),
            file.label_rules(config.source_label()),
            &file.provenance_templates(),
        )?;

        let octocrab = Octocrab::builder()
            .personal_token(config.token().to_string())
            .build()?;
        let tracker = OctocrabTracker::new(octocrab, config.owner(), config.repository());
        let throttle = CallThrottle::new(config.rate_limit(), config.pause());
        let worker = ReplayWorker::new(tracker, throttle).with_thread_style(config.thread_style());

        Ok(Self::new(reader, formatter, worker)
            .with_issue_id(config.issue_id())
            .with_skip_closed(config.skip_closed())
            .with_dry_run(config.dry_run()))
    }
}

impl<F: PageFetcher, T: IssueTracker> Runner<F, T> {
    /// Creates a runner that migrates every work item.
    pub fn new(reader: CodePlexReader<F>, formatter: Formatter, worker: ReplayWorker<T>) -> Self {
        Self {
            reader,
            formatter,
            worker,
            issue_id: None,
            skip_closed: false,
            dry_run: false,
        }
    }

    /// Restricts the run to a single work item.
    #[must_use]
    pub fn with_issue_id(mut self, issue_id: Option<u32>) -> Self {
        self.issue_id = issue_id;
        self
    }

    /// Leaves closed work items out of the migration.
    #[must_use]
    pub fn with_skip_closed(mut self, skip_closed: bool) -> Self {
        self.skip_closed = skip_closed;
        self
    }

    /// Prints previews instead of calling GitHub.
    #[must_use]
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Returns the work item reader.
    pub fn reader(&self) -> &CodePlexReader<F> {
        &self.reader
    }

    /// Returns the replay worker.
    pub fn worker(&self) -> &ReplayWorker<T> {
        &self.worker
    }

    /// Executes the migration.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError`] on the first scraping, formatting or GitHub
    /// failure. Issues replayed before the failure stay on GitHub.
    pub async fn run(&mut self) -> Result<RunSummary, RunnerError> {
        let mut summary = RunSummary::new(self.dry_run);

        if let Some(id) = self.issue_id {
            info!(id, project = self.reader.urls().project(), "Migrating single work item");
            let issue = self.reader.issue(id).await?;
            let result = process_issue(
                &self.formatter,
                &mut self.worker,
                &issue,
                self.skip_closed,
                self.dry_run,
            )
            .await?;
            summary.record_result(&result);
        } else {
            info!(project = self.reader.urls().project(), "Migrating all work items");
            let mut issues = pin!(self.reader.issues());
            while let Some(issue) = issues.try_next().await? {
                let result = process_issue(
                    &self.formatter,
                    &mut self.worker,
                    &issue,
                    self.skip_closed,
                    self.dry_run,
                )
                .await?;
                summary.record_result(&result);
            }
        }

        summary.throttle_pauses = self.worker.throttle().pauses();
        info!(
            discovered = summary.issues_discovered,
            created = summary.issues_created,
            "Migration finished"
        );
        Ok(summary)
    }
}

async fn process_issue<T: IssueTracker>(
    formatter: &Formatter,
    worker: &mut ReplayWorker<T>,
    issue: &Issue,
    skip_closed: bool,
    dry_run: bool,
) -> Result<ProcessingResult, RunnerError> {
    if skip_closed && issue.is_closed() {
        info!(id = issue.id, "Skipping closed work item");
        return Ok(ProcessingResult::Skipped {
            source_id: issue.id,
            reason: "closed on CodePlex".to_string(),
        });
    }

    let formatted = formatter.format(issue)?;

    if dry_run {
        print_dry_run_preview(&formatted, &formatter.source_url(issue.id));
        return Ok(ProcessingResult::Previewed {
            source_id: issue.id,
            comments: formatted.comments.len(),
            closed: formatted.closed,
        });
    }

    let replayed = worker.replay_one(&formatted).await?;
    Ok(ProcessingResult::Replayed(replayed))
}

fn print_dry_run_preview(issue: &FormattedIssue, source_url: &str) {
    println!("\n[DRY RUN] #{} {}", issue.source_id, issue.title);
    println!("  Source: {source_url}");
    println!("  Labels: {}", issue.labels.join(", "));
    println!(
        "  Would post {} comment(s){}",
        issue.comments.len(),
        if issue.closed { " and close the issue" } else { "" }
    );

    let body = issue.body();
    println!("\n  Body:");
    for line in body.lines().take(PREVIEW_LINES) {
        println!("    {line}");
    }
    if body.lines().count() > PREVIEW_LINES {
        println!("    ...");
    }
}
