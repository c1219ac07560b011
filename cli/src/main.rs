//! CLI for the CodePlex migrator.
//!
//! Scrapes every work item of a CodePlex project (or a single one) and
//! recreates it, with its comments, as an issue in a GitHub repository.

use clap::Parser;
use codeplex_migrator::{RunSummary, Runner, RunnerConfig, RunnerError, ThreadStyle};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing::error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// CodePlex Migrator - Move CodePlex work items and their comments to GitHub issues.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// CodePlex project name (the `{project}` in `{project}.codeplex.com`).
    #[arg(long = "from")]
    project: String,

    /// Destination GitHub repository name.
    #[arg(long = "to")]
    repository: String,

    /// Owner (user or organisation) of the destination repository.
    #[arg(long)]
    owner: String,

    /// GitHub Personal Access Token.
    #[arg(long = "key", env = "GITHUB_TOKEN", hide_env_values = true)]
    token: String,

    /// Migrate only the work item with this id.
    #[arg(long = "id")]
    issue_id: Option<u32>,

    /// GitHub calls allowed before pausing (0 disables throttling).
    #[arg(long, default_value_t = 0)]
    rate_limit: u32,

    /// Seconds to pause once the call budget is spent.
    #[arg(long, default_value_t = 60)]
    pause: u64,

    /// Do not add the "CodePlex" label to migrated issues.
    #[arg(long)]
    no_source_label: bool,

    /// Work items requested per listing page.
    #[arg(long, default_value_t = 100, value_parser = clap::value_parser!(u32).range(1..))]
    page_size: u32,

    /// Maximum concurrent work item page downloads.
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u16).range(1..))]
    concurrency: u16,

    /// Put the whole thread in the issue body instead of posting comments.
    #[arg(long)]
    inline_comments: bool,

    /// Leave work items that are closed on CodePlex behind.
    #[arg(long)]
    skip_closed: bool,

    /// Print the formatted issues without calling GitHub.
    #[arg(long)]
    dry_run: bool,

    /// Path to a TOML file with label tables and templates.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    // Ignore the error if another provider was installed first
    let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();

    let args = Args::parse();

    match run(args).await {
        Ok(summary) => {
            print_summary(&summary);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "Migration failed");
            ExitCode::FAILURE
        }
    }
}

/// Initializes tracing with environment filter support.
///
/// Sets up the global tracing subscriber with:
/// - Compact log formatting (single-line output)
/// - Log level filtering via `RUST_LOG` env var (defaults to "info")
fn init_tracing() {
    tracing_subscriber::registry()
        .with(fmt::layer().compact().with_target(false))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
}

/// Main execution logic.
async fn run(args: Args) -> Result<RunSummary, RunnerError> {
    let thread_style = if args.inline_comments {
        ThreadStyle::Inline
    } else {
        ThreadStyle::Comments
    };

    let config = RunnerConfig::new(args.project, args.owner, args.repository, args.token)
        .with_issue_id(args.issue_id)
        .with_rate_limit(args.rate_limit, Duration::from_secs(args.pause))
        .with_source_label(!args.no_source_label)
        .with_page_size(args.page_size)
        .with_concurrency(usize::from(args.concurrency))
        .with_thread_style(thread_style)
        .with_skip_closed(args.skip_closed)
        .with_dry_run(args.dry_run)
        .with_config_path(args.config);

    let mut runner = Runner::from_config(&config)?;
    runner.run().await
}

/// Prints the final run summary.
fn print_summary(summary: &RunSummary) {
    println!("\nSummary:");
    println!(
        "  Mode: {}",
        if summary.dry_run { "Dry Run" } else { "Live" }
    );
    println!("  Work items read: {}", summary.issues_discovered);
    println!("  Work items skipped: {}", summary.issues_skipped);

    if summary.dry_run {
        println!("  Work items previewed: {}", summary.issues_previewed);
    } else {
        println!("  Issues created: {}", summary.issues_created);
        println!("  Comments created: {}", summary.comments_created);
        println!("  Issues closed: {}", summary.issues_closed);
        println!("  Throttle pauses: {}", summary.throttle_pauses);
    }
}
