//! Formatting of CodePlex work items as GitHub issues.
//!
//! Every migrated issue opens with a provenance header linking back to the
//! CodePlex work item, followed by an attribution line for the reporter and
//! the description. Each comment gets its own attribution line so the thread
//! keeps its authors and timestamps even though GitHub posts everything under
//! the migrating account.

mod error;
mod labels;
mod templates;

pub use error::FormatError;
pub use labels::{default_type_labels, LabelRules, DEFAULT_SOURCE_LABEL};
pub use templates::{
    create_handlebars_registry, ProvenanceTemplates, DEFAULT_ATTRIBUTION_TEMPLATE,
    DEFAULT_HEADER_TEMPLATE,
};

use crate::codeplex::Issue;
use chrono::{DateTime, Utc};
use handlebars::Handlebars;
use serde_json::json;
use url::Url;

const PROFILE_BASE: &str = "https://www.codeplex.com/site/users/view/";

/// A work item rendered for GitHub.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattedIssue {
    /// CodePlex work item identifier.
    pub source_id: u32,

    /// Issue title.
    pub title: String,

    /// Provenance header, reporter attribution and description.
    pub opening: String,

    /// One attributed body per CodePlex comment, in thread order.
    pub comments: Vec<String>,

    /// Labels to apply.
    pub labels: Vec<String>,

    /// Whether the GitHub issue should be closed after creation.
    pub closed: bool,
}

impl FormattedIssue {
    /// The whole thread as a single Markdown document.
    #[must_use]
    pub fn body(&self) -> String {
        std::iter::once(self.opening.as_str())
            .chain(self.comments.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

/// Renders [`Issue`]s into [`FormattedIssue`]s for one CodePlex project.
pub struct Formatter {
    project: String,
    labels: LabelRules,
    handlebars: Handlebars<'static>,
}

impl Formatter {
    /// Creates a formatter.
    ///
    /// # Errors
    ///
    /// Returns [`FormatError`] if a provenance template does not compile.
    pub fn new(
        project: impl Into<String>,
        labels: LabelRules,
        templates: &ProvenanceTemplates,
    ) -> Result<Self, FormatError> {
        Ok(Self {
            project: project.into(),
            labels,
            handlebars: create_handlebars_registry(templates)?,
        })
    }

    /// Address of the work item on CodePlex.
    #[must_use]
    pub fn source_url(&self, id: u32) -> String {
        format!("https://{}.codeplex.com/workitem/{id}", self.project)
    }

    /// Formats a work item.
    ///
    /// # Errors
    ///
    /// Returns [`FormatError::RenderError`] if a template references an unknown
    /// variable.
    pub fn format(&self, issue: &Issue) -> Result<FormattedIssue, FormatError> {
        let header = self.handlebars.render(
            templates::HEADER,
            &json!({
                "url": self.source_url(issue.id),
                "id": issue.id,
                "project": self.project,
                "title": issue.title,
            }),
        )?;
        let reporter = self.attribution(&issue.reported_by, issue.reported_at)?;
        let opening = entry(&format!("{header}\n\n{reporter}"), &issue.description);

        let comments = issue
            .comments
            .iter()
            .map(|comment| {
                let attribution = self.attribution(comment.author(), comment.time())?;
                Ok(entry(&attribution, comment.content()))
            })
            .collect::<Result<Vec<_>, FormatError>>()?;

        Ok(FormattedIssue {
            source_id: issue.id,
            title: issue.title.clone(),
            opening,
            comments,
            labels: self.labels.labels_for(issue),
            closed: issue.is_closed(),
        })
    }

    fn attribution(&self, author: &str, time: DateTime<Utc>) -> Result<String, FormatError> {
        Ok(self.handlebars.render(
            templates::ATTRIBUTION,
            &json!({
                "author": author,
                "profile_url": profile_url(author),
                "date": time.format("%Y-%m-%d").to_string(),
                "time": time.format("%H:%M").to_string(),
                "timestamp": time.to_rfc3339(),
            }),
        )?)
    }
}

/// Attribution line followed by content on the next line.
fn entry(attribution: &str, content: &str) -> String {
    if content.is_empty() {
        attribution.to_string()
    } else {
        format!("{attribution}\n{content}")
    }
}

/// CodePlex profile page of `author`, empty for anonymous entries.
fn profile_url(author: &str) -> String {
    if author.is_empty() {
        return String::new();
    }
    let Ok(mut url) = Url::parse(PROFILE_BASE) else {
        return String::new();
    };
    if let Ok(mut segments) = url.path_segments_mut() {
        segments.pop_if_empty().push(author);
    }
    url.to_string()
}
