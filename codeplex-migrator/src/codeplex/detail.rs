//! Parsing of a single work item page.

use super::timestamp::parse_timestamp_or_sentinel;
use super::{Comment, SourceError};
use crate::html::{find_all, pattern, selector, to_markdown, Document, Element};
use chrono::{DateTime, Utc};
use regex::Regex;
use scraper::Selector;
use std::sync::LazyLock;
use tracing::{debug, warn};

/// Content of the synthetic comment recorded for a close without remarks.
pub const EMPTY_CLOSING_REMARKS: &str = "Closed.";

static COMMENT_INDEX: LazyLock<Regex> =
    LazyLock::new(|| pattern(r#"id="CommentContainer(\d+)""#));

/// Everything recovered from a work item's detail page.
#[derive(Debug, Clone)]
pub struct IssueDetail {
    /// Heading title, empty if the page has none.
    pub title: String,
    /// Description converted to Markdown.
    pub description: String,
    /// Reporter display name.
    pub reported_by: String,
    /// Reported time, or the sentinel if unparsable.
    pub reported_at: DateTime<Utc>,
    /// Comments in display order, followed by the closing entry if requested.
    pub comments: Vec<Comment>,
}

/// Parses a work item detail page.
///
/// Comment containers are numbered from zero; the scan stops at the first
/// missing number. When `closed` is set the closed block, if present, is
/// appended as a final comment.
///
/// # Errors
///
/// Returns [`SourceError::Selector`] if a selector cannot be built.
pub fn parse_detail(html: &str, url: &str, closed: bool) -> Result<IssueDetail, SourceError> {
    let document = Document::parse(html);
    let entry = EntrySelectors::new()?;

    let title = document
        .text(&selector(r#"h1[id^="workItemTitle"]"#)?)
        .unwrap_or_default();

    let description = document
        .first(&selector(r#"[id$="descriptionContent"], .descriptionContent"#)?)
        .map(|element| to_markdown(&element.inner_html()))
        .unwrap_or_default();

    let reported_by = document
        .text(&selector(r#"[id$="ReportedByLink"]"#)?)
        .unwrap_or_default();
    if reported_by.is_empty() {
        warn!(url, "Reporter not found on work item page");
    }

    let reported_raw = document
        .first(&selector(r#"[id$="ReportedOnDateTime"]"#)?)
        .map(timestamp_text)
        .unwrap_or_default();
    let reported_at = parse_timestamp_or_sentinel(&reported_raw, "reported time");

    let mut comments = Vec::new();
    for index in 0u32.. {
        let container = selector(&format!(r#"[id="CommentContainer{index}"]"#))?;
        let Some(element) = document.first(&container) else {
            warn_on_gap(html, url, index);
            break;
        };
        comments.push(entry.read(element, "comment time"));
    }

    if closed {
        match document.first(&selector(r#"[id$="ClosedDiv"]"#)?) {
            Some(block) => {
                let closing = entry.read(block, "closed time");
                let closing = if closing.content().is_empty() {
                    Comment::new(closing.author(), closing.time(), EMPTY_CLOSING_REMARKS)
                } else {
                    closing
                };
                comments.push(closing);
            }
            None => debug!(url, "Closed work item has no closed block"),
        }
    }

    Ok(IssueDetail {
        title,
        description,
        reported_by,
        reported_at,
        comments,
    })
}

/// Reports comment containers numbered past the end of the contiguous run.
fn warn_on_gap(html: &str, url: &str, missing: u32) {
    let highest = find_all(html, &COMMENT_INDEX)
        .filter_map(|index| index.parse::<u32>().ok())
        .max();
    if let Some(highest) = highest.filter(|highest| *highest > missing) {
        warn!(
            url,
            missing,
            highest,
            "Comment numbering has a gap; later comments are not migrated"
        );
    }
}

/// Prefers the `title` attribute, where CodePlex keeps the full timestamp.
fn timestamp_text(element: Element<'_>) -> String {
    element
        .attr("title")
        .map(str::to_string)
        .unwrap_or_else(|| element.text())
}

/// Selectors shared by comment containers and the closed block.
struct EntrySelectors {
    author: Selector,
    time: Selector,
    content: Selector,
}

impl EntrySelectors {
    fn new() -> Result<Self, SourceError> {
        Ok(Self {
            author: selector(".author")?,
            time: selector(".smartDate")?,
            content: selector(".markDownOutput")?,
        })
    }

    fn read(&self, element: Element<'_>, context: &str) -> Comment {
        let author = element
            .first(&self.author)
            .map(|author| author.text())
            .unwrap_or_default();
        let time_raw = element
            .first(&self.time)
            .map(timestamp_text)
            .unwrap_or_default();
        let content = element
            .first(&self.content)
            .map(|content| to_markdown(&content.inner_html()))
            .unwrap_or_default();

        Comment::new(
            author,
            parse_timestamp_or_sentinel(&time_raw, context),
            content,
        )
    }
}
