//! Parsing of the advanced work item listing.

use super::{ListedIssue, SourceError};
use crate::html::{find_all, find_first, pattern, selector, Document, Element};
use regex::Regex;
use scraper::Selector;
use std::sync::LazyLock;
use tracing::warn;

static ITEM_COUNT: LazyLock<Regex> =
    LazyLock::new(|| pattern(r#"Selected">\s*([\d,]+)\s*</span>\s*items"#));

static ROW_ID: LazyLock<Regex> = LazyLock::new(|| pattern(r#"id="row_checkbox_(\d+)""#));

/// Extracts the total number of work items from the unfiltered listing.
///
/// # Errors
///
/// Returns [`SourceError`] if the count is missing or not a number. Paging
/// depends on it, so this is fatal.
pub fn parse_item_count(html: &str, url: &str) -> Result<u32, SourceError> {
    let raw = find_first(html, &ITEM_COUNT);
    if raw.is_empty() {
        return Err(SourceError::MissingField {
            field: "item count",
            url: url.to_string(),
        });
    }

    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    digits.parse().map_err(|_| SourceError::InvalidNumber {
        field: "item count",
        value: raw.to_string(),
        url: url.to_string(),
    })
}

/// Number of listing pages needed for `items` work items.
#[must_use]
pub fn page_count(items: u32, page_size: u32) -> u32 {
    items.div_ceil(page_size.max(1))
}

/// Extracts every work item row from one listing page, in page order.
///
/// # Errors
///
/// Returns [`SourceError`] if a row has no identifier or no title.
pub fn parse_listing(html: &str, url: &str) -> Result<Vec<ListedIssue>, SourceError> {
    let columns = ListingColumns::new()?;
    let document = Document::parse(html);

    let listed = document
        .select(&columns.row)
        .into_iter()
        .map(|row| columns.read(row, url))
        .collect::<Result<Vec<_>, _>>()?;

    let marked = find_all(html, &ROW_ID).count();
    if marked != listed.len() {
        warn!(
            url,
            marked,
            parsed = listed.len(),
            "Listing rows and checkbox markers disagree; markup may have changed"
        );
    }

    Ok(listed)
}

struct ListingColumns {
    row: Selector,
    id: Selector,
    title: Selector,
    status: Selector,
    kind: Selector,
    severity: Selector,
}

impl ListingColumns {
    fn new() -> Result<Self, SourceError> {
        Ok(Self {
            row: selector(r#"tr.CheckboxRow[id^="row_checkbox_"]"#)?,
            id: selector("td.ID")?,
            title: selector(r#"a[id^="TitleLink"]"#)?,
            status: selector("td.Status")?,
            kind: selector("td.Type")?,
            severity: selector("td.Severity")?,
        })
    }

    fn read(&self, row: Element<'_>, url: &str) -> Result<ListedIssue, SourceError> {
        let raw_id = cell(row, &self.id).ok_or_else(|| SourceError::MissingField {
            field: "work item id",
            url: url.to_string(),
        })?;
        let id = raw_id.parse().map_err(|_| SourceError::InvalidNumber {
            field: "work item id",
            value: raw_id.clone(),
            url: url.to_string(),
        })?;

        let title = cell(row, &self.title).ok_or_else(|| SourceError::MissingField {
            field: "title",
            url: url.to_string(),
        })?;

        Ok(ListedIssue {
            id,
            title,
            status: cell(row, &self.status),
            kind: cell(row, &self.kind),
            impact: cell(row, &self.severity),
        })
    }
}

/// Text of the first matching cell, `None` if missing or blank.
fn cell(row: Element<'_>, selector: &Selector) -> Option<String> {
    row.first(selector)
        .map(|element| element.text())
        .filter(|text| !text.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: u32, title: &str, status: &str, kind: &str, severity: &str) -> String {
        format!(
            r#"<tr id="row_checkbox_{id}" class="CheckboxRow">
                <td class="ID">{id}</td>
                <td class="Title"><a id="TitleLink{id}" href="/workitem/{id}">{title}</a></td>
                <td class="Status">{status}</td>
                <td class="Type">{kind}</td>
                <td class="Severity">{severity}</td>
            </tr>"#
        )
    }

    fn page(rows: &[String]) -> String {
        format!(
            "<html><body><table id=\"WorkItemList\"><tbody>{}</tbody></table></body></html>",
            rows.join("\n")
        )
    }

    #[test]
    fn reads_item_count() {
        let html = r#"<span class="Selected">150</span> items"#;
        assert_eq!(parse_item_count(html, "u").unwrap(), 150);

        let html = "<span class=\"Selected\">1,204</span>\n items";
        assert_eq!(parse_item_count(html, "u").unwrap(), 1204);
    }

    #[test]
    fn missing_item_count_is_fatal() {
        let result = parse_item_count("<html>maintenance</html>", "u");
        assert!(matches!(
            result,
            Err(SourceError::MissingField {
                field: "item count",
                ..
            })
        ));
    }

    #[test]
    fn computes_page_count() {
        assert_eq!(page_count(0, 100), 0);
        assert_eq!(page_count(1, 100), 1);
        assert_eq!(page_count(100, 100), 1);
        assert_eq!(page_count(150, 100), 2);
        assert_eq!(page_count(5, 0), 5);
    }

    #[test]
    fn reads_rows_with_columns() {
        let html = page(&[
            row(3, "Crash &amp; burn", "Active", "Issue", "High"),
            row(9, "Add <b>export</b>", "Closed", "Feature", ""),
        ]);

        let listed = parse_listing(&html, "u").unwrap();

        assert_eq!(
            listed,
            vec![
                ListedIssue {
                    id: 3,
                    title: "Crash & burn".to_string(),
                    status: Some("Active".to_string()),
                    kind: Some("Issue".to_string()),
                    impact: Some("High".to_string()),
                },
                ListedIssue {
                    id: 9,
                    title: "Add export".to_string(),
                    status: Some("Closed".to_string()),
                    kind: Some("Feature".to_string()),
                    impact: None,
                },
            ]
        );
    }

    #[test]
    fn row_without_title_is_fatal() {
        let html = page(&[row(4, "", "Active", "Issue", "Low")]);
        assert!(matches!(
            parse_listing(&html, "u"),
            Err(SourceError::MissingField { field: "title", .. })
        ));
    }

    #[test]
    fn empty_page_has_no_rows() {
        assert!(parse_listing(&page(&[]), "u").unwrap().is_empty());
    }
}
