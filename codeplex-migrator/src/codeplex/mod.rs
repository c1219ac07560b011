//! Reading work items from a CodePlex project's web pages.
//!
//! A full read runs in three steps:
//! 1. fetch the unfiltered listing and read the total item count
//! 2. walk the listing pages in ascending id order, collecting one row per item
//! 3. fetch each item's detail page for its description and discussion thread
//!
//! [`CodePlexReader::issues`] performs these steps lazily, yielding one
//! complete [`Issue`] at a time so replay can start before scraping finishes.

mod detail;
mod error;
mod fetch;
mod issue;
mod listing;
pub mod timestamp;
mod urls;

pub use detail::{parse_detail, IssueDetail, EMPTY_CLOSING_REMARKS};
pub use error::SourceError;
pub use fetch::{HttpFetcher, PageFetcher};
pub use issue::{Comment, Issue, ListedIssue, CLOSED_STATUS};
pub use listing::{page_count, parse_item_count, parse_listing};
pub use timestamp::{parse_timestamp, SENTINEL_TIMESTAMP};
pub use urls::{ProjectUrls, DEFAULT_PAGE_SIZE};

use futures::future;
use futures::stream::{self, Stream, StreamExt, TryStreamExt};
use tracing::{debug, info, info_span, warn, Instrument};

/// Reads work items from one CodePlex project.
pub struct CodePlexReader<F> {
    fetcher: F,
    urls: ProjectUrls,
    page_size: u32,
    concurrency: usize,
}

impl<F: PageFetcher> CodePlexReader<F> {
    /// Creates a reader with the default page size and no concurrency.
    pub fn new(fetcher: F, urls: ProjectUrls) -> Self {
        Self {
            fetcher,
            urls,
            page_size: DEFAULT_PAGE_SIZE,
            concurrency: 1,
        }
    }

    /// Sets the number of items requested per listing page.
    #[must_use]
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Sets how many detail pages may be downloaded at once.
    ///
    /// Items are still yielded in ascending id order.
    #[must_use]
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// The project's page addresses.
    pub fn urls(&self) -> &ProjectUrls {
        &self.urls
    }

    /// Returns the underlying fetcher.
    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Reads the total number of work items in the project.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the page cannot be fetched or has no count.
    pub async fn item_count(&self) -> Result<u32, SourceError> {
        let url = self.urls.item_count();
        let html = self.fetcher.fetch(&url).await?;
        let count = parse_item_count(&html, url.as_str())?;
        info!(count, "Found work items");
        Ok(count)
    }

    /// Reads the number of listing pages at the configured page size.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the item count cannot be read.
    pub async fn page_count(&self) -> Result<u32, SourceError> {
        let pages = page_count(self.item_count().await?, self.page_size);
        debug!(pages, page_size = self.page_size, "Computed listing pages");
        Ok(pages)
    }

    /// Reads one listing page.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the page cannot be fetched or a row is broken.
    pub async fn list_page(&self, page: u32) -> Result<Vec<ListedIssue>, SourceError> {
        let url = self.urls.listing_page(self.page_size, page);
        let html = self.fetcher.fetch(&url).await?;
        let listed = parse_listing(&html, url.as_str())?;

        for item in &listed {
            info!(
                id = item.id,
                status = item.status.as_deref().unwrap_or("-"),
                title = %item.title,
                "Listed work item"
            );
        }
        Ok(listed)
    }

    /// Reads every listing page without fetching detail pages.
    ///
    /// # Errors
    ///
    /// Returns the first [`SourceError`] encountered.
    pub async fn list_all(&self) -> Result<Vec<ListedIssue>, SourceError> {
        let mut last_id = 0;
        let mut listed = Vec::new();
        for page in 0..self.page_count().await? {
            for item in self.list_page(page).await? {
                if advance_if_ascending(&mut last_id, item.id) {
                    listed.push(item);
                }
            }
        }
        Ok(listed)
    }

    /// Lazily reads every work item, in ascending id order.
    ///
    /// The stream is finite and ends after the first error.
    pub fn issues(&self) -> impl Stream<Item = Result<Issue, SourceError>> + '_ {
        let mut last_id = 0;
        stream::once(self.page_count())
            .map_ok(|pages| stream::iter(0..pages).map(Ok::<u32, SourceError>))
            .try_flatten()
            .and_then(move |page| self.list_page(page))
            .map_ok(|rows| stream::iter(rows).map(Ok::<ListedIssue, SourceError>))
            .try_flatten()
            .try_filter(move |item| future::ready(advance_if_ascending(&mut last_id, item.id)))
            .map_ok(move |item| self.complete(item))
            .try_buffered(self.concurrency)
    }

    /// Reads every work item into memory.
    ///
    /// # Errors
    ///
    /// Returns the first [`SourceError`] encountered.
    pub async fn collect_issues(&self) -> Result<Vec<Issue>, SourceError> {
        self.issues().try_collect().await
    }

    /// Reads a single work item without consulting the listing.
    ///
    /// Status, type and impact are left unset because the detail page does not
    /// expose them in the same form as the listing.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the page cannot be fetched or has no title.
    pub async fn issue(&self, id: u32) -> Result<Issue, SourceError> {
        self.complete(ListedIssue {
            id,
            title: String::new(),
            status: None,
            kind: None,
            impact: None,
        })
        .await
    }

    /// Completes a listing row with its detail page.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the page cannot be fetched or no title is
    /// known for the item.
    pub async fn complete(&self, listed: ListedIssue) -> Result<Issue, SourceError> {
        let span = info_span!("work_item", id = listed.id);

        async {
            let url = self.urls.work_item(listed.id);
            let html = self.fetcher.fetch(&url).await?;
            let closed = listed.status.as_deref() == Some(CLOSED_STATUS);
            let detail = parse_detail(&html, url.as_str(), closed)?;

            let title = if listed.title.is_empty() {
                detail.title
            } else {
                listed.title
            };
            if title.is_empty() {
                return Err(SourceError::MissingField {
                    field: "title",
                    url: url.to_string(),
                });
            }

            debug!(comments = detail.comments.len(), "Read work item");
            Ok(Issue {
                id: listed.id,
                title,
                description: detail.description,
                status: listed.status,
                kind: listed.kind,
                impact: listed.impact,
                reported_by: detail.reported_by,
                reported_at: detail.reported_at,
                comments: detail.comments,
            })
        }
        .instrument(span)
        .await
    }
}

/// Accepts `id` only if it is greater than every id accepted so far.
fn advance_if_ascending(last_id: &mut u32, id: u32) -> bool {
    if id > *last_id {
        *last_id = id;
        true
    } else {
        warn!(id, last_id = *last_id, "Skipping repeated or out-of-order work item");
        false
    }
}
