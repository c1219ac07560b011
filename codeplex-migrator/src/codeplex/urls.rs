//! CodePlex page addresses for a project.

use url::Url;

/// Number of work items requested per listing page.
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// Builds the URLs of a CodePlex project's work item pages.
#[derive(Debug, Clone)]
pub struct ProjectUrls {
    project: String,
    base: Url,
}

impl ProjectUrls {
    /// Creates URLs for `https://{project}.codeplex.com`.
    ///
    /// # Errors
    ///
    /// Returns an error if the project name does not form a valid host.
    pub fn new(project: &str) -> Result<Self, url::ParseError> {
        let base = Url::parse(&format!("https://{project}.codeplex.com/"))?;
        Ok(Self {
            project: project.to_string(),
            base,
        })
    }

    /// Creates URLs rooted at an arbitrary base, e.g. a local mirror.
    #[must_use]
    pub fn with_base(project: &str, mut base: Url) -> Self {
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Self {
            project: project.to_string(),
            base,
        }
    }

    /// The CodePlex project name.
    #[must_use]
    pub fn project(&self) -> &str {
        &self.project
    }

    /// The unfiltered advanced listing, which reports the total item count.
    #[must_use]
    pub fn item_count(&self) -> Url {
        self.join("workitem/list/advanced")
    }

    /// One page of the listing with every filter open, sorted by ascending id.
    #[must_use]
    pub fn listing_page(&self, size: u32, page: u32) -> Url {
        let mut url = self.join("workitem/list/advanced");
        url.query_pairs_mut()
            .append_pair("keyword", "")
            .append_pair("status", "All")
            .append_pair("type", "All")
            .append_pair("priority", "All")
            .append_pair("release", "All")
            .append_pair("assignedTo", "All")
            .append_pair("component", "All")
            .append_pair("sortField", "Id")
            .append_pair("sortDirection", "Ascending")
            .append_pair("size", &size.to_string())
            .append_pair("page", &page.to_string());
        url
    }

    /// The detail page of a single work item.
    #[must_use]
    pub fn work_item(&self, id: u32) -> Url {
        self.join(&format!("workitem/{id}"))
    }

    fn join(&self, path: &str) -> Url {
        let mut url = self.base.clone();
        let full = format!("{}{path}", self.base.path());
        url.set_path(&full);
        url
    }
}
