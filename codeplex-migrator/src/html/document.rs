//! Structure-aware queries over parsed pages.

use super::SelectorError;
use scraper::{ElementRef, Html, Selector};

/// Parses a CSS selector.
///
/// # Errors
///
/// Returns [`SelectorError`] if `css` is not a valid selector.
pub fn selector(css: &str) -> Result<Selector, SelectorError> {
    Selector::parse(css).map_err(|e| SelectorError {
        selector: css.to_string(),
        message: e.to_string(),
    })
}

/// A parsed HTML page.
pub struct Document {
    html: Html,
}

impl Document {
    /// Parses a complete HTML document.
    #[must_use]
    pub fn parse(source: &str) -> Self {
        Self {
            html: Html::parse_document(source),
        }
    }

    /// Returns the first element matching `selector`.
    #[must_use]
    pub fn first(&self, selector: &Selector) -> Option<Element<'_>> {
        self.html.select(selector).next().map(Element)
    }

    /// Returns every element matching `selector`, in document order.
    #[must_use]
    pub fn select(&self, selector: &Selector) -> Vec<Element<'_>> {
        self.html.select(selector).map(Element).collect()
    }

    /// Returns the normalized text of the first element matching `selector`.
    #[must_use]
    pub fn text(&self, selector: &Selector) -> Option<String> {
        self.first(selector).map(|element| element.text())
    }
}

/// An element inside a [`Document`].
#[derive(Debug, Clone, Copy)]
pub struct Element<'a>(ElementRef<'a>);

impl<'a> Element<'a> {
    /// Returns the first descendant matching `selector`.
    #[must_use]
    pub fn first(&self, selector: &Selector) -> Option<Element<'a>> {
        self.0.select(selector).next().map(Element)
    }

    /// Returns every descendant matching `selector`.
    #[must_use]
    pub fn select(&self, selector: &Selector) -> Vec<Element<'a>> {
        self.0.select(selector).map(Element).collect()
    }

    /// Returns the decoded text content with whitespace runs collapsed.
    #[must_use]
    pub fn text(&self) -> String {
        let raw: String = self.0.text().collect();
        raw.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    /// Returns the markup of the element's children.
    #[must_use]
    pub fn inner_html(&self) -> String {
        self.0.inner_html()
    }

    /// Returns an attribute value, already entity-decoded.
    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&'a str> {
        self.0.value().attr(name)
    }
}
