//! Source reader error types.

use thiserror::Error;

/// Errors that can occur while reading work items from CodePlex.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The HTTP client could not be constructed.
    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// A request failed at the transport level.
    #[error("Request to '{url}' failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-success status.
    #[error("Request to '{url}' returned HTTP {status}")]
    Status { url: String, status: u16 },

    /// A field the migration cannot proceed without was not found.
    #[error("Missing required field '{field}' on '{url}'")]
    MissingField { field: &'static str, url: String },

    /// A numeric field was present but could not be parsed.
    #[error("Invalid {field} '{value}' on '{url}'")]
    InvalidNumber {
        field: &'static str,
        value: String,
        url: String,
    },

    /// A selector could not be built.
    #[error(transparent)]
    Selector(#[from] crate::html::SelectorError),
}
