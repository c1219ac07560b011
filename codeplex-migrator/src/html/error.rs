//! Selector error types.

use thiserror::Error;

/// A CSS selector could not be parsed.
#[derive(Debug, Error)]
#[error("Invalid selector '{selector}': {message}")]
pub struct SelectorError {
    /// The selector source text.
    pub selector: String,
    /// Parser message.
    pub message: String,
}
