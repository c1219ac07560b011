//! Formatter error types.

/// Errors that can occur while formatting an issue for GitHub.
#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    /// Handlebars rendering error.
    #[error("Template rendering error: {0}")]
    RenderError(#[from] handlebars::RenderError),

    /// Template registration error.
    #[error("Template registration error: {0}")]
    RegistrationError(#[from] handlebars::TemplateError),
}
