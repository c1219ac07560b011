//! Provenance line templates.

use super::FormatError;
use handlebars::{no_escape, Handlebars};

pub(crate) const HEADER: &str = "header";
pub(crate) const ATTRIBUTION: &str = "attribution";

/// Default first line of every migrated issue.
///
/// Variables: `url`, `id`, `project`, `title`.
pub const DEFAULT_HEADER_TEMPLATE: &str = "**This issue was imported from [CodePlex]({{url}})**";

/// Default line crediting the author of the description or a comment.
///
/// Variables: `author`, `profile_url` (empty for anonymous entries), `date`,
/// `time`, `timestamp`.
pub const DEFAULT_ATTRIBUTION_TEMPLATE: &str = "{{#if profile_url}}**[{{author}}]({{profile_url}})**{{else}}**Unknown user**{{/if}} wrote {{date}} at {{time}}";

/// Handlebars sources for the provenance lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvenanceTemplates {
    /// Issue header template.
    pub header: String,
    /// Author attribution template.
    pub attribution: String,
}

impl Default for ProvenanceTemplates {
    fn default() -> Self {
        Self {
            header: DEFAULT_HEADER_TEMPLATE.to_string(),
            attribution: DEFAULT_ATTRIBUTION_TEMPLATE.to_string(),
        }
    }
}

/// Creates a Handlebars registry holding the provenance templates.
///
/// The registry is configured with:
/// - No HTML escaping (output is Markdown)
/// - Strict mode (catches misspelled variables)
///
/// # Errors
///
/// Returns [`FormatError::RegistrationError`] if a template does not compile.
pub fn create_handlebars_registry(
    templates: &ProvenanceTemplates,
) -> Result<Handlebars<'static>, FormatError> {
    let mut hbs = Handlebars::new();
    hbs.register_escape_fn(no_escape);
    hbs.set_strict_mode(true);
    hbs.register_template_string(HEADER, &templates.header)?;
    hbs.register_template_string(ATTRIBUTION, &templates.attribution)?;
    Ok(hbs)
}
