//! Optional migration configuration file.
//!
//! The file is TOML with kebab-case keys:
//!
//! ```toml
//! source-label = "CodePlex"
//!
//! [type-labels]
//! Feature = "enhancement"
//! Issue = "bug"
//!
//! [impact-labels]
//! High = "priority: high"
//!
//! [templates]
//! header = "Imported from {{url}}"
//! attribution = "{{author}} on {{date}}"
//! ```
//!
//! Every key is optional. Tables replace the built-in defaults rather than
//! extending them.

mod error;

pub use error::ConfigError;

use crate::formatter::{create_handlebars_registry, LabelRules, ProvenanceTemplates};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::info;

/// Parsed configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct MigratorConfig {
    /// Label added to every migrated issue.
    pub source_label: Option<String>,

    /// CodePlex work item type to GitHub label.
    pub type_labels: Option<BTreeMap<String, String>>,

    /// CodePlex impact to GitHub label.
    pub impact_labels: Option<BTreeMap<String, String>>,

    /// Provenance template overrides.
    #[serde(default)]
    pub templates: TemplateOverrides,
}

/// Handlebars overrides for the provenance lines.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct TemplateOverrides {
    /// Issue header template.
    pub header: Option<String>,
    /// Author attribution template.
    pub attribution: Option<String>,
}

impl MigratorConfig {
    /// Loads and validates a configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file is missing, unreadable, not valid
    /// TOML, or fails validation.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let shown = path.display().to_string();
        if !path.exists() {
            return Err(ConfigError::MissingFile { path: shown });
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::IoError {
            path: shown.clone(),
            source: e,
        })?;
        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::TomlError {
            path: shown.clone(),
            source: e,
        })?;

        config.validate(&shown)?;
        info!(path = %shown, "Loaded configuration");
        Ok(config)
    }

    /// Checks that labels are non-empty and templates compile.
    fn validate(&self, path: &str) -> Result<(), ConfigError> {
        let invalid = |message: String| ConfigError::ValidationError {
            path: path.to_string(),
            message,
        };

        if self.source_label.as_deref().is_some_and(|l| l.trim().is_empty()) {
            return Err(invalid("source-label must not be empty".to_string()));
        }

        let tables = [
            ("type-labels", &self.type_labels),
            ("impact-labels", &self.impact_labels),
        ];
        for (table, labels) in tables {
            let empty = labels
                .iter()
                .flatten()
                .find(|(_, label)| label.trim().is_empty());
            if let Some((value, _)) = empty {
                return Err(invalid(format!("{table} maps '{value}' to an empty label")));
            }
        }

        create_handlebars_registry(&self.provenance_templates())
            .map_err(|e| invalid(format!("invalid template: {e}")))?;
        Ok(())
    }

    /// Label rules with this file's overrides applied.
    ///
    /// `with_source_label` set to false drops the source label regardless of
    /// the file.
    #[must_use]
    pub fn label_rules(&self, with_source_label: bool) -> LabelRules {
        let mut rules = LabelRules::default();
        if let Some(label) = &self.source_label {
            rules.source_label = Some(label.clone());
        }
        if let Some(by_type) = &self.type_labels {
            rules.by_type = by_type.clone();
        }
        if let Some(by_impact) = &self.impact_labels {
            rules.by_impact = by_impact.clone();
        }
        if with_source_label {
            rules
        } else {
            rules.without_source_label()
        }
    }

    /// Provenance templates with this file's overrides applied.
    #[must_use]
    pub fn provenance_templates(&self) -> ProvenanceTemplates {
        let defaults = ProvenanceTemplates::default();
        ProvenanceTemplates {
            header: self.templates.header.clone().unwrap_or(defaults.header),
            attribution: self
                .templates
                .attribution
                .clone()
                .unwrap_or(defaults.attribution),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formatter::{DEFAULT_HEADER_TEMPLATE, DEFAULT_SOURCE_LABEL};
    use std::fs;
    use tempfile::TempDir;

    fn write_config(dir: &TempDir, content: &str) -> std::path::PathBuf {
        let path = dir.path().join("migrator.toml");
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn can_load_full_config() {
        let temp = TempDir::new().unwrap();
        let path = write_config(
            &temp,
            r#"
source-label = "from-codeplex"

[type-labels]
Issue = "bug"

[impact-labels]
High = "priority"

[templates]
header = "Imported from {{url}}"
"#,
        );

        let config = MigratorConfig::load(&path).unwrap();
        let rules = config.label_rules(true);

        assert_eq!(rules.source_label.as_deref(), Some("from-codeplex"));
        assert_eq!(rules.by_type.get("Issue").map(String::as_str), Some("bug"));
        assert!(!rules.by_type.contains_key("Feature"));
        assert_eq!(rules.by_impact.get("High").map(String::as_str), Some("priority"));

        let templates = config.provenance_templates();
        assert_eq!(templates.header, "Imported from {{url}}");
        assert_eq!(templates.attribution, ProvenanceTemplates::default().attribution);
    }

    #[test]
    fn empty_config_keeps_defaults() {
        let temp = TempDir::new().unwrap();
        let path = write_config(&temp, "");

        let config = MigratorConfig::load(&path).unwrap();

        assert_eq!(config.label_rules(true), LabelRules::default());
        assert_eq!(config.provenance_templates().header, DEFAULT_HEADER_TEMPLATE);
    }

    #[test]
    fn source_label_can_be_disabled() {
        let config = MigratorConfig::default();

        assert_eq!(
            config.label_rules(true).source_label.as_deref(),
            Some(DEFAULT_SOURCE_LABEL)
        );
        assert_eq!(config.label_rules(false).source_label, None);
    }

    #[test]
    fn missing_file() {
        let temp = TempDir::new().unwrap();
        let result = MigratorConfig::load(&temp.path().join("nope.toml"));

        assert!(matches!(result, Err(ConfigError::MissingFile { .. })));
    }

    #[test]
    fn errors_name_the_configuration_file() {
        let temp = TempDir::new().unwrap();
        let path = write_config(&temp, "[templates]\nattribution = \"{{/if}}\"\n");

        let message = MigratorConfig::load(&path).unwrap_err().to_string();
        assert!(message.starts_with("Rejected migrator configuration"));
        assert!(message.contains("migrator.toml"));
    }

    #[test]
    fn invalid_toml() {
        let temp = TempDir::new().unwrap();
        let path = write_config(&temp, "source-label = ");

        assert!(matches!(
            MigratorConfig::load(&path),
            Err(ConfigError::TomlError { .. })
        ));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let temp = TempDir::new().unwrap();
        let path = write_config(&temp, "source-lable = \"typo\"");

        assert!(matches!(
            MigratorConfig::load(&path),
            Err(ConfigError::TomlError { .. })
        ));
    }

    #[test]
    fn empty_label_is_rejected() {
        let temp = TempDir::new().unwrap();
        let path = write_config(&temp, "[type-labels]\nFeature = \"  \"\n");

        let result = MigratorConfig::load(&path);
        assert!(matches!(result, Err(ConfigError::ValidationError { .. })));
    }

    #[test]
    fn broken_template_is_rejected() {
        let temp = TempDir::new().unwrap();
        let path = write_config(&temp, "[templates]\nheader = \"{{#if url}}\"\n");

        let result = MigratorConfig::load(&path);
        assert!(matches!(result, Err(ConfigError::ValidationError { .. })));
    }
}
