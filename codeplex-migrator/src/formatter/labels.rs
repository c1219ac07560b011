//! Mapping of CodePlex fields to GitHub labels.

use crate::codeplex::Issue;
use std::collections::BTreeMap;

/// Label added to every migrated issue unless disabled.
pub const DEFAULT_SOURCE_LABEL: &str = "CodePlex";

/// Closed tables that turn CodePlex fields into GitHub labels.
///
/// Values missing from a table add no label; nothing is inferred.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelRules {
    /// Label identifying migrated issues, if enabled.
    pub source_label: Option<String>,
    /// Work item type to label.
    pub by_type: BTreeMap<String, String>,
    /// Work item impact to label.
    pub by_impact: BTreeMap<String, String>,
}

impl Default for LabelRules {
    fn default() -> Self {
        Self {
            source_label: Some(DEFAULT_SOURCE_LABEL.to_string()),
            by_type: default_type_labels(),
            by_impact: BTreeMap::new(),
        }
    }
}

/// The built-in type table: only feature requests get a label.
#[must_use]
pub fn default_type_labels() -> BTreeMap<String, String> {
    BTreeMap::from([("Feature".to_string(), "enhancement".to_string())])
}

impl LabelRules {
    /// Removes the source label.
    #[must_use]
    pub fn without_source_label(mut self) -> Self {
        self.source_label = None;
        self
    }

    /// Returns the labels for `issue`: source label, type label, impact label.
    #[must_use]
    pub fn labels_for(&self, issue: &Issue) -> Vec<String> {
        let candidates = [
            self.source_label.as_ref(),
            issue.kind.as_ref().and_then(|kind| self.by_type.get(kind)),
            issue
                .impact
                .as_ref()
                .and_then(|impact| self.by_impact.get(impact)),
        ];

        let mut labels: Vec<String> = Vec::new();
        for label in candidates.into_iter().flatten() {
            if !label.is_empty() && !labels.contains(label) {
                labels.push(label.clone());
            }
        }
        labels
    }
}
