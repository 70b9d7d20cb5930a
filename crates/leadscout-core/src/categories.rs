use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// One business category to search for, e.g. `{ id: "rest", label:
/// "Restaurants", query: "restaurant" }`.
///
/// `query` is the free text sent upstream; `label` is what leads are tagged
/// with and what status text shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchTarget {
    pub id: String,
    pub label: String,
    pub query: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CategoriesFile {
    pub categories: Vec<SearchTarget>,
}

/// Load and validate the category catalog from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_categories(path: &Path) -> Result<CategoryCatalog, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::CategoriesFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let file: CategoriesFile =
        serde_yaml::from_str(&content).map_err(ConfigError::CategoriesFileParse)?;

    CategoryCatalog::new(file.categories)
}

/// Validated, ordered list of [`SearchTarget`]s.
#[derive(Debug, Clone)]
pub struct CategoryCatalog {
    targets: Vec<SearchTarget>,
}

impl CategoryCatalog {
    /// Builds a catalog, rejecting blank fields and duplicate ids.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` describing the first offending entry.
    pub fn new(targets: Vec<SearchTarget>) -> Result<Self, ConfigError> {
        validate_targets(&targets)?;
        Ok(Self { targets })
    }

    #[must_use]
    pub fn targets(&self) -> &[SearchTarget] {
        &self.targets
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&SearchTarget> {
        self.targets.iter().find(|t| t.id.eq_ignore_ascii_case(id))
    }

    /// Returns the categories a run should cover: every category in
    /// configured order, or just the one named by `target_category_id`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if `target_category_id` names no
    /// configured category.
    pub fn select(
        &self,
        target_category_id: Option<&str>,
    ) -> Result<Vec<SearchTarget>, ConfigError> {
        match target_category_id {
            Some(id) => self
                .get(id)
                .cloned()
                .map(|t| vec![t])
                .ok_or_else(|| ConfigError::Validation(format!("unknown category id: '{id}'"))),
            None => Ok(self.targets.clone()),
        }
    }
}

fn validate_targets(targets: &[SearchTarget]) -> Result<(), ConfigError> {
    let mut seen_ids = HashSet::new();

    for target in targets {
        if target.id.trim().is_empty() {
            return Err(ConfigError::Validation(
                "category id must be non-empty".to_string(),
            ));
        }

        if target.label.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "category '{}' has an empty label",
                target.id
            )));
        }

        if target.query.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "category '{}' has an empty query",
                target.id
            )));
        }

        if !seen_ids.insert(target.id.to_lowercase()) {
            return Err(ConfigError::Validation(format!(
                "duplicate category id: '{}'",
                target.id
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
#[path = "categories_test.rs"]
mod tests;
