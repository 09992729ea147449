use std::collections::HashSet;
use std::time::Duration;

use serde::{
    Deserialize,
    Serialize,
};
use thiserror::Error;

use crate::schema::{
    ValidationError,
    format_validation_errors,
};

/// Settings file looked up in the workspace root.
pub const CONFIG_FILE_NAME: &str = ".translation-manager.json";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration validation failed:\n{}", format_validation_errors(.0))]
    ValidationErrors(Vec<ValidationError>),

    #[error("Failed to load configuration file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ManagerSettings {
    /// Identity recorded as `updatedBy` on edits.
    pub current_user: String,

    pub latency: LatencyConfig,
    pub stale_time: StaleTimeConfig,

    /// Category choices offered by the category filter.
    pub categories: Vec<String>,
}

/// Injected latency of the in-memory data source, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LatencyConfig {
    pub search_ms: u64,
    pub update_ms: u64,
    pub detail_ms: u64,
    pub locales_ms: u64,
}

impl Default for LatencyConfig {
    fn default() -> Self {
        Self { search_ms: 300, update_ms: 300, detail_ms: 300, locales_ms: 200 }
    }
}

/// How long cached query results count as fresh, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StaleTimeConfig {
    pub search_ms: u64,
    pub detail_ms: u64,
    pub locales_ms: u64,
}

impl Default for StaleTimeConfig {
    fn default() -> Self {
        Self { search_ms: 30_000, detail_ms: 30_000, locales_ms: 5 * 60 * 1000 }
    }
}

impl StaleTimeConfig {
    #[must_use]
    pub const fn search(&self) -> Duration {
        Duration::from_millis(self.search_ms)
    }

    #[must_use]
    pub const fn detail(&self) -> Duration {
        Duration::from_millis(self.detail_ms)
    }

    #[must_use]
    pub const fn locales(&self) -> Duration {
        Duration::from_millis(self.locales_ms)
    }
}

impl ManagerSettings {
    /// # Errors
    /// - `currentUser` is blank
    /// - A category is empty or listed twice
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if self.current_user.trim().is_empty() {
            errors.push(ValidationError::new(
                "currentUser",
                "The current user cannot be empty. Example: \"translator@example.com\"",
            ));
        }

        let mut seen = HashSet::new();
        for (index, category) in self.categories.iter().enumerate() {
            if category.is_empty() {
                errors.push(ValidationError::new(
                    format!("categories[{index}]"),
                    "Category names cannot be empty",
                ));
            } else if !seen.insert(category.as_str()) {
                errors.push(ValidationError::new(
                    format!("categories[{index}]"),
                    format!("Duplicate category '{category}'"),
                ));
            }
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

impl Default for ManagerSettings {
    fn default() -> Self {
        Self {
            current_user: "current@user.com".to_string(),
            latency: LatencyConfig::default(),
            stale_time: StaleTimeConfig::default(),
            categories: ["buttons", "forms", "navigation", "messages"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}
