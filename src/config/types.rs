//! Configuration types for rule-tables
//!
//! Configuration is loaded from JSON files and validated before a registry
//! is built from it, so invalid patterns and conflicting table names are
//! rejected at the file boundary rather than during a reload.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Root configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Table definitions
    #[serde(default)]
    pub tables: Vec<TableConfig>,
}

impl Config {
    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ValidationError` if validation fails:
    /// - Empty table name (use the absent name for the default table)
    /// - Duplicate table names, or more than one default table
    /// - Empty or invalid rule patterns
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut names: HashSet<&str> = HashSet::new();
        let mut saw_default = false;

        for table in &self.tables {
            table.validate()?;

            match table.name.as_deref() {
                Some(name) => {
                    if !names.insert(name) {
                        return Err(ConfigError::ValidationError(format!(
                            "Duplicate table name: {name}"
                        )));
                    }
                }
                None => {
                    if saw_default {
                        return Err(ConfigError::ValidationError(
                            "More than one default table configured".into(),
                        ));
                    }
                    saw_default = true;
                }
            }
        }

        Ok(())
    }

    /// Create a default configuration: a single catch-all default table
    #[must_use]
    pub fn default_config() -> Self {
        Self {
            tables: vec![TableConfig {
                name: None,
                rules: vec![".*".into()],
            }],
        }
    }
}

/// A single table definition
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TableConfig {
    /// Table name; omit for the default table
    #[serde(default)]
    pub name: Option<String>,

    /// Host patterns, in match order
    #[serde(default)]
    pub rules: Vec<String>,
}

impl TableConfig {
    /// Validate this table definition
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ValidationError` if the name or a pattern is
    /// invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(name) = &self.name {
            if name.is_empty() {
                return Err(ConfigError::ValidationError(
                    "Table name cannot be empty; omit the name for the default table".into(),
                ));
            }
        }

        for pattern in &self.rules {
            if pattern.is_empty() {
                return Err(ConfigError::ValidationError(format!(
                    "Empty rule pattern in table {:?}",
                    self.name.as_deref().unwrap_or("<default>")
                )));
            }
            if let Err(e) = regex::Regex::new(pattern) {
                return Err(ConfigError::ValidationError(format!(
                    "Invalid rule pattern {pattern:?}: {e}"
                )));
            }
        }

        Ok(())
    }
}
