//! Configuration loading and registry construction
//!
//! This module handles loading configuration from files and turning a parsed
//! configuration into an incoming registry for [`Registry::reload`].

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info};

use super::types::Config;
use crate::error::{ConfigError, Result, TableError};
use crate::registry::Registry;
use crate::rule::Rule;
use crate::table::Table;

/// Load configuration from a JSON file
///
/// # Arguments
///
/// * `path` - Path to the configuration file
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read or parsed.
pub fn load_config(path: impl AsRef<Path>) -> std::result::Result<Config, ConfigError> {
    let path = path.as_ref();

    debug!("Loading configuration from {:?}", path);

    if !path.exists() {
        return Err(ConfigError::FileNotFound {
            path: path.display().to_string(),
        });
    }

    let contents = std::fs::read_to_string(path)?;

    let config: Config = serde_json::from_str(&contents)
        .map_err(|e| ConfigError::ParseError(format!("Failed to parse JSON: {e} at {path:?}")))?;

    config.validate()?;

    info!("Configuration loaded: {} tables", config.tables.len());

    Ok(config)
}

/// Load configuration from a JSON string
///
/// # Errors
///
/// Returns `ConfigError` if parsing or validation fails.
pub fn load_config_str(json: &str) -> std::result::Result<Config, ConfigError> {
    let config: Config =
        serde_json::from_str(json).map_err(|e| ConfigError::ParseError(e.to_string()))?;

    config.validate()?;

    Ok(config)
}

/// Build an incoming registry from a parsed configuration
///
/// Tables are created empty, given their rules in configuration order, and
/// named through the single name token. Rule patterns are not compiled here;
/// that happens during the reload, once the table set is final.
///
/// # Errors
///
/// Returns `TableError` if a table rejects its name token.
pub fn build_registry(config: &Config) -> std::result::Result<Registry, TableError> {
    let mut registry = Registry::new();

    for table_config in &config.tables {
        let mut table = Table::new();
        if let Some(name) = &table_config.name {
            table.accept_arg(name)?;
        }
        for pattern in &table_config.rules {
            table.add_rule(Rule::new(pattern));
        }
        registry.insert(Arc::new(table));
    }

    Ok(registry)
}

/// Reload the active registry from a configuration file
///
/// Loads and validates the file, builds the incoming registry, and
/// reconciles the active registry against it. This is the entry point for
/// the reconfiguration-signal path.
///
/// # Errors
///
/// Returns an error if the file cannot be loaded or a table cannot be
/// built. The active registry is untouched in that case: reload only runs
/// once the incoming registry is fully constructed.
pub fn reload_from_file(active: &mut Registry, path: impl AsRef<Path>) -> Result<()> {
    let config = load_config(&path)?;
    let incoming = build_registry(&config)?;

    active.reload(incoming);

    info!(
        "Reloaded {} tables from {:?}",
        active.len(),
        path.as_ref()
    );

    Ok(())
}

/// Create a default configuration file at the given path
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be written.
pub fn create_default_config(path: impl AsRef<Path>) -> std::result::Result<(), ConfigError> {
    let config = Config::default_config();
    let json = serde_json::to_string_pretty(&config)
        .map_err(|e| ConfigError::ParseError(format!("Failed to serialize config: {e}")))?;

    std::fs::write(path, json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_temp_config(json: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_config() {
        let file = write_temp_config(
            r#"{"tables": [{"name": "a", "rules": ["^www\\."]}, {"rules": [".*"]}]}"#,
        );
        let config = load_config(file.path()).unwrap();
        assert_eq!(config.tables.len(), 2);
    }

    #[test]
    fn test_load_config_file_not_found() {
        let result = load_config("/nonexistent/path/config.json");
        assert!(matches!(result, Err(ConfigError::FileNotFound { .. })));
    }

    #[test]
    fn test_load_config_invalid_json() {
        let result = load_config_str("not valid json");
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_load_config_rejects_invalid_pattern() {
        let result = load_config_str(r#"{"tables": [{"name": "t", "rules": ["[broken"]}]}"#);
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_build_registry() {
        let config =
            load_config_str(r#"{"tables": [{"name": "a", "rules": ["x", "y"]}, {"rules": []}]}"#)
                .unwrap();
        let registry = build_registry(&config).unwrap();

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.lookup(Some("a")).unwrap().rule_count(), 2);
        assert!(registry.lookup(None).is_some());
    }

    #[test]
    fn test_reload_from_file() {
        let mut active = Registry::new();

        let file = write_temp_config(r#"{"tables": [{"name": "a", "rules": ["^api\\."]}]}"#);
        reload_from_file(&mut active, file.path()).unwrap();

        let table = active.lookup(Some("a")).unwrap();
        assert!(table.lookup_rule("api.example.com").is_some());

        // A second reload keeps the table's identity
        let file = write_temp_config(r#"{"tables": [{"name": "a", "rules": ["^db\\."]}]}"#);
        reload_from_file(&mut active, file.path()).unwrap();

        assert!(Arc::ptr_eq(&table, &active.lookup(Some("a")).unwrap()));
        assert!(table.lookup_rule("db.example.com").is_some());
        assert!(table.lookup_rule("api.example.com").is_none());
    }

    #[test]
    fn test_reload_from_file_leaves_active_untouched_on_error() {
        let mut active = Registry::new();
        let file = write_temp_config(r#"{"tables": [{"name": "keep", "rules": []}]}"#);
        reload_from_file(&mut active, file.path()).unwrap();

        let result = reload_from_file(&mut active, "/nonexistent/config.json");
        assert!(result.is_err());
        assert!(active.lookup(Some("keep")).is_some());
    }

    #[test]
    fn test_create_default_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        create_default_config(&path).unwrap();
        let config = load_config(&path).unwrap();
        assert!(config.tables[0].name.is_none());
    }
}
