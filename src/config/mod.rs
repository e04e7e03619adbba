//! Configuration module for rule-tables
//!
//! This module provides configuration types and loading utilities for
//! building a registry from a parsed configuration file.
//!
//! # Example
//!
//! ```no_run
//! use rule_tables::config::{load_config, build_registry};
//!
//! let config = load_config("/etc/rule-tables/config.json").unwrap();
//! let incoming = build_registry(&config).unwrap();
//! ```

mod loader;
mod types;

pub use loader::{
    build_registry, create_default_config, load_config, load_config_str, reload_from_file,
};
pub use types::{Config, TableConfig};
