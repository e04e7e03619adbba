//! rule-tables: named rule-table registry with identity-preserving hot reload
//!
//! This crate implements the rule-table registry used by a proxy/router to
//! organize named groups of host-matching rules and to reconfigure them in
//! place while connections currently referencing a table continue to run
//! unaffected.
//!
//! # Architecture
//!
//! ```text
//! Config file → load_config → build_registry → incoming Registry
//!                                                    ↓
//! Connection → Registry::lookup → TableRef     Registry::reload
//!                  (retained handle)          (identity-preserving)
//! ```
//!
//! A [`Table`] owns an ordered chain of rules; the [`Registry`] indexes
//! tables by name, with the unnamed table acting as the default. Tables are
//! shared as [`TableRef`] handles (`Arc<Table>`): cloning retains, dropping
//! releases, and a table is freed exactly when its last handle drops.
//!
//! [`Registry::reload`] reconciles the active registry with a freshly built
//! one: tables whose name persists keep their identity and receive the new
//! rule content through an O(1) in-place chain swap, so handles held by
//! in-flight connections stay valid and observe the update; tables removed
//! from the configuration become unreachable and are freed once unheld.
//!
//! # Quick Start
//!
//! ```
//! use std::sync::Arc;
//! use rule_tables::{Registry, Rule, Table};
//!
//! // Build the active registry
//! let mut active = Registry::new();
//! let table = Table::with_name("internal");
//! table.add_rule(Rule::new(r"\.corp\.example\.com$"));
//! table.init().unwrap();
//! active.insert(Arc::new(table));
//!
//! // A connection resolves its governing table and retains it
//! let handle = active.lookup(Some("internal")).unwrap();
//! assert!(handle.lookup_rule("db.corp.example.com").is_some());
//!
//! // Reconfigure: same name, new rules, same table identity
//! let mut incoming = Registry::new();
//! let replacement = Table::with_name("internal");
//! replacement.add_rule(Rule::new(r"\.lan\.example\.com$"));
//! incoming.insert(Arc::new(replacement));
//! active.reload(incoming);
//!
//! assert!(handle.lookup_rule("db.lan.example.com").is_some());
//! assert!(handle.lookup_rule("db.corp.example.com").is_none());
//! ```
//!
//! # Modules
//!
//! - [`config`]: Configuration types, loading, and registry construction
//! - [`error`]: Error types
//! - [`registry`]: The registry and its reload algorithm
//! - [`rule`]: Host-matching rules and the owned rule chain
//! - [`table`]: Table lifecycle and shared handles

#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod config;
pub mod error;
pub mod registry;
pub mod rule;
pub mod table;

// Re-export commonly used types at the crate root
pub use config::{build_registry, load_config, load_config_str, Config, TableConfig};
pub use error::{ConfigError, Result, RuleTablesError, TableError};
pub use registry::Registry;
pub use rule::{Rule, RuleChain, RuleMatch};
pub use table::{Table, TableRef};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
