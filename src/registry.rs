//! The table registry and its reload algorithm
//!
//! A [`Registry`] is the set of tables addressable by name at a given time,
//! indexed for O(1) lookup and removal. The default (unnamed) table is stored
//! in its own slot, which also encodes the at-most-one-default invariant.
//!
//! The registry is not internally synchronized: a single logical owner
//! performs lookups, insertions, and reloads. External holders of a
//! [`TableRef`] may run concurrently with that owner; the handles they hold
//! stay valid across any reload.
//!
//! # Reload
//!
//! [`Registry::reload`] reconciles the active registry with a freshly built
//! incoming one. Tables whose name persists keep their identity and receive
//! the new rule content through an in-place chain swap; tables whose name
//! disappeared are dropped from the registry (and freed once no holder
//! remains); new names are inserted. The incoming registry is consumed.
//!
//! ```
//! use std::sync::Arc;
//! use rule_tables::{Registry, Rule, Table};
//!
//! let mut active = Registry::new();
//! active.insert(Arc::new(Table::with_name("edge")));
//!
//! let held = active.lookup(Some("edge")).unwrap();
//!
//! let mut incoming = Registry::new();
//! let replacement = Table::with_name("edge");
//! replacement.add_rule(Rule::new(r"\.example\.com$"));
//! incoming.insert(Arc::new(replacement));
//!
//! active.reload(incoming);
//!
//! // Same table object, new rules
//! assert!(Arc::ptr_eq(&held, &active.lookup(Some("edge")).unwrap()));
//! assert!(held.lookup_rule("www.example.com").is_some());
//! ```

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::table::TableRef;

/// The set of tables addressable by name.
///
/// Holds exactly one reference per stored table; lookups hand out additional
/// clones to callers. Name matching is exact, and a `None` name addresses
/// only the default table; there is no fallback.
#[derive(Debug, Default)]
pub struct Registry {
    /// Named tables, indexed by name
    named: HashMap<String, TableRef>,

    /// The default table, addressed by the absent name
    default: Option<TableRef>,
}

impl Registry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a table by name and acquire a reference to it.
    ///
    /// `None` matches only the default table. The returned clone is the
    /// caller's retained reference; dropping it releases the table.
    #[must_use]
    pub fn lookup(&self, name: Option<&str>) -> Option<TableRef> {
        match name {
            Some(name) => self.named.get(name).cloned(),
            None => self.default.clone(),
        }
    }

    /// Check whether a table with the given name is present.
    #[must_use]
    pub fn contains(&self, name: Option<&str>) -> bool {
        match name {
            Some(name) => self.named.contains_key(name),
            None => self.default.is_some(),
        }
    }

    /// Insert a table, storing it under its own name.
    ///
    /// An existing entry with the same name is displaced and returned: the
    /// last insert wins. The displaced table stays alive for any external
    /// holders but is no longer reachable through the registry.
    pub fn insert(&mut self, table: TableRef) -> Option<TableRef> {
        let name = table.name().map(str::to_string);
        match name {
            Some(name) => self.named.insert(name, table),
            None => self.default.replace(table),
        }
    }

    /// Unlink a table by name, returning the registry's reference.
    ///
    /// The caller decides what to do with the returned handle; the table may
    /// still be alive via other holders.
    pub fn remove(&mut self, name: Option<&str>) -> Option<TableRef> {
        match name {
            Some(name) => self.named.remove(name),
            None => self.default.take(),
        }
    }

    /// Drop every table from the registry.
    ///
    /// Used for teardown; tables with no external holders are freed here.
    pub fn drain(&mut self) {
        self.named.clear();
        self.default = None;
    }

    /// Number of tables in the registry.
    #[must_use]
    pub fn len(&self) -> usize {
        self.named.len() + usize::from(self.default.is_some())
    }

    /// Check if the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.named.is_empty() && self.default.is_none()
    }

    /// Iterate over the stored tables, in no particular order.
    pub fn tables(&self) -> impl Iterator<Item = &TableRef> {
        self.named.values().chain(self.default.iter())
    }

    /// Reconcile this registry with a freshly built configuration.
    ///
    /// Mutates `self` in place and consumes `incoming`:
    ///
    /// 1. Every active table whose name is absent from `incoming` is
    ///    unlinked. It is freed once no external holder remains.
    /// 2. Every incoming table is compiled, then merged: if the active
    ///    registry holds a table with the same name, the two tables exchange
    ///    rule chains in place: the active table keeps its identity, so
    ///    every outstanding [`TableRef`] to it observes the new rules.
    ///    Otherwise the incoming table is inserted as-is.
    ///
    /// Rule compilation happens here, not at parse time, so only tables in
    /// the surviving configuration pay the cost. A pattern that fails to
    /// compile is logged and left inert; the reload itself cannot fail and
    /// never leaves the registry partially updated.
    pub fn reload(&mut self, incoming: Registry) {
        let Registry {
            named: incoming_named,
            default: incoming_default,
        } = incoming;

        // Unlink tables removed from the new configuration
        self.named.retain(|name, _| {
            let keep = incoming_named.contains_key(name);
            if !keep {
                debug!("Removing table \"{name}\" absent from new configuration");
            }
            keep
        });
        if self.default.is_some() && incoming_default.is_none() {
            debug!("Removing default table absent from new configuration");
            self.default = None;
        }

        // Merge the new configuration's tables
        for table in incoming_named.into_values().chain(incoming_default) {
            if let Err(err) = table.init() {
                warn!("Table {:?}: {err}", table.name());
            }

            match self.lookup(table.name()) {
                Some(existing) => {
                    debug!(
                        "Updating rules for table {:?} in place ({} rules)",
                        existing.name(),
                        table.rule_count()
                    );
                    existing.swap_rules(&table);
                    // `table` now owns the old chain and drops it here
                }
                None => {
                    debug!(
                        "Adding table {:?} ({} rules)",
                        table.name(),
                        table.rule_count()
                    );
                    self.insert(table);
                }
            }
        }

        debug!("Reload complete: {} tables active", self.len());
    }
}
