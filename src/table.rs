//! Named, shared rule tables
//!
//! A [`Table`] owns an ordered [`RuleChain`] and an optional name. Tables are
//! shared as [`TableRef`] (`Arc<Table>`) handles: cloning a handle retains the
//! table, dropping it releases it, and the table is freed exactly when the
//! last handle drops, which rules out the use-after-free and double-release
//! class of bugs entirely.
//!
//! A table's identity is its allocation: a connection holding a [`TableRef`]
//! across a reload keeps a valid handle and observes rule-content updates
//! applied through [`Table::swap_rules`] without the handle ever changing.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::TableError;
use crate::rule::{Rule, RuleChain, RuleMatch};

/// Shared handle to a table.
///
/// Clone to retain, drop to release. Any holder keeping a table across a
/// suspension point must hold its own clone for the duration of use.
pub type TableRef = Arc<Table>;

/// A named, ordered collection of host-matching rules.
///
/// Created empty and unshared; the name is assigned at most once with
/// [`Table::accept_arg`]. Rules are appended during construction and compiled
/// by [`Table::init`] before the table serves lookups. Once inserted into a
/// registry the table is shared and only its rule content can change (via
/// [`Table::swap_rules`] during a reload).
///
/// # Example
///
/// ```
/// use rule_tables::{Rule, Table};
///
/// let mut table = Table::new();
/// table.accept_arg("internal").unwrap();
/// table.add_rule(Rule::new(r"\.corp\.example\.com$"));
/// table.init().unwrap();
///
/// assert_eq!(table.name(), Some("internal"));
/// assert!(table.lookup_rule("db.corp.example.com").is_some());
/// ```
pub struct Table {
    /// Table name; `None` marks the default table
    name: Option<String>,

    /// Owned rule chain. The lock exists so the reload-time swap and compile
    /// passes can run against an already shared table.
    rules: RwLock<RuleChain>,
}

impl Table {
    /// Create an empty table with no name.
    #[must_use]
    pub fn new() -> Self {
        Self {
            name: None,
            rules: RwLock::new(RuleChain::new()),
        }
    }

    /// Create an empty table with the given name.
    #[must_use]
    pub fn with_name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            rules: RwLock::new(RuleChain::new()),
        }
    }

    /// Accept the table's name token.
    ///
    /// The first call assigns the name; any later call fails and leaves the
    /// table unchanged.
    ///
    /// # Errors
    ///
    /// Returns `TableError::UnexpectedArgument` if a name is already set.
    pub fn accept_arg(&mut self, token: &str) -> Result<(), TableError> {
        if self.name.is_some() {
            return Err(TableError::UnexpectedArgument(token.to_string()));
        }
        self.name = Some(token.to_string());
        Ok(())
    }

    /// Get the table name, or `None` for the default table.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Check whether this is the default (unnamed) table.
    #[must_use]
    pub const fn is_default(&self) -> bool {
        self.name.is_none()
    }

    /// Append a rule to the table's chain.
    pub fn add_rule(&self, rule: Rule) {
        self.rules.write().add(rule);
    }

    /// Number of rules currently owned by the table.
    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.rules.read().len()
    }

    /// Compile every rule's pattern matcher.
    ///
    /// Must run before the table serves lookups; idempotent for already
    /// compiled rules. Every rule is attempted; rules that fail to compile
    /// stay inert and never match.
    ///
    /// # Errors
    ///
    /// Returns the first `TableError::InvalidPattern` encountered.
    pub fn init(&self) -> Result<(), TableError> {
        self.rules.write().init()
    }

    /// Find the first rule matching a hostname.
    ///
    /// Returns an owned snapshot so no lock is held by the caller.
    #[must_use]
    pub fn lookup_rule(&self, host: &str) -> Option<RuleMatch> {
        self.rules.read().lookup(host).map(|rule| RuleMatch {
            pattern: rule.pattern().to_string(),
        })
    }

    /// Detach and return the first rule with the given pattern source.
    pub fn remove_rule(&self, pattern: &str) -> Option<Rule> {
        self.rules.write().remove(pattern)
    }

    /// Exchange rule chains with another table, in place.
    ///
    /// This is the reload primitive: the surviving table keeps its identity
    /// (every outstanding [`TableRef`] stays valid) while taking ownership of
    /// the other table's rules. A pointer/header exchange, O(1) regardless of
    /// rule count. Self-swap is a no-op.
    ///
    /// Callers serialize reloads; the two write locks are taken together only
    /// here, under the registry owner's exclusive access.
    pub fn swap_rules(&self, other: &Self) {
        if std::ptr::eq(self, other) {
            return;
        }
        let mut ours = self.rules.write();
        let mut theirs = other.rules.write();
        std::mem::swap(&mut *ours, &mut *theirs);
    }

    /// Observable share count for this table.
    ///
    /// Counts the registry's reference (if inserted) plus every external
    /// holder. Useful for diagnostics and tests.
    #[must_use]
    pub fn reference_count(self: &Arc<Self>) -> usize {
        Arc::strong_count(self)
    }
}

impl Default for Table {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Table")
            .field("name", &self.name)
            .field("rules", &self.rules.read().len())
            .finish()
    }
}
