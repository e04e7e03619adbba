//! Host-matching rules and the owned rule chain
//!
//! A [`Rule`] is a regular-expression host pattern plus a lazily compiled
//! matcher. Rules are created from their pattern source at parse time and
//! compiled later by an explicit [`Rule::init`] pass, so that configurations
//! only pay compilation cost for rules that actually become active.
//!
//! A [`RuleChain`] is the ordered sequence of rules owned by one table.
//! Order is significant: the first matching rule wins.

use regex::Regex;

use crate::error::TableError;

/// A single host-matching rule.
///
/// The pattern is a regular expression matched against a hostname. A rule
/// that has not been compiled (or whose pattern failed to compile) never
/// matches.
///
/// # Example
///
/// ```
/// use rule_tables::Rule;
///
/// let mut rule = Rule::new(r"\.example\.com$");
/// assert!(!rule.matches("www.example.com")); // not compiled yet
///
/// rule.init().unwrap();
/// assert!(rule.matches("www.example.com"));
/// assert!(!rule.matches("example.org"));
/// ```
#[derive(Debug, Clone)]
pub struct Rule {
    /// Pattern source, as written in the configuration
    pattern: String,

    /// Compiled matcher; `None` until [`Rule::init`] succeeds
    matcher: Option<Regex>,
}

impl Rule {
    /// Create a new rule from a pattern source.
    ///
    /// The pattern is not compiled here; call [`Rule::init`] before matching.
    #[must_use]
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            matcher: None,
        }
    }

    /// Get the pattern source.
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Check whether the pattern has been compiled.
    #[must_use]
    pub const fn is_initialized(&self) -> bool {
        self.matcher.is_some()
    }

    /// Compile the pattern matcher.
    ///
    /// Idempotent: an already compiled rule is left untouched. On failure the
    /// rule stays inert (it never matches) and the error is returned.
    ///
    /// # Errors
    ///
    /// Returns `TableError::InvalidPattern` if the pattern is not a valid
    /// regular expression.
    pub fn init(&mut self) -> Result<(), TableError> {
        if self.matcher.is_some() {
            return Ok(());
        }

        match Regex::new(&self.pattern) {
            Ok(re) => {
                self.matcher = Some(re);
                Ok(())
            }
            Err(e) => Err(TableError::invalid_pattern(&self.pattern, e.to_string())),
        }
    }

    /// Match a hostname against this rule.
    ///
    /// Returns `false` for rules that have not been compiled.
    #[must_use]
    pub fn matches(&self, host: &str) -> bool {
        self.matcher.as_ref().is_some_and(|re| re.is_match(host))
    }
}

/// Snapshot of a matched rule, safe to hold after the table lock is released.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleMatch {
    /// Pattern source of the rule that matched
    pub pattern: String,
}

/// Ordered sequence of rules owned by one table.
///
/// Insertion order is preserved and lookups return the first match.
///
/// # Example
///
/// ```
/// use rule_tables::RuleChain;
/// use rule_tables::Rule;
///
/// let mut chain = RuleChain::new();
/// chain.add(Rule::new(r"^api\."));
/// chain.add(Rule::new(r"\.internal$"));
/// chain.init().unwrap();
///
/// assert_eq!(chain.lookup("api.internal").unwrap().pattern(), r"^api\.");
/// assert!(chain.lookup("www.example.com").is_none());
/// ```
#[derive(Debug, Clone, Default)]
pub struct RuleChain {
    rules: Vec<Rule>,
}

impl RuleChain {
    /// Create an empty rule chain.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a rule to the end of the chain.
    pub fn add(&mut self, rule: Rule) {
        self.rules.push(rule);
    }

    /// Compile every rule in the chain.
    ///
    /// Every rule is attempted even if an earlier one fails; rules that fail
    /// to compile are left inert. Idempotent for already compiled rules.
    ///
    /// # Errors
    ///
    /// Returns the first `TableError::InvalidPattern` encountered.
    pub fn init(&mut self) -> Result<(), TableError> {
        let mut first_err = None;
        for rule in &mut self.rules {
            if let Err(e) = rule.init() {
                first_err.get_or_insert(e);
            }
        }
        match first_err {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Find the first rule matching a hostname.
    #[must_use]
    pub fn lookup(&self, host: &str) -> Option<&Rule> {
        self.rules.iter().find(|rule| rule.matches(host))
    }

    /// Detach and return the first rule with the given pattern source.
    pub fn remove(&mut self, pattern: &str) -> Option<Rule> {
        let index = self.rules.iter().position(|r| r.pattern() == pattern)?;
        Some(self.rules.remove(index))
    }

    /// Number of rules in the chain.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Check if the chain is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Iterate over the rules in order.
    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter()
    }
}
