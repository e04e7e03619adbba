//! Error types for rule-tables
//!
//! This module defines the error hierarchy for the table registry.
//! All errors are categorized by subsystem and include recovery hints.

use std::io;

use thiserror::Error;

/// Top-level error type for rule-tables
#[derive(Debug, Error)]
pub enum RuleTablesError {
    /// Table construction and rule compilation errors
    #[error("Table error: {0}")]
    Table(#[from] TableError),

    /// Configuration errors (file parsing, validation)
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// I/O errors not covered by other categories
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl RuleTablesError {
    /// Check if this error is recoverable (can retry operation)
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Table(e) => e.is_recoverable(),
            Self::Config(_) => false,
            Self::Io(e) => matches!(
                e.kind(),
                io::ErrorKind::TimedOut | io::ErrorKind::Interrupted | io::ErrorKind::WouldBlock
            ),
        }
    }
}

/// Table construction errors
#[derive(Debug, Error)]
pub enum TableError {
    /// A second name token was supplied for a table that already has one
    #[error("Unexpected table argument: {0}")]
    UnexpectedArgument(String),

    /// A rule pattern failed to compile
    #[error("Invalid rule pattern {pattern:?}: {reason}")]
    InvalidPattern { pattern: String, reason: String },
}

impl TableError {
    /// Table errors indicate a bad configuration token and are not
    /// recoverable without user intervention
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        false
    }

    /// Create an invalid pattern error
    pub fn invalid_pattern(pattern: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidPattern {
            pattern: pattern.into(),
            reason: reason.into(),
        }
    }
}

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File not found or inaccessible
    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },

    /// JSON parsing error
    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    /// Validation error (invalid values, duplicate table names)
    #[error("Configuration validation failed: {0}")]
    ValidationError(String),

    /// I/O error while reading config
    #[error("I/O error reading configuration: {0}")]
    IoError(#[from] io::Error),
}

impl ConfigError {
    /// Config errors are generally not recoverable without user intervention
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        false
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::ValidationError(msg.into())
    }
}

/// Type alias for Result with `RuleTablesError`
pub type Result<T> = std::result::Result<T, RuleTablesError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_recovery_classification() {
        let table_err = TableError::UnexpectedArgument("extra".into());
        assert!(!table_err.is_recoverable());

        let config_err = ConfigError::validation("duplicate table name");
        assert!(!config_err.is_recoverable());

        let io_err = io::Error::new(io::ErrorKind::TimedOut, "timeout");
        let err: RuleTablesError = io_err.into();
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_error_display() {
        let err = TableError::UnexpectedArgument("second-name".into());
        assert!(err.to_string().contains("second-name"));

        let err = TableError::invalid_pattern("[broken", "unclosed character class");
        let msg = err.to_string();
        assert!(msg.contains("[broken"));
        assert!(msg.contains("unclosed character class"));

        let err = ConfigError::FileNotFound {
            path: "/etc/rule-tables/config.json".into(),
        };
        assert!(err.to_string().contains("/etc/rule-tables/config.json"));
    }

    #[test]
    fn test_error_conversion() {
        let table_err = TableError::UnexpectedArgument("extra".into());
        let err: RuleTablesError = table_err.into();
        assert!(!err.is_recoverable());
        assert!(matches!(err, RuleTablesError::Table(_)));

        let config_err = ConfigError::ParseError("bad json".into());
        let err: RuleTablesError = config_err.into();
        assert!(matches!(err, RuleTablesError::Config(_)));
    }
}
