//! Unified error type for the domain layer.

use thiserror::Error;

/// Unified error type for domain operations
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    /// Validation failed (e.g., invalid field values)
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Parse error (for value objects)
    #[error("Parse error: {0}")]
    Parse(String),

    /// A patch carried a change the target document cannot hold
    #[error("Cannot apply {change} to {item_type} '{item}'")]
    InvalidChange {
        change: &'static str,
        item_type: &'static str,
        item: String,
    },
}

impl DomainError {
    /// Creates a validation error for business rule violations.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Creates a parse error for string-to-type conversion failures.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    pub fn invalid_change(
        change: &'static str,
        item_type: &'static str,
        item: impl Into<String>,
    ) -> Self {
        Self::InvalidChange {
            change,
            item_type,
            item: item.into(),
        }
    }
}
