//! Catalog source identifiers.
//!
//! A source id names the catalog document an item was instantiated from.
//! Two stacks of ammunition are "the same type" when they share one.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::DomainError;

/// Maximum length for a catalog reference
const MAX_SOURCE_ID_LENGTH: usize = 500;

/// A validated catalog reference (non-empty, <=500 chars, trimmed)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SourceId(String);

impl SourceId {
    /// Create a new validated source id.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the id is empty after trimming
    /// or exceeds 500 characters.
    pub fn new(id: impl Into<String>) -> Result<Self, DomainError> {
        let id = id.into();
        let trimmed = id.trim();
        if trimmed.is_empty() {
            return Err(DomainError::validation("Source id cannot be empty"));
        }
        if trimmed.len() > MAX_SOURCE_ID_LENGTH {
            return Err(DomainError::validation(format!(
                "Source id cannot exceed {} characters",
                MAX_SOURCE_ID_LENGTH
            )));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Builds a source id from a compile-time constant.
    ///
    /// Only for literals known to be valid; no validation is performed.
    pub(crate) fn from_static(id: &'static str) -> Self {
        Self(id.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for SourceId {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<SourceId> for String {
    fn from(id: SourceId) -> String {
        id.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_whitespace() {
        let id = SourceId::new("  Compendium.pf2e.equipment-srd.Item.bolt ").expect("valid");
        assert_eq!(id.as_str(), "Compendium.pf2e.equipment-srd.Item.bolt");
    }

    #[test]
    fn rejects_empty() {
        assert!(SourceId::new("   ").is_err());
    }

    #[test]
    fn deserialization_validates() {
        let result: Result<SourceId, _> = serde_json::from_str("\"\"");
        assert!(result.is_err());
    }
}
