//! Account identity type.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An opaque account identity.
///
/// Identities are produced by the surrounding wallet/session layer (which
/// authenticates callers); the registry only compares and stores them.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AccountId(String);

impl AccountId {
    /// Create a new account id from a raw string.
    ///
    /// # Panics
    /// Panics if the string is empty.
    pub fn new(raw: impl Into<String>) -> Self {
        let s = raw.into();
        assert!(!s.is_empty(), "account id must not be empty");
        Self(s)
    }

    /// Return the raw identity string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Raw bytes, as fed into commitment hashing.
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for AccountId {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for AccountId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_raw_string() {
        let id = AccountId::new("0xabc123");
        assert_eq!(id.as_str(), "0xabc123");
        assert_eq!(id.to_string(), "0xabc123");
    }

    #[test]
    #[should_panic(expected = "must not be empty")]
    fn empty_id_panics() {
        AccountId::new("");
    }

    #[test]
    fn ids_compare_by_value() {
        assert_eq!(AccountId::new("alice"), AccountId::new("alice"));
        assert_ne!(AccountId::new("alice"), AccountId::new("bob"));
    }
}
