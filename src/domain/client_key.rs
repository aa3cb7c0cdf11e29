//! Routing key for connected clients.
//!
//! [`ClientKey`] is a newtype wrapper around the string keys used in the
//! [`super::ClientRegistry`]. Two flavors exist for one connection over
//! its lifetime: the ephemeral per-connection key assigned at handshake
//! time, and the durable identity key adopted after token binding.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Routing key under which a connection is registered.
///
/// Ephemeral keys are UUID v4 strings unique for the life of the process;
/// identity keys are the decimal rendering of an account id. Both may map
/// to the same connection at the same time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClientKey(String);

impl ClientKey {
    /// Creates the ephemeral key for a connection from its connection id.
    #[must_use]
    pub fn ephemeral(conn_id: uuid::Uuid) -> Self {
        Self(conn_id.to_string())
    }

    /// Creates the durable identity key for a bound account id.
    #[must_use]
    pub fn identity(account_id: i64) -> Self {
        Self(account_id.to_string())
    }

    /// Wraps an arbitrary key string (e.g. a `targetUserId` from the wire).
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Returns the key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ClientKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for ClientKey {
    fn from(key: String) -> Self {
        Self(key)
    }
}

impl From<&str> for ClientKey {
    fn from(key: &str) -> Self {
        Self(key.to_string())
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn ephemeral_keys_are_unique() {
        let a = ClientKey::ephemeral(uuid::Uuid::new_v4());
        let b = ClientKey::ephemeral(uuid::Uuid::new_v4());
        assert_ne!(a, b);
    }

    #[test]
    fn identity_key_is_decimal_id() {
        let key = ClientKey::identity(42);
        assert_eq!(key.as_str(), "42");
    }

    #[test]
    fn identity_key_survives_large_ids() {
        let key = ClientKey::identity(9_007_199_254_740_993);
        assert_eq!(key.as_str(), "9007199254740993");
    }

    #[test]
    fn hash_works_in_hashmap() {
        use std::collections::HashMap;
        let key = ClientKey::identity(7);
        let mut map = HashMap::new();
        map.insert(key.clone(), "test");
        assert_eq!(map.get(&key), Some(&"test"));
    }

    #[test]
    fn serde_is_transparent() {
        let key = ClientKey::identity(42);
        let json = serde_json::to_string(&key).ok();
        assert_eq!(json.as_deref(), Some("\"42\""));
    }
}
