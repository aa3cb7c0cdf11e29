//! Early invalidation of tokens before their natural expiry.
//!
//! [`RevocationStore`] maps a token's `jti` to its natural expiry. An
//! entry makes the token permanently rejected for the remainder of its
//! lifetime even though its signature still verifies; once the token has
//! expired on its own the entry is redundant and is lazily dropped.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

/// In-process revocation store keyed by `jti`.
///
/// Entries carry the revoked token's natural expiry so the store can
/// self-expire: membership checks ignore entries whose expiry has passed,
/// and `revoke` prunes stale entries opportunistically. The interface
/// matches a cache-backed blacklist with per-key TTL, so swapping the
/// backing store does not touch the composed verification path.
#[derive(Debug, Default)]
pub struct RevocationStore {
    revoked: RwLock<HashMap<String, DateTime<Utc>>>,
}

impl RevocationStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if `jti` has been revoked and the corresponding
    /// token has not yet expired naturally.
    pub async fn is_revoked(&self, jti: &str) -> bool {
        self.revoked
            .read()
            .await
            .get(jti)
            .is_some_and(|expires_at| *expires_at > Utc::now())
    }

    /// Revokes `jti` until `expires_at`.
    ///
    /// The retention window is `expires_at - now` clamped to zero: a
    /// token revoked after its natural expiry gains no extra lifetime in
    /// the store. Returns `false` if the `jti` was already revoked
    /// (idempotent no-op), `true` on first revocation.
    pub async fn revoke(&self, jti: &str, expires_at: DateTime<Utc>) -> bool {
        let now = Utc::now();
        let mut map = self.revoked.write().await;
        map.retain(|_, exp| *exp > now);
        if map.contains_key(jti) {
            return false;
        }
        map.insert(jti.to_string(), expires_at.max(now));
        true
    }

    /// Returns the number of live revocation entries.
    pub async fn len(&self) -> usize {
        self.revoked.read().await.len()
    }

    /// Returns `true` if no token is currently revoked.
    pub async fn is_empty(&self) -> bool {
        self.revoked.read().await.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use chrono::Duration;

    use super::*;

    #[tokio::test]
    async fn revoked_jti_is_rejected_until_expiry() {
        let store = RevocationStore::new();
        let jti = "jti-1";
        assert!(!store.is_revoked(jti).await);

        assert!(store.revoke(jti, Utc::now() + Duration::hours(1)).await);
        assert!(store.is_revoked(jti).await);
    }

    #[tokio::test]
    async fn revoke_is_idempotent() {
        let store = RevocationStore::new();
        let expires_at = Utc::now() + Duration::hours(1);

        assert!(store.revoke("jti-2", expires_at).await);
        assert!(!store.revoke("jti-2", expires_at).await);
        assert!(store.is_revoked("jti-2").await);
    }

    #[tokio::test]
    async fn naturally_expired_entry_is_not_revoked() {
        let store = RevocationStore::new();
        // TTL clamps to zero for a token that already expired.
        store.revoke("jti-3", Utc::now() - Duration::hours(1)).await;
        assert!(!store.is_revoked("jti-3").await);
    }

    #[tokio::test]
    async fn stale_entries_are_pruned_on_revoke() {
        let store = RevocationStore::new();
        store.revoke("stale", Utc::now() - Duration::seconds(1)).await;
        store
            .revoke("live", Utc::now() + Duration::hours(1))
            .await;
        assert_eq!(store.len().await, 1);
    }
}
