//! Concurrent client storage shared by all connection tasks.
//!
//! [`ClientRegistry`] maps routing keys to live connection handles. It is
//! the single piece of shared mutable state in the chat core: one instance
//! is created at server start and passed by `Arc` to every per-connection
//! task.

use std::collections::{HashMap, HashSet};

use tokio::sync::{RwLock, mpsc};

use super::ClientKey;

/// Writable handle to a live WebSocket connection.
///
/// Wraps the unbounded sender feeding the connection's outbound queue plus
/// a connection id used for identity comparison. Cloning is cheap; the
/// registry and routers hold clones, never the connection itself. Sending
/// only enqueues — the owning connection task is the sole writer to the
/// socket, which keeps concurrent sends frame-atomic.
#[derive(Debug, Clone)]
pub struct ClientHandle {
    conn_id: uuid::Uuid,
    sender: mpsc::UnboundedSender<String>,
}

impl ClientHandle {
    /// Creates a handle around the outbound queue of a new connection.
    #[must_use]
    pub fn new(sender: mpsc::UnboundedSender<String>) -> Self {
        Self {
            conn_id: uuid::Uuid::new_v4(),
            sender,
        }
    }

    /// Returns the process-unique id of the underlying connection.
    #[must_use]
    pub fn conn_id(&self) -> uuid::Uuid {
        self.conn_id
    }

    /// Enqueues a text frame for delivery to this connection.
    ///
    /// Returns `false` if the connection task has already shut down; the
    /// frame is dropped in that case and the stale registry entry will be
    /// purged by the connection's own disconnect cleanup.
    pub fn send(&self, frame: impl Into<String>) -> bool {
        self.sender.send(frame.into()).is_ok()
    }
}

/// Central store mapping routing keys to connected clients.
///
/// Uses a `RwLock<HashMap<...>>`: lookups and fan-out snapshots take the
/// read lock concurrently, while `put`/`remove_all` briefly take the write
/// lock. No lock is held across a send — sends only enqueue into the
/// target's channel, so broadcast fan-out cannot stall unrelated
/// connections.
#[derive(Debug, Default)]
pub struct ClientRegistry {
    clients: RwLock<HashMap<ClientKey, ClientHandle>>,
}

impl ClientRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Associates `key` with `handle`, replacing any previous mapping.
    ///
    /// Last writer wins: a reconnect claiming an already-bound identity key
    /// silently supersedes the old mapping without closing the old
    /// connection.
    pub async fn put(&self, key: ClientKey, handle: ClientHandle) {
        self.clients.write().await.insert(key, handle);
    }

    /// Returns the handle registered under `key`, if any.
    pub async fn get(&self, key: &ClientKey) -> Option<ClientHandle> {
        self.clients.read().await.get(key).cloned()
    }

    /// Removes every key currently mapping to the given connection.
    ///
    /// Called exactly once when a connection closes or errors. Returns the
    /// number of keys removed (both the ephemeral key and any bound
    /// identity keys).
    pub async fn remove_all(&self, handle: &ClientHandle) -> usize {
        let mut map = self.clients.write().await;
        let before = map.len();
        map.retain(|_, h| h.conn_id() != handle.conn_id());
        before - map.len()
    }

    /// Returns one handle per distinct connection currently registered.
    ///
    /// A bound connection appears in the map under two keys but must
    /// receive broadcast traffic exactly once, so the snapshot is
    /// deduplicated by connection id.
    pub async fn connections(&self) -> Vec<ClientHandle> {
        let map = self.clients.read().await;
        let mut seen = HashSet::with_capacity(map.len());
        let mut handles = Vec::with_capacity(map.len());
        for handle in map.values() {
            if seen.insert(handle.conn_id()) {
                handles.push(handle.clone());
            }
        }
        handles
    }

    /// Returns the number of registered keys (not distinct connections).
    pub async fn len(&self) -> usize {
        self.clients.read().await.len()
    }

    /// Returns `true` if no client is registered.
    pub async fn is_empty(&self) -> bool {
        self.clients.read().await.is_empty()
    }

    /// Returns the number of distinct connections currently registered.
    pub async fn connection_count(&self) -> usize {
        let map = self.clients.read().await;
        let mut seen = HashSet::with_capacity(map.len());
        for handle in map.values() {
            seen.insert(handle.conn_id());
        }
        seen.len()
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use std::sync::Arc;

    use super::*;

    fn make_handle() -> (ClientHandle, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (ClientHandle::new(tx), rx)
    }

    #[tokio::test]
    async fn put_and_get() {
        let registry = ClientRegistry::new();
        let (handle, _rx) = make_handle();
        let key = ClientKey::ephemeral(handle.conn_id());

        registry.put(key.clone(), handle.clone()).await;

        let found = registry.get(&key).await;
        assert!(found.is_some_and(|h| h.conn_id() == handle.conn_id()));
    }

    #[tokio::test]
    async fn get_unknown_key_returns_none() {
        let registry = ClientRegistry::new();
        assert!(registry.get(&ClientKey::identity(99)).await.is_none());
    }

    #[tokio::test]
    async fn put_overwrites_previous_mapping() {
        let registry = ClientRegistry::new();
        let (old, _old_rx) = make_handle();
        let (new, _new_rx) = make_handle();
        let key = ClientKey::identity(42);

        registry.put(key.clone(), old.clone()).await;
        registry.put(key.clone(), new.clone()).await;

        let found = registry.get(&key).await;
        assert!(found.is_some_and(|h| h.conn_id() == new.conn_id()));
        // The superseded connection is orphaned, not closed.
        assert!(old.send("still alive"));
    }

    #[tokio::test]
    async fn remove_all_purges_every_key() {
        let registry = ClientRegistry::new();
        let (handle, _rx) = make_handle();
        let ephemeral = ClientKey::ephemeral(handle.conn_id());
        let identity = ClientKey::identity(42);

        registry.put(ephemeral.clone(), handle.clone()).await;
        registry.put(identity.clone(), handle.clone()).await;
        assert_eq!(registry.len().await, 2);

        let removed = registry.remove_all(&handle).await;
        assert_eq!(removed, 2);
        assert!(registry.get(&ephemeral).await.is_none());
        assert!(registry.get(&identity).await.is_none());
        assert!(registry.is_empty().await);
    }

    #[tokio::test]
    async fn remove_all_leaves_other_connections() {
        let registry = ClientRegistry::new();
        let (a, _a_rx) = make_handle();
        let (b, _b_rx) = make_handle();
        let key_a = ClientKey::ephemeral(a.conn_id());
        let key_b = ClientKey::ephemeral(b.conn_id());

        registry.put(key_a, a.clone()).await;
        registry.put(key_b.clone(), b.clone()).await;

        registry.remove_all(&a).await;
        assert!(registry.get(&key_b).await.is_some());
    }

    #[tokio::test]
    async fn connections_deduplicates_bound_clients() {
        let registry = ClientRegistry::new();
        let (handle, _rx) = make_handle();
        registry
            .put(ClientKey::ephemeral(handle.conn_id()), handle.clone())
            .await;
        registry.put(ClientKey::identity(42), handle.clone()).await;

        assert_eq!(registry.len().await, 2);
        assert_eq!(registry.connections().await.len(), 1);
        assert_eq!(registry.connection_count().await, 1);
    }

    #[tokio::test]
    async fn concurrent_put_get_remove_is_consistent() {
        let registry = Arc::new(ClientRegistry::new());
        let mut tasks = Vec::new();

        for i in 0..32_i64 {
            let registry = Arc::clone(&registry);
            tasks.push(tokio::spawn(async move {
                let (tx, _rx) = mpsc::unbounded_channel();
                let handle = ClientHandle::new(tx);
                let ephemeral = ClientKey::ephemeral(handle.conn_id());
                let identity = ClientKey::identity(i);

                registry.put(ephemeral.clone(), handle.clone()).await;
                registry.put(identity.clone(), handle.clone()).await;

                // Lookups from other tasks may interleave here.
                assert!(registry.get(&ephemeral).await.is_some());

                let removed = registry.remove_all(&handle).await;
                assert_eq!(removed, 2);
                assert!(registry.get(&ephemeral).await.is_none());
                assert!(registry.get(&identity).await.is_none());
            }));
        }

        for task in tasks {
            let Ok(()) = task.await else {
                panic!("registry task panicked");
            };
        }
        assert!(registry.is_empty().await);
    }
}
