//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::domain::ClientRegistry;
use crate::persistence::AccountStore;
use crate::service::AuthService;

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
///
/// Constructed once at server start; every field lives for the process
/// lifetime.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Token lifecycle service (issue, composed verify, revoke).
    pub auth_service: Arc<AuthService>,
    /// Account lookup and credential verification.
    pub accounts: Arc<AccountStore>,
    /// Registry of live WebSocket connections.
    pub registry: Arc<ClientRegistry>,
}
