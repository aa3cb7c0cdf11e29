//! # parley-gateway
//!
//! WebSocket chat gateway with JWT identity binding and token revocation.
//!
//! This crate provides a persistent-connection chat server: WebSocket
//! clients are addressable by an ephemeral per-connection key from the
//! moment they connect, and additionally by their account id once they
//! submit a valid bearer token in-band. Messages route either to one
//! addressed recipient or to every connected client.
//!
//! ## Architecture
//!
//! ```text
//! Clients (HTTP, WebSocket)
//!     │
//!     ├── REST Handlers (api/)          login, logout, register
//!     ├── WS Router (ws/)               per-connection state machine
//!     │
//!     ├── AuthService (service/)        TokenCodec ∘ RevocationStore
//!     ├── ClientRegistry (domain/)      routing key → connection handle
//!     │
//!     ├── TokenCodec, RevocationStore (security/)
//!     └── AccountStore (persistence/)   PostgreSQL
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod persistence;
pub mod security;
pub mod service;
pub mod ws;
