//! Persistence layer: PostgreSQL account storage.
//!
//! Provides the account table the HTTP credential flow reads and writes.
//! The pool is created lazily so the chat core — which never performs
//! database I/O — runs even when PostgreSQL is unreachable.

pub mod accounts;
pub mod models;

pub use accounts::AccountStore;
pub use models::AccountRecord;
