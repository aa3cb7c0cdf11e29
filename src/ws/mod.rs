//! WebSocket layer: connection handling and message routing.
//!
//! The WebSocket endpoint at `/ws` carries text frames only. A fresh
//! connection is addressable by its ephemeral key immediately; submitting
//! a valid bearer token binds the account id as an additional durable
//! routing key.

pub mod connection;
pub mod handler;
pub mod messages;
