//! Domain layer: routing keys and the shared client registry.
//!
//! This module contains the server-side domain model for live
//! connections: the routing key type used to address clients and the
//! process-wide registry mapping keys to writable connection handles.

pub mod client_key;
pub mod client_registry;

pub use client_key::ClientKey;
pub use client_registry::{ClientHandle, ClientRegistry};
