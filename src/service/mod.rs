//! Service layer: business logic orchestration.
//!
//! [`AuthService`] composes the token codec with the revocation store so
//! every access check in the gateway applies the same rules.

pub mod auth_service;

pub use auth_service::AuthService;
