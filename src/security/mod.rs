//! Security layer: token signing, revocation, and password hashing.
//!
//! [`TokenCodec`] performs stateless issue/verify of identity tokens;
//! [`RevocationStore`] rejects explicitly invalidated tokens before their
//! natural expiry. The two are composed by the service layer — signature
//! verification stays pure and the revocation check stays swappable.

pub mod password;
pub mod revocation;
pub mod token;

pub use revocation::RevocationStore;
pub use token::{IdentityClaims, IssuedToken, TokenCodec, TokenError, VerifiedToken};
