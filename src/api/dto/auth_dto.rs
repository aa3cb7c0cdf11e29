//! Request/response DTOs for the authentication endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Login request body.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct LoginRequest {
    /// Username or email address.
    pub username: String,
    /// Plaintext password.
    pub password: String,
}

/// Successful login response carrying the bearer token.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AuthorizeResponse {
    /// Signed bearer token for `Authorization: Bearer <token>` and
    /// in-band WebSocket binding.
    pub token: String,
    /// Natural expiry of the token.
    pub expire: DateTime<Utc>,
    /// Username the token was issued for.
    pub username: String,
}

/// Registration request body.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct RegisterRequest {
    /// Desired unique username.
    pub username: String,
    /// Unique email address.
    pub email: String,
    /// Plaintext password; stored as an Argon2id hash.
    pub password: String,
}

/// Successful registration response.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RegisterResponse {
    /// Id of the newly created account.
    pub id: i64,
    /// Registered username.
    pub username: String,
}

/// Successful logout response.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LogoutResponse {
    /// Always `true`; failures are reported as error responses.
    pub revoked: bool,
}
