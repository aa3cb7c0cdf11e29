//! Database models for the account store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An account row from the `accounts` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountRecord {
    /// Auto-increment account id; becomes the durable routing key once a
    /// connection binds.
    pub id: i64,
    /// Unique username.
    pub username: String,
    /// Unique email address.
    pub email: String,
    /// Argon2id PHC-format password hash.
    pub password_hash: String,
    /// Granted authorities (e.g. `ROLE_USER`), order-preserving.
    pub roles: Vec<String>,
    /// Row creation timestamp.
    pub created_at: DateTime<Utc>,
}
