//! PostgreSQL-backed account store.
//!
//! The chat core never touches this module — accounts are only consulted
//! by the HTTP login/register flow, through two narrow operations:
//! credential verification and lookup by username or email.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use super::models::AccountRecord;
use crate::error::GatewayError;
use crate::security::IdentityClaims;
use crate::security::password::{hash_password, verify_password};

/// Account lookup and credential verification over `sqlx::PgPool`.
#[derive(Debug, Clone)]
pub struct AccountStore {
    pool: PgPool,
}

type AccountRow = (i64, String, String, String, Vec<String>, DateTime<Utc>);

impl AccountStore {
    /// Creates a new account store with the given connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Looks up an account by username or email.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::AccountNotFound`] if no account matches and
    /// [`GatewayError::PersistenceError`] on database failure.
    pub async fn find_by_username_or_email(
        &self,
        text: &str,
    ) -> Result<AccountRecord, GatewayError> {
        let row = sqlx::query_as::<_, AccountRow>(
            "SELECT id, username, email, password_hash, roles, created_at \
             FROM accounts WHERE username = $1 OR email = $1",
        )
        .bind(text)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| GatewayError::PersistenceError(e.to_string()))?;

        row.map(
            |(id, username, email, password_hash, roles, created_at)| AccountRecord {
                id,
                username,
                email,
                password_hash,
                roles,
                created_at,
            },
        )
        .ok_or_else(|| GatewayError::AccountNotFound(text.to_string()))
    }

    /// Verifies a username/email + password pair and returns the identity
    /// claims to sign into a token.
    ///
    /// An unknown account and a wrong password are indistinguishable to
    /// the caller.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidCredentials`] when the pair does not
    /// match and [`GatewayError::PersistenceError`] on database failure.
    pub async fn verify_credentials(
        &self,
        username_or_email: &str,
        password: &str,
    ) -> Result<IdentityClaims, GatewayError> {
        let account = match self.find_by_username_or_email(username_or_email).await {
            Ok(account) => account,
            Err(GatewayError::AccountNotFound(_)) => return Err(GatewayError::InvalidCredentials),
            Err(e) => return Err(e),
        };

        if verify_password(password, &account.password_hash)? {
            Ok(IdentityClaims {
                id: account.id,
                name: account.username,
                authorities: account.roles,
            })
        } else {
            Err(GatewayError::InvalidCredentials)
        }
    }

    /// Registers a new account with a hashed password and default role.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidRequest`] when the username or email
    /// is already taken and [`GatewayError::PersistenceError`] on database
    /// failure.
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<i64, GatewayError> {
        let taken = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM accounts WHERE username = $1 OR email = $2)",
        )
        .bind(username)
        .bind(email)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| GatewayError::PersistenceError(e.to_string()))?;

        if taken {
            return Err(GatewayError::InvalidRequest(
                "username or email already taken".to_string(),
            ));
        }

        let password_hash = hash_password(password)?;

        sqlx::query_scalar::<_, i64>(
            "INSERT INTO accounts (username, email, password_hash, roles) \
             VALUES ($1, $2, $3, $4) RETURNING id",
        )
        .bind(username)
        .bind(email)
        .bind(password_hash)
        .bind(vec!["ROLE_USER".to_string()])
        .fetch_one(&self.pool)
        .await
        .map_err(|e| GatewayError::PersistenceError(e.to_string()))
    }
}
