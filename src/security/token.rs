//! Stateless signing and verification of identity tokens.
//!
//! [`TokenCodec`] wraps an HS256 key pair derived from the process-wide
//! signing secret. Issue and verify are pure: revocation is a separate
//! concern composed by [`crate::service::AuthService`].

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

/// Identity carried by a token: account id, username, and granted
/// authorities in issuance order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityClaims {
    /// Numeric account id. Round-trips exactly — no precision loss.
    pub id: i64,
    /// Account username.
    pub name: String,
    /// Granted authorities, order-preserving.
    pub authorities: Vec<String>,
}

/// A freshly issued token together with its registered claims.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    /// Compact JWT string.
    pub token: String,
    /// Unique token identifier, used as the revocation key.
    pub jti: String,
    /// Issuance instant.
    pub issued_at: DateTime<Utc>,
    /// Natural expiry instant.
    pub expires_at: DateTime<Utc>,
}

/// The decoded contents of a token that passed signature and expiry
/// checks.
#[derive(Debug, Clone)]
pub struct VerifiedToken {
    /// Identity claims carried by the token.
    pub claims: IdentityClaims,
    /// Unique token identifier.
    pub jti: String,
    /// Issuance instant (second precision).
    pub issued_at: DateTime<Utc>,
    /// Natural expiry instant (second precision).
    pub expires_at: DateTime<Utc>,
}

/// Why a token failed verification.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    /// The token is not a structurally valid JWT.
    #[error("malformed token")]
    Malformed,
    /// The signature does not match the configured key.
    #[error("bad signature")]
    BadSignature,
    /// The token's `exp` is in the past.
    #[error("token expired")]
    Expired,
    /// Signing failed while issuing (key misconfiguration).
    #[error("token signing failed: {0}")]
    Signing(String),
}

/// Wire-format claims as serialized into the JWT payload.
#[derive(Debug, Serialize, Deserialize)]
struct TokenClaims {
    id: i64,
    name: String,
    authorities: Vec<String>,
    iat: i64,
    exp: i64,
    jti: String,
}

/// Signs and verifies identity tokens with a symmetric HS256 key.
///
/// Constructed once at startup from [`crate::config::GatewayConfig`];
/// holds no mutable state and is safe to share.
pub struct TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenCodec").finish_non_exhaustive()
    }
}

impl TokenCodec {
    /// Creates a codec from the shared signing secret.
    #[must_use]
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Exact expiry: a token is invalid the second `exp` passes.
        validation.leeway = 0;
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Issues a signed token for `claims` valid for `ttl` from now.
    ///
    /// Each call generates a fresh `jti` (UUID v4), `iat = now`, and
    /// `exp = now + ttl`.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::Signing`] if encoding fails; with a valid
    /// HS256 key this does not happen in practice.
    pub fn issue(&self, claims: &IdentityClaims, ttl: Duration) -> Result<IssuedToken, TokenError> {
        let issued_at = Utc::now();
        let expires_at = issued_at + ttl;
        let jti = uuid::Uuid::new_v4().to_string();

        let payload = TokenClaims {
            id: claims.id,
            name: claims.name.clone(),
            authorities: claims.authorities.clone(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
            jti: jti.clone(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &payload, &self.encoding)
            .map_err(|e| TokenError::Signing(e.to_string()))?;

        Ok(IssuedToken {
            token,
            jti,
            issued_at,
            expires_at,
        })
    }

    /// Verifies signature and expiry, returning the decoded claims.
    ///
    /// Does not consult the revocation store; callers that gate access
    /// compose this with [`crate::security::RevocationStore::is_revoked`].
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::Expired`] past `exp`,
    /// [`TokenError::BadSignature`] for a signature mismatch, and
    /// [`TokenError::Malformed`] for anything that is not a valid JWT.
    pub fn verify(&self, token: &str) -> Result<VerifiedToken, TokenError> {
        let data = decode::<TokenClaims>(token, &self.decoding, &self.validation).map_err(|e| {
            match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
                jsonwebtoken::errors::ErrorKind::InvalidSignature => TokenError::BadSignature,
                _ => TokenError::Malformed,
            }
        })?;

        let claims = data.claims;
        let issued_at =
            DateTime::from_timestamp(claims.iat, 0).ok_or(TokenError::Malformed)?;
        let expires_at =
            DateTime::from_timestamp(claims.exp, 0).ok_or(TokenError::Malformed)?;

        Ok(VerifiedToken {
            claims: IdentityClaims {
                id: claims.id,
                name: claims.name,
                authorities: claims.authorities,
            },
            jti: claims.jti,
            issued_at,
            expires_at,
        })
    }
}
