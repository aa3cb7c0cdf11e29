//! Token lifecycle service: issuance, composed verification, revocation.

use std::sync::Arc;

use chrono::Duration;

use crate::error::GatewayError;
use crate::security::{IdentityClaims, IssuedToken, RevocationStore, TokenCodec, VerifiedToken};

/// Composes the stateless [`TokenCodec`] with the [`RevocationStore`].
///
/// Every place that gates access on a token — in-band WebSocket binding
/// and HTTP logout alike — goes through [`AuthService::authenticate`]:
/// the signature/expiry check succeeds AND the `jti` is not revoked, or
/// the caller is treated as unauthenticated.
#[derive(Debug)]
pub struct AuthService {
    codec: TokenCodec,
    revocations: Arc<RevocationStore>,
    token_ttl: Duration,
}

impl AuthService {
    /// Creates a new `AuthService`.
    #[must_use]
    pub fn new(codec: TokenCodec, revocations: Arc<RevocationStore>, token_ttl: Duration) -> Self {
        Self {
            codec,
            revocations,
            token_ttl,
        }
    }

    /// Returns the configured token lifetime.
    #[must_use]
    pub fn token_ttl(&self) -> Duration {
        self.token_ttl
    }

    /// Returns a reference to the shared [`RevocationStore`].
    #[must_use]
    pub fn revocations(&self) -> &Arc<RevocationStore> {
        &self.revocations
    }

    /// Issues a token for `claims` with the configured lifetime.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Internal`] if signing fails, which only
    /// happens on key misconfiguration.
    pub fn issue_token(&self, claims: &IdentityClaims) -> Result<IssuedToken, GatewayError> {
        self.codec
            .issue(claims, self.token_ttl)
            .map_err(|e| GatewayError::Internal(e.to_string()))
    }

    /// Full token check: signature, expiry, and revocation.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Unauthorized`] for malformed, forged, or
    /// expired tokens and [`GatewayError::TokenRevoked`] for tokens whose
    /// `jti` was invalidated by logout.
    pub async fn authenticate(&self, token: &str) -> Result<VerifiedToken, GatewayError> {
        let verified = self.codec.verify(token)?;
        if self.revocations.is_revoked(&verified.jti).await {
            return Err(GatewayError::TokenRevoked);
        }
        Ok(verified)
    }

    /// Invalidates the token carried in an `Authorization` header value.
    ///
    /// Expects the `Bearer <token>` convention. Returns `true` if the
    /// token's `jti` was revoked by this call; `false` for a missing
    /// prefix, an unverifiable token, or a token already revoked.
    pub async fn invalidate(&self, header_token: &str) -> bool {
        let Some(token) = header_token.strip_prefix("Bearer ") else {
            return false;
        };
        let Ok(verified) = self.codec.verify(token) else {
            return false;
        };
        self.revocations
            .revoke(&verified.jti, verified.expires_at)
            .await
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn make_service() -> AuthService {
        AuthService::new(
            TokenCodec::new("unit-test-secret"),
            Arc::new(RevocationStore::new()),
            Duration::hours(1),
        )
    }

    fn make_claims() -> IdentityClaims {
        IdentityClaims {
            id: 42,
            name: "alice".to_string(),
            authorities: vec!["ROLE_USER".to_string()],
        }
    }

    #[tokio::test]
    async fn issued_token_authenticates() {
        let service = make_service();
        let Ok(issued) = service.issue_token(&make_claims()) else {
            panic!("issue failed");
        };

        let result = service.authenticate(&issued.token).await;
        assert!(result.is_ok_and(|v| v.claims.id == 42));
    }

    #[tokio::test]
    async fn revoked_token_is_rejected_even_though_signature_verifies() {
        let service = make_service();
        let Ok(issued) = service.issue_token(&make_claims()) else {
            panic!("issue failed");
        };

        service
            .revocations()
            .revoke(&issued.jti, issued.expires_at)
            .await;

        assert!(matches!(
            service.authenticate(&issued.token).await,
            Err(GatewayError::TokenRevoked)
        ));
    }

    #[tokio::test]
    async fn invalidate_requires_bearer_prefix() {
        let service = make_service();
        let Ok(issued) = service.issue_token(&make_claims()) else {
            panic!("issue failed");
        };

        assert!(!service.invalidate(&issued.token).await);
        assert!(service.invalidate(&format!("Bearer {}", issued.token)).await);
    }

    #[tokio::test]
    async fn second_logout_is_a_no_op() {
        let service = make_service();
        let Ok(issued) = service.issue_token(&make_claims()) else {
            panic!("issue failed");
        };
        let header = format!("Bearer {}", issued.token);

        assert!(service.invalidate(&header).await);
        assert!(!service.invalidate(&header).await);
        assert!(service.revocations().is_revoked(&issued.jti).await);
    }

    #[tokio::test]
    async fn forged_token_does_not_authenticate() {
        let service = make_service();
        let forger = TokenCodec::new("attacker-secret");
        let Ok(forged) = forger.issue(&make_claims(), Duration::hours(1)) else {
            panic!("issue failed");
        };

        assert!(matches!(
            service.authenticate(&forged.token).await,
            Err(GatewayError::Unauthorized(_))
        ));
        assert!(!service.invalidate(&format!("Bearer {}", forged.token)).await);
    }
}
