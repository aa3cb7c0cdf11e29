//! Authentication endpoint handlers: login, logout, register.

use axum::extract::State;
use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};

use crate::api::dto::{
    AuthorizeResponse, LoginRequest, LogoutResponse, RegisterRequest, RegisterResponse,
};
use crate::app_state::AppState;
use crate::error::{ErrorResponse, GatewayError};

/// `POST /api/auth/login` — Verify credentials and issue a bearer token.
///
/// # Errors
///
/// Returns [`GatewayError::InvalidCredentials`] when the pair does not
/// match a stored account.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Auth",
    summary = "Log in",
    description = "Verifies a username/email + password pair and returns a signed bearer token.",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Token issued", body = AuthorizeResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse),
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, GatewayError> {
    let claims = state
        .accounts
        .verify_credentials(&req.username, &req.password)
        .await?;
    let username = claims.name.clone();
    let issued = state.auth_service.issue_token(&claims)?;

    tracing::info!(account = claims.id, "login succeeded");

    Ok(Json(AuthorizeResponse {
        token: issued.token,
        expire: issued.expires_at,
        username,
    }))
}

/// `POST /api/auth/logout` — Revoke the bearer token in `Authorization`.
///
/// # Errors
///
/// Returns [`GatewayError::InvalidRequest`] when the header is missing,
/// the token does not verify, or the token was already revoked.
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    tag = "Auth",
    summary = "Log out",
    description = "Revokes the presented token's jti until its natural expiry.",
    responses(
        (status = 200, description = "Token revoked", body = LogoutResponse),
        (status = 400, description = "Logout failed", body = ErrorResponse),
    ),
    security(("bearer_token" = []))
)]
pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, GatewayError> {
    let header_token = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    if state.auth_service.invalidate(header_token).await {
        Ok(Json(LogoutResponse { revoked: true }))
    } else {
        Err(GatewayError::InvalidRequest("logout failed".to_string()))
    }
}

/// `POST /api/auth/register` — Create a new account.
///
/// # Errors
///
/// Returns [`GatewayError::InvalidRequest`] when the username or email is
/// already taken or a field is empty.
#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "Auth",
    summary = "Register an account",
    description = "Creates a new account with an Argon2id-hashed password and default role.",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "Account created", body = RegisterResponse),
        (status = 400, description = "Username or email already taken", body = ErrorResponse),
    )
)]
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<impl IntoResponse, GatewayError> {
    if req.username.is_empty() || req.email.is_empty() || req.password.is_empty() {
        return Err(GatewayError::InvalidRequest(
            "username, email, and password must be non-empty".to_string(),
        ));
    }

    let id = state
        .accounts
        .register(&req.username, &req.email, &req.password)
        .await?;

    tracing::info!(account = id, "account registered");

    Ok(Json(RegisterResponse {
        id,
        username: req.username,
    }))
}

/// Auth routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
        .route("/auth/register", post(register))
}
