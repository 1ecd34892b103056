//! Session handling
//!
//! Identity arrives from an external login flow; this module upserts the
//! user row, hands out opaque bearer tokens, and resolves them back to
//! users on every request.

use async_trait::async_trait;
use axum::extract::{FromRequestParts, State};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::Json;
use serde::{Deserialize, Serialize};

use super::AppState;
use crate::db::{users, UserRow};
use crate::error::{AppError, Result};

/// The authenticated caller, resolved from the bearer token.
pub struct AuthUser(pub UserRow);

/// The raw bearer token alongside the caller (logout needs it).
pub struct AuthSession {
    pub user: UserRow,
    pub token: String,
}

fn bearer_token(parts: &Parts) -> Option<String> {
    parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::to_string)
}

#[async_trait]
impl FromRequestParts<AppState> for AuthSession {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self> {
        let token = bearer_token(parts)
            .ok_or_else(|| AppError::Unauthorized("Missing bearer token".to_string()))?;
        let user = state
            .db
            .with_conn(|conn| users::session_user(conn, &token))?
            .ok_or_else(|| AppError::Unauthorized("Invalid or expired session".to_string()))?;
        Ok(AuthSession { user, token })
    }
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self> {
        let session = AuthSession::from_request_parts(parts, state).await?;
        Ok(AuthUser(session.user))
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateSessionRequest {
    pub open_id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CreateSessionResponse {
    pub token: String,
    pub user: UserRow,
}

/// POST /api/auth/session - upsert the user and issue a bearer token.
pub async fn create_session(
    State(state): State<AppState>,
    Json(req): Json<CreateSessionRequest>,
) -> Result<Json<CreateSessionResponse>> {
    if req.open_id.trim().is_empty() {
        return Err(AppError::BadRequest("open_id must not be empty".to_string()));
    }

    let user = state.db.with_conn_mut(|conn| {
        users::upsert_user(conn, &req.open_id, req.name.as_deref(), req.email.as_deref())
    })?;
    let token = state
        .db
        .with_conn(|conn| users::create_session(conn, user.id))?;

    Ok(Json(CreateSessionResponse { token, user }))
}

/// GET /api/auth/me
pub async fn me(session: Option<AuthSession>) -> Json<Option<UserRow>> {
    Json(session.map(|s| s.user))
}

#[derive(Debug, Serialize)]
pub struct LogoutResponse {
    pub success: bool,
}

/// POST /api/auth/logout
pub async fn logout(
    State(state): State<AppState>,
    session: AuthSession,
) -> Result<Json<LogoutResponse>> {
    state
        .db
        .with_conn(|conn| users::delete_session(conn, &session.token))?;
    Ok(Json(LogoutResponse { success: true }))
}
