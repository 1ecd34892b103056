//! Report generation and retrieval
//!
//! Generation requires a complete assessment. Retrieval by user id is
//! ownership-gated: a mismatch and a missing resource produce the identical
//! not-found response, so nothing leaks about other users' resources.

use axum::extract::{Path, State};
use axum::http::header;
use axum::response::IntoResponse;
use axum::Json;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::Serialize;

use super::auth::AuthUser;
use super::AppState;
use crate::db::{audit, choices};
use crate::error::{AppError, Result};
use crate::renderer::{HealthStatus, SupervisorState};
use crate::report::build_report_payload;
use crate::status;

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub success: bool,
    pub pdf_base64: String,
    pub filename: String,
}

/// Build the payload for a user, call the renderer, and audit the result.
async fn render_report(state: &AppState, user: &crate::db::UserRow) -> Result<Vec<u8>> {
    let assessment = state.db.full_assessment(user.id)?;
    let plan = state
        .db
        .with_conn(|conn| choices::plan_90d(conn, user.id))?;
    let payload = build_report_payload(user.name.as_deref(), &assessment, plan.as_ref());

    let pdf = state.renderer.render(&payload).await?;

    state.db.with_conn(|conn| {
        audit::append(
            conn,
            user.id,
            "pdf_generated",
            Some(serde_json::json!({ "size": pdf.len() })),
        )
    })?;

    Ok(pdf)
}

/// POST /api/report/generate
pub async fn generate(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<impl IntoResponse> {
    let progress = status::load_status(&state.db, &user);
    if !progress.all_complete {
        return Err(AppError::Forbidden(
            "Assessment not complete - cannot generate PDF".to_string(),
        ));
    }

    let pdf = render_report(&state, &user).await?;

    let filename = format!(
        "arc-relatorio-{}-{}.pdf",
        user.id,
        chrono::Utc::now().timestamp_millis()
    );

    Ok((
        [
            (header::CACHE_CONTROL, "no-store, no-cache, must-revalidate, private"),
            (header::X_CONTENT_TYPE_OPTIONS, "nosniff"),
            (header::PRAGMA, "no-cache"),
        ],
        Json(GenerateResponse {
            success: true,
            pdf_base64: BASE64.encode(&pdf),
            filename,
        }),
    ))
}

/// GET /api/users/{user_id}/report.pdf
///
/// The caller only ever sees their own report. Any other user id, and any
/// id with no finished assessment behind it, yields the same 404.
pub async fn download(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(user_id): Path<i64>,
) -> Result<impl IntoResponse> {
    if user.id != user_id {
        return Err(AppError::NotFound);
    }

    let progress = status::load_status(&state.db, &user);
    if !progress.all_complete {
        return Err(AppError::NotFound);
    }

    let pdf = render_report(&state, &user).await?;

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"arc-relatorio.pdf\"",
            ),
            (header::CACHE_CONTROL, "no-store"),
            (header::X_CONTENT_TYPE_OPTIONS, "nosniff"),
        ],
        pdf,
    ))
}

#[derive(Debug, Serialize)]
pub struct RendererStatusResponse {
    pub supervisor: SupervisorState,
    pub health: HealthStatus,
}

/// GET /api/renderer/status - observable supervisor state plus a live
/// health classification.
pub async fn renderer_status(State(state): State<AppState>) -> Json<RendererStatusResponse> {
    Json(RendererStatusResponse {
        supervisor: state.supervisor.state().await,
        health: state.renderer.health().await,
    })
}
