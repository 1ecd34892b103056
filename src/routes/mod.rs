//! HTTP API surface
//!
//! Handlers for the wizard's save/get/status/submit operations, report
//! generation, and the LGPD endpoints. Every handler runs against the
//! authenticated caller's own rows.

pub mod assessment;
pub mod auth;
pub mod privacy;
pub mod report;

use std::sync::Arc;

use axum::response::IntoResponse;
use axum::routing::{delete, get, post};
use axum::Router;

use crate::db::AssessmentDb;
use crate::renderer::{RendererClient, RendererSupervisor};

/// Shared state for all handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<AssessmentDb>,
    pub renderer: RendererClient,
    pub supervisor: Arc<RendererSupervisor>,
}

/// Build the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/auth/session", post(auth::create_session))
        .route("/api/auth/me", get(auth::me))
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/lgpd/consent", post(assessment::lgpd_consent))
        .route("/api/likert/save", post(assessment::save_likert))
        .route("/api/likert", get(assessment::get_likert))
        .route("/api/evidence/save", post(assessment::save_evidence))
        .route("/api/evidence", get(assessment::get_evidence))
        .route("/api/ikigai/save", post(assessment::save_ikigai))
        .route("/api/ikigai", get(assessment::get_ikigai))
        .route("/api/choices/save", post(assessment::save_choices))
        .route("/api/choices", get(assessment::get_choices))
        .route("/api/plan90d/save", post(assessment::save_plan))
        .route("/api/plan90d", get(assessment::get_plan))
        .route("/api/assessment/full", get(assessment::get_full))
        .route("/api/assessment/status", get(assessment::get_status))
        .route("/api/assessment/submit", post(assessment::submit))
        .route("/api/report/generate", post(report::generate))
        .route("/api/users/:user_id/report.pdf", get(report::download))
        .route("/api/renderer/status", get(report::renderer_status))
        .route("/api/me/data", delete(privacy::delete_my_data))
        .with_state(state)
}

/// Liveness probe for the service itself.
async fn health() -> impl IntoResponse {
    "OK"
}
