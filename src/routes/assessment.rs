//! Wizard save/get handlers, assessment status, and submit
//!
//! Save endpoints validate ranges and enums before touching the store and
//! append an audit row on success.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Deserializer, Serialize};

use super::auth::AuthUser;
use super::AppState;
use crate::db::choices::{ChoicesUpdate, PlanUpdate};
use crate::db::responses::{EvidenceInput, IkigaiInput, LikertInput};
use crate::db::{audit, choices, responses, users, Assessment, AssessmentState, ChoiceRow, EvidenceRow, IkigaiRow, IkigaiZone, LikertRow, LikertSection, PlanRow};
use crate::error::{AppError, Result};
use crate::status::{self, AssessmentStatus};

#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

fn ok() -> Json<SuccessResponse> {
    Json(SuccessResponse { success: true })
}

/// Distinguishes an absent field from an explicit null in partial updates.
fn double_option<'de, T, D>(de: D) -> std::result::Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(de).map(Some)
}

// ─── LGPD consent ────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ConsentRequest {
    pub version: String,
}

pub async fn lgpd_consent(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(req): Json<ConsentRequest>,
) -> Result<Json<SuccessResponse>> {
    state.db.with_conn(|conn| {
        users::set_lgpd_consent(conn, user.id, &req.version)?;
        audit::append(
            conn,
            user.id,
            "lgpd_consent",
            Some(serde_json::json!({ "version": req.version })),
        )
    })?;
    Ok(ok())
}

// ─── Likert ──────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct SaveLikertRequest {
    pub section: LikertSection,
    pub items: Vec<LikertInput>,
}

pub async fn save_likert(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(req): Json<SaveLikertRequest>,
) -> Result<Json<SuccessResponse>> {
    for item in &req.items {
        if !(1..=5).contains(&item.value) {
            return Err(AppError::BadRequest(format!(
                "Likert value {} out of range 1-5 for item {}",
                item.value, item.item_id
            )));
        }
    }

    let count = req.items.len();
    state.db.with_conn_mut(|conn| {
        responses::save_likert(conn, user.id, req.section, &req.items)
    })?;
    state.db.with_conn(|conn| {
        audit::append(
            conn,
            user.id,
            "likert_saved",
            Some(serde_json::json!({ "section": req.section, "count": count })),
        )
    })?;
    Ok(ok())
}

pub async fn get_likert(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<Vec<LikertRow>>> {
    let rows = state
        .db
        .with_conn(|conn| responses::likert_responses(conn, user.id))?;
    Ok(Json(rows))
}

// ─── Evidence ────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct SaveEvidenceRequest {
    pub items: Vec<EvidenceInput>,
}

pub async fn save_evidence(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(req): Json<SaveEvidenceRequest>,
) -> Result<Json<SuccessResponse>> {
    let count = req.items.len();
    state
        .db
        .with_conn_mut(|conn| responses::save_evidence(conn, user.id, &req.items))?;
    state.db.with_conn(|conn| {
        audit::append(
            conn,
            user.id,
            "evidence_saved",
            Some(serde_json::json!({ "count": count })),
        )
    })?;
    Ok(ok())
}

pub async fn get_evidence(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<Vec<EvidenceRow>>> {
    let rows = state
        .db
        .with_conn(|conn| responses::evidence_responses(conn, user.id))?;
    Ok(Json(rows))
}

// ─── IKIGAI ──────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct SaveIkigaiRequest {
    pub items: Vec<IkigaiInput>,
}

pub async fn save_ikigai(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(req): Json<SaveIkigaiRequest>,
) -> Result<Json<SuccessResponse>> {
    for item in &req.items {
        if !(1..=5).contains(&item.rank) {
            return Err(AppError::BadRequest(format!(
                "IKIGAI rank {} out of range 1-5",
                item.rank
            )));
        }
    }

    let count = req.items.len();
    state
        .db
        .with_conn_mut(|conn| responses::save_ikigai(conn, user.id, &req.items))?;
    state.db.with_conn(|conn| {
        audit::append(
            conn,
            user.id,
            "ikigai_saved",
            Some(serde_json::json!({ "count": count })),
        )
    })?;
    Ok(ok())
}

pub async fn get_ikigai(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<Vec<IkigaiRow>>> {
    let rows = state
        .db
        .with_conn(|conn| responses::ikigai_items(conn, user.id))?;
    Ok(Json(rows))
}

// ─── Choices ─────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct SaveChoicesRequest {
    #[serde(default, deserialize_with = "double_option")]
    pub chosen_zone: Option<Option<IkigaiZone>>,
    #[serde(default, deserialize_with = "double_option")]
    pub chosen_focus: Option<Option<String>>,
    #[serde(default)]
    pub assessment_status: Option<AssessmentState>,
}

pub async fn save_choices(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(req): Json<SaveChoicesRequest>,
) -> Result<Json<SuccessResponse>> {
    let update = ChoicesUpdate {
        chosen_zone: req.chosen_zone,
        chosen_focus: req.chosen_focus,
        assessment_status: req.assessment_status,
    };
    state
        .db
        .with_conn_mut(|conn| choices::save_choices(conn, user.id, &update))?;
    state.db.with_conn(|conn| {
        audit::append(
            conn,
            user.id,
            "choices_saved",
            Some(serde_json::json!({
                "chosen_zone": update.chosen_zone.flatten(),
                "assessment_status": update.assessment_status,
            })),
        )
    })?;
    Ok(ok())
}

pub async fn get_choices(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<Option<ChoiceRow>>> {
    let row = state
        .db
        .with_conn(|conn| choices::user_choices(conn, user.id))?;
    Ok(Json(row))
}

// ─── 90-day plan ─────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct SavePlanRequest {
    #[serde(default, deserialize_with = "double_option")]
    pub cycle_objective: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub checkpoint1_date: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub checkpoint2_date: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub checkpoint3_date: Option<Option<String>>,
    #[serde(default)]
    pub selected_70: Option<Vec<String>>,
    #[serde(default)]
    pub selected_20: Option<Vec<String>>,
    #[serde(default)]
    pub selected_10: Option<Vec<String>>,
}

pub async fn save_plan(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(req): Json<SavePlanRequest>,
) -> Result<Json<SuccessResponse>> {
    let update = PlanUpdate {
        cycle_objective: req.cycle_objective,
        checkpoint1_date: req.checkpoint1_date,
        checkpoint2_date: req.checkpoint2_date,
        checkpoint3_date: req.checkpoint3_date,
        selected_70: req.selected_70,
        selected_20: req.selected_20,
        selected_10: req.selected_10,
    };
    state
        .db
        .with_conn_mut(|conn| choices::save_plan(conn, user.id, &update))?;
    state.db.with_conn(|conn| {
        audit::append(
            conn,
            user.id,
            "plan90d_saved",
            Some(serde_json::json!({
                "selected_70": update.selected_70.as_ref().map(Vec::len),
                "selected_20": update.selected_20.as_ref().map(Vec::len),
                "selected_10": update.selected_10.as_ref().map(Vec::len),
            })),
        )
    })?;
    Ok(ok())
}

pub async fn get_plan(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<Option<PlanRow>>> {
    let row = state
        .db
        .with_conn(|conn| choices::plan_90d(conn, user.id))?;
    Ok(Json(row))
}

// ─── Assessment status and submit ────────────────────────────

pub async fn get_full(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<Assessment>> {
    Ok(Json(state.db.full_assessment(user.id)?))
}

pub async fn get_status(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Json<AssessmentStatus> {
    // Degrades to "nothing answered" when the store is unavailable
    Json(status::load_status(&state.db, &user))
}

/// POST /api/assessment/submit - forward-only transition to completed.
pub async fn submit(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<SuccessResponse>> {
    let update = ChoicesUpdate {
        assessment_status: Some(AssessmentState::Completed),
        ..Default::default()
    };
    state
        .db
        .with_conn_mut(|conn| choices::save_choices(conn, user.id, &update))?;
    state
        .db
        .with_conn(|conn| audit::append(conn, user.id, "assessment_submitted", None))?;
    Ok(ok())
}
