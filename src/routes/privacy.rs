//! LGPD right-to-erasure endpoint

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use super::auth::AuthSession;
use super::AppState;
use crate::db::{audit, users};
use crate::error::Result;

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub deleted: bool,
}

/// DELETE /api/me/data
///
/// Removes every row belonging to the caller in one transaction, sessions
/// included. The audit trail keeps the deletion event itself.
pub async fn delete_my_data(
    State(state): State<AppState>,
    session: AuthSession,
) -> Result<Json<DeleteResponse>> {
    let user_id = session.user.id;

    state.db.with_conn(|conn| {
        audit::append(
            conn,
            user_id,
            "user_data_deleted",
            Some(serde_json::json!({
                "requested_at": chrono::Utc::now().to_rfc3339()
            })),
        )
    })?;

    state
        .db
        .with_conn_mut(|conn| users::delete_user_data(conn, user_id))?;

    Ok(Json(DeleteResponse { deleted: true }))
}
