//! Append-only audit log. Write-only sink; core logic never reads it back.

use rusqlite::{params, Connection};

use super::now_rfc3339;
use crate::error::AppError;

pub fn append(
    conn: &Connection,
    user_id: i64,
    event_type: &str,
    payload: Option<serde_json::Value>,
) -> Result<(), AppError> {
    conn.execute(
        "INSERT INTO audit_logs (user_id, event_type, payload, created_at)
         VALUES (?1, ?2, ?3, ?4)",
        params![
            user_id,
            event_type,
            payload.map(|p| p.to_string()),
            now_rfc3339(),
        ],
    )
    .map_err(|e| AppError::Database(format!("Insert failed: {}", e)))?;
    Ok(())
}
