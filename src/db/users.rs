//! User identity, sessions, consent, and the erasure transaction.
//!
//! Identity arrives from an external login flow; this module only upserts
//! the user row and hands out opaque bearer tokens.

use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use super::{now_rfc3339, UserRow};
use crate::error::AppError;

/// Insert or update a user by open_id, returning the stored row.
pub fn upsert_user(
    conn: &mut Connection,
    open_id: &str,
    name: Option<&str>,
    email: Option<&str>,
) -> Result<UserRow, AppError> {
    let now = now_rfc3339();
    conn.execute(
        "INSERT INTO users (open_id, name, email, created_at, last_signed_in)
         VALUES (?1, ?2, ?3, ?4, ?4)
         ON CONFLICT(open_id) DO UPDATE SET
             name = COALESCE(excluded.name, users.name),
             email = COALESCE(excluded.email, users.email),
             last_signed_in = excluded.last_signed_in",
        params![open_id, name, email, now],
    )
    .map_err(|e| AppError::Database(format!("Upsert failed: {}", e)))?;

    user_by_open_id(conn, open_id)?
        .ok_or_else(|| AppError::Database("User vanished after upsert".to_string()))
}

pub fn user_by_open_id(conn: &Connection, open_id: &str) -> Result<Option<UserRow>, AppError> {
    query_user(
        conn,
        "SELECT id, open_id, name, email, lgpd_consent_at, lgpd_consent_version
         FROM users WHERE open_id = ?1",
        params![open_id],
    )
}

pub fn user_by_id(conn: &Connection, user_id: i64) -> Result<Option<UserRow>, AppError> {
    query_user(
        conn,
        "SELECT id, open_id, name, email, lgpd_consent_at, lgpd_consent_version
         FROM users WHERE id = ?1",
        params![user_id],
    )
}

fn query_user(
    conn: &Connection,
    sql: &str,
    params: impl rusqlite::Params,
) -> Result<Option<UserRow>, AppError> {
    conn.query_row(sql, params, |row| {
        Ok(UserRow {
            id: row.get(0)?,
            open_id: row.get(1)?,
            name: row.get(2)?,
            email: row.get(3)?,
            lgpd_consent_at: row.get(4)?,
            lgpd_consent_version: row.get(5)?,
        })
    })
    .optional()
    .map_err(|e| AppError::Database(format!("Query failed: {}", e)))
}

/// Record LGPD consent with its policy version.
pub fn set_lgpd_consent(
    conn: &Connection,
    user_id: i64,
    version: &str,
) -> Result<(), AppError> {
    conn.execute(
        "UPDATE users SET lgpd_consent_at = ?1, lgpd_consent_version = ?2 WHERE id = ?3",
        params![now_rfc3339(), version, user_id],
    )
    .map_err(|e| AppError::Database(format!("Update failed: {}", e)))?;
    Ok(())
}

/// Issue a new session token for a user.
pub fn create_session(conn: &Connection, user_id: i64) -> Result<String, AppError> {
    let token = Uuid::new_v4().to_string();
    conn.execute(
        "INSERT INTO sessions (token, user_id, created_at) VALUES (?1, ?2, ?3)",
        params![token, user_id, now_rfc3339()],
    )
    .map_err(|e| AppError::Database(format!("Insert failed: {}", e)))?;
    Ok(token)
}

/// Resolve a session token to its user, if the session is live.
pub fn session_user(conn: &Connection, token: &str) -> Result<Option<UserRow>, AppError> {
    query_user(
        conn,
        "SELECT u.id, u.open_id, u.name, u.email, u.lgpd_consent_at, u.lgpd_consent_version
         FROM sessions s JOIN users u ON u.id = s.user_id
         WHERE s.token = ?1",
        params![token],
    )
}

pub fn delete_session(conn: &Connection, token: &str) -> Result<(), AppError> {
    conn.execute("DELETE FROM sessions WHERE token = ?1", params![token])
        .map_err(|e| AppError::Database(format!("Delete failed: {}", e)))?;
    Ok(())
}

/// Erase every row belonging to a user, in one transaction, sessions
/// included. Audit rows are kept: the deletion event itself must remain
/// traceable.
pub fn delete_user_data(conn: &mut Connection, user_id: i64) -> Result<(), AppError> {
    let tx = conn
        .transaction()
        .map_err(|e| AppError::Database(format!("Transaction failed: {}", e)))?;

    for sql in [
        "DELETE FROM responses_likert WHERE user_id = ?1",
        "DELETE FROM responses_evidence WHERE user_id = ?1",
        "DELETE FROM ikigai_items WHERE user_id = ?1",
        "DELETE FROM user_choices WHERE user_id = ?1",
        "DELETE FROM plan_90d WHERE user_id = ?1",
        "DELETE FROM sessions WHERE user_id = ?1",
        "DELETE FROM users WHERE id = ?1",
    ] {
        tx.execute(sql, params![user_id])
            .map_err(|e| AppError::Database(format!("Delete failed: {}", e)))?;
    }

    tx.commit()
        .map_err(|e| AppError::Database(format!("Commit failed: {}", e)))
}
