//! Database schema definitions

use rusqlite::Connection;
use tracing::info;

use crate::error::AppError;

/// Current schema version for migrations
pub const SCHEMA_VERSION: i32 = 1;

/// Initialize the database schema
pub fn init_schema(conn: &Connection) -> Result<(), AppError> {
    let current_version = get_schema_version(conn)?;

    if current_version == 0 {
        info!("Creating new database schema v{}", SCHEMA_VERSION);
        create_tables(conn)?;
        set_schema_version(conn, SCHEMA_VERSION)?;
    } else if current_version < SCHEMA_VERSION {
        info!(
            "Migrating schema from v{} to v{}",
            current_version, SCHEMA_VERSION
        );
        migrate_schema(conn, current_version)?;
    }

    Ok(())
}

/// Get current schema version (0 if not initialized)
fn get_schema_version(conn: &Connection) -> Result<i32, AppError> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL)",
        [],
    )
    .map_err(|e| AppError::Database(format!("Failed to create schema_version table: {}", e)))?;

    let version: i32 = conn
        .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
            row.get(0)
        })
        .unwrap_or(0);

    Ok(version)
}

fn set_schema_version(conn: &Connection, version: i32) -> Result<(), AppError> {
    conn.execute("DELETE FROM schema_version", [])
        .map_err(|e| AppError::Database(format!("Failed to clear schema_version: {}", e)))?;
    conn.execute(
        "INSERT INTO schema_version (version) VALUES (?1)",
        [version],
    )
    .map_err(|e| AppError::Database(format!("Failed to set schema_version: {}", e)))?;
    Ok(())
}

fn create_tables(conn: &Connection) -> Result<(), AppError> {
    conn.execute_batch(TABLES_SCHEMA)
        .map_err(|e| AppError::Database(format!("Failed to create tables: {}", e)))?;
    Ok(())
}

fn migrate_schema(conn: &Connection, from_version: i32) -> Result<(), AppError> {
    // Migration steps land here as the schema evolves
    let _ = from_version;
    set_schema_version(conn, SCHEMA_VERSION)?;
    Ok(())
}

const TABLES_SCHEMA: &str = r#"
-- Users: identity plus LGPD consent state
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    open_id TEXT NOT NULL UNIQUE,
    name TEXT,
    email TEXT,
    lgpd_consent_at TEXT,
    lgpd_consent_version TEXT,
    created_at TEXT NOT NULL,
    last_signed_in TEXT NOT NULL
);

-- Bearer sessions; deleted on logout and on erasure
CREATE TABLE IF NOT EXISTS sessions (
    token TEXT PRIMARY KEY NOT NULL,
    user_id INTEGER NOT NULL,
    created_at TEXT NOT NULL
);

-- Likert answers, both agility and Big Five sections.
-- The section split lives in the catalog item-id sets, not in this table.
CREATE TABLE IF NOT EXISTS responses_likert (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER NOT NULL,
    dimension TEXT NOT NULL,
    item_id TEXT NOT NULL,
    value INTEGER NOT NULL,
    reverse_flag INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL,
    UNIQUE(user_id, item_id)
);

CREATE TABLE IF NOT EXISTS responses_evidence (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER NOT NULL,
    dimension TEXT NOT NULL,
    prompt_id TEXT NOT NULL,
    text TEXT NOT NULL,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS ikigai_items (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER NOT NULL,
    circle TEXT NOT NULL,
    text TEXT NOT NULL,
    rank INTEGER NOT NULL,
    created_at TEXT NOT NULL
);

-- One row per user, partial-field upsert
CREATE TABLE IF NOT EXISTS user_choices (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER NOT NULL UNIQUE,
    chosen_zone TEXT,
    chosen_focus TEXT,
    assessment_status TEXT NOT NULL DEFAULT 'in_progress',
    completed_at TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

-- One row per user, partial-field upsert
CREATE TABLE IF NOT EXISTS plan_90d (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER NOT NULL UNIQUE,
    cycle_objective TEXT,
    checkpoint1_date TEXT,
    checkpoint2_date TEXT,
    checkpoint3_date TEXT,
    selected_70 TEXT NOT NULL DEFAULT '[]',
    selected_20 TEXT NOT NULL DEFAULT '[]',
    selected_10 TEXT NOT NULL DEFAULT '[]',
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

-- Append-only compliance sink; never read by core logic
CREATE TABLE IF NOT EXISTS audit_logs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER NOT NULL,
    event_type TEXT NOT NULL,
    payload TEXT,
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_likert_user ON responses_likert(user_id);
CREATE INDEX IF NOT EXISTS idx_evidence_user ON responses_evidence(user_id);
CREATE INDEX IF NOT EXISTS idx_ikigai_user ON ikigai_items(user_id);
CREATE INDEX IF NOT EXISTS idx_audit_user ON audit_logs(user_id);
CREATE INDEX IF NOT EXISTS idx_sessions_user ON sessions(user_id);
"#;
