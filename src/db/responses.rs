//! Likert, evidence, and IKIGAI response persistence
//!
//! Likert saves are partitioned by section: saving the core batch must not
//! touch Big Five rows for the same user, and vice versa. The partition is
//! the catalog's item-id set for the section, never the dimension column.

use std::collections::HashSet;

use rusqlite::{params, Connection};

use super::{now_rfc3339, EvidenceRow, IkigaiCircle, IkigaiRow, LikertRow, LikertSection};
use crate::catalog;
use crate::error::AppError;

/// Incoming Likert answer from the wizard.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct LikertInput {
    pub dimension: String,
    pub item_id: String,
    pub value: i64,
    pub reverse_flag: bool,
}

/// Incoming evidence answer.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct EvidenceInput {
    pub dimension: String,
    pub prompt_id: String,
    pub text: String,
}

/// Incoming IKIGAI worksheet entry.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct IkigaiInput {
    pub circle: IkigaiCircle,
    pub text: String,
    pub rank: i64,
}

/// Replace one section's Likert rows for a user.
///
/// Deletes only the rows whose item_id belongs to the section's catalog id
/// set, then inserts the batch. Rows of the other section survive.
pub fn save_likert(
    conn: &mut Connection,
    user_id: i64,
    section: LikertSection,
    items: &[LikertInput],
) -> Result<(), AppError> {
    let section_ids: HashSet<&'static str> = match section {
        LikertSection::Core => catalog::core_item_ids(),
        LikertSection::Bigfive => catalog::big_five_item_ids(),
    };

    let tx = conn
        .transaction()
        .map_err(|e| AppError::Database(format!("Transaction failed: {}", e)))?;

    {
        let mut stmt = tx
            .prepare("DELETE FROM responses_likert WHERE user_id = ?1 AND item_id = ?2")
            .map_err(|e| AppError::Database(format!("Prepare failed: {}", e)))?;
        for item_id in &section_ids {
            stmt.execute(params![user_id, item_id])
                .map_err(|e| AppError::Database(format!("Delete failed: {}", e)))?;
        }

        let now = now_rfc3339();
        let mut insert = tx
            .prepare(
                "INSERT INTO responses_likert (user_id, dimension, item_id, value, reverse_flag, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                 ON CONFLICT(user_id, item_id) DO UPDATE SET
                     dimension = excluded.dimension,
                     value = excluded.value,
                     reverse_flag = excluded.reverse_flag",
            )
            .map_err(|e| AppError::Database(format!("Prepare failed: {}", e)))?;
        for item in items {
            insert
                .execute(params![
                    user_id,
                    item.dimension,
                    item.item_id,
                    item.value,
                    item.reverse_flag as i64,
                    now,
                ])
                .map_err(|e| AppError::Database(format!("Insert failed: {}", e)))?;
        }
    }

    tx.commit()
        .map_err(|e| AppError::Database(format!("Commit failed: {}", e)))
}

/// All Likert rows for a user (both sections).
pub fn likert_responses(conn: &Connection, user_id: i64) -> Result<Vec<LikertRow>, AppError> {
    let mut stmt = conn
        .prepare(
            "SELECT dimension, item_id, value, reverse_flag FROM responses_likert WHERE user_id = ?1",
        )
        .map_err(|e| AppError::Database(format!("Prepare failed: {}", e)))?;

    let rows = stmt
        .query_map(params![user_id], |row| {
            Ok(LikertRow {
                dimension: row.get(0)?,
                item_id: row.get(1)?,
                value: row.get(2)?,
                reverse_flag: row.get::<_, i64>(3)? != 0,
            })
        })
        .map_err(|e| AppError::Database(format!("Query failed: {}", e)))?
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| AppError::Database(format!("Row fetch failed: {}", e)))?;

    Ok(rows)
}

/// Replace all evidence rows for a user.
pub fn save_evidence(
    conn: &mut Connection,
    user_id: i64,
    items: &[EvidenceInput],
) -> Result<(), AppError> {
    let tx = conn
        .transaction()
        .map_err(|e| AppError::Database(format!("Transaction failed: {}", e)))?;

    tx.execute(
        "DELETE FROM responses_evidence WHERE user_id = ?1",
        params![user_id],
    )
    .map_err(|e| AppError::Database(format!("Delete failed: {}", e)))?;

    {
        let now = now_rfc3339();
        let mut insert = tx
            .prepare(
                "INSERT INTO responses_evidence (user_id, dimension, prompt_id, text, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )
            .map_err(|e| AppError::Database(format!("Prepare failed: {}", e)))?;
        for item in items {
            insert
                .execute(params![user_id, item.dimension, item.prompt_id, item.text, now])
                .map_err(|e| AppError::Database(format!("Insert failed: {}", e)))?;
        }
    }

    tx.commit()
        .map_err(|e| AppError::Database(format!("Commit failed: {}", e)))
}

pub fn evidence_responses(conn: &Connection, user_id: i64) -> Result<Vec<EvidenceRow>, AppError> {
    let mut stmt = conn
        .prepare("SELECT dimension, prompt_id, text FROM responses_evidence WHERE user_id = ?1")
        .map_err(|e| AppError::Database(format!("Prepare failed: {}", e)))?;

    let rows = stmt
        .query_map(params![user_id], |row| {
            Ok(EvidenceRow {
                dimension: row.get(0)?,
                prompt_id: row.get(1)?,
                text: row.get(2)?,
            })
        })
        .map_err(|e| AppError::Database(format!("Query failed: {}", e)))?
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| AppError::Database(format!("Row fetch failed: {}", e)))?;

    Ok(rows)
}

/// Replace all IKIGAI worksheet rows for a user.
pub fn save_ikigai(
    conn: &mut Connection,
    user_id: i64,
    items: &[IkigaiInput],
) -> Result<(), AppError> {
    let tx = conn
        .transaction()
        .map_err(|e| AppError::Database(format!("Transaction failed: {}", e)))?;

    tx.execute(
        "DELETE FROM ikigai_items WHERE user_id = ?1",
        params![user_id],
    )
    .map_err(|e| AppError::Database(format!("Delete failed: {}", e)))?;

    {
        let now = now_rfc3339();
        let mut insert = tx
            .prepare(
                "INSERT INTO ikigai_items (user_id, circle, text, rank, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )
            .map_err(|e| AppError::Database(format!("Prepare failed: {}", e)))?;
        for item in items {
            insert
                .execute(params![user_id, item.circle.as_str(), item.text, item.rank, now])
                .map_err(|e| AppError::Database(format!("Insert failed: {}", e)))?;
        }
    }

    tx.commit()
        .map_err(|e| AppError::Database(format!("Commit failed: {}", e)))
}

pub fn ikigai_items(conn: &Connection, user_id: i64) -> Result<Vec<IkigaiRow>, AppError> {
    let mut stmt = conn
        .prepare("SELECT circle, text, rank FROM ikigai_items WHERE user_id = ?1")
        .map_err(|e| AppError::Database(format!("Prepare failed: {}", e)))?;

    let rows = stmt
        .query_map(params![user_id], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?, row.get::<_, i64>(2)?))
        })
        .map_err(|e| AppError::Database(format!("Query failed: {}", e)))?
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| AppError::Database(format!("Row fetch failed: {}", e)))?;

    let mut items = Vec::with_capacity(rows.len());
    for (circle, text, rank) in rows {
        let circle = IkigaiCircle::from_str(&circle)
            .ok_or_else(|| AppError::Database(format!("Unknown IKIGAI circle: {}", circle)))?;
        items.push(IkigaiRow { circle, text, rank });
    }
    Ok(items)
}
