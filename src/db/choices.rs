//! User choices and 90-day plan rows: one row per user, upsert-in-place
//! with partial-field merge, unlike the replace-all collections.

use rusqlite::{params, Connection, OptionalExtension};

use super::{now_rfc3339, AssessmentState, ChoiceRow, IkigaiZone, PlanRow};
use crate::error::AppError;

/// Partial update of the choices row. `None` fields are left untouched.
/// `chosen_zone` distinguishes "not provided" (`None`) from "clear the zone"
/// (`Some(None)`).
#[derive(Debug, Clone, Default)]
pub struct ChoicesUpdate {
    pub chosen_zone: Option<Option<IkigaiZone>>,
    pub chosen_focus: Option<Option<String>>,
    pub assessment_status: Option<AssessmentState>,
}

/// Upsert the choices row, merging only the provided fields.
///
/// assessment_status moves forward only: once completed, an in_progress
/// update is ignored and completed_at is kept.
pub fn save_choices(
    conn: &mut Connection,
    user_id: i64,
    update: &ChoicesUpdate,
) -> Result<(), AppError> {
    let existing = user_choices(conn, user_id)?;
    let now = now_rfc3339();

    let merged = match existing {
        Some(current) => {
            let status = match update.assessment_status {
                Some(AssessmentState::Completed) => AssessmentState::Completed,
                // in_progress never overwrites completed
                Some(AssessmentState::InProgress) | None => current.assessment_status,
            };
            let completed_at = if status == AssessmentState::Completed {
                current.completed_at.clone().or_else(|| Some(now.clone()))
            } else {
                None
            };
            ChoiceRow {
                chosen_zone: update.chosen_zone.unwrap_or(current.chosen_zone),
                chosen_focus: update
                    .chosen_focus
                    .clone()
                    .unwrap_or(current.chosen_focus),
                assessment_status: status,
                completed_at,
            }
        }
        None => {
            let status = update
                .assessment_status
                .unwrap_or(AssessmentState::InProgress);
            ChoiceRow {
                chosen_zone: update.chosen_zone.unwrap_or(None),
                chosen_focus: update.chosen_focus.clone().unwrap_or(None),
                assessment_status: status,
                completed_at: (status == AssessmentState::Completed).then(|| now.clone()),
            }
        }
    };

    conn.execute(
        "INSERT INTO user_choices (user_id, chosen_zone, chosen_focus, assessment_status, completed_at, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)
         ON CONFLICT(user_id) DO UPDATE SET
             chosen_zone = excluded.chosen_zone,
             chosen_focus = excluded.chosen_focus,
             assessment_status = excluded.assessment_status,
             completed_at = excluded.completed_at,
             updated_at = excluded.updated_at",
        params![
            user_id,
            merged.chosen_zone.map(|z| z.as_str()),
            merged.chosen_focus,
            merged.assessment_status.as_str(),
            merged.completed_at,
            now,
        ],
    )
    .map_err(|e| AppError::Database(format!("Upsert failed: {}", e)))?;

    Ok(())
}

/// The choices row for a user, if any.
pub fn user_choices(conn: &Connection, user_id: i64) -> Result<Option<ChoiceRow>, AppError> {
    let row = conn
        .query_row(
            "SELECT chosen_zone, chosen_focus, assessment_status, completed_at
             FROM user_choices WHERE user_id = ?1",
            params![user_id],
            |row| {
                Ok((
                    row.get::<_, Option<String>>(0)?,
                    row.get::<_, Option<String>>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, Option<String>>(3)?,
                ))
            },
        )
        .optional()
        .map_err(|e| AppError::Database(format!("Query failed: {}", e)))?;

    match row {
        None => Ok(None),
        Some((zone, focus, status, completed_at)) => {
            let assessment_status = AssessmentState::from_str(&status)
                .ok_or_else(|| AppError::Database(format!("Unknown assessment status: {}", status)))?;
            let chosen_zone = match zone {
                None => None,
                Some(z) => Some(
                    IkigaiZone::from_str(&z)
                        .ok_or_else(|| AppError::Database(format!("Unknown zone: {}", z)))?,
                ),
            };
            Ok(Some(ChoiceRow {
                chosen_zone,
                chosen_focus: focus,
                assessment_status,
                completed_at,
            }))
        }
    }
}

/// Partial update of the 90-day plan row.
#[derive(Debug, Clone, Default)]
pub struct PlanUpdate {
    pub cycle_objective: Option<Option<String>>,
    pub checkpoint1_date: Option<Option<String>>,
    pub checkpoint2_date: Option<Option<String>>,
    pub checkpoint3_date: Option<Option<String>>,
    pub selected_70: Option<Vec<String>>,
    pub selected_20: Option<Vec<String>>,
    pub selected_10: Option<Vec<String>>,
}

/// Upsert the plan row, merging only the provided fields.
pub fn save_plan(conn: &mut Connection, user_id: i64, update: &PlanUpdate) -> Result<(), AppError> {
    let existing = plan_90d(conn, user_id)?.unwrap_or(PlanRow {
        cycle_objective: None,
        checkpoint1_date: None,
        checkpoint2_date: None,
        checkpoint3_date: None,
        selected_70: vec![],
        selected_20: vec![],
        selected_10: vec![],
    });

    let merged = PlanRow {
        cycle_objective: update
            .cycle_objective
            .clone()
            .unwrap_or(existing.cycle_objective),
        checkpoint1_date: update
            .checkpoint1_date
            .clone()
            .unwrap_or(existing.checkpoint1_date),
        checkpoint2_date: update
            .checkpoint2_date
            .clone()
            .unwrap_or(existing.checkpoint2_date),
        checkpoint3_date: update
            .checkpoint3_date
            .clone()
            .unwrap_or(existing.checkpoint3_date),
        selected_70: update.selected_70.clone().unwrap_or(existing.selected_70),
        selected_20: update.selected_20.clone().unwrap_or(existing.selected_20),
        selected_10: update.selected_10.clone().unwrap_or(existing.selected_10),
    };

    let now = now_rfc3339();
    conn.execute(
        "INSERT INTO plan_90d (user_id, cycle_objective, checkpoint1_date, checkpoint2_date, checkpoint3_date, selected_70, selected_20, selected_10, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?9)
         ON CONFLICT(user_id) DO UPDATE SET
             cycle_objective = excluded.cycle_objective,
             checkpoint1_date = excluded.checkpoint1_date,
             checkpoint2_date = excluded.checkpoint2_date,
             checkpoint3_date = excluded.checkpoint3_date,
             selected_70 = excluded.selected_70,
             selected_20 = excluded.selected_20,
             selected_10 = excluded.selected_10,
             updated_at = excluded.updated_at",
        params![
            user_id,
            merged.cycle_objective,
            merged.checkpoint1_date,
            merged.checkpoint2_date,
            merged.checkpoint3_date,
            serde_json::to_string(&merged.selected_70)?,
            serde_json::to_string(&merged.selected_20)?,
            serde_json::to_string(&merged.selected_10)?,
            now,
        ],
    )
    .map_err(|e| AppError::Database(format!("Upsert failed: {}", e)))?;

    Ok(())
}

/// The plan row for a user, if any.
pub fn plan_90d(conn: &Connection, user_id: i64) -> Result<Option<PlanRow>, AppError> {
    let row = conn
        .query_row(
            "SELECT cycle_objective, checkpoint1_date, checkpoint2_date, checkpoint3_date, selected_70, selected_20, selected_10
             FROM plan_90d WHERE user_id = ?1",
            params![user_id],
            |row| {
                Ok((
                    row.get::<_, Option<String>>(0)?,
                    row.get::<_, Option<String>>(1)?,
                    row.get::<_, Option<String>>(2)?,
                    row.get::<_, Option<String>>(3)?,
                    row.get::<_, String>(4)?,
                    row.get::<_, String>(5)?,
                    row.get::<_, String>(6)?,
                ))
            },
        )
        .optional()
        .map_err(|e| AppError::Database(format!("Query failed: {}", e)))?;

    match row {
        None => Ok(None),
        Some((objective, cp1, cp2, cp3, sel70, sel20, sel10)) => Ok(Some(PlanRow {
            cycle_objective: objective,
            checkpoint1_date: cp1,
            checkpoint2_date: cp2,
            checkpoint3_date: cp3,
            selected_70: serde_json::from_str(&sel70)?,
            selected_20: serde_json::from_str(&sel20)?,
            selected_10: serde_json::from_str(&sel10)?,
        })),
    }
}
