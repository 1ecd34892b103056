//! SQLite persistence for assessment responses
//!
//! One connection behind a mutex, WAL mode, versioned schema. All reads and
//! writes are filtered by user id.
//!
//! Save semantics differ per table and are load-bearing:
//! - Likert: partitioned replace, only the saved section's rows are deleted
//! - Evidence, IKIGAI: whole-collection replace per user
//! - Choices, plan: single-row upsert with partial-field merge
//! - Audit log: append-only

pub mod audit;
pub mod choices;
pub mod responses;
pub mod schema;
pub mod users;

use std::path::Path;
use std::sync::Mutex;

use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::AppError;

/// Likert save target: which catalog id set the batch replaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LikertSection {
    Core,
    Bigfive,
}

/// IKIGAI worksheet circle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IkigaiCircle {
    Love,
    GoodAt,
    WorldNeeds,
    PaidFor,
}

impl IkigaiCircle {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Love => "love",
            Self::GoodAt => "good_at",
            Self::WorldNeeds => "world_needs",
            Self::PaidFor => "paid_for",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "love" => Some(Self::Love),
            "good_at" => Some(Self::GoodAt),
            "world_needs" => Some(Self::WorldNeeds),
            "paid_for" => Some(Self::PaidFor),
            _ => None,
        }
    }
}

/// IKIGAI intersection zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IkigaiZone {
    Passion,
    Profession,
    Mission,
    Vocation,
}

impl IkigaiZone {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Passion => "passion",
            Self::Profession => "profession",
            Self::Mission => "mission",
            Self::Vocation => "vocation",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "passion" => Some(Self::Passion),
            "profession" => Some(Self::Profession),
            "mission" => Some(Self::Mission),
            "vocation" => Some(Self::Vocation),
            _ => None,
        }
    }
}

/// Assessment lifecycle state. Transitions only forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssessmentState {
    InProgress,
    Completed,
}

impl AssessmentState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "in_progress" => Some(Self::InProgress),
            "completed" => Some(Self::Completed),
            _ => None,
        }
    }
}

/// User row with consent state.
#[derive(Debug, Clone, Serialize)]
pub struct UserRow {
    pub id: i64,
    pub open_id: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub lgpd_consent_at: Option<String>,
    pub lgpd_consent_version: Option<String>,
}

/// Stored Likert answer.
#[derive(Debug, Clone, Serialize)]
pub struct LikertRow {
    pub dimension: String,
    pub item_id: String,
    pub value: i64,
    pub reverse_flag: bool,
}

/// Stored evidence answer.
#[derive(Debug, Clone, Serialize)]
pub struct EvidenceRow {
    pub dimension: String,
    pub prompt_id: String,
    pub text: String,
}

/// Stored IKIGAI worksheet entry.
#[derive(Debug, Clone, Serialize)]
pub struct IkigaiRow {
    pub circle: IkigaiCircle,
    pub text: String,
    pub rank: i64,
}

/// The single choices row for a user.
#[derive(Debug, Clone, Serialize)]
pub struct ChoiceRow {
    pub chosen_zone: Option<IkigaiZone>,
    pub chosen_focus: Option<String>,
    pub assessment_status: AssessmentState,
    pub completed_at: Option<String>,
}

/// The single 90-day plan row for a user.
#[derive(Debug, Clone, Serialize)]
pub struct PlanRow {
    pub cycle_objective: Option<String>,
    pub checkpoint1_date: Option<String>,
    pub checkpoint2_date: Option<String>,
    pub checkpoint3_date: Option<String>,
    pub selected_70: Vec<String>,
    pub selected_20: Vec<String>,
    pub selected_10: Vec<String>,
}

/// Everything stored for one user, as the review page consumes it.
#[derive(Debug, Clone, Serialize)]
pub struct Assessment {
    pub likert: Vec<LikertRow>,
    pub evidence: Vec<EvidenceRow>,
    pub ikigai: Vec<IkigaiRow>,
    pub choices: Option<ChoiceRow>,
}

/// SQLite database for assessment state
pub struct AssessmentDb {
    conn: Mutex<Connection>,
}

impl AssessmentDb {
    /// Open or create the database
    pub fn open(path: &Path) -> Result<Self, AppError> {
        info!("Opening SQLite database at {:?}", path);

        let conn = Connection::open(path)
            .map_err(|e| AppError::Database(format!("Failed to open SQLite: {}", e)))?;

        // WAL mode for concurrent read performance
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")
            .map_err(|e| AppError::Database(format!("Failed to set PRAGMA: {}", e)))?;

        let db = Self {
            conn: Mutex::new(conn),
        };
        db.init_schema()?;
        Ok(db)
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self, AppError> {
        debug!("Opening in-memory SQLite database");

        let conn = Connection::open_in_memory()
            .map_err(|e| AppError::Database(format!("Failed to open in-memory SQLite: {}", e)))?;

        let db = Self {
            conn: Mutex::new(conn),
        };
        db.init_schema()?;
        Ok(db)
    }

    fn init_schema(&self) -> Result<(), AppError> {
        self.with_conn(|conn| schema::init_schema(conn))
    }

    /// Run a read against the connection
    pub fn with_conn<F, T>(&self, f: F) -> Result<T, AppError>
    where
        F: FnOnce(&Connection) -> Result<T, AppError>,
    {
        let conn = self
            .conn
            .lock()
            .map_err(|e| AppError::Database(format!("Lock poisoned: {}", e)))?;
        f(&conn)
    }

    /// Run a write (transaction-capable) against the connection
    pub fn with_conn_mut<F, T>(&self, f: F) -> Result<T, AppError>
    where
        F: FnOnce(&mut Connection) -> Result<T, AppError>,
    {
        let mut conn = self
            .conn
            .lock()
            .map_err(|e| AppError::Database(format!("Lock poisoned: {}", e)))?;
        f(&mut conn)
    }

    /// Everything stored for a user, in one pass.
    pub fn full_assessment(&self, user_id: i64) -> Result<Assessment, AppError> {
        self.with_conn(|conn| {
            Ok(Assessment {
                likert: responses::likert_responses(conn, user_id)?,
                evidence: responses::evidence_responses(conn, user_id)?,
                ikigai: responses::ikigai_items(conn, user_id)?,
                choices: choices::user_choices(conn, user_id)?,
            })
        })
    }
}

fn now_rfc3339() -> String {
    chrono::Utc::now().to_rfc3339()
}
