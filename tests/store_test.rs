//! Response store integration tests
//!
//! Covers the save semantics that differ per table: partitioned Likert
//! replace, whole-collection replace, partial-field upsert, forward-only
//! submission, and the erasure transaction.

use arc_assess::catalog::{BIG_FIVE_ITEMS, CORE_LIKERT_ITEMS};
use arc_assess::db::choices::{self, ChoicesUpdate, PlanUpdate};
use arc_assess::db::responses::{self, EvidenceInput, IkigaiInput, LikertInput};
use arc_assess::db::users;
use arc_assess::db::{
    AssessmentDb, AssessmentState, IkigaiCircle, IkigaiZone, LikertSection, UserRow,
};
use arc_assess::status::{self, ResumeStep};

fn test_db() -> AssessmentDb {
    AssessmentDb::open_in_memory().expect("in-memory db")
}

#[test]
fn test_open_creates_file_database() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("assess.db");

    let db = AssessmentDb::open(&path).expect("file-backed db");
    assert!(path.exists());

    // Schema is usable immediately
    let user = db
        .with_conn_mut(|conn| users::upsert_user(conn, "open-file", None, None))
        .unwrap();
    assert!(user.id > 0);

    // Reopening finds the schema already at the current version
    drop(db);
    let db = AssessmentDb::open(&path).expect("reopen");
    let found = db
        .with_conn(|conn| users::user_by_open_id(conn, "open-file"))
        .unwrap();
    assert!(found.is_some());
}

fn test_user(db: &AssessmentDb) -> UserRow {
    let mut user = db
        .with_conn_mut(|conn| users::upsert_user(conn, "open-1", Some("Ana"), None))
        .unwrap();
    db.with_conn(|conn| users::set_lgpd_consent(conn, user.id, "1.0"))
        .unwrap();
    user.lgpd_consent_at = Some("set".to_string());
    user
}

fn likert_inputs(items: &[arc_assess::catalog::LikertItem], value: i64) -> Vec<LikertInput> {
    items
        .iter()
        .map(|i| LikertInput {
            dimension: i.dimension.to_string(),
            item_id: i.id.to_string(),
            value,
            reverse_flag: i.reverse,
        })
        .collect()
}

#[test]
fn test_core_save_does_not_touch_bigfive_rows() {
    let db = test_db();
    let user = test_user(&db);

    db.with_conn_mut(|conn| {
        responses::save_likert(
            conn,
            user.id,
            LikertSection::Bigfive,
            &likert_inputs(BIG_FIVE_ITEMS, 3),
        )
    })
    .unwrap();

    // Save, then re-save, the core section
    db.with_conn_mut(|conn| {
        responses::save_likert(
            conn,
            user.id,
            LikertSection::Core,
            &likert_inputs(CORE_LIKERT_ITEMS, 4),
        )
    })
    .unwrap();
    db.with_conn_mut(|conn| {
        responses::save_likert(
            conn,
            user.id,
            LikertSection::Core,
            &likert_inputs(&CORE_LIKERT_ITEMS[..10], 5),
        )
    })
    .unwrap();

    let rows = db
        .with_conn(|conn| responses::likert_responses(conn, user.id))
        .unwrap();
    let bigfive_count = rows.iter().filter(|r| r.item_id.starts_with("bf_")).count();
    let core_count = rows.iter().filter(|r| !r.item_id.starts_with("bf_")).count();

    assert_eq!(bigfive_count, 20, "bigfive rows must survive core saves");
    assert_eq!(core_count, 10, "core section fully replaced");
    assert!(rows
        .iter()
        .filter(|r| r.item_id.starts_with("bf_"))
        .all(|r| r.value == 3));
}

#[test]
fn test_bigfive_save_does_not_touch_core_rows() {
    let db = test_db();
    let user = test_user(&db);

    db.with_conn_mut(|conn| {
        responses::save_likert(
            conn,
            user.id,
            LikertSection::Core,
            &likert_inputs(CORE_LIKERT_ITEMS, 4),
        )
    })
    .unwrap();
    db.with_conn_mut(|conn| {
        responses::save_likert(conn, user.id, LikertSection::Bigfive, &[])
    })
    .unwrap();

    let rows = db
        .with_conn(|conn| responses::likert_responses(conn, user.id))
        .unwrap();
    assert_eq!(rows.len(), 40);
}

#[test]
fn test_saving_last_items_flips_completion() {
    let db = test_db();
    let user = test_user(&db);

    db.with_conn_mut(|conn| {
        responses::save_likert(
            conn,
            user.id,
            LikertSection::Core,
            &likert_inputs(&CORE_LIKERT_ITEMS[..38], 4),
        )
    })
    .unwrap();
    db.with_conn_mut(|conn| {
        responses::save_likert(
            conn,
            user.id,
            LikertSection::Bigfive,
            &likert_inputs(BIG_FIVE_ITEMS, 3),
        )
    })
    .unwrap();

    let progress = status::load_status(&db, &user);
    assert_eq!(progress.sections.core_likert.answered, 38);
    assert_eq!(progress.sections.core_likert.total, 40);
    assert!(!progress.sections.core_likert.complete);
    assert!(progress.sections.bigfive.complete);
    assert_eq!(progress.resume_step, ResumeStep::CoreLikert);

    db.with_conn_mut(|conn| {
        responses::save_likert(
            conn,
            user.id,
            LikertSection::Core,
            &likert_inputs(CORE_LIKERT_ITEMS, 4),
        )
    })
    .unwrap();

    let progress = status::load_status(&db, &user);
    assert!(progress.sections.core_likert.complete);
    assert_eq!(progress.sections.bigfive.answered, 20);
}

#[test]
fn test_evidence_replace_all() {
    let db = test_db();
    let user = test_user(&db);

    let first = vec![EvidenceInput {
        dimension: "self_management".to_string(),
        prompt_id: "sm_ev1".to_string(),
        text: "primeira resposta".to_string(),
    }];
    let second = vec![EvidenceInput {
        dimension: "mental_agility".to_string(),
        prompt_id: "ma_ev1".to_string(),
        text: "segunda resposta".to_string(),
    }];

    db.with_conn_mut(|conn| responses::save_evidence(conn, user.id, &first))
        .unwrap();
    db.with_conn_mut(|conn| responses::save_evidence(conn, user.id, &second))
        .unwrap();

    let rows = db
        .with_conn(|conn| responses::evidence_responses(conn, user.id))
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].prompt_id, "ma_ev1");
}

#[test]
fn test_ikigai_replace_all_and_rows_roundtrip() {
    let db = test_db();
    let user = test_user(&db);

    let items = vec![
        IkigaiInput { circle: IkigaiCircle::Love, text: "ensinar".to_string(), rank: 1 },
        IkigaiInput { circle: IkigaiCircle::PaidFor, text: "consultoria".to_string(), rank: 2 },
    ];
    db.with_conn_mut(|conn| responses::save_ikigai(conn, user.id, &items))
        .unwrap();

    let rows = db
        .with_conn(|conn| responses::ikigai_items(conn, user.id))
        .unwrap();
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().any(|r| r.circle == IkigaiCircle::PaidFor));
}

#[test]
fn test_choices_partial_merge() {
    let db = test_db();
    let user = test_user(&db);

    db.with_conn_mut(|conn| {
        choices::save_choices(
            conn,
            user.id,
            &ChoicesUpdate {
                chosen_zone: Some(Some(IkigaiZone::Passion)),
                ..Default::default()
            },
        )
    })
    .unwrap();

    // Updating only the focus must keep the zone
    db.with_conn_mut(|conn| {
        choices::save_choices(
            conn,
            user.id,
            &ChoicesUpdate {
                chosen_focus: Some(Some("liderança técnica".to_string())),
                ..Default::default()
            },
        )
    })
    .unwrap();

    let row = db
        .with_conn(|conn| choices::user_choices(conn, user.id))
        .unwrap()
        .unwrap();
    assert_eq!(row.chosen_zone, Some(IkigaiZone::Passion));
    assert_eq!(row.chosen_focus.as_deref(), Some("liderança técnica"));
    assert_eq!(row.assessment_status, AssessmentState::InProgress);
}

#[test]
fn test_submission_is_forward_only() {
    let db = test_db();
    let user = test_user(&db);

    db.with_conn_mut(|conn| {
        choices::save_choices(
            conn,
            user.id,
            &ChoicesUpdate {
                assessment_status: Some(AssessmentState::Completed),
                ..Default::default()
            },
        )
    })
    .unwrap();

    let row = db
        .with_conn(|conn| choices::user_choices(conn, user.id))
        .unwrap()
        .unwrap();
    assert_eq!(row.assessment_status, AssessmentState::Completed);
    let completed_at = row.completed_at.clone();
    assert!(completed_at.is_some());

    // An in_progress write afterwards must not reverse it
    db.with_conn_mut(|conn| {
        choices::save_choices(
            conn,
            user.id,
            &ChoicesUpdate {
                assessment_status: Some(AssessmentState::InProgress),
                chosen_zone: Some(Some(IkigaiZone::Mission)),
                ..Default::default()
            },
        )
    })
    .unwrap();

    let row = db
        .with_conn(|conn| choices::user_choices(conn, user.id))
        .unwrap()
        .unwrap();
    assert_eq!(row.assessment_status, AssessmentState::Completed);
    assert_eq!(row.completed_at, completed_at);
    assert_eq!(row.chosen_zone, Some(IkigaiZone::Mission));
}

#[test]
fn test_plan_upsert_merge() {
    let db = test_db();
    let user = test_user(&db);

    db.with_conn_mut(|conn| {
        choices::save_plan(
            conn,
            user.id,
            &PlanUpdate {
                cycle_objective: Some(Some("objetivo".to_string())),
                selected_70: Some(vec!["Entregar projeto estratégico".to_string()]),
                ..Default::default()
            },
        )
    })
    .unwrap();

    db.with_conn_mut(|conn| {
        choices::save_plan(
            conn,
            user.id,
            &PlanUpdate {
                checkpoint1_date: Some(Some("2025-02-01".to_string())),
                ..Default::default()
            },
        )
    })
    .unwrap();

    let plan = db
        .with_conn(|conn| choices::plan_90d(conn, user.id))
        .unwrap()
        .unwrap();
    assert_eq!(plan.cycle_objective.as_deref(), Some("objetivo"));
    assert_eq!(plan.checkpoint1_date.as_deref(), Some("2025-02-01"));
    assert_eq!(plan.selected_70, vec!["Entregar projeto estratégico"]);
}

#[test]
fn test_session_roundtrip_and_logout() {
    let db = test_db();
    let user = test_user(&db);

    let token = db
        .with_conn(|conn| users::create_session(conn, user.id))
        .unwrap();
    let resolved = db
        .with_conn(|conn| users::session_user(conn, &token))
        .unwrap();
    assert_eq!(resolved.unwrap().id, user.id);

    db.with_conn(|conn| users::delete_session(conn, &token))
        .unwrap();
    let resolved = db
        .with_conn(|conn| users::session_user(conn, &token))
        .unwrap();
    assert!(resolved.is_none());
}

#[test]
fn test_erasure_removes_all_rows_and_sessions() {
    let db = test_db();
    let user = test_user(&db);

    let token = db
        .with_conn(|conn| users::create_session(conn, user.id))
        .unwrap();
    db.with_conn_mut(|conn| {
        responses::save_likert(
            conn,
            user.id,
            LikertSection::Core,
            &likert_inputs(&CORE_LIKERT_ITEMS[..5], 4),
        )
    })
    .unwrap();
    db.with_conn_mut(|conn| {
        choices::save_plan(
            conn,
            user.id,
            &PlanUpdate {
                selected_10: Some(vec!["Pesquisar tendências do setor".to_string()]),
                ..Default::default()
            },
        )
    })
    .unwrap();

    db.with_conn_mut(|conn| users::delete_user_data(conn, user.id))
        .unwrap();

    assert!(db
        .with_conn(|conn| users::user_by_id(conn, user.id))
        .unwrap()
        .is_none());
    assert!(db
        .with_conn(|conn| users::session_user(conn, &token))
        .unwrap()
        .is_none());
    assert!(db
        .with_conn(|conn| responses::likert_responses(conn, user.id))
        .unwrap()
        .is_empty());
    assert!(db
        .with_conn(|conn| choices::plan_90d(conn, user.id))
        .unwrap()
        .is_none());
}
