//! Assessment progress derivation
//!
//! Computes per-section completion, overall completion, and the wizard step
//! to resume at, purely from stored rows plus the catalog. No side effects.
//!
//! Section completeness is row-count vs catalog total; there is no partial
//! credit. The core/bigfive split is decided by item-id membership in the
//! catalog sets; the dimension tag on a row is not trusted for it.

use std::collections::HashSet;

use serde::Serialize;
use tracing::warn;

use crate::catalog;
use crate::db::{
    responses, users, Assessment, AssessmentDb, AssessmentState, ChoiceRow, EvidenceRow,
    IkigaiCircle, IkigaiRow, IkigaiZone, LikertRow, UserRow,
};

/// Counted progress of a Likert or evidence section.
#[derive(Debug, Clone, Serialize)]
pub struct SectionProgress {
    pub answered: usize,
    pub total: usize,
    pub complete: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConsentProgress {
    pub complete: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct CircleProgress {
    pub circle: IkigaiCircle,
    pub count: usize,
    pub complete: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct IkigaiProgress {
    pub circles: Vec<CircleProgress>,
    pub complete: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ZoneProgress {
    pub chosen: Option<IkigaiZone>,
    pub complete: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct Sections {
    pub lgpd: ConsentProgress,
    pub core_likert: SectionProgress,
    pub core_evidence: SectionProgress,
    pub bigfive: SectionProgress,
    pub ikigai: IkigaiProgress,
    pub zone: ZoneProgress,
}

/// Wizard step the UI should land the user on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResumeStep {
    Welcome,
    CoreLikert,
    CoreEvidence,
    Bigfive,
    Ikigai,
    Review,
    Submitted,
}

#[derive(Debug, Clone, Serialize)]
pub struct AssessmentStatus {
    pub sections: Sections,
    pub resume_step: ResumeStep,
    pub assessment_status: AssessmentState,
    pub all_complete: bool,
}

/// Derive the full status for one user from stored rows.
pub fn compute_status(user: &UserRow, assessment: &Assessment) -> AssessmentStatus {
    let lgpd = ConsentProgress {
        complete: user.lgpd_consent_at.is_some(),
    };

    let core_likert = likert_progress(&assessment.likert, &catalog::core_item_ids());
    let bigfive = likert_progress(&assessment.likert, &catalog::big_five_item_ids());
    let core_evidence = evidence_progress(&assessment.evidence);
    let ikigai = ikigai_progress(&assessment.ikigai);
    let zone = zone_progress(assessment.choices.as_ref());

    // Deliberate asymmetry: lgpd and plan90d gate entry/exit, not completion
    let all_complete = core_likert.complete
        && core_evidence.complete
        && bigfive.complete
        && ikigai.complete
        && zone.complete;

    let assessment_status = assessment
        .choices
        .as_ref()
        .map(|c| c.assessment_status)
        .unwrap_or(AssessmentState::InProgress);

    // Fixed priority chain, first unmet requirement wins. A submitted
    // assessment is terminal regardless of the chain.
    let resume_step = if assessment_status == AssessmentState::Completed {
        ResumeStep::Submitted
    } else if !lgpd.complete {
        ResumeStep::Welcome
    } else if !core_likert.complete {
        ResumeStep::CoreLikert
    } else if !core_evidence.complete {
        ResumeStep::CoreEvidence
    } else if !bigfive.complete {
        ResumeStep::Bigfive
    } else if !ikigai.complete || !zone.complete {
        ResumeStep::Ikigai
    } else {
        ResumeStep::Review
    };

    AssessmentStatus {
        sections: Sections {
            lgpd,
            core_likert,
            core_evidence,
            bigfive,
            ikigai,
            zone,
        },
        resume_step,
        assessment_status,
        all_complete,
    }
}

/// Load rows and compute status, degrading every failed read to an empty
/// collection. A dead store reports "0 of N, incomplete", never an error.
pub fn load_status(db: &AssessmentDb, user: &UserRow) -> AssessmentStatus {
    let likert = db
        .with_conn(|conn| responses::likert_responses(conn, user.id))
        .unwrap_or_else(|e| {
            warn!(error = %e, "Likert read failed, treating as unanswered");
            vec![]
        });
    let evidence = db
        .with_conn(|conn| responses::evidence_responses(conn, user.id))
        .unwrap_or_else(|e| {
            warn!(error = %e, "Evidence read failed, treating as unanswered");
            vec![]
        });
    let ikigai = db
        .with_conn(|conn| responses::ikigai_items(conn, user.id))
        .unwrap_or_else(|e| {
            warn!(error = %e, "IKIGAI read failed, treating as unanswered");
            vec![]
        });
    let choices = db
        .with_conn(|conn| crate::db::choices::user_choices(conn, user.id))
        .unwrap_or_else(|e| {
            warn!(error = %e, "Choices read failed, treating as unanswered");
            None
        });

    // Consent may have landed after the session row was loaded
    let user = db
        .with_conn(|conn| users::user_by_id(conn, user.id))
        .ok()
        .flatten()
        .unwrap_or_else(|| user.clone());

    compute_status(
        &user,
        &Assessment {
            likert,
            evidence,
            ikigai,
            choices,
        },
    )
}

fn likert_progress(rows: &[LikertRow], section_ids: &HashSet<&'static str>) -> SectionProgress {
    let answered: HashSet<&str> = rows
        .iter()
        .map(|r| r.item_id.as_str())
        .filter(|id| section_ids.contains(id))
        .collect();
    let total = section_ids.len();
    SectionProgress {
        answered: answered.len(),
        total,
        complete: answered.len() >= total,
    }
}

fn evidence_progress(rows: &[EvidenceRow]) -> SectionProgress {
    let prompt_ids = catalog::evidence_prompt_ids();
    let answered: HashSet<&str> = rows
        .iter()
        .map(|r| r.prompt_id.as_str())
        .filter(|id| prompt_ids.contains(id))
        .collect();
    let total = prompt_ids.len();
    SectionProgress {
        answered: answered.len(),
        total,
        complete: answered.len() >= total,
    }
}

fn ikigai_progress(rows: &[IkigaiRow]) -> IkigaiProgress {
    let circles: Vec<CircleProgress> = [
        IkigaiCircle::Love,
        IkigaiCircle::GoodAt,
        IkigaiCircle::WorldNeeds,
        IkigaiCircle::PaidFor,
    ]
    .into_iter()
    .map(|circle| {
        let count = rows.iter().filter(|r| r.circle == circle).count();
        CircleProgress {
            circle,
            count,
            complete: count >= catalog::IKIGAI_MIN_ITEMS_PER_CIRCLE,
        }
    })
    .collect();

    let complete = circles.iter().all(|c| c.complete);
    IkigaiProgress { circles, complete }
}

fn zone_progress(choices: Option<&ChoiceRow>) -> ZoneProgress {
    let chosen = choices.and_then(|c| c.chosen_zone);
    ZoneProgress {
        chosen,
        complete: chosen.is_some(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{BIG_FIVE_ITEMS, CORE_EVIDENCE_PROMPTS, CORE_LIKERT_ITEMS};

    fn consented_user() -> UserRow {
        UserRow {
            id: 1,
            open_id: "u-1".to_string(),
            name: Some("Ana".to_string()),
            email: None,
            lgpd_consent_at: Some("2025-01-01T00:00:00Z".to_string()),
            lgpd_consent_version: Some("1.0".to_string()),
        }
    }

    fn likert_rows(items: &[crate::catalog::LikertItem]) -> Vec<LikertRow> {
        items
            .iter()
            .map(|i| LikertRow {
                dimension: i.dimension.to_string(),
                item_id: i.id.to_string(),
                value: 4,
                reverse_flag: i.reverse,
            })
            .collect()
    }

    fn evidence_rows() -> Vec<EvidenceRow> {
        CORE_EVIDENCE_PROMPTS
            .iter()
            .map(|p| EvidenceRow {
                dimension: p.dimension.to_string(),
                prompt_id: p.id.to_string(),
                text: "resposta".to_string(),
            })
            .collect()
    }

    fn full_ikigai() -> Vec<IkigaiRow> {
        let mut rows = vec![];
        for circle in [
            IkigaiCircle::Love,
            IkigaiCircle::GoodAt,
            IkigaiCircle::WorldNeeds,
            IkigaiCircle::PaidFor,
        ] {
            for rank in 1..=3 {
                rows.push(IkigaiRow {
                    circle,
                    text: format!("item {}", rank),
                    rank,
                });
            }
        }
        rows
    }

    fn chosen_zone() -> Option<ChoiceRow> {
        Some(ChoiceRow {
            chosen_zone: Some(IkigaiZone::Passion),
            chosen_focus: None,
            assessment_status: AssessmentState::InProgress,
            completed_at: None,
        })
    }

    fn complete_assessment() -> Assessment {
        let mut likert = likert_rows(CORE_LIKERT_ITEMS);
        likert.extend(likert_rows(BIG_FIVE_ITEMS));
        Assessment {
            likert,
            evidence: evidence_rows(),
            ikigai: full_ikigai(),
            choices: chosen_zone(),
        }
    }

    #[test]
    fn test_empty_assessment_reports_zero_counts() {
        let status = compute_status(
            &consented_user(),
            &Assessment {
                likert: vec![],
                evidence: vec![],
                ikigai: vec![],
                choices: None,
            },
        );
        assert_eq!(status.sections.core_likert.answered, 0);
        assert_eq!(status.sections.core_likert.total, 40);
        assert!(!status.sections.core_likert.complete);
        assert_eq!(status.sections.bigfive.total, 20);
        assert_eq!(status.sections.core_evidence.total, 10);
        assert!(!status.all_complete);
        assert_eq!(status.resume_step, ResumeStep::CoreLikert);
    }

    #[test]
    fn test_all_complete_is_and_of_five_sections() {
        let status = compute_status(&consented_user(), &complete_assessment());
        assert!(status.all_complete);
        assert_eq!(status.resume_step, ResumeStep::Review);

        // Toggle each gating section to incomplete, one at a time
        let mut a = complete_assessment();
        a.likert.retain(|r| r.item_id != "sm_1");
        assert!(!compute_status(&consented_user(), &a).all_complete);

        let mut a = complete_assessment();
        a.likert.retain(|r| r.item_id != "bf_e1");
        assert!(!compute_status(&consented_user(), &a).all_complete);

        let mut a = complete_assessment();
        a.evidence.pop();
        assert!(!compute_status(&consented_user(), &a).all_complete);

        let mut a = complete_assessment();
        a.ikigai.retain(|r| !(r.circle == IkigaiCircle::Love && r.rank == 3));
        assert!(!compute_status(&consented_user(), &a).all_complete);

        let mut a = complete_assessment();
        a.choices.as_mut().unwrap().chosen_zone = None;
        assert!(!compute_status(&consented_user(), &a).all_complete);
    }

    #[test]
    fn test_lgpd_does_not_gate_all_complete() {
        let mut user = consented_user();
        user.lgpd_consent_at = None;
        let status = compute_status(&user, &complete_assessment());
        assert!(status.all_complete);
        assert_eq!(status.resume_step, ResumeStep::Welcome);
    }

    #[test]
    fn test_resume_priority_core_likert_first_unmet() {
        let mut a = complete_assessment();
        a.likert.retain(|r| r.item_id != "ma_3");
        let status = compute_status(&consented_user(), &a);
        assert_eq!(status.resume_step, ResumeStep::CoreLikert);
    }

    #[test]
    fn test_resume_priority_chain_order() {
        let mut a = complete_assessment();
        a.evidence.clear();
        a.likert.retain(|r| !r.item_id.starts_with("bf_"));
        // Evidence outranks bigfive in the chain
        assert_eq!(
            compute_status(&consented_user(), &a).resume_step,
            ResumeStep::CoreEvidence
        );

        let mut a = complete_assessment();
        a.likert.retain(|r| !r.item_id.starts_with("bf_"));
        assert_eq!(
            compute_status(&consented_user(), &a).resume_step,
            ResumeStep::Bigfive
        );

        let mut a = complete_assessment();
        a.choices.as_mut().unwrap().chosen_zone = None;
        assert_eq!(
            compute_status(&consented_user(), &a).resume_step,
            ResumeStep::Ikigai
        );
    }

    #[test]
    fn test_submitted_overrides_chain() {
        let mut a = complete_assessment();
        a.likert.clear();
        a.choices.as_mut().unwrap().assessment_status = AssessmentState::Completed;
        let status = compute_status(&consented_user(), &a);
        assert_eq!(status.resume_step, ResumeStep::Submitted);
        assert!(!status.all_complete);
    }

    #[test]
    fn test_ikigai_needs_three_per_circle() {
        let mut a = complete_assessment();
        assert!(compute_status(&consented_user(), &a).sections.ikigai.complete);

        // Drop one item from a single circle: 2 of 3
        a.ikigai
            .retain(|r| !(r.circle == IkigaiCircle::WorldNeeds && r.rank == 1));
        let status = compute_status(&consented_user(), &a);
        assert!(!status.sections.ikigai.complete);
        assert_eq!(status.resume_step, ResumeStep::Ikigai);
    }

    #[test]
    fn test_partial_core_count() {
        let mut a = complete_assessment();
        a.likert.retain(|r| r.item_id != "sm_1" && r.item_id != "ra_8");
        let status = compute_status(&consented_user(), &a);
        assert_eq!(status.sections.core_likert.answered, 38);
        assert_eq!(status.sections.core_likert.total, 40);
        assert!(!status.sections.core_likert.complete);
        // bigfive tracked independently
        assert_eq!(status.sections.bigfive.answered, 20);
        assert!(status.sections.bigfive.complete);
    }

    #[test]
    fn test_unknown_item_ids_do_not_count() {
        let mut a = complete_assessment();
        a.likert.push(LikertRow {
            dimension: "self_management".to_string(),
            item_id: "sm_99".to_string(),
            value: 5,
            reverse_flag: false,
        });
        let status = compute_status(&consented_user(), &a);
        assert_eq!(status.sections.core_likert.answered, 40);
    }

    #[test]
    fn test_dimension_tag_not_trusted_for_split() {
        // A bigfive item mislabeled with a core dimension still counts as bigfive
        let mut a = complete_assessment();
        for row in a.likert.iter_mut() {
            if row.item_id == "bf_e1" {
                row.dimension = "self_management".to_string();
            }
        }
        let status = compute_status(&consented_user(), &a);
        assert_eq!(status.sections.bigfive.answered, 20);
        assert_eq!(status.sections.core_likert.answered, 40);
    }
}
