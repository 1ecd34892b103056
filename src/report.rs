//! Report payload assembly
//!
//! Turns stored rows into the fixed-shape JSON the external renderer
//! consumes: dimension and trait averages with reverse-keyed scoring, a
//! heuristic archetype, ordered IKIGAI lists, and the 70/20/10 plan fanned
//! into the renderer's schema.

use serde::Serialize;

use crate::catalog;
use crate::db::{Assessment, IkigaiCircle, LikertRow, PlanRow};

/// Agility dimension averages on the 0-5 scale, one decimal.
#[derive(Debug, Clone, Serialize)]
pub struct AgilityScores {
    pub mental: f64,
    pub resultados: f64,
    pub pessoas: f64,
    pub mudancas: f64,
    pub autogestao: f64,
}

/// Big Five trait averages on the 0-5 scale, one decimal.
#[derive(Debug, Clone, Serialize)]
pub struct BigFiveScores {
    pub abertura: f64,
    pub conscienciosidade: f64,
    pub extroversao: f64,
    pub amabilidade: f64,
    pub neuroticismo: f64,
}

/// IKIGAI circle contents ordered by rank; the rank itself is not emitted.
#[derive(Debug, Clone, Serialize)]
pub struct IkigaiLists {
    pub amo: Vec<String>,
    pub sou_bom: Vec<String>,
    pub mundo_precisa: Vec<String>,
    pub posso_ser_pago: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Experience {
    pub title: String,
    pub week: u32,
    pub metric: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ContactProfile {
    pub profile: String,
    pub justification: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct EducationItem {
    pub kind: String,
    pub title: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Checkpoint {
    pub week: u32,
    pub question: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlanPayload {
    pub chosen_hypothesis: String,
    pub experiencias: Vec<Experience>,
    pub pessoas: Vec<ContactProfile>,
    pub educacao: Vec<EducationItem>,
    pub checkpoints: Vec<Checkpoint>,
}

impl PlanPayload {
    fn empty() -> Self {
        Self {
            chosen_hypothesis: String::new(),
            experiencias: vec![],
            pessoas: vec![],
            educacao: vec![],
            checkpoints: vec![],
        }
    }
}

/// Wire contract of the external renderer's /render endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct ReportPayload {
    pub user_name: String,
    pub archetype: String,
    pub archetype_strengths: Vec<String>,
    pub archetype_tensions: Vec<String>,
    pub provocative_questions: Vec<String>,
    pub agilidades: AgilityScores,
    pub big_five: BigFiveScores,
    pub ikigai: IkigaiLists,
    pub selected_zone: String,
    pub plan: PlanPayload,
}

struct Archetype {
    name: &'static str,
    strengths: &'static [&'static str],
    tensions: &'static [&'static str],
    questions: &'static [&'static str],
}

// Keyed by the payload field names, in the fixed tie-breaking order.
const ARCHETYPES: &[(&str, Archetype)] = &[
    ("mental", Archetype {
        name: "O Pensador Sistêmico",
        strengths: &["Visão analítica e estruturada", "Capacidade de síntese", "Aprendizado rápido"],
        tensions: &["Pode paralisar por excesso de análise", "Dificuldade com ambiguidade"],
        questions: &["Qual problema você ainda não conseguiu simplificar?", "Quando a análise virou desculpa para não agir?"],
    }),
    ("resultados", Archetype {
        name: "O Executor",
        strengths: &["Foco em entrega", "Alta capacidade de priorização", "Orientação a impacto"],
        tensions: &["Pode sacrificar qualidade por velocidade", "Dificuldade em pausar para reflexão"],
        questions: &["Qual resultado você perseguiu que não deveria?", "O que você entrega que ninguém pediu?"],
    }),
    ("pessoas", Archetype {
        name: "O Conector",
        strengths: &["Inteligência relacional elevada", "Comunicação adaptativa", "Capacidade de influência"],
        tensions: &["Pode evitar conflitos necessários", "Dependência de aprovação"],
        questions: &["Qual conversa difícil você está adiando?", "Onde sua empatia virou obstáculo?"],
    }),
    ("mudancas", Archetype {
        name: "O Navegador",
        strengths: &["Alta adaptabilidade", "Resiliência em cenários instáveis", "Visão de oportunidade em crises"],
        tensions: &["Pode se perder sem estrutura", "Dificuldade com rotina"],
        questions: &["O que você ainda não aprendeu com a última mudança?", "Onde a adaptabilidade virou falta de posição?"],
    }),
    ("autogestao", Archetype {
        name: "O Arquiteto de Si",
        strengths: &["Alta consciência de si mesmo", "Consistência e confiabilidade", "Capacidade de autorregulação"],
        tensions: &["Pode ser excessivamente autocrítico", "Dificuldade em delegar"],
        questions: &["Quando foi a última vez que você mudou de opinião sobre si mesmo?", "O que você tolera em si que não toleraria nos outros?"],
    }),
];

/// Average of the rows whose item_id is in the target set, with 6 - value
/// for reverse-flagged rows, rounded to one decimal. An unanswered set
/// scores exactly 0, never NaN.
fn likert_score(rows: &[LikertRow], target_ids: &std::collections::HashSet<&'static str>) -> f64 {
    let filtered: Vec<&LikertRow> = rows
        .iter()
        .filter(|r| target_ids.contains(r.item_id.as_str()))
        .collect();
    if filtered.is_empty() {
        return 0.0;
    }
    let sum: f64 = filtered
        .iter()
        .map(|r| {
            if r.reverse_flag {
                (6 - r.value) as f64
            } else {
                r.value as f64
            }
        })
        .sum();
    ((sum / filtered.len() as f64) * 10.0).round() / 10.0
}

fn agility_scores(rows: &[LikertRow]) -> AgilityScores {
    let score = |dim: &str| likert_score(rows, &catalog::dimension_item_ids(dim));
    AgilityScores {
        mental: score("mental_agility"),
        resultados: score("results_agility"),
        pessoas: score("people_agility"),
        mudancas: score("change_agility"),
        autogestao: score("self_management"),
    }
}

fn big_five_scores(rows: &[LikertRow]) -> BigFiveScores {
    let score = |t: &str| likert_score(rows, &catalog::trait_item_ids(t));
    BigFiveScores {
        abertura: score("intellect"),
        conscienciosidade: score("conscientiousness"),
        extroversao: score("extraversion"),
        amabilidade: score("agreeableness"),
        neuroticismo: score("neuroticism"),
    }
}

/// Highest-scoring dimension wins; ties break to the earlier entry in the
/// fixed order (replacement only on strict greater-than).
fn pick_archetype(scores: &AgilityScores) -> &'static Archetype {
    let ranked = [
        ("mental", scores.mental),
        ("resultados", scores.resultados),
        ("pessoas", scores.pessoas),
        ("mudancas", scores.mudancas),
        ("autogestao", scores.autogestao),
    ];
    let mut top = ranked[0];
    for candidate in &ranked[1..] {
        if candidate.1 > top.1 {
            top = *candidate;
        }
    }
    ARCHETYPES
        .iter()
        .find(|(key, _)| *key == top.0)
        .map(|(_, a)| a)
        .expect("archetype table covers every dimension key")
}

fn ikigai_lists(assessment: &Assessment) -> IkigaiLists {
    let mut sorted = assessment.ikigai.clone();
    sorted.sort_by_key(|i| i.rank);

    let texts = |circle: IkigaiCircle| -> Vec<String> {
        sorted
            .iter()
            .filter(|i| i.circle == circle)
            .map(|i| i.text.clone())
            .collect()
    };

    IkigaiLists {
        amo: texts(IkigaiCircle::Love),
        sou_bom: texts(IkigaiCircle::GoodAt),
        mundo_precisa: texts(IkigaiCircle::WorldNeeds),
        posso_ser_pago: texts(IkigaiCircle::PaidFor),
    }
}

/// Fan the 70/20/10 selections into the renderer's plan schema.
///
/// 70% items become dated experiences on a 3-week cadence; 20% and 10%
/// items fold into a single education list tagged by kind; checkpoint
/// questions are synthesized at weeks 4/8/12, dateless when no date is
/// stored. A missing plan row yields an all-empty sub-object so the rest of
/// the report still renders.
fn plan_payload(plan: Option<&PlanRow>) -> PlanPayload {
    let Some(p) = plan else {
        return PlanPayload::empty();
    };

    let experiencias = p
        .selected_70
        .iter()
        .enumerate()
        .map(|(i, title)| Experience {
            title: title.clone(),
            week: (i as u32 + 1) * 3,
            metric: "Avalie o impacto no trabalho principal ao final do ciclo".to_string(),
        })
        .collect();

    let mut educacao: Vec<EducationItem> = p
        .selected_20
        .iter()
        .map(|title| EducationItem {
            kind: "desenvolvimento".to_string(),
            title: title.clone(),
        })
        .collect();
    educacao.extend(p.selected_10.iter().map(|title| EducationItem {
        kind: "exploração".to_string(),
        title: title.clone(),
    }));

    let checkpoint = |week: u32, n: u32, date: Option<&String>, tail: &str| Checkpoint {
        week,
        question: match date {
            Some(d) => format!("Checkpoint {} ({}): {}", n, d, tail),
            None => format!("Checkpoint {}: {}", n, tail),
        },
    };
    let checkpoints = vec![
        checkpoint(4, 1, p.checkpoint1_date.as_ref(), "O que mudou desde o início do ciclo?"),
        checkpoint(8, 2, p.checkpoint2_date.as_ref(), "O que precisa ser ajustado?"),
        checkpoint(12, 3, p.checkpoint3_date.as_ref(), "O que ficou para o próximo ciclo?"),
    ];

    PlanPayload {
        chosen_hypothesis: p
            .cycle_objective
            .clone()
            .unwrap_or_else(|| "Ciclo de desenvolvimento Arc".to_string()),
        experiencias,
        pessoas: vec![],
        educacao,
        checkpoints,
    }
}

/// Assemble the full render payload for one user.
pub fn build_report_payload(
    user_name: Option<&str>,
    assessment: &Assessment,
    plan: Option<&PlanRow>,
) -> ReportPayload {
    let agilidades = agility_scores(&assessment.likert);
    let big_five = big_five_scores(&assessment.likert);
    let archetype = pick_archetype(&agilidades);

    let selected_zone = assessment
        .choices
        .as_ref()
        .and_then(|c| c.chosen_zone)
        .map(|z| z.as_str().to_string())
        .unwrap_or_default();

    ReportPayload {
        user_name: user_name.unwrap_or("Participante").to_string(),
        archetype: archetype.name.to_string(),
        archetype_strengths: archetype.strengths.iter().map(|s| s.to_string()).collect(),
        archetype_tensions: archetype.tensions.iter().map(|s| s.to_string()).collect(),
        provocative_questions: archetype.questions.iter().map(|s| s.to_string()).collect(),
        agilidades,
        big_five,
        ikigai: ikigai_lists(assessment),
        selected_zone,
        plan: plan_payload(plan),
    }
}
