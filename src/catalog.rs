//! Static question bank consumed by the status engine, report builder, and
//! API validation.
//!
//! Five competency dimensions with 8 Likert items each (2 reverse-keyed) and
//! 2 evidence prompts; the 20-item Mini-IPIP Big Five inventory; the four
//! IKIGAI circles and zones; and the 70/20/10 plan option library.
//!
//! Item-id membership in [`CORE_LIKERT_ITEMS`] / [`BIG_FIVE_ITEMS`] is the
//! authoritative core-vs-bigfive split; the dimension tag stored on a
//! response row is never trusted for it.

use std::collections::HashSet;

/// A Likert-scale item. Reverse-keyed items score as `6 - value`.
#[derive(Debug, Clone, Copy)]
pub struct LikertItem {
    pub id: &'static str,
    pub dimension: &'static str,
    pub text: &'static str,
    pub reverse: bool,
}

/// An open-text evidence prompt tied to a dimension.
#[derive(Debug, Clone, Copy)]
pub struct EvidencePrompt {
    pub id: &'static str,
    pub dimension: &'static str,
    pub text: &'static str,
}

/// Keyed label pair for dimensions and traits.
#[derive(Debug, Clone, Copy)]
pub struct KeyedLabel {
    pub key: &'static str,
    pub label: &'static str,
}

pub const DIMENSIONS: &[KeyedLabel] = &[
    KeyedLabel { key: "self_management", label: "Autoconhecimento / Autogestão" },
    KeyedLabel { key: "mental_agility", label: "Agilidade Mental" },
    KeyedLabel { key: "people_agility", label: "Agilidade com Pessoas" },
    KeyedLabel { key: "change_agility", label: "Agilidade com Mudanças" },
    KeyedLabel { key: "results_agility", label: "Agilidade com Resultados" },
];

pub const CORE_LIKERT_ITEMS: &[LikertItem] = &[
    // A) Autoconhecimento / Autogestão
    LikertItem { id: "sm_1", dimension: "self_management", text: "Eu consigo descrever com clareza meus pontos fortes e fracos no trabalho.", reverse: false },
    LikertItem { id: "sm_2", dimension: "self_management", text: "Eu costumo refletir sobre como minhas ações impactam outras pessoas.", reverse: false },
    LikertItem { id: "sm_3", dimension: "self_management", text: "Eu cumpro combinados mesmo quando ninguém está cobrando.", reverse: false },
    LikertItem { id: "sm_4", dimension: "self_management", text: "Eu reconheço cedo quando estou reagindo emocionalmente e ajusto a forma de agir.", reverse: false },
    LikertItem { id: "sm_5", dimension: "self_management", text: "Eu consigo manter consistência mesmo com queda de motivação.", reverse: false },
    LikertItem { id: "sm_6", dimension: "self_management", text: "Eu tenho um método para me organizar e priorizar.", reverse: false },
    LikertItem { id: "sm_7", dimension: "self_management", text: "Eu geralmente \"vou no feeling\" e só depois percebo que errei na forma de agir.", reverse: true },
    LikertItem { id: "sm_8", dimension: "self_management", text: "Eu frequentemente deixo coisas importantes para resolver em cima da hora.", reverse: true },
    // B) Agilidade Mental
    LikertItem { id: "ma_1", dimension: "mental_agility", text: "Eu consigo simplificar problemas complexos em partes claras.", reverse: false },
    LikertItem { id: "ma_2", dimension: "mental_agility", text: "Eu faço perguntas para entender causas, não só sintomas.", reverse: false },
    LikertItem { id: "ma_3", dimension: "mental_agility", text: "Eu conecto diferentes áreas/variáveis antes de decidir.", reverse: false },
    LikertItem { id: "ma_4", dimension: "mental_agility", text: "Eu aprendo rápido quando o tema tem aplicação prática.", reverse: false },
    LikertItem { id: "ma_5", dimension: "mental_agility", text: "Eu busco melhorar processos sem precisar \"reinventar a roda\".", reverse: false },
    LikertItem { id: "ma_6", dimension: "mental_agility", text: "Eu consigo gerar alternativas quando o plano original falha.", reverse: false },
    LikertItem { id: "ma_7", dimension: "mental_agility", text: "Eu prefiro executar sem questionar para evitar complexidade.", reverse: true },
    LikertItem { id: "ma_8", dimension: "mental_agility", text: "Eu só consigo decidir quando tenho 100% das informações.", reverse: true },
    // C) Agilidade com Pessoas
    LikertItem { id: "pa_1", dimension: "people_agility", text: "Eu adapto minha comunicação ao perfil da pessoa (técnico vs executivo).", reverse: false },
    LikertItem { id: "pa_2", dimension: "people_agility", text: "Eu consigo discordar sem gerar atrito desnecessário.", reverse: false },
    LikertItem { id: "pa_3", dimension: "people_agility", text: "Eu peço e ofereço feedback de forma objetiva.", reverse: false },
    LikertItem { id: "pa_4", dimension: "people_agility", text: "Eu consigo conduzir conversas difíceis quando necessário.", reverse: false },
    LikertItem { id: "pa_5", dimension: "people_agility", text: "Eu facilito colaboração entre pessoas com visões diferentes.", reverse: false },
    LikertItem { id: "pa_6", dimension: "people_agility", text: "Eu consigo escutar de verdade antes de responder.", reverse: false },
    LikertItem { id: "pa_7", dimension: "people_agility", text: "Eu evito conversas difíceis mesmo quando sei que são necessárias.", reverse: true },
    LikertItem { id: "pa_8", dimension: "people_agility", text: "Eu frequentemente me frustro por achar que as pessoas \"não entendem o óbvio\".", reverse: true },
    // D) Agilidade com Mudanças
    LikertItem { id: "ca_1", dimension: "change_agility", text: "Eu me adapto rápido quando prioridades mudam.", reverse: false },
    LikertItem { id: "ca_2", dimension: "change_agility", text: "Eu consigo separar \"não gosto\" de \"não vou aceitar\".", reverse: false },
    LikertItem { id: "ca_3", dimension: "change_agility", text: "Eu encontro o que está no meu controle mesmo em cenários ruins.", reverse: false },
    LikertItem { id: "ca_4", dimension: "change_agility", text: "Eu consigo liderar pequenas mudanças no meu entorno.", reverse: false },
    LikertItem { id: "ca_5", dimension: "change_agility", text: "Eu consigo manter performance em ambientes instáveis.", reverse: false },
    LikertItem { id: "ca_6", dimension: "change_agility", text: "Eu busco aprender com mudanças inesperadas.", reverse: false },
    LikertItem { id: "ca_7", dimension: "change_agility", text: "Mudanças fora do meu controle costumam me travar por muito tempo.", reverse: true },
    LikertItem { id: "ca_8", dimension: "change_agility", text: "Eu me apego ao plano original mesmo quando fica claro que não faz mais sentido.", reverse: true },
    // E) Agilidade com Resultados
    LikertItem { id: "ra_1", dimension: "results_agility", text: "Eu priorizo com clareza o que gera mais impacto.", reverse: false },
    LikertItem { id: "ra_2", dimension: "results_agility", text: "Eu transformo objetivos em entregas e prazos.", reverse: false },
    LikertItem { id: "ra_3", dimension: "results_agility", text: "Eu tomo decisões mesmo com incerteza moderada.", reverse: false },
    LikertItem { id: "ra_4", dimension: "results_agility", text: "Eu acompanho progresso com métricas simples.", reverse: false },
    LikertItem { id: "ra_5", dimension: "results_agility", text: "Eu gosto de resolver problemas com entregas concretas.", reverse: false },
    LikertItem { id: "ra_6", dimension: "results_agility", text: "Eu consigo dizer \"não\" para proteger o que é prioridade.", reverse: false },
    LikertItem { id: "ra_7", dimension: "results_agility", text: "Eu começo muitas coisas e termino poucas.", reverse: true },
    LikertItem { id: "ra_8", dimension: "results_agility", text: "Eu confundo \"estar ocupado\" com \"gerar resultado\".", reverse: true },
];

pub const CORE_EVIDENCE_PROMPTS: &[EvidencePrompt] = &[
    EvidencePrompt { id: "sm_ev1", dimension: "self_management", text: "Conte 1 situação recente em que você mudou de ideia após refletir (o que te fez mudar?)." },
    EvidencePrompt { id: "sm_ev2", dimension: "self_management", text: "Cite 2 combinados que você cumpre bem e 1 que você tem falhado (e por quê)." },
    EvidencePrompt { id: "ma_ev1", dimension: "mental_agility", text: "Dê um exemplo de um problema que você resolveu fazendo boas perguntas." },
    EvidencePrompt { id: "ma_ev2", dimension: "mental_agility", text: "Cite um processo que você melhorou e qual foi o ganho concreto." },
    EvidencePrompt { id: "pa_ev1", dimension: "people_agility", text: "Conte 1 feedback difícil que você deu/recebeu e o que mudou depois." },
    EvidencePrompt { id: "pa_ev2", dimension: "people_agility", text: "Cite 1 conflito que você ajudou a resolver (como você agiu?)." },
    EvidencePrompt { id: "ca_ev1", dimension: "change_agility", text: "Conte uma mudança recente que te afetou e como você se reajustou." },
    EvidencePrompt { id: "ca_ev2", dimension: "change_agility", text: "O que mais te irrita em mudanças? (e o que você faz com isso?)" },
    EvidencePrompt { id: "ra_ev1", dimension: "results_agility", text: "Cite 2 entregas repetidas que você faz bem e 1 que você evita." },
    EvidencePrompt { id: "ra_ev2", dimension: "results_agility", text: "Conte um caso em que você teve que priorizar e o que cortou." },
];

// Mini-IPIP (Donnellan et al., 2006), 20 items, public domain.
// Scoring: +keyed = direct value; -keyed = (6 - value).

pub const BIG_FIVE_TRAITS: &[KeyedLabel] = &[
    KeyedLabel { key: "extraversion", label: "Extroversão" },
    KeyedLabel { key: "agreeableness", label: "Amabilidade" },
    KeyedLabel { key: "conscientiousness", label: "Conscienciosidade" },
    KeyedLabel { key: "neuroticism", label: "Neuroticismo" },
    KeyedLabel { key: "intellect", label: "Intelecto / Imaginação" },
];

pub const BIG_FIVE_ITEMS: &[LikertItem] = &[
    LikertItem { id: "bf_e1", dimension: "extraversion", text: "Sou a alma da festa.", reverse: false },
    LikertItem { id: "bf_e2", dimension: "extraversion", text: "Converso com muitas pessoas diferentes em festas.", reverse: false },
    LikertItem { id: "bf_e3", dimension: "extraversion", text: "Não falo muito.", reverse: true },
    LikertItem { id: "bf_e4", dimension: "extraversion", text: "Fico em segundo plano.", reverse: true },
    LikertItem { id: "bf_a1", dimension: "agreeableness", text: "Simpatizo com os sentimentos dos outros.", reverse: false },
    LikertItem { id: "bf_a2", dimension: "agreeableness", text: "Sinto as emoções das outras pessoas.", reverse: false },
    LikertItem { id: "bf_a3", dimension: "agreeableness", text: "Não me interesso muito pelos outros.", reverse: true },
    LikertItem { id: "bf_a4", dimension: "agreeableness", text: "Não me interesso pelos problemas das outras pessoas.", reverse: true },
    LikertItem { id: "bf_c1", dimension: "conscientiousness", text: "Faço minhas tarefas imediatamente.", reverse: false },
    LikertItem { id: "bf_c2", dimension: "conscientiousness", text: "Gosto de ordem.", reverse: false },
    LikertItem { id: "bf_c3", dimension: "conscientiousness", text: "Frequentemente esqueço de colocar as coisas no lugar.", reverse: true },
    LikertItem { id: "bf_c4", dimension: "conscientiousness", text: "Faço bagunça com as coisas.", reverse: true },
    LikertItem { id: "bf_n1", dimension: "neuroticism", text: "Tenho mudanças frequentes de humor.", reverse: false },
    LikertItem { id: "bf_n2", dimension: "neuroticism", text: "Fico chateado(a) facilmente.", reverse: false },
    LikertItem { id: "bf_n3", dimension: "neuroticism", text: "Estou relaxado(a) a maior parte do tempo.", reverse: true },
    LikertItem { id: "bf_n4", dimension: "neuroticism", text: "Raramente me sinto triste.", reverse: true },
    LikertItem { id: "bf_i1", dimension: "intellect", text: "Tenho uma imaginação vívida.", reverse: false },
    LikertItem { id: "bf_i2", dimension: "intellect", text: "Tenho dificuldade em entender ideias abstratas.", reverse: true },
    LikertItem { id: "bf_i3", dimension: "intellect", text: "Não me interesso por ideias abstratas.", reverse: true },
    LikertItem { id: "bf_i4", dimension: "intellect", text: "Não tenho uma boa imaginação.", reverse: true },
];

/// IKIGAI circle keys, in worksheet order.
pub const IKIGAI_CIRCLES: &[&str] = &["love", "good_at", "world_needs", "paid_for"];

/// Minimum stored items per circle for the worksheet to count as complete.
pub const IKIGAI_MIN_ITEMS_PER_CIRCLE: usize = 3;

/// IKIGAI intersection zones the user picks one of.
pub const IKIGAI_ZONES: &[KeyedLabel] = &[
    KeyedLabel { key: "passion", label: "Paixão" },
    KeyedLabel { key: "profession", label: "Profissão" },
    KeyedLabel { key: "mission", label: "Missão" },
    KeyedLabel { key: "vocation", label: "Vocação" },
];

/// A 70/20/10 plan option the user can select.
#[derive(Debug, Clone, Copy)]
pub struct PlanOption {
    pub id: &'static str,
    pub label: &'static str,
    pub description: &'static str,
}

pub const PLAN_OPTIONS_70: &[PlanOption] = &[
    PlanOption { id: "70_deepen_core", label: "Aprofundar competência central", description: "Dedicar tempo deliberado à dimensão de maior impacto no seu trabalho atual, com prática intencional, não apenas execução." },
    PlanOption { id: "70_deliver_project", label: "Entregar projeto estratégico", description: "Identificar o projeto de maior visibilidade e impacto no ciclo e garantir entrega com qualidade acima do esperado." },
    PlanOption { id: "70_build_routine", label: "Construir rotina de alta performance", description: "Estruturar blocos de trabalho focado (deep work), reduzir interrupções e criar rituais de início/encerramento de dia." },
    PlanOption { id: "70_improve_process", label: "Melhorar processo crítico", description: "Mapear o processo que mais drena energia ou gera retrabalho e redesenhá-lo com pelo menos 20% de ganho de eficiência." },
    PlanOption { id: "70_stakeholder", label: "Fortalecer relação com stakeholders-chave", description: "Identificar 2-3 pessoas que mais influenciam seu trabalho e investir em alinhamento proativo e visibilidade de resultados." },
];

pub const PLAN_OPTIONS_20: &[PlanOption] = &[
    PlanOption { id: "20_learn_adjacent", label: "Aprender habilidade adjacente", description: "Escolher uma habilidade que complementa sua competência central e dedicar 2-3 horas semanais a aprendizado estruturado." },
    PlanOption { id: "20_seek_feedback", label: "Buscar feedback estruturado", description: "Solicitar feedback específico de 2-3 pessoas sobre uma dimensão de desenvolvimento, com perguntas concretas, não genéricas." },
    PlanOption { id: "20_mentor_mentee", label: "Ativar relação de mentoria", description: "Identificar alguém mais experiente na sua área de desenvolvimento e propor encontros quinzenais com pauta preparada." },
    PlanOption { id: "20_experiment", label: "Conduzir experimento de carreira", description: "Testar uma hipótese sobre seu desenvolvimento com prazo definido." },
    PlanOption { id: "20_document_learning", label: "Documentar aprendizados", description: "Criar o hábito de registrar 1 aprendizado por semana: o que funcionou, o que não funcionou e o que mudaria." },
];

pub const PLAN_OPTIONS_10: &[PlanOption] = &[
    PlanOption { id: "10_explore_ikigai", label: "Explorar interseção do IKIGAI", description: "Dedicar tempo a uma atividade que cruza pelo menos dois círculos do seu IKIGAI, sem pressão de resultado imediato." },
    PlanOption { id: "10_network_new", label: "Expandir rede para área de interesse", description: "Conectar-se com 2-3 pessoas que atuam na direção que você quer explorar, para aprender, não para pedir favores." },
    PlanOption { id: "10_side_project", label: "Iniciar projeto paralelo pequeno", description: "Lançar um projeto de baixo custo e baixo risco que testa uma hipótese de carreira ou produto, com entrega em 30 dias." },
    PlanOption { id: "10_read_research", label: "Pesquisar tendências do setor", description: "Ler 2-3 referências relevantes sobre o futuro da sua área e identificar onde você quer estar posicionado em 2-3 anos." },
    PlanOption { id: "10_reflect_values", label: "Revisitar valores e critérios de decisão", description: "Reservar tempo para revisar o que importa para você agora e verificar se suas escolhas atuais estão alinhadas com isso." },
];

/// Item ids belonging to the core (agility) Likert section.
pub fn core_item_ids() -> HashSet<&'static str> {
    CORE_LIKERT_ITEMS.iter().map(|i| i.id).collect()
}

/// Item ids belonging to the Big Five section.
pub fn big_five_item_ids() -> HashSet<&'static str> {
    BIG_FIVE_ITEMS.iter().map(|i| i.id).collect()
}

/// Evidence prompt ids.
pub fn evidence_prompt_ids() -> HashSet<&'static str> {
    CORE_EVIDENCE_PROMPTS.iter().map(|p| p.id).collect()
}

/// Item ids of one core dimension.
pub fn dimension_item_ids(dimension: &str) -> HashSet<&'static str> {
    CORE_LIKERT_ITEMS
        .iter()
        .filter(|i| i.dimension == dimension)
        .map(|i| i.id)
        .collect()
}

/// Item ids of one Big Five trait.
pub fn trait_item_ids(trait_key: &str) -> HashSet<&'static str> {
    BIG_FIVE_ITEMS
        .iter()
        .filter(|i| i.dimension == trait_key)
        .map(|i| i.id)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_counts() {
        assert_eq!(CORE_LIKERT_ITEMS.len(), 40);
        assert_eq!(BIG_FIVE_ITEMS.len(), 20);
        assert_eq!(CORE_EVIDENCE_PROMPTS.len(), 10);
        assert_eq!(DIMENSIONS.len(), 5);
        assert_eq!(BIG_FIVE_TRAITS.len(), 5);
    }

    #[test]
    fn test_two_reverse_items_per_dimension() {
        for dim in DIMENSIONS {
            let reversed = CORE_LIKERT_ITEMS
                .iter()
                .filter(|i| i.dimension == dim.key && i.reverse)
                .count();
            assert_eq!(reversed, 2, "dimension {}", dim.key);
        }
    }

    #[test]
    fn test_core_and_big_five_ids_disjoint() {
        let core = core_item_ids();
        let bf = big_five_item_ids();
        assert!(core.is_disjoint(&bf));
        assert_eq!(core.len(), 40);
        assert_eq!(bf.len(), 20);
    }
}
