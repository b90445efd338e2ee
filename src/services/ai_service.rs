use anyhow::anyhow;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value as JsonValue};
use std::time::Duration;

use crate::error::Result;
use crate::models::behavioral::{
    AdvancedSection, BehavioralAnalysis, BehavioralHighlights, BehavioralInsights,
    BigFiveDistribution, CareerSuggestions, EnneagramType, NOT_AVAILABLE,
};
use crate::models::candidate::CandidateData;
use crate::services::candidate_service::CandidateService;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// A posting suggested by the model for the legacy job search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobSuggestion {
    pub title: String,
    pub company: String,
    pub contract_type: String,
    pub requirements: Vec<String>,
    pub apply_url: String,
}

#[derive(Clone)]
pub struct AIService {
    client: Client,
    api_key: Option<String>,
    model: String,
    api_base: String,
}

impl AIService {
    pub fn new(api_key: Option<String>, model: String, api_base: String, client: Client) -> Self {
        Self {
            client,
            api_key,
            model,
            api_base,
        }
    }

    /// Never fails: transport or parse errors yield the placeholder block, and
    /// partially valid answers are repaired field by field.
    pub async fn generate_behavioral_insights(
        &self,
        analysis: &BehavioralAnalysis,
    ) -> BehavioralInsights {
        if self.api_key.is_none() {
            tracing::warn!("GEMINI_API_KEY not set; returning placeholder insights");
            return fallback_insights(&analysis.section3);
        }

        let prompt = behavioral_prompt(analysis);
        match self.generate_json(&prompt).await {
            Ok(raw) => normalize_insights(&raw, &analysis.section3),
            Err(e) => {
                tracing::error!("Behavioral insight generation failed: {:?}", e);
                fallback_insights(&analysis.section3)
            }
        }
    }

    /// Generates insights and stores them with the questionnaire on the
    /// candidate record.
    pub async fn process_behavioral_analysis(
        &self,
        candidates: &CandidateService,
        cpf: &str,
        mut analysis: BehavioralAnalysis,
    ) -> Result<CandidateData> {
        let insights = self.generate_behavioral_insights(&analysis).await;
        analysis.ai_insights = Some(insights);
        let saved = candidates.update_behavioral_analysis(cpf, analysis).await?;
        tracing::info!(cpf = %saved.personal.cpf, "Behavioral analysis processed");
        Ok(saved)
    }

    pub async fn suggest_jobs(&self, role: &str, city: &str) -> Result<Vec<JobSuggestion>> {
        let prompt = format!(
            "Liste 5 vagas de emprego para o cargo '{}' em '{}'. \
             Cada vaga deve ter: título, empresa, tipo de contrato, requisitos principais e link de candidatura fictício. \
             Responda em JSON com uma lista chamada 'vagas', onde cada item tem os campos \
             \"title\", \"company\", \"contractType\", \"requirements\" (lista) e \"applyUrl\".",
            role.trim(),
            city.trim()
        );

        let raw = self.generate_json(&prompt).await?;
        let items = raw
            .get("vagas")
            .or_else(|| raw.get("jobs"))
            .and_then(|v| v.as_array())
            .or_else(|| raw.as_array())
            .ok_or_else(|| anyhow!("Gemini response has no job list"))?;

        Ok(items.iter().filter_map(coerce_job_suggestion).collect())
    }

    async fn generate_json(&self, prompt: &str) -> Result<JsonValue> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| anyhow!("GEMINI_API_KEY is not configured"))?;

        let url = format!(
            "{}/models/{}:generateContent",
            self.api_base.trim_end_matches('/'),
            self.model
        );
        let payload = json!({
            "contents": [
                {"role": "user", "parts": [{"text": prompt}]}
            ],
            "generationConfig": { "responseMimeType": "application/json" }
        });

        let res = self
            .client
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(&payload)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            return Err(anyhow!("Gemini API Error {}: {}", status, text).into());
        }

        let body: JsonValue = res.json().await?;
        let text = body
            .pointer("/candidates/0/content/parts/0/text")
            .and_then(|t| t.as_str())
            .ok_or_else(|| anyhow!("Invalid Gemini response format"))?;

        serde_json::from_str(strip_json_fences(text))
            .map_err(|e| anyhow!("Gemini returned malformed JSON: {}", e).into())
    }
}

fn behavioral_prompt(analysis: &BehavioralAnalysis) -> String {
    let s1 = &analysis.section1;
    let s2 = &analysis.section2;
    let s3 = &analysis.section3;

    format!(
        r#"Como especialista em análise comportamental, psicologia organizacional e Eneagrama, analise as respostas abaixo e gere um relatório estruturado em JSON.

DADOS DO CANDIDATO:

=== SEÇÃO 1: ANÁLISE COMPORTAMENTAL ===
Colaboração: {}
Resolução de Problemas: {}
Comunicação: {}
Iniciativa: {}
Adaptação: {}
Influência: {}
Aprendizado: {}

=== SEÇÃO 2: EXPECTATIVAS ===
Ambiente de Trabalho: {}
Valores: {}
Objetivos de Carreira: {}

=== SEÇÃO 3: ANÁLISE AVANÇADA ===
Raciocínio Lógico: {}
Análise de Dados: {}
Big Five - Conscienciosidade: {}/5
Big Five - Extroversão: {}/5
Big Five - Abertura: {}/5
Big Five - Amabilidade: {}/5
Big Five - Estabilidade Emocional: {}/5
Habilidades Interpessoais: {}
Resolução de Conflitos: {}
Mentalidade de Crescimento: {}
Adaptabilidade: {}
Motivação: {}
Resiliência: {}
Criatividade: {}
Inovação: {}
Ética: {}
Valores: {}

INSTRUÇÕES DE ANÁLISE:
1. Determine o tipo do ENEAGRAMA mais provável (1-9) baseado nos padrões comportamentais
2. Calcule os percentuais dos Big Five baseado nas autoavaliações e respostas contextuais
3. Identifique características comportamentais que se destacam
4. Sugira posições compatíveis com o perfil identificado

GERE UM RELATÓRIO EM JSON com a seguinte estrutura EXATA:
{{
  "profile": "Descrição detalhada do perfil (3-4 parágrafos)",
  "profileSummary": "Resumo em 2 linhas do perfil comportamental",
  "enneagramType": {{ "type": 1, "name": "Nome do tipo", "description": "Breve descrição" }},
  "bigFiveDistribution": {{ "openness": 0, "conscientiousness": 0, "extraversion": 0, "agreeableness": 0, "neuroticism": 0 }},
  "behavioralHighlights": {{ "communication": "", "decision": "", "leadership": "", "problemSolving": "", "adaptability": "" }},
  "suggestions": {{ "recommendedPositions": [], "standoutTips": [], "developmentAreas": [] }}
}}

IMPORTANTE:
- Retorne APENAS o JSON válido, sem texto adicional
- Percentuais dos Big Five entre 0 e 100; tipo do Eneagrama entre 1 e 9
- Seja específico e profissional nas descrições
- As sugestões devem ser práticas e acionáveis"#,
        s1.collaboration,
        s1.problem_solving,
        s1.communication,
        s1.initiative,
        s1.adaptation,
        s1.influence,
        s1.learning,
        s2.work_environment.join(", "),
        s2.values.join(", "),
        s2.career_goals,
        s3.logical_reasoning,
        s3.data_analysis,
        s3.conscientiousness,
        s3.extraversion,
        s3.openness,
        s3.agreeableness,
        s3.emotional_stability,
        s3.interpersonal_skills,
        s3.conflict_resolution,
        s3.growth_mindset,
        s3.adaptability,
        s3.motivation,
        s3.resilience,
        s3.creativity,
        s3.innovation,
        s3.ethics,
        s3.values,
    )
}

pub fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}

/// Placeholder block for when the model is unreachable or its answer unusable.
pub fn fallback_insights(section: &AdvancedSection) -> BehavioralInsights {
    normalize_insights(&JsonValue::Null, section)
}

/// Coerces a model answer into the insight contract. Every field that is
/// missing or has the wrong type gets its placeholder.
pub fn normalize_insights(raw: &JsonValue, section: &AdvancedSection) -> BehavioralInsights {
    let derived = BigFiveDistribution::from_self_assessment(section);
    let null = JsonValue::Null;
    let enneagram = raw.get("enneagramType").unwrap_or(&null);
    let big_five = raw.get("bigFiveDistribution").unwrap_or(&null);
    let highlights = raw.get("behavioralHighlights").unwrap_or(&null);
    let suggestions = raw.get("suggestions").unwrap_or(&null);

    BehavioralInsights {
        profile: text_field(raw, "profile"),
        profile_summary: text_field(raw, "profileSummary"),
        enneagram_type: EnneagramType {
            kind: enneagram
                .get("type")
                .and_then(as_number)
                .filter(|t| (1.0..=9.0).contains(t) && t.fract() == 0.0)
                .map(|t| t as u8),
            name: text_field(enneagram, "name"),
            description: text_field(enneagram, "description"),
        },
        big_five_distribution: BigFiveDistribution {
            openness: percent_field(big_five, "openness", derived.openness),
            conscientiousness: percent_field(
                big_five,
                "conscientiousness",
                derived.conscientiousness,
            ),
            extraversion: percent_field(big_five, "extraversion", derived.extraversion),
            agreeableness: percent_field(big_five, "agreeableness", derived.agreeableness),
            neuroticism: percent_field(big_five, "neuroticism", derived.neuroticism),
        },
        behavioral_highlights: BehavioralHighlights {
            communication: text_field(highlights, "communication"),
            decision: text_field(highlights, "decision"),
            leadership: text_field(highlights, "leadership"),
            problem_solving: text_field(highlights, "problemSolving"),
            adaptability: text_field(highlights, "adaptability"),
        },
        suggestions: CareerSuggestions {
            recommended_positions: list_field(suggestions, "recommendedPositions"),
            standout_tips: list_field(suggestions, "standoutTips"),
            development_areas: list_field(suggestions, "developmentAreas"),
        },
    }
}

fn text_field(value: &JsonValue, key: &str) -> String {
    value
        .get(key)
        .and_then(|v| v.as_str())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(NOT_AVAILABLE)
        .to_string()
}

fn list_field(value: &JsonValue, key: &str) -> Vec<String> {
    let items: Vec<String> = value
        .get(key)
        .and_then(|v| v.as_array())
        .map(|arr| {
            arr.iter()
                .filter_map(|item| item.as_str())
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect()
        })
        .unwrap_or_default();

    if items.is_empty() {
        vec![NOT_AVAILABLE.to_string()]
    } else {
        items
    }
}

fn percent_field(value: &JsonValue, key: &str, fallback: u8) -> u8 {
    value
        .get(key)
        .and_then(as_number)
        .filter(|n| n.is_finite())
        .map(|n| n.clamp(0.0, 100.0).round() as u8)
        .unwrap_or(fallback)
}

fn as_number(value: &JsonValue) -> Option<f64> {
    match value {
        JsonValue::Number(n) => n.as_f64(),
        JsonValue::String(s) => s.trim().trim_end_matches('%').parse().ok(),
        _ => None,
    }
}

fn coerce_job_suggestion(value: &JsonValue) -> Option<JobSuggestion> {
    let pick = |keys: &[&str]| -> Option<String> {
        keys.iter()
            .filter_map(|k| value.get(*k))
            .filter_map(|v| v.as_str())
            .map(str::trim)
            .find(|s| !s.is_empty())
            .map(String::from)
    };

    let title = pick(&["title", "titulo", "título", "cargo"])?;
    let requirements = ["requirements", "requisitos", "requisitos_principais", "requisitosPrincipais"]
        .iter()
        .find_map(|k| value.get(*k))
        .map(|v| match v {
            JsonValue::Array(items) => items
                .iter()
                .filter_map(|i| i.as_str())
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            JsonValue::String(s) => s
                .split(|c| c == ',' || c == ';')
                .map(|p| p.trim().to_string())
                .filter(|p| !p.is_empty())
                .collect(),
            _ => Vec::new(),
        })
        .unwrap_or_default();

    Some(JobSuggestion {
        title,
        company: pick(&["company", "empresa"]).unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        contract_type: pick(&["contractType", "tipo_contrato", "tipoContrato", "tipo_de_contrato"])
            .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        requirements,
        apply_url: pick(&["applyUrl", "link", "link_candidatura", "linkCandidatura", "url"])
            .unwrap_or_default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn likert(c: u8, e: u8, o: u8, a: u8, s: u8) -> AdvancedSection {
        AdvancedSection {
            conscientiousness: c,
            extraversion: e,
            openness: o,
            agreeableness: a,
            emotional_stability: s,
            ..Default::default()
        }
    }

    #[test]
    fn strips_fenced_json() {
        assert_eq!(strip_json_fences("```json\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_json_fences("```\n[1]\n```"), "[1]");
        assert_eq!(strip_json_fences("  {\"a\":1} "), "{\"a\":1}");
    }

    #[test]
    fn fallback_uses_placeholders_and_self_assessment() {
        let insights = fallback_insights(&likert(5, 1, 4, 2, 5));
        assert_eq!(insights.profile, NOT_AVAILABLE);
        assert_eq!(insights.enneagram_type.kind, None);
        assert_eq!(insights.behavioral_highlights.leadership, NOT_AVAILABLE);
        assert_eq!(insights.suggestions.standout_tips, vec![NOT_AVAILABLE.to_string()]);

        let big_five = insights.big_five_distribution;
        assert_eq!(big_five.conscientiousness, 100);
        assert_eq!(big_five.extraversion, 20);
        assert_eq!(big_five.openness, 80);
        assert_eq!(big_five.agreeableness, 40);
        assert_eq!(big_five.neuroticism, 20);
    }

    #[test]
    fn well_formed_answer_is_kept() {
        let raw = json!({
            "profile": "Perfil analítico",
            "profileSummary": "Resumo",
            "enneagramType": {"type": 5, "name": "O Investigador", "description": "Curioso"},
            "bigFiveDistribution": {
                "openness": 90, "conscientiousness": 70, "extraversion": 30,
                "agreeableness": 60, "neuroticism": 25
            },
            "behavioralHighlights": {
                "communication": "Clara", "decision": "Baseada em dados",
                "leadership": "Técnica", "problemSolving": "Sistemática",
                "adaptability": "Alta"
            },
            "suggestions": {
                "recommendedPositions": ["Analista de Dados"],
                "standoutTips": ["Mostre projetos"],
                "developmentAreas": ["Oratória"]
            }
        });
        let insights = normalize_insights(&raw, &AdvancedSection::default());
        assert_eq!(insights.profile, "Perfil analítico");
        assert_eq!(insights.enneagram_type.kind, Some(5));
        assert_eq!(insights.enneagram_type.name, "O Investigador");
        assert_eq!(insights.big_five_distribution.openness, 90);
        assert_eq!(insights.big_five_distribution.neuroticism, 25);
        assert_eq!(insights.behavioral_highlights.decision, "Baseada em dados");
        assert_eq!(
            insights.suggestions.recommended_positions,
            vec!["Analista de Dados".to_string()]
        );
    }

    #[test]
    fn malformed_fields_are_repaired_individually() {
        let raw = json!({
            "profile": 42,
            "profileSummary": "   ",
            "enneagramType": {"type": 12, "name": "Tipo"},
            "bigFiveDistribution": {"openness": 140, "conscientiousness": -3, "extraversion": "55%"},
            "suggestions": {"recommendedPositions": [], "standoutTips": "nope"}
        });
        let insights = normalize_insights(&raw, &likert(3, 3, 3, 4, 2));
        assert_eq!(insights.profile, NOT_AVAILABLE);
        assert_eq!(insights.profile_summary, NOT_AVAILABLE);
        assert_eq!(insights.enneagram_type.kind, None);
        assert_eq!(insights.enneagram_type.name, "Tipo");
        assert_eq!(insights.enneagram_type.description, NOT_AVAILABLE);

        let big_five = &insights.big_five_distribution;
        assert_eq!(big_five.openness, 100);
        assert_eq!(big_five.conscientiousness, 0);
        assert_eq!(big_five.extraversion, 55);
        assert_eq!(big_five.agreeableness, 80);
        assert_eq!(big_five.neuroticism, 80);

        assert_eq!(insights.behavioral_highlights.communication, NOT_AVAILABLE);
        assert_eq!(
            insights.suggestions.recommended_positions,
            vec![NOT_AVAILABLE.to_string()]
        );
        assert_eq!(insights.suggestions.standout_tips, vec![NOT_AVAILABLE.to_string()]);
    }

    #[test]
    fn job_suggestions_accept_portuguese_keys() {
        let raw = json!({
            "titulo": "Desenvolvedor Rust",
            "empresa": "Acme",
            "tipo_contrato": "CLT",
            "requisitos": "Rust, SQL; Docker",
            "link": "https://example.com/vaga"
        });
        let job = coerce_job_suggestion(&raw).unwrap();
        assert_eq!(job.title, "Desenvolvedor Rust");
        assert_eq!(job.company, "Acme");
        assert_eq!(job.contract_type, "CLT");
        assert_eq!(job.requirements, vec!["Rust", "SQL", "Docker"]);
        assert_eq!(job.apply_url, "https://example.com/vaga");
    }

    #[test]
    fn job_suggestion_without_title_is_dropped() {
        assert!(coerce_job_suggestion(&json!({"empresa": "Acme"})).is_none());
    }

    #[tokio::test]
    async fn missing_api_key_short_circuits_to_fallback() {
        let service = AIService::new(
            None,
            "gemini-1.5-flash".to_string(),
            "http://127.0.0.1:9".to_string(),
            Client::new(),
        );
        let insights = service
            .generate_behavioral_insights(&BehavioralAnalysis::default())
            .await;
        assert_eq!(insights.profile, NOT_AVAILABLE);
        assert_eq!(insights.big_five_distribution.openness, 60);
    }
}
