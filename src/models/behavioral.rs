use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

pub const NOT_AVAILABLE: &str = "Não disponível";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct BehaviorSection {
    pub collaboration: String,
    pub problem_solving: String,
    pub communication: String,
    pub initiative: String,
    pub adaptation: String,
    pub influence: String,
    pub learning: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct ExpectationsSection {
    pub work_environment: Vec<String>,
    pub values: Vec<String>,
    pub career_goals: String,
}

/// Advanced section. The five Likert answers keep the wire names used by the
/// questionnaire form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct AdvancedSection {
    pub logical_reasoning: String,
    pub data_analysis: String,
    #[serde(rename = "bigFive0")]
    #[validate(range(min = 1, max = 5))]
    pub conscientiousness: u8,
    #[serde(rename = "bigFive1")]
    #[validate(range(min = 1, max = 5))]
    pub extraversion: u8,
    #[serde(rename = "bigFive2")]
    #[validate(range(min = 1, max = 5))]
    pub openness: u8,
    #[serde(rename = "bigFive3")]
    #[validate(range(min = 1, max = 5))]
    pub agreeableness: u8,
    #[serde(rename = "bigFive4")]
    #[validate(range(min = 1, max = 5))]
    pub emotional_stability: u8,
    pub interpersonal_skills: String,
    pub conflict_resolution: String,
    pub growth_mindset: String,
    pub adaptability: String,
    pub motivation: String,
    pub resilience: String,
    pub creativity: String,
    pub innovation: String,
    pub ethics: String,
    pub values: String,
}

impl Default for AdvancedSection {
    fn default() -> Self {
        Self {
            logical_reasoning: String::new(),
            data_analysis: String::new(),
            conscientiousness: 3,
            extraversion: 3,
            openness: 3,
            agreeableness: 3,
            emotional_stability: 3,
            interpersonal_skills: String::new(),
            conflict_resolution: String::new(),
            growth_mindset: String::new(),
            adaptability: String::new(),
            motivation: String::new(),
            resilience: String::new(),
            creativity: String::new(),
            innovation: String::new(),
            ethics: String::new(),
            values: String::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct BehavioralAnalysis {
    #[validate(nested)]
    pub section1: BehaviorSection,
    #[validate(nested)]
    pub section2: ExpectationsSection,
    #[validate(nested)]
    pub section3: AdvancedSection,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_insights: Option<BehavioralInsights>,
    pub completed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnneagramType {
    #[serde(rename = "type")]
    pub kind: Option<u8>,
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BigFiveDistribution {
    pub openness: u8,
    pub conscientiousness: u8,
    pub extraversion: u8,
    pub agreeableness: u8,
    pub neuroticism: u8,
}

impl BigFiveDistribution {
    /// Percentages derived from the 1..=5 self assessment. Neuroticism is the
    /// inverse of emotional stability.
    pub fn from_self_assessment(section: &AdvancedSection) -> Self {
        let pct = |score: u8| score.clamp(1, 5) * 20;
        Self {
            openness: pct(section.openness),
            conscientiousness: pct(section.conscientiousness),
            extraversion: pct(section.extraversion),
            agreeableness: pct(section.agreeableness),
            neuroticism: pct(6 - section.emotional_stability.clamp(1, 5)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BehavioralHighlights {
    pub communication: String,
    pub decision: String,
    pub leadership: String,
    pub problem_solving: String,
    pub adaptability: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CareerSuggestions {
    pub recommended_positions: Vec<String>,
    pub standout_tips: Vec<String>,
    pub development_areas: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BehavioralInsights {
    pub profile: String,
    pub profile_summary: String,
    pub enneagram_type: EnneagramType,
    pub big_five_distribution: BigFiveDistribution,
    pub behavioral_highlights: BehavioralHighlights,
    pub suggestions: CareerSuggestions,
}
