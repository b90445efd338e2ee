use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::behavioral::{BehavioralAnalysis, BehavioralInsights};
use crate::models::candidate::{CandidatePersonalData, CandidateSkills};

/// Body of the legacy questionnaire submission.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SubmitProfilePayload {
    pub personal: Option<CandidatePersonalData>,
    #[validate(nested)]
    pub behavioral_analysis: BehavioralAnalysis,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitProfileResponse {
    pub message: String,
    pub id: String,
    pub insights: BehavioralInsights,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResponse {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub skills: CandidateSkills,
    pub linkedin: Option<String>,
    pub portfolio: Option<String>,
    pub career_goal: String,
    pub profile_completion: u8,
    pub behavioral_analysis: Option<BehavioralAnalysis>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct JobSearchPayload {
    #[serde(alias = "cargo")]
    #[validate(length(min = 1))]
    pub role: String,
    #[serde(alias = "cidade")]
    #[validate(length(min = 1))]
    pub city: String,
}
