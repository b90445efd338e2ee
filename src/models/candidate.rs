use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::behavioral::BehavioralAnalysis;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CandidatePersonalData {
    pub cpf: String,
    pub full_name: String,
    pub birth_date: String,
    pub gender: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub cep: String,
    pub about: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_image: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CandidateExperience {
    pub id: String,
    pub title: String,
    pub company: String,
    pub start_date: String,
    pub end_date: Option<String>,
    pub is_current: bool,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CandidateEducation {
    pub id: String,
    pub degree: String,
    pub institution: String,
    pub completion_year: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CandidateCourse {
    pub id: String,
    pub name: String,
    pub institution: String,
    pub hours: u32,
    pub year: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CandidateLanguage {
    pub id: String,
    pub name: String,
    pub level: String,
    pub proficiency: u8,
    pub certification: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CandidateSkills {
    pub technical: Vec<String>,
    pub soft: Vec<String>,
}

impl CandidateSkills {
    pub fn is_empty(&self) -> bool {
        self.technical.is_empty() && self.soft.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CandidateDocuments {
    pub resume: Option<String>,
    pub portfolio: Option<String>,
    pub linkedin: Option<String>,
    pub github: Option<String>,
}

/// A candidate profile, keyed by the digit-only CPF in `personal.cpf`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CandidateData {
    pub personal: CandidatePersonalData,
    pub experiences: Vec<CandidateExperience>,
    pub education: Vec<CandidateEducation>,
    pub courses: Vec<CandidateCourse>,
    pub languages: Vec<CandidateLanguage>,
    pub skills: CandidateSkills,
    pub documents: CandidateDocuments,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub behavioral_analysis: Option<BehavioralAnalysis>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl CandidateData {
    pub fn empty(personal: CandidatePersonalData) -> Self {
        Self {
            personal,
            ..Default::default()
        }
    }
}
