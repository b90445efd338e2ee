use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

pub const DEFAULT_FIRST_STAGE: &str = "Triagem";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Active,
    Closed,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Active => "active",
            JobStatus::Closed => "closed",
        }
    }
}

impl FromStr for JobStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "active" => Ok(JobStatus::Active),
            "closed" => Ok(JobStatus::Closed),
            other => Err(format!("Unknown job status: {}", other)),
        }
    }
}

/// A job posting owned by the company with `company_cnpj`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: String,
    pub company_cnpj: String,
    pub title: String,
    pub area: String,
    /// CLT, PJ, Freelancer, Estágio
    pub contract_type: String,
    /// Presencial, Remoto, Híbrido
    pub work_model: String,
    pub city: String,
    pub salary: String,
    pub vacancies: u32,
    pub description: String,
    pub requirements: String,
    pub benefits: Option<String>,
    pub status: JobStatus,
    /// Ordered pipeline stage names.
    pub stages: Vec<String>,
    /// Ordered screening questions.
    pub questions: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub published_at: Option<DateTime<Utc>>,
    pub closed_at: Option<DateTime<Utc>>,
}

impl Job {
    pub fn first_stage(&self) -> String {
        self.stages
            .iter()
            .map(|s| s.trim())
            .find(|s| !s.is_empty())
            .unwrap_or(DEFAULT_FIRST_STAGE)
            .to_string()
    }
}
