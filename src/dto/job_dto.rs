use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::job::JobStatus;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateJobPayload {
    #[validate(length(min = 1))]
    pub title: String,
    #[serde(default)]
    pub area: String,
    #[validate(length(min = 1))]
    pub contract_type: String,
    #[validate(length(min = 1))]
    pub work_model: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub salary: String,
    #[validate(range(min = 1))]
    #[serde(default = "one")]
    pub vacancies: u32,
    #[validate(length(min = 1))]
    pub description: String,
    #[serde(default)]
    pub requirements: String,
    pub benefits: Option<String>,
    #[serde(default)]
    pub stages: Vec<String>,
    #[serde(default)]
    pub questions: Vec<String>,
}

fn one() -> u32 {
    1
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateJobPayload {
    #[validate(length(min = 1))]
    pub title: Option<String>,
    pub area: Option<String>,
    #[validate(length(min = 1))]
    pub contract_type: Option<String>,
    #[validate(length(min = 1))]
    pub work_model: Option<String>,
    pub city: Option<String>,
    pub salary: Option<String>,
    #[validate(range(min = 1))]
    pub vacancies: Option<u32>,
    #[validate(length(min = 1))]
    pub description: Option<String>,
    pub requirements: Option<String>,
    pub benefits: Option<String>,
    pub stages: Option<Vec<String>>,
    pub questions: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateJobStatusPayload {
    pub status: JobStatus,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct JobListQuery {
    pub status: Option<JobStatus>,
}
