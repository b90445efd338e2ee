use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use validator::Validate;

use crate::models::application::{ApplicationStatus, StageDecision};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApplyPayload {
    #[serde(default)]
    pub answers: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AdvanceStagePayload {
    #[validate(length(min = 1))]
    pub stage: String,
    #[serde(default)]
    pub decision: StageDecision,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetApplicationStatusPayload {
    pub status: ApplicationStatus,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StageQuery {
    pub stage: Option<String>,
}
