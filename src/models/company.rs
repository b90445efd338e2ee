use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A company profile, keyed by the digit-only CNPJ.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CompanyData {
    pub cnpj: String,
    pub name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub cep: String,
    pub founded_year: String,
    pub employee_count: String,
    pub about: String,
    pub email: String,
    pub phone: String,
    pub website: Option<String>,
    pub industry: String,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}
