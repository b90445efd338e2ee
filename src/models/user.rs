use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserType {
    Candidate,
    Company,
}

impl UserType {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserType::Candidate => "candidate",
            UserType::Company => "company",
        }
    }

    pub fn dashboard_url(&self) -> &'static str {
        match self {
            UserType::Candidate => "/dashboard/candidate",
            UserType::Company => "/dashboard/company",
        }
    }
}

impl FromStr for UserType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "candidate" => Ok(UserType::Candidate),
            "company" => Ok(UserType::Company),
            other => Err(format!("Unknown user type: {}", other)),
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub id: String,
    pub email: String,
    pub password_hash: String,
    pub user_type: String,
    pub document: String,
    pub full_name: String,
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    #[serde(skip)]
    pub password_hash: String,
    pub user_type: UserType,
    /// CPF for candidates, CNPJ for companies; digits only.
    #[serde(rename = "cpfOrCnpj")]
    pub document: String,
    pub full_name: String,
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = crate::error::Error;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let user_type = row
            .user_type
            .parse()
            .map_err(crate::error::Error::Internal)?;
        Ok(Self {
            id: row.id,
            email: row.email,
            password_hash: row.password_hash,
            user_type,
            document: row.document,
            full_name: row.full_name,
            is_verified: row.is_verified,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}
