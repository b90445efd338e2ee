use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use sqlx::types::Json;
use sqlx::FromRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Application,
    Interview,
    ProfileView,
    JobUpdate,
    System,
    Message,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::Application => "application",
            NotificationKind::Interview => "interview",
            NotificationKind::ProfileView => "profile_view",
            NotificationKind::JobUpdate => "job_update",
            NotificationKind::System => "system",
            NotificationKind::Message => "message",
        }
    }

    fn parse(s: &str) -> Self {
        match s {
            "application" => NotificationKind::Application,
            "interview" => NotificationKind::Interview,
            "profile_view" => NotificationKind::ProfileView,
            "job_update" => NotificationKind::JobUpdate,
            "message" => NotificationKind::Message,
            _ => NotificationKind::System,
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct NotificationRow {
    pub id: String,
    pub user_id: String,
    pub kind: String,
    pub title: String,
    pub message: String,
    pub data: Option<Json<JsonValue>>,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: String,
    pub user_id: String,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<JsonValue>,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

impl From<NotificationRow> for Notification {
    fn from(row: NotificationRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            kind: NotificationKind::parse(&row.kind),
            title: row.title,
            message: row.message,
            data: row.data.map(|d| d.0),
            is_read: row.is_read,
            created_at: row.created_at,
        }
    }
}
