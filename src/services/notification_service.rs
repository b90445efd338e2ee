use serde_json::Value as JsonValue;
use sqlx::{types::Json, SqlitePool};

use crate::error::{Error, Result};
use crate::models::notification::{Notification, NotificationKind, NotificationRow};
use crate::utils::{id::prefixed_id, time};

#[derive(Clone)]
pub struct NotificationService {
    pool: SqlitePool,
}

impl NotificationService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        user_id: &str,
        kind: NotificationKind,
        title: &str,
        message: &str,
        data: Option<JsonValue>,
    ) -> Result<Notification> {
        let notification = Notification {
            id: prefixed_id("notif"),
            user_id: user_id.to_string(),
            kind,
            title: title.to_string(),
            message: message.to_string(),
            data,
            is_read: false,
            created_at: time::now(),
        };

        sqlx::query(
            r#"
            INSERT INTO notifications (id, user_id, kind, title, message, data, is_read, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&notification.id)
        .bind(&notification.user_id)
        .bind(notification.kind.as_str())
        .bind(&notification.title)
        .bind(&notification.message)
        .bind(notification.data.as_ref().map(Json))
        .bind(notification.is_read)
        .bind(notification.created_at)
        .execute(&self.pool)
        .await?;

        tracing::debug!(
            notification_id = %notification.id,
            user_id = %user_id,
            kind = kind.as_str(),
            "Notification created"
        );
        Ok(notification)
    }

    /// Newest first.
    pub async fn list_for_user(&self, user_id: &str) -> Result<Vec<Notification>> {
        let rows = sqlx::query_as::<_, NotificationRow>(
            r#"
            SELECT id, user_id, kind, title, message, data, is_read, created_at
            FROM notifications
            WHERE user_id = ?
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Notification::from).collect())
    }

    pub async fn unread_count(&self, user_id: &str) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM notifications WHERE user_id = ? AND is_read = FALSE",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    /// Marks one notification as read. Only its recipient may do so.
    pub async fn mark_read(&self, notification_id: &str, user_id: &str) -> Result<()> {
        let owner = sqlx::query_scalar::<_, String>("SELECT user_id FROM notifications WHERE id = ?")
            .bind(notification_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Error::NotFound("Notification not found".to_string()))?;
        if owner != user_id {
            return Err(Error::Forbidden(
                "Notification belongs to another user".to_string(),
            ));
        }

        sqlx::query("UPDATE notifications SET is_read = TRUE WHERE id = ?")
            .bind(notification_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Returns true when at least one notification changed.
    pub async fn mark_all_read(&self, user_id: &str) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE notifications SET is_read = TRUE WHERE user_id = ? AND is_read = FALSE",
        )
        .bind(user_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
