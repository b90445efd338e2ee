use sqlx::SqlitePool;

use crate::error::Result;

const STORES: [&str; 6] = [
    "notifications",
    "applications",
    "jobs",
    "users",
    "companies",
    "candidates",
];

#[derive(Clone)]
pub struct MaintenanceService {
    pool: SqlitePool,
}

impl MaintenanceService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Empties every store in one transaction.
    pub async fn clear_all(&self) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        for table in STORES {
            let sql = format!("DELETE FROM {}", table);
            sqlx::query(&sql).execute(&mut *tx).await?;
        }
        tx.commit().await?;
        tracing::warn!("All stores cleared");
        Ok(())
    }
}
