use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use sqlx::{types::Json, SqliteConnection, SqlitePool};

use crate::database::tx::WriteTx;
use crate::error::{Error, Result};
use crate::models::company::CompanyData;
use crate::utils::document::{strip_non_digits, DocumentPolicy};
use crate::utils::time;

#[derive(Clone)]
pub struct CompanyService {
    pool: SqlitePool,
    policy: DocumentPolicy,
}

impl CompanyService {
    pub fn new(pool: SqlitePool, policy: DocumentPolicy) -> Self {
        Self { pool, policy }
    }

    pub async fn get_all(&self) -> Result<BTreeMap<String, CompanyData>> {
        let rows = sqlx::query_as::<_, (String, Json<CompanyData>)>(
            "SELECT cnpj, data FROM companies ORDER BY cnpj",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(|(cnpj, Json(data))| (cnpj, data)).collect())
    }

    pub async fn get(&self, cnpj: &str) -> Result<Option<CompanyData>> {
        let row = sqlx::query_scalar::<_, Json<CompanyData>>(
            "SELECT data FROM companies WHERE cnpj = ?",
        )
        .bind(strip_non_digits(cnpj))
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(|Json(data)| data))
    }

    pub async fn save(&self, mut data: CompanyData) -> Result<CompanyData> {
        let cnpj = strip_non_digits(&data.cnpj);
        if !self.policy.accepts_cnpj(&cnpj) {
            tracing::warn!(cnpj = %cnpj, "Rejected company record with invalid CNPJ");
            return Err(Error::BadRequest("Invalid CNPJ".to_string()));
        }
        data.cnpj = cnpj.clone();

        match self.store(&cnpj, data).await {
            Ok(saved) => Ok(saved),
            Err(e) => {
                tracing::error!(error = ?e, cnpj = %cnpj, "Failed to save company record");
                Err(e)
            }
        }
    }

    async fn store(&self, cnpj: &str, data: CompanyData) -> Result<CompanyData> {
        let mut tx = WriteTx::begin(&self.pool).await?;
        let result = store_record(&mut tx, cnpj, data).await;
        tx.finish(result).await
    }
}

async fn store_record(
    conn: &mut SqliteConnection,
    cnpj: &str,
    mut data: CompanyData,
) -> Result<CompanyData> {
    let existing_created = sqlx::query_scalar::<_, DateTime<Utc>>(
        "SELECT created_at FROM companies WHERE cnpj = ?",
    )
    .bind(cnpj)
    .fetch_optional(&mut *conn)
    .await?;

    let now = time::now();
    let created_at = existing_created.or(data.created_at).unwrap_or(now);
    data.created_at = Some(created_at);
    data.updated_at = Some(now);

    sqlx::query(
        r#"
        INSERT INTO companies (cnpj, name, data, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?)
        ON CONFLICT(cnpj) DO UPDATE SET
            name = excluded.name,
            data = excluded.data,
            updated_at = excluded.updated_at
        "#,
    )
    .bind(cnpj)
    .bind(&data.name)
    .bind(Json(&data))
    .bind(created_at)
    .bind(now)
    .execute(&mut *conn)
    .await?;

    Ok(data)
}
