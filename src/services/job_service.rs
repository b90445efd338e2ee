use sqlx::{types::Json, SqliteConnection, SqlitePool};

use crate::database::tx::WriteTx;
use crate::dto::job_dto::{CreateJobPayload, UpdateJobPayload};
use crate::error::{Error, Result};
use crate::models::job::{Job, JobStatus};
use crate::utils::document::strip_non_digits;
use crate::utils::{id::timestamp_id, time};

#[derive(Clone)]
pub struct JobService {
    pool: SqlitePool,
}

impl JobService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, company_cnpj: &str, payload: CreateJobPayload) -> Result<Job> {
        let now = time::now();
        let job = Job {
            id: timestamp_id(),
            company_cnpj: strip_non_digits(company_cnpj),
            title: payload.title,
            area: payload.area,
            contract_type: payload.contract_type,
            work_model: payload.work_model,
            city: payload.city,
            salary: payload.salary,
            vacancies: payload.vacancies,
            description: payload.description,
            requirements: payload.requirements,
            benefits: payload.benefits,
            status: JobStatus::Active,
            stages: clean_list(payload.stages),
            questions: clean_list(payload.questions),
            created_at: now,
            updated_at: now,
            published_at: Some(now),
            closed_at: None,
        };

        sqlx::query(
            r#"
            INSERT INTO jobs (id, company_cnpj, status, data, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&job.id)
        .bind(&job.company_cnpj)
        .bind(job.status.as_str())
        .bind(Json(&job))
        .bind(job.created_at)
        .bind(job.updated_at)
        .execute(&self.pool)
        .await?;

        tracing::info!(job_id = %job.id, cnpj = %job.company_cnpj, "Job created");
        Ok(job)
    }

    pub async fn get(&self, id: &str) -> Result<Option<Job>> {
        let row = sqlx::query_scalar::<_, Json<Job>>("SELECT data FROM jobs WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|Json(job)| job))
    }

    pub async fn list_by_company(&self, cnpj: &str, status: Option<JobStatus>) -> Result<Vec<Job>> {
        let cnpj = strip_non_digits(cnpj);
        let rows = match status {
            Some(status) => {
                sqlx::query_scalar::<_, Json<Job>>(
                    "SELECT data FROM jobs WHERE company_cnpj = ? AND status = ? ORDER BY created_at DESC, id DESC",
                )
                .bind(&cnpj)
                .bind(status.as_str())
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_scalar::<_, Json<Job>>(
                    "SELECT data FROM jobs WHERE company_cnpj = ? ORDER BY created_at DESC, id DESC",
                )
                .bind(&cnpj)
                .fetch_all(&self.pool)
                .await?
            }
        };
        Ok(rows.into_iter().map(|Json(job)| job).collect())
    }

    /// Every active posting, newest first.
    pub async fn list_active(&self) -> Result<Vec<Job>> {
        let rows = sqlx::query_scalar::<_, Json<Job>>(
            "SELECT data FROM jobs WHERE status = ? ORDER BY created_at DESC, id DESC",
        )
        .bind(JobStatus::Active.as_str())
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(|Json(job)| job).collect())
    }

    pub async fn update(&self, id: &str, owner_cnpj: &str, payload: UpdateJobPayload) -> Result<Job> {
        self.mutate(id, owner_cnpj, |job| {
            if let Some(title) = payload.title {
                job.title = title;
            }
            if let Some(area) = payload.area {
                job.area = area;
            }
            if let Some(contract_type) = payload.contract_type {
                job.contract_type = contract_type;
            }
            if let Some(work_model) = payload.work_model {
                job.work_model = work_model;
            }
            if let Some(city) = payload.city {
                job.city = city;
            }
            if let Some(salary) = payload.salary {
                job.salary = salary;
            }
            if let Some(vacancies) = payload.vacancies {
                job.vacancies = vacancies;
            }
            if let Some(description) = payload.description {
                job.description = description;
            }
            if let Some(requirements) = payload.requirements {
                job.requirements = requirements;
            }
            if let Some(benefits) = payload.benefits {
                job.benefits = Some(benefits);
            }
            if let Some(stages) = payload.stages {
                job.stages = clean_list(stages);
            }
            if let Some(questions) = payload.questions {
                job.questions = clean_list(questions);
            }
        })
        .await
    }

    /// Closing stamps `closed_at`; reopening clears it.
    pub async fn update_status(&self, id: &str, owner_cnpj: &str, status: JobStatus) -> Result<Job> {
        let job = self
            .mutate(id, owner_cnpj, |job| {
                job.status = status;
                match status {
                    JobStatus::Closed => job.closed_at = Some(time::now()),
                    JobStatus::Active => {
                        job.closed_at = None;
                        job.published_at = job.published_at.or(Some(time::now()));
                    }
                }
            })
            .await?;
        tracing::info!(job_id = %job.id, status = status.as_str(), "Job status changed");
        Ok(job)
    }

    pub async fn delete(&self, id: &str, owner_cnpj: &str) -> Result<()> {
        let job = self
            .get(id)
            .await?
            .ok_or_else(|| Error::NotFound("Job not found".to_string()))?;
        ensure_owner(&job, owner_cnpj)?;

        sqlx::query("DELETE FROM jobs WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        tracing::info!(job_id = %id, "Job deleted");
        Ok(())
    }

    async fn mutate<F>(&self, id: &str, owner_cnpj: &str, apply: F) -> Result<Job>
    where
        F: FnOnce(&mut Job),
    {
        let mut tx = WriteTx::begin(&self.pool).await?;
        let result = mutate_job(&mut tx, id, owner_cnpj, apply).await;
        tx.finish(result).await
    }
}

async fn mutate_job<F>(
    conn: &mut SqliteConnection,
    id: &str,
    owner_cnpj: &str,
    apply: F,
) -> Result<Job>
where
    F: FnOnce(&mut Job),
{
    let Json(mut job) = sqlx::query_scalar::<_, Json<Job>>("SELECT data FROM jobs WHERE id = ?")
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or_else(|| Error::NotFound("Job not found".to_string()))?;
    ensure_owner(&job, owner_cnpj)?;

    apply(&mut job);
    job.updated_at = time::now();

    sqlx::query("UPDATE jobs SET status = ?, data = ?, updated_at = ? WHERE id = ?")
        .bind(job.status.as_str())
        .bind(Json(&job))
        .bind(job.updated_at)
        .bind(&job.id)
        .execute(&mut *conn)
        .await?;
    Ok(job)
}

fn ensure_owner(job: &Job, owner_cnpj: &str) -> Result<()> {
    if job.company_cnpj != strip_non_digits(owner_cnpj) {
        return Err(Error::Forbidden(
            "Job belongs to another company".to_string(),
        ));
    }
    Ok(())
}

fn clean_list(items: Vec<String>) -> Vec<String> {
    items
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
