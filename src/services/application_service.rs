use std::collections::BTreeMap;

use serde_json::json;
use sqlx::{types::Json, SqliteConnection, SqlitePool};

use crate::database::tx::WriteTx;
use crate::dto::candidate_dto::CandidateStatistics;
use crate::error::{Error, Result};
use crate::models::application::{
    ApplicationStatus, JobApplication, StageDecision, StageStatus, StageTransition,
};
use crate::models::job::JobStatus;
use crate::models::notification::NotificationKind;
use crate::services::candidate_service::CandidateService;
use crate::services::job_service::JobService;
use crate::services::notification_service::NotificationService;
use crate::services::user_service::UserService;
use crate::utils::document::strip_non_digits;
use crate::utils::{id::prefixed_id, time};

pub const DEFAULT_RECENT_LIMIT: u32 = 5;

#[derive(Clone)]
pub struct ApplicationService {
    pool: SqlitePool,
    jobs: JobService,
    candidates: CandidateService,
    users: UserService,
    notifications: NotificationService,
}

impl ApplicationService {
    pub fn new(
        pool: SqlitePool,
        jobs: JobService,
        candidates: CandidateService,
        users: UserService,
        notifications: NotificationService,
    ) -> Self {
        Self {
            pool,
            jobs,
            candidates,
            users,
            notifications,
        }
    }

    /// Creates the application in the job's first stage and tells the company.
    pub async fn apply(
        &self,
        job_id: &str,
        candidate_cpf: &str,
        answers: BTreeMap<String, String>,
    ) -> Result<JobApplication> {
        let job = self
            .jobs
            .get(job_id)
            .await?
            .ok_or_else(|| Error::NotFound("Job not found".to_string()))?;
        if job.status != JobStatus::Active {
            return Err(Error::BadRequest("Job is not active".to_string()));
        }

        let cpf = strip_non_digits(candidate_cpf);
        let candidate = self
            .candidates
            .get(&cpf)
            .await?
            .ok_or_else(|| Error::NotFound("Candidate not found".to_string()))?;

        let now = time::now();
        let first_stage = job.first_stage();
        let application = JobApplication {
            id: prefixed_id("app"),
            job_id: job.id.clone(),
            candidate_cpf: cpf.clone(),
            company_cnpj: job.company_cnpj.clone(),
            status: ApplicationStatus::Applied,
            current_stage: first_stage.clone(),
            stage_history: vec![StageTransition {
                stage: first_stage,
                status: StageStatus::Pending,
                date: now,
                notes: None,
            }],
            answers,
            applied_at: now,
            updated_at: now,
        };

        sqlx::query(
            r#"
            INSERT INTO applications
                (id, job_id, candidate_cpf, company_cnpj, status, current_stage, data, applied_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&application.id)
        .bind(&application.job_id)
        .bind(&application.candidate_cpf)
        .bind(&application.company_cnpj)
        .bind(application.status.as_str())
        .bind(&application.current_stage)
        .bind(Json(&application))
        .bind(application.applied_at)
        .bind(application.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                Error::Conflict("Already applied for this job".to_string())
            }
            other => Error::from(other),
        })?;

        tracing::info!(
            application_id = %application.id,
            job_id = %job.id,
            cpf = %cpf,
            "Application created"
        );

        let candidate_name = if candidate.personal.full_name.trim().is_empty() {
            "Um candidato".to_string()
        } else {
            candidate.personal.full_name.clone()
        };
        self.notify_document_owner(
            &job.company_cnpj,
            NotificationKind::Application,
            "Nova candidatura",
            &format!("{} se candidatou à vaga {}", candidate_name, job.title),
            &application,
        )
        .await;

        Ok(application)
    }

    pub async fn get(&self, id: &str) -> Result<Option<JobApplication>> {
        let row = sqlx::query_scalar::<_, Json<JobApplication>>(
            "SELECT data FROM applications WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(|Json(app)| app))
    }

    pub async fn list_by_candidate(&self, cpf: &str) -> Result<Vec<JobApplication>> {
        self.list_where("candidate_cpf = ?", &strip_non_digits(cpf), None)
            .await
    }

    pub async fn list_by_company(&self, cnpj: &str) -> Result<Vec<JobApplication>> {
        self.list_where("company_cnpj = ?", &strip_non_digits(cnpj), None)
            .await
    }

    pub async fn list_by_job(&self, job_id: &str) -> Result<Vec<JobApplication>> {
        self.list_where("job_id = ?", job_id, None).await
    }

    pub async fn list_by_job_stage(&self, job_id: &str, stage: &str) -> Result<Vec<JobApplication>> {
        self.list_where("job_id = ? AND current_stage = ?", job_id, Some(stage))
            .await
    }

    async fn list_where(
        &self,
        filter: &str,
        key: &str,
        stage: Option<&str>,
    ) -> Result<Vec<JobApplication>> {
        let sql = format!(
            "SELECT data FROM applications WHERE {} ORDER BY applied_at DESC, id DESC",
            filter
        );
        let mut query = sqlx::query_scalar::<_, Json<JobApplication>>(&sql).bind(key);
        if let Some(stage) = stage {
            query = query.bind(stage);
        }
        let rows = query.fetch_all(&self.pool).await?;
        Ok(rows.into_iter().map(|Json(app)| app).collect())
    }

    /// Closes the current stage with `decision` and opens `stage` as pending.
    pub async fn advance_stage(
        &self,
        id: &str,
        owner_cnpj: &str,
        stage: &str,
        decision: StageDecision,
        notes: Option<String>,
    ) -> Result<JobApplication> {
        let stage = stage.trim().to_string();
        if stage.is_empty() {
            return Err(Error::BadRequest("Stage is required".to_string()));
        }

        let application = self
            .mutate(id, owner_cnpj, |app| {
                let now = time::now();
                if let Some(last) = app.stage_history.last_mut() {
                    if last.status == StageStatus::Pending {
                        last.status = decision.into();
                    }
                }
                app.stage_history.push(StageTransition {
                    stage: stage.clone(),
                    status: StageStatus::Pending,
                    date: now,
                    notes,
                });
                app.current_stage = stage.clone();
                app.status = match decision {
                    StageDecision::Approved => ApplicationStatus::Reviewing,
                    StageDecision::Rejected => ApplicationStatus::Rejected,
                };
            })
            .await?;

        tracing::info!(
            application_id = %application.id,
            stage = %application.current_stage,
            status = application.status.as_str(),
            "Application stage advanced"
        );

        let (kind, title) = if application.is_interview_stage() {
            (NotificationKind::Interview, "Convite para entrevista")
        } else {
            (NotificationKind::JobUpdate, "Atualização da candidatura")
        };
        let job_title = self.job_title(&application.job_id).await;
        self.notify_document_owner(
            &application.candidate_cpf,
            kind,
            title,
            &format!(
                "Sua candidatura para {} avançou para a etapa {}",
                job_title, application.current_stage
            ),
            &application,
        )
        .await;

        Ok(application)
    }

    /// Final decision by the company.
    pub async fn set_status(
        &self,
        id: &str,
        owner_cnpj: &str,
        status: ApplicationStatus,
    ) -> Result<JobApplication> {
        let application = self
            .mutate(id, owner_cnpj, |app| {
                app.status = status;
                let closing = match status {
                    ApplicationStatus::Approved => Some(StageStatus::Approved),
                    ApplicationStatus::Rejected => Some(StageStatus::Rejected),
                    _ => None,
                };
                if let (Some(closing), Some(last)) = (closing, app.stage_history.last_mut()) {
                    if last.status == StageStatus::Pending {
                        last.status = closing;
                        last.date = time::now();
                    }
                }
            })
            .await?;

        tracing::info!(
            application_id = %application.id,
            status = status.as_str(),
            "Application status changed"
        );

        let job_title = self.job_title(&application.job_id).await;
        let message = match status {
            ApplicationStatus::Approved => format!("Parabéns! Você foi aprovado para a vaga {}", job_title),
            ApplicationStatus::Rejected => format!("Sua candidatura para {} não avançou desta vez", job_title),
            _ => format!("Sua candidatura para {} está em análise", job_title),
        };
        self.notify_document_owner(
            &application.candidate_cpf,
            NotificationKind::JobUpdate,
            "Atualização da candidatura",
            &message,
            &application,
        )
        .await;

        Ok(application)
    }

    pub async fn candidate_statistics(&self, cpf: &str) -> Result<CandidateStatistics> {
        let applications = self.list_by_candidate(cpf).await?;
        Ok(statistics_for(&applications))
    }

    /// Newest first.
    pub async fn recent_for_candidate(&self, cpf: &str, limit: u32) -> Result<Vec<JobApplication>> {
        let rows = sqlx::query_scalar::<_, Json<JobApplication>>(
            "SELECT data FROM applications WHERE candidate_cpf = ? ORDER BY applied_at DESC, id DESC LIMIT ?",
        )
        .bind(strip_non_digits(cpf))
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(|Json(app)| app).collect())
    }

    async fn mutate<F>(&self, id: &str, owner_cnpj: &str, apply: F) -> Result<JobApplication>
    where
        F: FnOnce(&mut JobApplication),
    {
        let mut tx = WriteTx::begin(&self.pool).await?;
        let result = mutate_application(&mut tx, id, owner_cnpj, apply).await;
        tx.finish(result).await
    }

    async fn job_title(&self, job_id: &str) -> String {
        match self.jobs.get(job_id).await {
            Ok(Some(job)) => job.title,
            _ => "a vaga".to_string(),
        }
    }

    /// Best effort: a missing account or a failed insert is logged, never returned.
    async fn notify_document_owner(
        &self,
        document: &str,
        kind: NotificationKind,
        title: &str,
        message: &str,
        application: &JobApplication,
    ) {
        let user = match self.users.get_by_document(document).await {
            Ok(Some(user)) => user,
            Ok(None) => {
                tracing::debug!(document = %document, "No account to notify");
                return;
            }
            Err(e) => {
                tracing::warn!(error = ?e, "Could not look up notification recipient");
                return;
            }
        };

        let data = json!({
            "applicationId": application.id,
            "jobId": application.job_id,
            "stage": application.current_stage,
        });
        if let Err(e) = self
            .notifications
            .create(&user.id, kind, title, message, Some(data))
            .await
        {
            tracing::warn!(error = ?e, user_id = %user.id, "Failed to create notification");
        }
    }
}

async fn mutate_application<F>(
    conn: &mut SqliteConnection,
    id: &str,
    owner_cnpj: &str,
    apply: F,
) -> Result<JobApplication>
where
    F: FnOnce(&mut JobApplication),
{
    let Json(mut application) = sqlx::query_scalar::<_, Json<JobApplication>>(
        "SELECT data FROM applications WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?
    .ok_or_else(|| Error::NotFound("Application not found".to_string()))?;

    if application.company_cnpj != strip_non_digits(owner_cnpj) {
        return Err(Error::Forbidden(
            "Application belongs to another company".to_string(),
        ));
    }

    apply(&mut application);
    application.updated_at = time::now();

    sqlx::query(
        "UPDATE applications SET status = ?, current_stage = ?, data = ?, updated_at = ? WHERE id = ?",
    )
    .bind(application.status.as_str())
    .bind(&application.current_stage)
    .bind(Json(&application))
    .bind(application.updated_at)
    .bind(&application.id)
    .execute(&mut *conn)
    .await?;
    Ok(application)
}

pub fn statistics_for(applications: &[JobApplication]) -> CandidateStatistics {
    let total = applications.len() as u32;
    let interviews = applications
        .iter()
        .filter(|app| app.is_interview_stage())
        .count() as u32;
    let not_rejected = applications
        .iter()
        .filter(|app| app.status != ApplicationStatus::Rejected)
        .count() as u32;
    let match_rate = if total > 0 {
        (not_rejected * 100 / total) as u8
    } else {
        0
    };
    CandidateStatistics {
        applications: total,
        interviews,
        match_rate,
    }
}
