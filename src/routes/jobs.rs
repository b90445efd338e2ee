use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use validator::Validate;

use crate::{
    dto::application_dto::{ApplyPayload, StageQuery},
    dto::job_dto::{CreateJobPayload, UpdateJobPayload, UpdateJobStatusPayload},
    error::{Error, Result},
    middleware::auth::Session,
    AppState,
};

#[utoipa::path(
    get,
    path = "/api/jobs",
    responses((status = 200, description = "Active job postings, newest first", body = [Job]))
)]
#[axum::debug_handler]
pub async fn list_active_jobs(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let jobs = state.job_service.list_active().await?;
    Ok(Json(jobs))
}

#[utoipa::path(
    get,
    path = "/api/jobs/{id}",
    params(("id" = String, Path, description = "Job ID")),
    responses(
        (status = 200, description = "Job posting", body = Job),
        (status = 404, description = "Job not found")
    )
)]
#[axum::debug_handler]
pub async fn get_job(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let job = state
        .job_service
        .get(&id)
        .await?
        .ok_or_else(|| Error::NotFound("Job not found".to_string()))?;
    Ok(Json(job))
}

#[utoipa::path(
    post,
    path = "/api/jobs",
    request_body = CreateJobPayload,
    responses(
        (status = 201, description = "Job created", body = Job),
        (status = 400, description = "Invalid payload"),
        (status = 403, description = "Only companies can post jobs")
    )
)]
#[axum::debug_handler]
pub async fn create_job(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Json(payload): Json<CreateJobPayload>,
) -> Result<impl IntoResponse> {
    let cnpj = session.company_cnpj()?.to_string();
    payload.validate()?;
    let job = state.job_service.create(&cnpj, payload).await?;
    Ok((StatusCode::CREATED, Json(job)))
}

#[utoipa::path(
    patch,
    path = "/api/jobs/{id}",
    params(("id" = String, Path, description = "Job ID")),
    request_body = UpdateJobPayload,
    responses(
        (status = 200, description = "Job updated", body = Job),
        (status = 403, description = "Job belongs to another company"),
        (status = 404, description = "Job not found")
    )
)]
#[axum::debug_handler]
pub async fn update_job(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateJobPayload>,
) -> Result<impl IntoResponse> {
    let cnpj = session.company_cnpj()?.to_string();
    payload.validate()?;
    let job = state.job_service.update(&id, &cnpj, payload).await?;
    Ok(Json(job))
}

#[axum::debug_handler]
pub async fn update_job_status(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateJobStatusPayload>,
) -> Result<impl IntoResponse> {
    let cnpj = session.company_cnpj()?.to_string();
    let job = state
        .job_service
        .update_status(&id, &cnpj, payload.status)
        .await?;
    Ok(Json(job))
}

#[utoipa::path(
    delete,
    path = "/api/jobs/{id}",
    params(("id" = String, Path, description = "Job ID")),
    responses(
        (status = 204, description = "Job deleted"),
        (status = 403, description = "Job belongs to another company"),
        (status = 404, description = "Job not found")
    )
)]
#[axum::debug_handler]
pub async fn delete_job(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let cnpj = session.company_cnpj()?.to_string();
    state.job_service.delete(&id, &cnpj).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[axum::debug_handler]
pub async fn list_job_applications(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(id): Path<String>,
    Query(query): Query<StageQuery>,
) -> Result<impl IntoResponse> {
    let cnpj = session.company_cnpj()?.to_string();
    let job = state
        .job_service
        .get(&id)
        .await?
        .ok_or_else(|| Error::NotFound("Job not found".to_string()))?;
    if job.company_cnpj != cnpj {
        return Err(Error::Forbidden(
            "Job belongs to another company".to_string(),
        ));
    }

    let applications = match query.stage.as_deref().map(str::trim) {
        Some(stage) if !stage.is_empty() => {
            state
                .application_service
                .list_by_job_stage(&id, stage)
                .await?
        }
        _ => state.application_service.list_by_job(&id).await?,
    };
    Ok(Json(applications))
}

#[utoipa::path(
    post,
    path = "/api/jobs/{id}/apply",
    params(("id" = String, Path, description = "Job ID")),
    request_body = ApplyPayload,
    responses(
        (status = 201, description = "Application created", body = JobApplication),
        (status = 400, description = "Job is not active"),
        (status = 404, description = "Job or candidate not found"),
        (status = 409, description = "Already applied for this job")
    )
)]
#[axum::debug_handler]
pub async fn apply_to_job(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(id): Path<String>,
    Json(payload): Json<ApplyPayload>,
) -> Result<impl IntoResponse> {
    let cpf = session.candidate_cpf()?.to_string();
    let application = state
        .application_service
        .apply(&id, &cpf, payload.answers)
        .await?;
    Ok((StatusCode::CREATED, Json(application)))
}
