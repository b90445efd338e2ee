use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Json},
    Extension,
};

use crate::{
    dto::job_dto::JobListQuery,
    error::{Error, Result},
    middleware::auth::Session,
    models::company::CompanyData,
    models::job::JobStatus,
    utils::document::strip_non_digits,
    AppState,
};

#[utoipa::path(
    get,
    path = "/api/companies/{cnpj}",
    params(("cnpj" = String, Path, description = "Company CNPJ, formatted or digits")),
    responses(
        (status = 200, description = "Company record", body = CompanyData),
        (status = 404, description = "Company not found")
    )
)]
#[axum::debug_handler]
pub async fn get_company(
    State(state): State<AppState>,
    Path(cnpj): Path<String>,
) -> Result<impl IntoResponse> {
    let data = state
        .company_service
        .get(&cnpj)
        .await?
        .ok_or_else(|| Error::NotFound("Company not found".to_string()))?;
    Ok(Json(data))
}

#[utoipa::path(
    put,
    path = "/api/companies/{cnpj}",
    params(("cnpj" = String, Path, description = "Company CNPJ")),
    request_body = CompanyData,
    responses(
        (status = 200, description = "Record saved", body = CompanyData),
        (status = 400, description = "Invalid CNPJ"),
        (status = 403, description = "Not the owner of this record")
    )
)]
#[axum::debug_handler]
pub async fn save_company(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(cnpj): Path<String>,
    Json(mut data): Json<CompanyData>,
) -> Result<impl IntoResponse> {
    session.ensure_company(&cnpj)?;
    data.cnpj = strip_non_digits(&cnpj);
    let saved = state.company_service.save(data).await?;
    Ok(Json(saved))
}

/// Other callers only see the company's active postings.
#[axum::debug_handler]
pub async fn list_company_jobs(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(cnpj): Path<String>,
    Query(query): Query<JobListQuery>,
) -> Result<impl IntoResponse> {
    let is_owner = session.ensure_company(&cnpj).is_ok();
    let status = if is_owner {
        query.status
    } else {
        Some(JobStatus::Active)
    };
    let jobs = state.job_service.list_by_company(&cnpj, status).await?;
    Ok(Json(jobs))
}

#[axum::debug_handler]
pub async fn list_company_applications(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(cnpj): Path<String>,
) -> Result<impl IntoResponse> {
    session.ensure_company(&cnpj)?;
    let applications = state.application_service.list_by_company(&cnpj).await?;
    Ok(Json(applications))
}
