use axum::{
    extract::{Path, State},
    response::{IntoResponse, Json},
    Extension,
};
use validator::Validate;

use crate::{
    dto::application_dto::{AdvanceStagePayload, SetApplicationStatusPayload},
    error::{Error, Result},
    middleware::auth::Session,
    models::user::UserType,
    AppState,
};

/// Visible to the applicant and to the hiring company.
#[axum::debug_handler]
pub async fn get_application(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let application = state
        .application_service
        .get(&id)
        .await?
        .ok_or_else(|| Error::NotFound("Application not found".to_string()))?;

    let owner = match session.user_type {
        UserType::Candidate => &application.candidate_cpf,
        UserType::Company => &application.company_cnpj,
    };
    if *owner != session.document {
        return Err(Error::Forbidden(
            "Application belongs to someone else".to_string(),
        ));
    }
    Ok(Json(application))
}

#[utoipa::path(
    post,
    path = "/api/applications/{id}/stage",
    params(("id" = String, Path, description = "Application ID")),
    request_body = AdvanceStagePayload,
    responses(
        (status = 200, description = "Stage advanced", body = JobApplication),
        (status = 403, description = "Application belongs to another company"),
        (status = 404, description = "Application not found")
    )
)]
#[axum::debug_handler]
pub async fn advance_stage(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(id): Path<String>,
    Json(payload): Json<AdvanceStagePayload>,
) -> Result<impl IntoResponse> {
    let cnpj = session.company_cnpj()?.to_string();
    payload.validate()?;
    let application = state
        .application_service
        .advance_stage(&id, &cnpj, &payload.stage, payload.decision, payload.notes)
        .await?;
    Ok(Json(application))
}

#[axum::debug_handler]
pub async fn set_status(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(id): Path<String>,
    Json(payload): Json<SetApplicationStatusPayload>,
) -> Result<impl IntoResponse> {
    let cnpj = session.company_cnpj()?.to_string();
    let application = state
        .application_service
        .set_status(&id, &cnpj, payload.status)
        .await?;
    Ok(Json(application))
}
