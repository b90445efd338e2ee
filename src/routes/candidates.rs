use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use validator::Validate;

use crate::{
    dto::candidate_dto::{
        CompletionResponse, CoursePayload, EducationPayload, ExperiencePayload, LanguagePayload,
        RecentApplication, RecentApplicationsQuery, UpdateEducationPayload,
        UpdateExperiencePayload,
    },
    error::{Error, Result},
    middleware::auth::Session,
    models::behavioral::BehavioralAnalysis,
    models::candidate::{CandidateData, CandidateDocuments, CandidatePersonalData, CandidateSkills},
    services::application_service::DEFAULT_RECENT_LIMIT,
    utils::document::strip_non_digits,
    AppState,
};

#[utoipa::path(
    get,
    path = "/api/candidates/{cpf}",
    params(("cpf" = String, Path, description = "Candidate CPF, formatted or digits")),
    responses(
        (status = 200, description = "Candidate record", body = CandidateData),
        (status = 403, description = "Not allowed to read this record"),
        (status = 404, description = "Candidate not found")
    )
)]
#[axum::debug_handler]
pub async fn get_candidate(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(cpf): Path<String>,
) -> Result<impl IntoResponse> {
    session.ensure_can_read_candidate(&cpf)?;
    let data = state
        .candidate_service
        .get(&cpf)
        .await?
        .ok_or_else(|| Error::NotFound("Candidate not found".to_string()))?;
    Ok(Json(data))
}

#[utoipa::path(
    put,
    path = "/api/candidates/{cpf}",
    params(("cpf" = String, Path, description = "Candidate CPF")),
    request_body = CandidateData,
    responses(
        (status = 200, description = "Record saved", body = CandidateData),
        (status = 400, description = "Invalid CPF or payload"),
        (status = 403, description = "Not the owner of this record")
    )
)]
#[axum::debug_handler]
pub async fn save_candidate(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(cpf): Path<String>,
    Json(mut data): Json<CandidateData>,
) -> Result<impl IntoResponse> {
    session.ensure_candidate(&cpf)?;
    if let Some(analysis) = &data.behavioral_analysis {
        analysis.validate()?;
    }
    data.personal.cpf = strip_non_digits(&cpf);
    let saved = state.candidate_service.save(data).await?;
    Ok(Json(saved))
}

#[axum::debug_handler]
pub async fn update_personal_data(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(cpf): Path<String>,
    Json(personal): Json<CandidatePersonalData>,
) -> Result<impl IntoResponse> {
    session.ensure_candidate(&cpf)?;
    let saved = state
        .candidate_service
        .update_personal_data(&cpf, personal)
        .await?;
    Ok(Json(saved))
}

#[axum::debug_handler]
pub async fn update_skills(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(cpf): Path<String>,
    Json(skills): Json<CandidateSkills>,
) -> Result<impl IntoResponse> {
    session.ensure_candidate(&cpf)?;
    let skills = state.candidate_service.update_skills(&cpf, skills).await?;
    Ok(Json(skills))
}

#[axum::debug_handler]
pub async fn update_documents(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(cpf): Path<String>,
    Json(documents): Json<CandidateDocuments>,
) -> Result<impl IntoResponse> {
    session.ensure_candidate(&cpf)?;
    let documents = state
        .candidate_service
        .update_documents(&cpf, documents)
        .await?;
    Ok(Json(documents))
}

#[axum::debug_handler]
pub async fn update_behavioral_analysis(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(cpf): Path<String>,
    Json(analysis): Json<BehavioralAnalysis>,
) -> Result<impl IntoResponse> {
    session.ensure_candidate(&cpf)?;
    analysis.validate()?;
    let saved = state
        .candidate_service
        .update_behavioral_analysis(&cpf, analysis)
        .await?;
    Ok(Json(saved.behavioral_analysis))
}

#[utoipa::path(
    post,
    path = "/api/candidates/{cpf}/behavioral-analysis/insights",
    params(("cpf" = String, Path, description = "Candidate CPF")),
    request_body = BehavioralAnalysis,
    responses(
        (status = 200, description = "Questionnaire stored with generated insights", body = BehavioralAnalysis),
        (status = 404, description = "Candidate not found")
    )
)]
#[axum::debug_handler]
pub async fn generate_insights(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(cpf): Path<String>,
    Json(analysis): Json<BehavioralAnalysis>,
) -> Result<impl IntoResponse> {
    session.ensure_candidate(&cpf)?;
    analysis.validate()?;
    let saved = state
        .ai_service
        .process_behavioral_analysis(&state.candidate_service, &cpf, analysis)
        .await?;
    Ok(Json(saved.behavioral_analysis))
}

#[axum::debug_handler]
pub async fn add_experience(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(cpf): Path<String>,
    Json(payload): Json<ExperiencePayload>,
) -> Result<impl IntoResponse> {
    session.ensure_candidate(&cpf)?;
    payload.validate()?;
    let experience = state.candidate_service.add_experience(&cpf, payload).await?;
    Ok((StatusCode::CREATED, Json(experience)))
}

#[axum::debug_handler]
pub async fn update_experience(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path((cpf, id)): Path<(String, String)>,
    Json(payload): Json<UpdateExperiencePayload>,
) -> Result<impl IntoResponse> {
    session.ensure_candidate(&cpf)?;
    payload.validate()?;
    let experience = state
        .candidate_service
        .update_experience(&cpf, &id, payload)
        .await?;
    Ok(Json(experience))
}

#[axum::debug_handler]
pub async fn delete_experience(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path((cpf, id)): Path<(String, String)>,
) -> Result<impl IntoResponse> {
    session.ensure_candidate(&cpf)?;
    state.candidate_service.delete_experience(&cpf, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[axum::debug_handler]
pub async fn add_education(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(cpf): Path<String>,
    Json(payload): Json<EducationPayload>,
) -> Result<impl IntoResponse> {
    session.ensure_candidate(&cpf)?;
    payload.validate()?;
    let education = state.candidate_service.add_education(&cpf, payload).await?;
    Ok((StatusCode::CREATED, Json(education)))
}

#[axum::debug_handler]
pub async fn update_education(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path((cpf, id)): Path<(String, String)>,
    Json(payload): Json<UpdateEducationPayload>,
) -> Result<impl IntoResponse> {
    session.ensure_candidate(&cpf)?;
    payload.validate()?;
    let education = state
        .candidate_service
        .update_education(&cpf, &id, payload)
        .await?;
    Ok(Json(education))
}

#[axum::debug_handler]
pub async fn delete_education(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path((cpf, id)): Path<(String, String)>,
) -> Result<impl IntoResponse> {
    session.ensure_candidate(&cpf)?;
    state.candidate_service.delete_education(&cpf, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[axum::debug_handler]
pub async fn add_course(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(cpf): Path<String>,
    Json(payload): Json<CoursePayload>,
) -> Result<impl IntoResponse> {
    session.ensure_candidate(&cpf)?;
    payload.validate()?;
    let course = state.candidate_service.add_course(&cpf, payload).await?;
    Ok((StatusCode::CREATED, Json(course)))
}

#[axum::debug_handler]
pub async fn delete_course(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path((cpf, id)): Path<(String, String)>,
) -> Result<impl IntoResponse> {
    session.ensure_candidate(&cpf)?;
    state.candidate_service.delete_course(&cpf, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[axum::debug_handler]
pub async fn add_language(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(cpf): Path<String>,
    Json(payload): Json<LanguagePayload>,
) -> Result<impl IntoResponse> {
    session.ensure_candidate(&cpf)?;
    payload.validate()?;
    let language = state.candidate_service.add_language(&cpf, payload).await?;
    Ok((StatusCode::CREATED, Json(language)))
}

#[axum::debug_handler]
pub async fn delete_language(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path((cpf, id)): Path<(String, String)>,
) -> Result<impl IntoResponse> {
    session.ensure_candidate(&cpf)?;
    state.candidate_service.delete_language(&cpf, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/candidates/{cpf}/completion",
    params(("cpf" = String, Path, description = "Candidate CPF")),
    responses(
        (status = 200, description = "Profile completion percentage", body = CompletionResponse),
        (status = 404, description = "Candidate not found")
    )
)]
#[axum::debug_handler]
pub async fn profile_completion(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(cpf): Path<String>,
) -> Result<impl IntoResponse> {
    session.ensure_can_read_candidate(&cpf)?;
    let completion = state.candidate_service.profile_completion(&cpf).await?;
    Ok(Json(CompletionResponse {
        cpf: strip_non_digits(&cpf),
        completion,
    }))
}

#[axum::debug_handler]
pub async fn statistics(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(cpf): Path<String>,
) -> Result<impl IntoResponse> {
    session.ensure_can_read_candidate(&cpf)?;
    let stats = state.application_service.candidate_statistics(&cpf).await?;
    Ok(Json(stats))
}

#[axum::debug_handler]
pub async fn recent_applications(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(cpf): Path<String>,
    Query(query): Query<RecentApplicationsQuery>,
) -> Result<impl IntoResponse> {
    session.ensure_candidate(&cpf)?;
    let limit = query.limit.unwrap_or(DEFAULT_RECENT_LIMIT).clamp(1, 100);
    let applications = state
        .application_service
        .recent_for_candidate(&cpf, limit)
        .await?;

    let mut items = Vec::with_capacity(applications.len());
    for application in applications {
        let job_title = state
            .job_service
            .get(&application.job_id)
            .await?
            .map(|job| job.title);
        items.push(RecentApplication {
            application,
            job_title,
        });
    }
    Ok(Json(items))
}
