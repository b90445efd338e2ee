//! Endpoints kept for the React questionnaire client.

use axum::{
    extract::State,
    response::{IntoResponse, Json},
    Extension,
};
use validator::Validate;

use crate::{
    dto::analysis_dto::{
        AnalysisResponse, JobSearchPayload, SubmitProfilePayload, SubmitProfileResponse,
    },
    error::{Error, Result},
    middleware::auth::Session,
    models::behavioral::NOT_AVAILABLE,
    utils::completion::calculate_profile_completion,
    AppState,
};

#[utoipa::path(
    post,
    path = "/submit-profile",
    request_body = SubmitProfilePayload,
    responses(
        (status = 200, description = "Profile stored with generated insights", body = SubmitProfileResponse),
        (status = 403, description = "Only candidates can submit a profile")
    )
)]
#[axum::debug_handler]
pub async fn submit_profile(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Json(payload): Json<SubmitProfilePayload>,
) -> Result<impl IntoResponse> {
    let cpf = session.candidate_cpf()?.to_string();
    payload.validate()?;

    if let Some(personal) = payload.personal {
        state
            .candidate_service
            .update_personal_data(&cpf, personal)
            .await?;
    } else if !state.candidate_service.exists(&cpf).await? {
        return Err(Error::NotFound("Candidate not found".to_string()));
    }

    let saved = state
        .ai_service
        .process_behavioral_analysis(&state.candidate_service, &cpf, payload.behavioral_analysis)
        .await?;
    let insights = saved
        .behavioral_analysis
        .and_then(|analysis| analysis.ai_insights)
        .ok_or_else(|| Error::Internal("Insights were not stored".to_string()))?;

    Ok(Json(SubmitProfileResponse {
        message: "Perfil salvo com sucesso!".to_string(),
        id: cpf,
        insights,
    }))
}

#[utoipa::path(
    get,
    path = "/get-analysis",
    responses(
        (status = 200, description = "Stored profile and analysis of the signed-in candidate", body = AnalysisResponse),
        (status = 404, description = "Candidate not found")
    )
)]
#[axum::debug_handler]
pub async fn get_analysis(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
) -> Result<impl IntoResponse> {
    let cpf = session.candidate_cpf()?;
    let data = state
        .candidate_service
        .get(cpf)
        .await?
        .ok_or_else(|| Error::NotFound("Candidate not found".to_string()))?;

    let career_goal = data
        .behavioral_analysis
        .as_ref()
        .map(|a| a.section2.career_goals.trim().to_string())
        .filter(|g| !g.is_empty())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string());

    Ok(Json(AnalysisResponse {
        profile_completion: calculate_profile_completion(&data),
        full_name: data.personal.full_name,
        email: data.personal.email,
        phone: data.personal.phone,
        skills: data.skills,
        linkedin: data.documents.linkedin,
        portfolio: data.documents.portfolio,
        career_goal,
        behavioral_analysis: data.behavioral_analysis,
    }))
}

#[utoipa::path(
    post,
    path = "/get-vagas",
    request_body = JobSearchPayload,
    responses(
        (status = 200, description = "Five suggested postings", body = [JobSuggestion]),
        (status = 502, description = "The language model could not be reached")
    )
)]
#[axum::debug_handler]
pub async fn suggest_jobs(
    State(state): State<AppState>,
    Json(payload): Json<JobSearchPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let jobs = state
        .ai_service
        .suggest_jobs(&payload.role, &payload.city)
        .await?;
    Ok(Json(jobs))
}
