use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use validator::Validate;

use crate::{
    dto::auth_dto::{AuthResponse, LoginPayload, RegisterPayload},
    error::{Error, Result},
    middleware::auth::Session,
    models::candidate::{CandidateData, CandidatePersonalData},
    models::company::CompanyData,
    models::user::{User, UserType},
    services::user_service::UserService,
    AppState,
};

#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterPayload,
    responses(
        (status = 201, description = "Account created and signed in", body = AuthResponse),
        (status = 400, description = "Invalid payload or document"),
        (status = 409, description = "Email or CPF/CNPJ already registered")
    )
)]
#[axum::debug_handler]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let user = state
        .user_service
        .create_user(
            &payload.email,
            &payload.password,
            payload.user_type,
            &payload.cpf_or_cnpj,
            &payload.full_name,
        )
        .await?;

    // An account without its profile record cannot apply or post jobs.
    if let Err(e) = seed_profile(&state, &user).await {
        tracing::error!(error = ?e, user_id = %user.id, "Failed to seed profile, removing account");
        if let Err(cleanup) = state.user_service.delete(&user.id).await {
            tracing::warn!(error = ?cleanup, user_id = %user.id, "Failed to remove account");
        }
        return Err(e);
    }

    let token = state.user_service.issue_token(&user)?;
    let dashboard_url = UserService::dashboard_url(user.user_type).to_string();
    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            token,
            user,
            dashboard_url,
        }),
    ))
}

/// New accounts start with a minimal profile so they can apply or post jobs.
async fn seed_profile(state: &AppState, user: &User) -> Result<()> {
    match user.user_type {
        UserType::Candidate => {
            if state.candidate_service.get(&user.document).await?.is_none() {
                state
                    .candidate_service
                    .save(CandidateData::empty(CandidatePersonalData {
                        cpf: user.document.clone(),
                        full_name: user.full_name.clone(),
                        email: user.email.clone(),
                        ..Default::default()
                    }))
                    .await?;
            }
        }
        UserType::Company => {
            if state.company_service.get(&user.document).await?.is_none() {
                state
                    .company_service
                    .save(CompanyData {
                        cnpj: user.document.clone(),
                        name: user.full_name.clone(),
                        email: user.email.clone(),
                        ..Default::default()
                    })
                    .await?;
            }
        }
    }
    Ok(())
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginPayload,
    responses(
        (status = 200, description = "Signed in", body = AuthResponse),
        (status = 401, description = "Invalid email or password")
    )
)]
#[axum::debug_handler]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let user = state
        .user_service
        .authenticate(&payload.email, &payload.password)
        .await?;
    let token = state.user_service.issue_token(&user)?;
    let dashboard_url = UserService::dashboard_url(user.user_type).to_string();
    Ok(Json(AuthResponse {
        token,
        user,
        dashboard_url,
    }))
}

#[utoipa::path(
    get,
    path = "/api/me",
    responses(
        (status = 200, description = "Signed-in account", body = User),
        (status = 401, description = "Missing or invalid token")
    )
)]
#[axum::debug_handler]
pub async fn me(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
) -> Result<impl IntoResponse> {
    let user = state
        .user_service
        .get(&session.user_id)
        .await?
        .ok_or_else(|| Error::Unauthorized("Account no longer exists".to_string()))?;
    Ok(Json(user))
}
