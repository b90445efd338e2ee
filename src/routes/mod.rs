pub mod admin;
pub mod analysis;
pub mod applications;
pub mod auth;
pub mod candidates;
pub mod companies;
pub mod docs;
pub mod health;
pub mod jobs;
pub mod notifications;

use axum::{
    middleware::from_fn_with_state,
    routing::{delete, get, patch, post, put},
    Router,
};

use crate::middleware::{
    auth::require_session,
    rate_limit::{new_rps_state, rps_middleware},
};
use crate::AppState;

/// The whole HTTP surface: public routes and routes that need a session,
/// each group behind its own rate limiter.
pub fn build_router(state: AppState) -> Router {
    let public_api = Router::new()
        .route("/health", get(health::health))
        .route("/api-docs/openapi.json", get(docs::openapi_json))
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/jobs", get(jobs::list_active_jobs))
        .route("/api/jobs/:id", get(jobs::get_job))
        .route("/get-vagas", post(analysis::suggest_jobs))
        .layer(from_fn_with_state(
            new_rps_state(state.config.public_rps),
            rps_middleware,
        ));

    let session_api = Router::new()
        .route("/api/me", get(auth::me))
        .route(
            "/api/candidates/:cpf",
            get(candidates::get_candidate).put(candidates::save_candidate),
        )
        .route(
            "/api/candidates/:cpf/personal",
            put(candidates::update_personal_data),
        )
        .route("/api/candidates/:cpf/skills", put(candidates::update_skills))
        .route(
            "/api/candidates/:cpf/documents",
            put(candidates::update_documents),
        )
        .route(
            "/api/candidates/:cpf/behavioral-analysis",
            put(candidates::update_behavioral_analysis),
        )
        .route(
            "/api/candidates/:cpf/behavioral-analysis/insights",
            post(candidates::generate_insights),
        )
        .route(
            "/api/candidates/:cpf/experiences",
            post(candidates::add_experience),
        )
        .route(
            "/api/candidates/:cpf/experiences/:id",
            patch(candidates::update_experience).delete(candidates::delete_experience),
        )
        .route(
            "/api/candidates/:cpf/education",
            post(candidates::add_education),
        )
        .route(
            "/api/candidates/:cpf/education/:id",
            patch(candidates::update_education).delete(candidates::delete_education),
        )
        .route("/api/candidates/:cpf/courses", post(candidates::add_course))
        .route(
            "/api/candidates/:cpf/courses/:id",
            delete(candidates::delete_course),
        )
        .route(
            "/api/candidates/:cpf/languages",
            post(candidates::add_language),
        )
        .route(
            "/api/candidates/:cpf/languages/:id",
            delete(candidates::delete_language),
        )
        .route(
            "/api/candidates/:cpf/completion",
            get(candidates::profile_completion),
        )
        .route(
            "/api/candidates/:cpf/statistics",
            get(candidates::statistics),
        )
        .route(
            "/api/candidates/:cpf/applications",
            get(candidates::recent_applications),
        )
        .route(
            "/api/companies/:cnpj",
            get(companies::get_company).put(companies::save_company),
        )
        .route(
            "/api/companies/:cnpj/jobs",
            get(companies::list_company_jobs),
        )
        .route(
            "/api/companies/:cnpj/applications",
            get(companies::list_company_applications),
        )
        .route("/api/jobs", post(jobs::create_job))
        .route(
            "/api/jobs/:id",
            patch(jobs::update_job).delete(jobs::delete_job),
        )
        .route("/api/jobs/:id/status", patch(jobs::update_job_status))
        .route(
            "/api/jobs/:id/applications",
            get(jobs::list_job_applications),
        )
        .route("/api/jobs/:id/apply", post(jobs::apply_to_job))
        .route("/api/applications/:id", get(applications::get_application))
        .route(
            "/api/applications/:id/stage",
            post(applications::advance_stage),
        )
        .route(
            "/api/applications/:id/status",
            post(applications::set_status),
        )
        .route("/api/notifications", get(notifications::list_notifications))
        .route(
            "/api/notifications/unread-count",
            get(notifications::unread_count),
        )
        .route(
            "/api/notifications/read-all",
            post(notifications::mark_all_read),
        )
        .route(
            "/api/notifications/:id/read",
            post(notifications::mark_read),
        )
        .route("/submit-profile", post(analysis::submit_profile))
        .route("/get-analysis", get(analysis::get_analysis))
        .route("/api/admin/storage", delete(admin::clear_storage))
        .route_layer(from_fn_with_state(state.clone(), require_session))
        .layer(from_fn_with_state(
            new_rps_state(state.config.api_rps),
            rps_middleware,
        ));

    public_api.merge(session_api).with_state(state)
}
