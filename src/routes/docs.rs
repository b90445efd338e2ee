use axum::{response::IntoResponse, Json};
use utoipa::OpenApi;

use crate::routes;

#[derive(OpenApi)]
#[openapi(
    info(title = "MatchJobs API", description = "Candidates, companies, jobs and behavioral insights"),
    paths(
        routes::health::health,
        routes::auth::register,
        routes::auth::login,
        routes::auth::me,
        routes::candidates::get_candidate,
        routes::candidates::save_candidate,
        routes::candidates::generate_insights,
        routes::candidates::profile_completion,
        routes::companies::get_company,
        routes::companies::save_company,
        routes::jobs::list_active_jobs,
        routes::jobs::get_job,
        routes::jobs::create_job,
        routes::jobs::update_job,
        routes::jobs::delete_job,
        routes::jobs::apply_to_job,
        routes::applications::advance_stage,
        routes::notifications::list_notifications,
        routes::analysis::submit_profile,
        routes::analysis::get_analysis,
        routes::analysis::suggest_jobs,
        routes::admin::clear_storage,
    )
)]
pub struct ApiDoc;

pub async fn openapi_json() -> impl IntoResponse {
    Json(ApiDoc::openapi())
}
