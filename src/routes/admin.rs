use axum::{extract::State, http::StatusCode, response::IntoResponse};

use crate::{
    error::{Error, Result},
    AppState,
};

/// Wipes every store. Disabled unless `ALLOW_STORAGE_RESET` is set.
#[utoipa::path(
    delete,
    path = "/api/admin/storage",
    responses(
        (status = 204, description = "All stores cleared"),
        (status = 403, description = "Storage reset is disabled")
    )
)]
#[axum::debug_handler]
pub async fn clear_storage(State(state): State<AppState>) -> Result<impl IntoResponse> {
    if !state.config.allow_storage_reset {
        return Err(Error::Forbidden("Storage reset is disabled".to_string()));
    }
    state.maintenance_service.clear_all().await?;
    Ok(StatusCode::NO_CONTENT)
}
