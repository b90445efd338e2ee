use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};

use crate::{
    dto::notification_dto::{MarkAllReadResponse, UnreadCountResponse},
    error::Result,
    middleware::auth::Session,
    AppState,
};

#[utoipa::path(
    get,
    path = "/api/notifications",
    responses((status = 200, description = "Notifications of the signed-in user, newest first", body = [Notification]))
)]
#[axum::debug_handler]
pub async fn list_notifications(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
) -> Result<impl IntoResponse> {
    let notifications = state
        .notification_service
        .list_for_user(&session.user_id)
        .await?;
    Ok(Json(notifications))
}

#[axum::debug_handler]
pub async fn unread_count(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
) -> Result<impl IntoResponse> {
    let count = state
        .notification_service
        .unread_count(&session.user_id)
        .await?;
    Ok(Json(UnreadCountResponse { count }))
}

#[axum::debug_handler]
pub async fn mark_read(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    state
        .notification_service
        .mark_read(&id, &session.user_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

#[axum::debug_handler]
pub async fn mark_all_read(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
) -> Result<impl IntoResponse> {
    let updated = state
        .notification_service
        .mark_all_read(&session.user_id)
        .await?;
    Ok(Json(MarkAllReadResponse { updated }))
}
