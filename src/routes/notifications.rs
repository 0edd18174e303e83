use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, put},
};
use uuid::Uuid;

use crate::{
    dto::{chat::UserQuery, notifications::NotificationList},
    error::AppResult,
    models::Notification,
    response::ApiResponse,
    services::notification_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_notifications))
        .route("/{id}/read", put(mark_read))
}

#[utoipa::path(
    get,
    path = "/api/notifications",
    params(
        ("user_id" = Uuid, Query, description = "Inbox owner")
    ),
    responses(
        (status = 200, description = "Notifications, newest first", body = ApiResponse<NotificationList>)
    ),
    tag = "Notifications"
)]
pub async fn list_notifications(
    State(state): State<AppState>,
    Query(query): Query<UserQuery>,
) -> AppResult<Json<ApiResponse<NotificationList>>> {
    let resp = notification_service::list_notifications(&state, query.user_id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/notifications/{id}/read",
    params(
        ("id" = Uuid, Path, description = "Notification ID")
    ),
    responses(
        (status = 200, description = "Marked as read", body = ApiResponse<Notification>),
        (status = 404, description = "Notification not found")
    ),
    tag = "Notifications"
)]
pub async fn mark_read(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Notification>>> {
    let resp = notification_service::mark_read(&state, id).await?;
    Ok(Json(resp))
}
