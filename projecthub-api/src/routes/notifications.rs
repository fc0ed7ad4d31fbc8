/// Notification inbox endpoints
///
/// The read flag is the only thing a user can change; notifications
/// are never deleted through the API.
///
/// # Endpoints
///
/// - `GET  /api/notifications` - List (newest first, paginated)
/// - `GET  /api/notifications/unread-count` - Unread counter
/// - `POST /api/notifications/:id/read` - Mark one read
/// - `POST /api/notifications/read-all` - Mark everything read

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    routes::{Paginated, Pagination},
};
use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use projecthub_shared::{auth::middleware::CurrentUser, models::notification::Notification};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unread counter response
#[derive(Debug, Serialize)]
pub struct UnreadCountResponse {
    /// Number of unread notifications
    pub unread_count: i64,
}

/// Inbox list query
#[derive(Debug, Deserialize)]
pub struct InboxQuery {
    /// Restrict to unread entries
    #[serde(default)]
    pub unread_only: bool,

    /// 1-based page number
    pub page: Option<i64>,

    /// Items per page
    pub per_page: Option<i64>,
}

/// Lists the caller's notifications, newest first
pub async fn list_notifications(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Query(query): Query<InboxQuery>,
) -> ApiResult<Json<Paginated<Notification>>> {
    let defaults = Pagination::default();
    let page = Pagination {
        page: query.page.unwrap_or(defaults.page),
        per_page: query.per_page.unwrap_or(defaults.per_page),
    };

    let items = Notification::list_for_user(
        &state.db,
        current.id(),
        query.unread_only,
        page.limit(),
        page.offset(),
    )
    .await?;
    let total_count =
        Notification::count_for_user(&state.db, current.id(), query.unread_only).await?;

    Ok(Json(Paginated { items, total_count }))
}

/// Returns the caller's unread notification count
pub async fn unread_count(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> ApiResult<Json<UnreadCountResponse>> {
    let unread_count = Notification::unread_count(&state.db, current.id()).await?;

    Ok(Json(UnreadCountResponse { unread_count }))
}

/// Marks one notification read
///
/// Someone else's notification reads as not found.
pub async fn mark_read(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<serde_json::Value>> {
    let marked = Notification::mark_read(&state.db, id, current.id()).await?;
    if !marked {
        return Err(ApiError::NotFound("Notification not found".to_string()));
    }

    Ok(Json(serde_json::json!({ "read": true })))
}

/// Marks all of the caller's notifications read
pub async fn mark_all_read(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> ApiResult<Json<serde_json::Value>> {
    let marked = Notification::mark_all_read(&state.db, current.id()).await?;

    Ok(Json(serde_json::json!({ "marked": marked })))
}
