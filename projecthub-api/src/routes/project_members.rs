/// Project roster endpoints
///
/// # Endpoints
///
/// - `GET    /api/projects/:id/members` - List the roster (paginated)
/// - `POST   /api/projects/:id/members` - Add a member (owner only)
/// - `DELETE /api/projects/:id/members/:user_id` - Remove a member (owner only)
/// - `PUT    /api/projects/:id/members/:user_id` - Change a role (owner only)

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    routes::{
        projects::{load_project, require_member},
        Paginated, Pagination,
    },
};
use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use projecthub_shared::{
    auth::{authorization, middleware::CurrentUser},
    models::{
        project_member::{ProjectMember, ProjectMemberDetail},
        user::User,
    },
};
use serde::Deserialize;
use uuid::Uuid;

/// Add member request
#[derive(Debug, Deserialize)]
pub struct AddMemberRequest {
    /// User to add
    pub user_id: Uuid,
}

/// Role change request
#[derive(Debug, Deserialize)]
pub struct ChangeRoleRequest {
    /// New role name (free-form)
    pub role: String,
}

/// Lists the project roster with member profiles, members only
pub async fn list_members(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Query(page): Query<Pagination>,
) -> ApiResult<Json<Paginated<ProjectMemberDetail>>> {
    let project = load_project(&state, id).await?;
    require_member(&state, project.id, current.id()).await?;

    let items = ProjectMember::list_detailed(&state.db, id, page.limit(), page.offset()).await?;
    let total_count = ProjectMember::count(&state.db, id).await?;

    Ok(Json(Paginated { items, total_count }))
}

/// Adds a member to the roster, owner only
pub async fn add_member(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(req): Json<AddMemberRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    let project = load_project(&state, id).await?;
    if !authorization::is_project_owner(&project, current.id()) {
        return Err(ApiError::Forbidden(
            "Only the project owner can add members".to_string(),
        ));
    }

    let user = User::find_by_id(&state.db, req.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    let added = ProjectMember::add(&state.db, id, user.id).await?;
    if !added {
        return Err(ApiError::Conflict(
            "User is already a member of this project".to_string(),
        ));
    }

    state
        .notifier
        .project_invitation(&[user.id], &current.0, &project)
        .await;

    Ok(Json(serde_json::json!({ "added": true })))
}

/// Removes a member from the roster, owner only
///
/// The owner's entry cannot be removed.
pub async fn remove_member(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path((id, user_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<serde_json::Value>> {
    let project = load_project(&state, id).await?;
    if !authorization::is_project_owner(&project, current.id()) {
        return Err(ApiError::Forbidden(
            "Only the project owner can remove members".to_string(),
        ));
    }

    if user_id == project.owner_id {
        return Err(ApiError::BadRequest(
            "The project owner cannot be removed".to_string(),
        ));
    }

    let removed = ProjectMember::remove(&state.db, id, user_id).await?;
    if !removed {
        return Err(ApiError::NotFound(
            "User is not a member of this project".to_string(),
        ));
    }

    Ok(Json(serde_json::json!({ "removed": true })))
}

/// Changes a member's role, owner only
///
/// The role name is free-form; the owner's own role is fixed.
pub async fn change_role(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path((id, user_id)): Path<(Uuid, Uuid)>,
    Json(req): Json<ChangeRoleRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    let project = load_project(&state, id).await?;
    if !authorization::is_project_owner(&project, current.id()) {
        return Err(ApiError::Forbidden(
            "Only the project owner can change roles".to_string(),
        ));
    }

    if user_id == project.owner_id {
        return Err(ApiError::BadRequest(
            "The project owner's role cannot be changed".to_string(),
        ));
    }

    let updated = ProjectMember::set_role(&state.db, id, user_id, &req.role).await?;
    if !updated {
        return Err(ApiError::NotFound(
            "User is not a member of this project".to_string(),
        ));
    }

    state
        .notifier
        .role_changed(user_id, &current.0, &project, &req.role)
        .await;

    Ok(Json(serde_json::json!({ "updated": true })))
}
