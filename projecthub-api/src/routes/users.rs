/// User profile endpoints
///
/// # Endpoints
///
/// - `GET /api/users/me` - Current user's profile
/// - `PUT /api/users/me` - Update profile fields
/// - `GET /api/users/search?q=` - Search users by username or email
/// - `GET /api/users/:id` - Look up a user

use crate::{
    app::AppState,
    error::{ApiError, ApiResult, ValidationErrorDetail},
};
use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use uuid::Uuid;
use projecthub_shared::{
    auth::middleware::CurrentUser,
    models::user::{UpdateUser, User},
};
use serde::Deserialize;
use validator::Validate;

/// Profile update request
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    /// New display name
    #[validate(length(min = 1, max = 255, message = "Full name must be 1-255 characters"))]
    pub full_name: Option<String>,

    /// New username
    #[validate(length(min = 3, max = 100, message = "Username must be 3-100 characters"))]
    pub username: Option<String>,
}

/// Search query parameters
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    /// Substring to match against usernames and emails
    pub q: String,
}

/// Returns the authenticated user's profile
pub async fn me(Extension(current): Extension<CurrentUser>) -> ApiResult<Json<User>> {
    Ok(Json(current.0))
}

/// Updates the authenticated user's profile
///
/// Only the provided fields are written; an empty payload is rejected.
pub async fn update_me(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Json(req): Json<UpdateProfileRequest>,
) -> ApiResult<Json<User>> {
    req.validate()?;

    let update = UpdateUser {
        full_name: req.full_name,
        username: req.username,
    };

    if update.is_empty() {
        return Err(ApiError::ValidationError(vec![ValidationErrorDetail {
            field: "body".to_string(),
            message: "No fields to update".to_string(),
        }]));
    }

    let user = User::update_profile(&state.db, current.id(), update)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(user))
}

/// Searches users by username or email substring
///
/// The caller is excluded from the results.
pub async fn search(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Query(query): Query<SearchQuery>,
) -> ApiResult<Json<Vec<User>>> {
    if query.q.trim().is_empty() {
        return Ok(Json(Vec::new()));
    }

    let users = User::search(&state.db, query.q.trim(), current.id()).await?;

    Ok(Json(users))
}

/// Looks up a user by id
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<User>> {
    let user = User::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(user))
}
