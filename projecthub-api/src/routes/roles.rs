/// Role catalog endpoints
///
/// The catalog is seeded at startup ([`Role::seed_defaults`]); this
/// surface is read-only.
///
/// # Endpoints
///
/// - `GET /api/roles` - List the seeded roles
/// - `GET /api/roles/:id` - Get one role

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, State},
    Json,
};
use projecthub_shared::models::role::Role;
use uuid::Uuid;

/// Lists the role catalog
pub async fn list_roles(State(state): State<AppState>) -> ApiResult<Json<Vec<Role>>> {
    let roles = Role::list(&state.db).await?;
    Ok(Json(roles))
}

/// Gets one role from the catalog
pub async fn get_role(State(state): State<AppState>, Path(id): Path<Uuid>) -> ApiResult<Json<Role>> {
    let role = Role::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Role not found".to_string()))?;

    Ok(Json(role))
}
