/// Team endpoints
///
/// Teams group users under a single owner. The owner is always a
/// member, cannot be removed, and is the only user allowed to rename
/// the team, edit its roster, or delete it. Team names are unique per
/// owner.
///
/// # Endpoints
///
/// - `POST   /api/teams` - Create team
/// - `GET    /api/teams` - List teams the caller belongs to
/// - `GET    /api/teams/:id` - Get one team
/// - `PUT    /api/teams/:id` - Update team (owner only)
/// - `DELETE /api/teams/:id` - Delete team (owner only)
/// - `GET    /api/teams/:id/members` - List members (paginated)
/// - `POST   /api/teams/:id/members` - Add member (owner only)
/// - `DELETE /api/teams/:id/members/:user_id` - Remove member (owner only)
/// - `GET    /api/teams/:id/members/search?q=` - Search members
/// - `GET    /api/teams/:id/projects` - List the team's projects

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    routes::{Paginated, Pagination},
};
use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use projecthub_shared::{
    auth::{authorization, middleware::CurrentUser},
    models::{
        team::{CreateTeam, Team, UpdateTeam},
        user::User,
    },
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

/// Create team request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTeamRequest {
    /// Team name (unique per owner)
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,

    /// Team description
    #[serde(default)]
    pub description: String,

    /// Initial member ids
    #[serde(default)]
    pub member_ids: Vec<Uuid>,
}

/// Update team request
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateTeamRequest {
    /// New name
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: Option<String>,

    /// New description
    pub description: Option<String>,

    /// Replacement member roster
    pub member_ids: Option<Vec<Uuid>>,
}

/// Add member request
#[derive(Debug, Deserialize)]
pub struct AddMemberRequest {
    /// User to add
    pub user_id: Uuid,
}

/// Member search query
#[derive(Debug, Deserialize)]
pub struct MemberSearchQuery {
    /// Substring to match against usernames
    pub q: String,
}

/// Loads a team or maps its absence to 404
async fn load_team(state: &AppState, id: Uuid) -> ApiResult<Team> {
    Team::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Team not found".to_string()))
}

/// Ensures the caller belongs to the team (owner counts)
async fn require_member(state: &AppState, team: &Team, user_id: Uuid) -> ApiResult<()> {
    if Team::is_member(&state.db, team.id, user_id).await? {
        Ok(())
    } else {
        Err(ApiError::Forbidden(
            "You are not a member of this team".to_string(),
        ))
    }
}

/// Creates a team
///
/// Unknown user ids in `member_ids` are silently dropped. Everyone who
/// actually joins the roster is notified.
pub async fn create_team(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Json(req): Json<CreateTeamRequest>,
) -> ApiResult<Json<Team>> {
    req.validate()?;

    if Team::name_taken(&state.db, current.id(), &req.name).await? {
        return Err(ApiError::Conflict(
            "You already have a team with this name".to_string(),
        ));
    }

    let member_ids = User::existing_ids(&state.db, &req.member_ids).await?;

    let team = Team::create(
        &state.db,
        CreateTeam {
            name: req.name,
            description: req.description,
            owner_id: current.id(),
            member_ids: member_ids.clone(),
        },
    )
    .await?;

    state
        .notifier
        .team_invitation(&member_ids, &current.0, &team)
        .await;

    Ok(Json(team))
}

/// Lists teams the caller owns or belongs to
pub async fn list_teams(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> ApiResult<Json<Vec<Team>>> {
    let teams = Team::list_for_user(&state.db, current.id()).await?;
    Ok(Json(teams))
}

/// Gets one team, members only
pub async fn get_team(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Team>> {
    let team = load_team(&state, id).await?;
    require_member(&state, &team, current.id()).await?;

    Ok(Json(team))
}

/// Updates a team, owner only
///
/// A replacement roster notifies newly added members and users who
/// were dropped.
pub async fn update_team(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateTeamRequest>,
) -> ApiResult<Json<Team>> {
    req.validate()?;

    let team = load_team(&state, id).await?;
    if !authorization::is_team_owner(&team, current.id()) {
        return Err(ApiError::Forbidden(
            "Only the team owner can update the team".to_string(),
        ));
    }

    if let Some(name) = &req.name {
        if name != &team.name && Team::name_taken(&state.db, current.id(), name).await? {
            return Err(ApiError::Conflict(
                "You already have a team with this name".to_string(),
            ));
        }
    }

    let previous_members = Team::member_ids(&state.db, id).await?;

    let new_roster = match req.member_ids {
        Some(ids) => Some(User::existing_ids(&state.db, &ids).await?),
        None => None,
    };

    let updated = Team::update(
        &state.db,
        id,
        team.owner_id,
        UpdateTeam {
            name: req.name,
            description: req.description,
            member_ids: new_roster.clone(),
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("Team not found".to_string()))?;

    if let Some(roster) = new_roster {
        let added: Vec<Uuid> = roster
            .iter()
            .filter(|id| !previous_members.contains(id))
            .copied()
            .collect();
        state
            .notifier
            .team_invitation(&added, &current.0, &updated)
            .await;

        for dropped in previous_members
            .iter()
            .filter(|id| !roster.contains(id) && **id != team.owner_id)
        {
            state
                .notifier
                .removed_from_team(*dropped, &current.0, &updated)
                .await;
        }
    }

    Ok(Json(updated))
}

/// Deletes a team, owner only
///
/// Projects under the team (and their tasks) go with it.
pub async fn delete_team(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<serde_json::Value>> {
    let team = load_team(&state, id).await?;
    if !authorization::is_team_owner(&team, current.id()) {
        return Err(ApiError::Forbidden(
            "Only the team owner can delete the team".to_string(),
        ));
    }

    Team::delete(&state.db, id).await?;

    tracing::info!(team_id = %id, "Team deleted");

    Ok(Json(serde_json::json!({ "deleted": true })))
}

/// Lists team members with pagination, members only
pub async fn list_members(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Query(page): Query<Pagination>,
) -> ApiResult<Json<Paginated<User>>> {
    let team = load_team(&state, id).await?;
    require_member(&state, &team, current.id()).await?;

    let items = Team::members(&state.db, id, page.limit(), page.offset()).await?;
    let total_count = Team::member_count(&state.db, id).await?;

    Ok(Json(Paginated { items, total_count }))
}

/// Adds a member, owner only
pub async fn add_member(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(req): Json<AddMemberRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    let team = load_team(&state, id).await?;
    if !authorization::is_team_owner(&team, current.id()) {
        return Err(ApiError::Forbidden(
            "Only the team owner can add members".to_string(),
        ));
    }

    let user = User::find_by_id(&state.db, req.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    let added = Team::add_member(&state.db, id, user.id).await?;
    if !added {
        return Err(ApiError::Conflict(
            "User is already a member of this team".to_string(),
        ));
    }

    state
        .notifier
        .team_invitation(&[user.id], &current.0, &team)
        .await;

    Ok(Json(serde_json::json!({ "added": true })))
}

/// Removes a member, owner only
///
/// The owner's own membership is not removable.
pub async fn remove_member(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path((id, user_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<serde_json::Value>> {
    let team = load_team(&state, id).await?;
    if !authorization::is_team_owner(&team, current.id()) {
        return Err(ApiError::Forbidden(
            "Only the team owner can remove members".to_string(),
        ));
    }

    if user_id == team.owner_id {
        return Err(ApiError::BadRequest(
            "The team owner cannot be removed".to_string(),
        ));
    }

    let removed = Team::remove_member(&state.db, id, user_id).await?;
    if !removed {
        return Err(ApiError::NotFound(
            "User is not a member of this team".to_string(),
        ));
    }

    state
        .notifier
        .removed_from_team(user_id, &current.0, &team)
        .await;

    Ok(Json(serde_json::json!({ "removed": true })))
}

/// Searches team members by username, members only
pub async fn search_members(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Query(query): Query<MemberSearchQuery>,
) -> ApiResult<Json<Vec<User>>> {
    let team = load_team(&state, id).await?;
    require_member(&state, &team, current.id()).await?;

    let users = Team::search_members(&state.db, id, query.q.trim()).await?;

    Ok(Json(users))
}
