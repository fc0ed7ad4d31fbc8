/// Project endpoints
///
/// A project is personal (no team) or team-affiliated. Team projects
/// can only be created by the team owner and start with the whole team
/// on the roster; personal projects start with just the owner. The
/// team affiliation is fixed at creation.
///
/// # Endpoints
///
/// - `POST   /api/projects` - Create project
/// - `GET    /api/projects` - List projects the caller belongs to
/// - `GET    /api/projects/personal` - List the caller's personal projects
/// - `GET    /api/projects/:id` - Get one project
/// - `DELETE /api/projects/:id` - Delete project (owner only)
/// - `GET    /api/teams/:id/projects` - List a team's projects

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
        project::{CreateProject, Project, ProjectSummary},
        team::Team,
    },
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

/// Create project request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateProjectRequest {
    /// Project name
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,

    /// Project description
    #[serde(default)]
    pub description: String,

    /// Team the project belongs to; omit for a personal project
    pub team_id: Option<Uuid>,
}

/// Loads a project or maps its absence to 404
pub(crate) async fn load_project(state: &AppState, id: Uuid) -> ApiResult<Project> {
    Project::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Project not found".to_string()))
}

/// Ensures the caller is on the project roster
pub(crate) async fn require_member(
    state: &AppState,
    project_id: Uuid,
    user_id: Uuid,
) -> ApiResult<()> {
    if Project::is_member(&state.db, project_id, user_id).await? {
        Ok(())
    } else {
        Err(ApiError::Forbidden(
            "You are not a member of this project".to_string(),
        ))
    }
}

/// Creates a project
///
/// With a `team_id` the caller must own the team and the project roster
/// is a snapshot of the team's current membership, each of whom is
/// notified of the invitation. Without one the project is personal and
/// the roster is just the caller.
pub async fn create_project(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Json(req): Json<CreateProjectRequest>,
) -> ApiResult<Json<Project>> {
    req.validate()?;

    if let Some(team_id) = req.team_id {
        let team = Team::find_by_id(&state.db, team_id)
            .await?
            .ok_or_else(|| ApiError::NotFound("Team not found".to_string()))?;

        if !authorization::is_team_owner(&team, current.id()) {
            return Err(ApiError::Forbidden(
                "Only the team owner can create projects for the team".to_string(),
            ));
        }
    }

    let project = Project::create(
        &state.db,
        CreateProject {
            name: req.name,
            description: req.description,
            team_id: req.team_id,
            owner_id: current.id(),
        },
    )
    .await?;

    if project.team_id.is_some() {
        let invited: Vec<Uuid> = Project::member_ids(&state.db, project.id)
            .await?
            .into_iter()
            .filter(|id| *id != current.id())
            .collect();

        state
            .notifier
            .project_invitation(&invited, &current.0, &project)
            .await;
    }

    Ok(Json(project))
}

/// Lists projects the caller belongs to, with roster sizes
pub async fn list_projects(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Query(page): Query<Pagination>,
) -> ApiResult<Json<Paginated<ProjectSummary>>> {
    let items =
        Project::list_for_user(&state.db, current.id(), page.limit(), page.offset()).await?;
    let total_count = Project::count_for_user(&state.db, current.id()).await?;

    Ok(Json(Paginated { items, total_count }))
}

/// Lists the caller's personal projects
pub async fn list_personal_projects(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Query(page): Query<Pagination>,
) -> ApiResult<Json<Paginated<ProjectSummary>>> {
    let items =
        Project::list_personal(&state.db, current.id(), page.limit(), page.offset()).await?;
    let total_count = Project::count_personal(&state.db, current.id()).await?;

    Ok(Json(Paginated { items, total_count }))
}

/// Lists a team's projects, team members only
pub async fn list_team_projects(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(team_id): Path<Uuid>,
) -> ApiResult<Json<Vec<Project>>> {
    let team = Team::find_by_id(&state.db, team_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Team not found".to_string()))?;

    if !Team::is_member(&state.db, team.id, current.id()).await? {
        return Err(ApiError::Forbidden(
            "You are not a member of this team".to_string(),
        ));
    }

    let projects = Project::list_for_team(&state.db, team_id).await?;
    Ok(Json(projects))
}

/// Gets one project, roster members only
pub async fn get_project(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Project>> {
    let project = load_project(&state, id).await?;
    require_member(&state, project.id, current.id()).await?;

    Ok(Json(project))
}

/// Deletes a project, owner only
///
/// Remaining roster members are told the project is gone; its tasks
/// are removed by CASCADE.
pub async fn delete_project(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<serde_json::Value>> {
    let project = load_project(&state, id).await?;
    if !authorization::is_project_owner(&project, current.id()) {
        return Err(ApiError::Forbidden(
            "Only the project owner can delete the project".to_string(),
        ));
    }

    // Snapshot the roster before the rows cascade away
    let member_ids = Project::member_ids(&state.db, id).await?;

    Project::delete(&state.db, id).await?;

    state
        .notifier
        .project_deleted(&member_ids, &current.0, &project.name)
        .await;

    tracing::info!(project_id = %id, "Project deleted");

    Ok(Json(serde_json::json!({ "deleted": true })))
}
