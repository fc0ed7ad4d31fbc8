/// Task endpoints
///
/// Tasks come in two shapes: project tasks, created by the project
/// owner and assigned to roster members, and personal tasks, owned by
/// a single user. Project tasks move through an approval lifecycle
/// (submit, recall, approve, request changes, reopen); personal tasks
/// are completed directly.
///
/// Every handler follows the same order: load the task (404), check
/// permission (403), check the lifecycle precondition (400), then run
/// the update. The review verbs run status-guarded updates, so a guard
/// miss under concurrency reports the same invalid-transition error as
/// the precondition check.
///
/// # Endpoints
///
/// - `POST   /api/tasks` - Create task
/// - `GET    /api/tasks/my` - The caller's working set
/// - `GET    /api/tasks/personal` - The caller's personal tasks
/// - `GET    /api/tasks/project/:project_id` - List project tasks
/// - `GET    /api/tasks/project/:project_id/pending-approval` - Review queue
/// - `GET    /api/tasks/:id` - Get one task
/// - `PUT    /api/tasks/:id` - Update task
/// - `DELETE /api/tasks/:id` - Delete task
/// - `POST   /api/tasks/:id/submit` - Submit for approval
/// - `POST   /api/tasks/:id/recall` - Recall a submission
/// - `POST   /api/tasks/:id/approve` - Approve a submission
/// - `POST   /api/tasks/:id/request-changes` - Send back for more work
/// - `POST   /api/tasks/:id/reopen` - Put a task back in progress
/// - `POST   /api/tasks/:id/complete-personal` - Complete a personal task
/// - `POST   /api/tasks/:id/content` - Save the caller's submitted work

use crate::{
    app::AppState,
    error::{ApiError, ApiResult, ValidationErrorDetail},
    realtime::{TaskEvent, TaskEventKind},
    routes::{Paginated, Pagination},
};
use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use chrono::{DateTime, Utc};
use projecthub_shared::{
    auth::{authorization, middleware::CurrentUser},
    models::{
        project::Project,
        task::{CreateTask, SubmissionEntry, Task, TaskPriority, TaskStatus, UpdateTask},
    },
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

/// Create task request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTaskRequest {
    /// Task title
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: String,

    /// Task description
    #[serde(default)]
    pub description: String,

    /// Free-form notes
    #[serde(default)]
    pub notes: String,

    /// Priority (defaults to medium)
    #[serde(default = "default_priority")]
    pub priority: TaskPriority,

    /// Project to create the task in; omit for a personal task
    pub project_id: Option<Uuid>,

    /// Optional deadline
    pub deadline: Option<DateTime<Utc>>,

    /// Assignees (required and non-empty for team-project tasks)
    #[serde(default)]
    pub assignee_ids: Vec<Uuid>,
}

fn default_priority() -> TaskPriority {
    TaskPriority::Medium
}

/// Update task request
///
/// The project a task belongs to cannot be changed after creation.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateTaskRequest {
    /// New title
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: Option<String>,

    /// New description
    pub description: Option<String>,

    /// New notes
    pub notes: Option<String>,

    /// New priority
    pub priority: Option<TaskPriority>,

    /// Direct status change
    pub status: Option<TaskStatus>,

    /// New deadline
    pub deadline: Option<DateTime<Utc>>,

    /// Replacement assignee roster
    pub assignee_ids: Option<Vec<Uuid>>,
}

/// Save content request
#[derive(Debug, Deserialize)]
pub struct SaveContentRequest {
    /// The caller's submitted work
    pub content: String,
}

/// Task list query (status filter plus pagination)
#[derive(Debug, Deserialize)]
pub struct TaskListQuery {
    /// Filter to one status
    pub status: Option<TaskStatus>,

    /// 1-based page number
    pub page: Option<i64>,

    /// Items per page
    pub per_page: Option<i64>,
}

impl TaskListQuery {
    fn pagination(&self) -> Pagination {
        let defaults = Pagination::default();
        Pagination {
            page: self.page.unwrap_or(defaults.page),
            per_page: self.per_page.unwrap_or(defaults.per_page),
        }
    }
}

/// Loads a task or maps its absence to 404
async fn load_task(state: &AppState, id: Uuid) -> ApiResult<Task> {
    Task::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))
}

/// Loads the task's project when it has one
async fn load_task_project(state: &AppState, task: &Task) -> ApiResult<Option<Project>> {
    match task.project_id {
        Some(project_id) => Ok(Project::find_by_id(&state.db, project_id).await?),
        None => Ok(None),
    }
}

/// Ensures the caller may edit the task (project owner, or owner of a
/// personal task)
fn require_can_mutate(task: &Task, project: Option<&Project>, user_id: Uuid) -> ApiResult<()> {
    if authorization::can_mutate_task(task, project, user_id) {
        Ok(())
    } else {
        Err(ApiError::Forbidden(
            "You cannot modify this task".to_string(),
        ))
    }
}

/// Lifecycle verbs a loaded task can be put through
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LifecycleVerb {
    /// General update; a status in the payload is applied directly
    Edit { target: Option<TaskStatus> },

    /// Send a project task to the owner's review queue
    Submit,

    /// Assignee pulls a submission back
    Recall,

    /// Owner accepts a submission
    Approve,

    /// Owner sends a submission back for more work
    RequestChanges,

    /// Put a task back in progress, from any state
    Reopen,

    /// Complete a personal task without review, from any state
    CompletePersonal,
}

/// Shape and source-state preconditions per lifecycle verb
///
/// The review verbs require their exact source state; edit, reopen,
/// and personal completion accept any state. A wrong shape (personal
/// task submitted, project task completed directly) is rejected before
/// any state is considered.
fn check_lifecycle(task: &Task, verb: LifecycleVerb) -> ApiResult<()> {
    match verb {
        LifecycleVerb::Edit { target: _ } => Ok(()),
        LifecycleVerb::Submit => {
            if task.project_id.is_none() {
                return Err(ApiError::ValidationError(vec![ValidationErrorDetail {
                    field: "project_id".to_string(),
                    message: "Personal tasks do not go through approval".to_string(),
                }]));
            }
            if !task.status.can_transition_to(TaskStatus::PendingApproval) {
                return Err(ApiError::InvalidTransition(format!(
                    "Cannot submit a {} task for approval",
                    task.status.as_str()
                )));
            }
            Ok(())
        }
        LifecycleVerb::Recall => {
            if task.status != TaskStatus::PendingApproval {
                return Err(ApiError::InvalidTransition(
                    "Only submitted tasks can be recalled".to_string(),
                ));
            }
            Ok(())
        }
        LifecycleVerb::Approve => {
            if task.status != TaskStatus::PendingApproval {
                return Err(ApiError::InvalidTransition(
                    "Only pending approval tasks can be approved".to_string(),
                ));
            }
            Ok(())
        }
        LifecycleVerb::RequestChanges => {
            if task.status != TaskStatus::PendingApproval {
                return Err(ApiError::InvalidTransition(
                    "Only pending approval tasks can be sent back".to_string(),
                ));
            }
            Ok(())
        }
        LifecycleVerb::Reopen => Ok(()),
        LifecycleVerb::CompletePersonal => {
            if task.project_id.is_some() {
                return Err(ApiError::InvalidTransition(
                    "Project tasks are completed through approval".to_string(),
                ));
            }
            Ok(())
        }
    }
}

/// Rejects assignees who are not on the project roster
async fn require_roster_subset(
    state: &AppState,
    project_id: Uuid,
    assignee_ids: &[Uuid],
) -> ApiResult<()> {
    for &user_id in assignee_ids {
        if !Project::is_member(&state.db, project_id, user_id).await? {
            return Err(ApiError::ValidationError(vec![ValidationErrorDetail {
                field: "assignee_ids".to_string(),
                message: "All assignees must be members of the project".to_string(),
            }]));
        }
    }
    Ok(())
}

/// Broadcasts a task event to the task's project subscribers, if any
fn broadcast_task(state: &AppState, task: &Task, kind: TaskEventKind) {
    if let Some(project_id) = task.project_id {
        state
            .channels
            .broadcast(project_id, &TaskEvent { kind, data: task });
    }
}

/// Creates a task
///
/// Project tasks require project ownership; on a team-affiliated
/// project at least one assignee is mandatory, and every assignee must
/// come from the roster. A personal task is assigned to its creator.
pub async fn create_task(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Json(req): Json<CreateTaskRequest>,
) -> ApiResult<Json<Task>> {
    req.validate()?;

    let data = match req.project_id {
        Some(project_id) => {
            let project = Project::find_by_id(&state.db, project_id)
                .await?
                .ok_or_else(|| ApiError::NotFound("Project not found".to_string()))?;

            if !authorization::is_project_owner(&project, current.id()) {
                return Err(ApiError::Forbidden(
                    "Only the project owner can create tasks".to_string(),
                ));
            }

            if project.team_id.is_some() && req.assignee_ids.is_empty() {
                return Err(ApiError::ValidationError(vec![ValidationErrorDetail {
                    field: "assignee_ids".to_string(),
                    message: "Tasks in a team project require at least one assignee".to_string(),
                }]));
            }

            require_roster_subset(&state, project_id, &req.assignee_ids).await?;

            CreateTask {
                title: req.title,
                description: req.description,
                notes: req.notes,
                priority: req.priority,
                project_id: Some(project_id),
                owner_id: Some(project.owner_id),
                assigned_by: Some(current.id()),
                deadline: req.deadline,
                assignee_ids: req.assignee_ids,
            }
        }
        None => CreateTask {
            title: req.title,
            description: req.description,
            notes: req.notes,
            priority: req.priority,
            project_id: None,
            owner_id: Some(current.id()),
            assigned_by: Some(current.id()),
            deadline: req.deadline,
            assignee_ids: vec![current.id()],
        },
    };

    let task = Task::create(&state.db, data).await?;

    let assignees = Task::assignee_ids(&state.db, task.id).await?;
    state
        .notifier
        .task_assigned(&assignees, &current.0, &task)
        .await;

    broadcast_task(&state, &task, TaskEventKind::TaskCreated);

    Ok(Json(task))
}

/// The caller's working set, paginated
///
/// Personal tasks in every status plus open project tasks assigned to
/// the caller.
pub async fn my_tasks(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Query(page): Query<Pagination>,
) -> ApiResult<Json<Paginated<Task>>> {
    let items = Task::list_assigned(&state.db, current.id(), page.limit(), page.offset()).await?;
    let total_count = Task::count_assigned(&state.db, current.id()).await?;

    Ok(Json(Paginated { items, total_count }))
}

/// The caller's personal tasks, paginated, optionally by status
pub async fn personal_tasks(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Query(query): Query<TaskListQuery>,
) -> ApiResult<Json<Paginated<Task>>> {
    let page = query.pagination();
    let items = Task::list_personal(
        &state.db,
        current.id(),
        query.status,
        page.limit(),
        page.offset(),
    )
    .await?;
    let total_count = Task::count_personal(&state.db, current.id(), query.status).await?;

    Ok(Json(Paginated { items, total_count }))
}

/// Lists a project's tasks, paginated
///
/// The project owner sees everything; other members only see tasks
/// they are assigned to.
pub async fn project_tasks(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(project_id): Path<Uuid>,
    Query(query): Query<TaskListQuery>,
) -> ApiResult<Json<Paginated<Task>>> {
    let project = Project::find_by_id(&state.db, project_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Project not found".to_string()))?;

    crate::routes::projects::require_member(&state, project.id, current.id()).await?;

    let visible_to = if authorization::is_project_owner(&project, current.id()) {
        None
    } else {
        Some(current.id())
    };

    let page = query.pagination();
    let items = Task::list_by_project(
        &state.db,
        project_id,
        query.status,
        visible_to,
        page.limit(),
        page.offset(),
    )
    .await?;
    let total_count =
        Task::count_by_project(&state.db, project_id, query.status, visible_to).await?;

    Ok(Json(Paginated { items, total_count }))
}

/// The project's review queue, owner only
pub async fn pending_approval(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(project_id): Path<Uuid>,
) -> ApiResult<Json<Vec<Task>>> {
    let project = Project::find_by_id(&state.db, project_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Project not found".to_string()))?;

    if !authorization::is_project_owner(&project, current.id()) {
        return Err(ApiError::Forbidden(
            "Only the project owner can view the approval queue".to_string(),
        ));
    }

    let tasks = Task::list_pending_approval(&state.db, project_id).await?;

    Ok(Json(tasks))
}

/// Gets one task
///
/// Visible to whoever may edit it and to its assignees.
pub async fn get_task(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Task>> {
    let task = load_task(&state, id).await?;
    let project = load_task_project(&state, &task).await?;

    let can_view = authorization::can_mutate_task(&task, project.as_ref(), current.id())
        || Task::is_assignee(&state.db, task.id, current.id()).await?;

    if !can_view {
        return Err(ApiError::Forbidden(
            "You cannot view this task".to_string(),
        ));
    }

    Ok(Json(task))
}

/// Updates a task
///
/// Newly added assignees are notified; a status in the payload is
/// applied as-is regardless of the current state and announced to the
/// assignees.
pub async fn update_task(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateTaskRequest>,
) -> ApiResult<Json<Task>> {
    req.validate()?;

    let task = load_task(&state, id).await?;
    let project = load_task_project(&state, &task).await?;
    require_can_mutate(&task, project.as_ref(), current.id())?;
    check_lifecycle(&task, LifecycleVerb::Edit { target: req.status })?;

    if let (Some(project_id), Some(assignee_ids)) = (task.project_id, req.assignee_ids.as_deref())
    {
        require_roster_subset(&state, project_id, assignee_ids).await?;
    }

    let previous_assignees = Task::assignee_ids(&state.db, id).await?;

    let updated = Task::update(
        &state.db,
        id,
        UpdateTask {
            title: req.title,
            description: req.description,
            notes: req.notes,
            priority: req.priority,
            status: req.status,
            deadline: req.deadline,
            assignee_ids: req.assignee_ids,
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    let assignees = Task::assignee_ids(&state.db, id).await?;

    let added: Vec<Uuid> = assignees
        .iter()
        .filter(|a| !previous_assignees.contains(a))
        .copied()
        .collect();
    state
        .notifier
        .task_assigned(&added, &current.0, &updated)
        .await;

    if req.status.is_some() {
        state
            .notifier
            .task_status_changed(&assignees, &current.0, &updated)
            .await;
    }

    broadcast_task(&state, &updated, TaskEventKind::TaskUpdated);

    Ok(Json(updated))
}

/// Deletes a task
pub async fn delete_task(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<serde_json::Value>> {
    let task = load_task(&state, id).await?;
    let project = load_task_project(&state, &task).await?;
    require_can_mutate(&task, project.as_ref(), current.id())?;

    Task::delete(&state.db, id).await?;

    if let Some(project_id) = task.project_id {
        state.channels.broadcast(
            project_id,
            &TaskEvent {
                kind: TaskEventKind::TaskDeleted,
                data: serde_json::json!({ "id": id }),
            },
        );
    }

    Ok(Json(serde_json::json!({ "deleted": true })))
}

/// Submits a project task for the owner's review, assignees only
pub async fn submit_task(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Task>> {
    let task = load_task(&state, id).await?;

    if !Task::is_assignee(&state.db, task.id, current.id()).await? {
        return Err(ApiError::Forbidden(
            "Only assignees can submit this task".to_string(),
        ));
    }

    check_lifecycle(&task, LifecycleVerb::Submit)?;

    let updated = Task::submit_for_approval(&state.db, id).await?.ok_or_else(|| {
        ApiError::InvalidTransition("Task is no longer open for submission".to_string())
    })?;

    if let Some(project_id) = task.project_id {
        if let Some(project) = Project::find_by_id(&state.db, project_id).await? {
            state
                .notifier
                .task_submitted(project.owner_id, &current.0, &updated)
                .await;
        }
    }

    broadcast_task(&state, &updated, TaskEventKind::TaskUpdated);

    Ok(Json(updated))
}

/// Recalls the caller's submission, assignees only
///
/// Recall is quiet: the project gets a live update but no inbox
/// notification.
pub async fn recall_task(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Task>> {
    let task = load_task(&state, id).await?;

    if !Task::is_assignee(&state.db, task.id, current.id()).await? {
        return Err(ApiError::Forbidden(
            "Only assignees can recall this task".to_string(),
        ));
    }

    check_lifecycle(&task, LifecycleVerb::Recall)?;

    let updated = Task::recall(&state.db, id).await?.ok_or_else(|| {
        ApiError::InvalidTransition("Task is no longer awaiting approval".to_string())
    })?;

    broadcast_task(&state, &updated, TaskEventKind::TaskUpdated);

    Ok(Json(updated))
}

/// Approves a submission, project owner only
pub async fn approve_task(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Task>> {
    let task = load_task(&state, id).await?;
    let project = load_task_project(&state, &task).await?;
    require_can_mutate(&task, project.as_ref(), current.id())?;

    check_lifecycle(&task, LifecycleVerb::Approve)?;

    let updated = Task::approve(&state.db, id).await?.ok_or_else(|| {
        ApiError::InvalidTransition("Task is no longer awaiting approval".to_string())
    })?;

    let assignees = Task::assignee_ids(&state.db, id).await?;
    state
        .notifier
        .task_approved(&assignees, &current.0, &updated)
        .await;

    broadcast_task(&state, &updated, TaskEventKind::TaskUpdated);

    Ok(Json(updated))
}

/// Sends a submission back for more work, project owner only
pub async fn request_changes(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Task>> {
    let task = load_task(&state, id).await?;
    let project = load_task_project(&state, &task).await?;
    require_can_mutate(&task, project.as_ref(), current.id())?;

    check_lifecycle(&task, LifecycleVerb::RequestChanges)?;

    let updated = Task::request_changes(&state.db, id).await?.ok_or_else(|| {
        ApiError::InvalidTransition("Task is no longer awaiting approval".to_string())
    })?;

    let assignees = Task::assignee_ids(&state.db, id).await?;
    state
        .notifier
        .task_changes_requested(&assignees, &current.0, &updated)
        .await;

    broadcast_task(&state, &updated, TaskEventKind::TaskUpdated);

    Ok(Json(updated))
}

/// Puts a task back in progress, from any state
pub async fn reopen_task(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Task>> {
    let task = load_task(&state, id).await?;
    let project = load_task_project(&state, &task).await?;
    require_can_mutate(&task, project.as_ref(), current.id())?;
    check_lifecycle(&task, LifecycleVerb::Reopen)?;

    let updated = Task::reopen(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    let assignees = Task::assignee_ids(&state.db, id).await?;
    state
        .notifier
        .task_reopened(&assignees, &current.0, &updated)
        .await;

    broadcast_task(&state, &updated, TaskEventKind::TaskUpdated);

    Ok(Json(updated))
}

/// Completes a personal task directly, owner only
///
/// Project tasks must go through the approval flow instead.
pub async fn complete_task(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Task>> {
    let task = load_task(&state, id).await?;

    check_lifecycle(&task, LifecycleVerb::CompletePersonal)?;

    if task.owner_id != Some(current.id()) {
        return Err(ApiError::Forbidden(
            "You cannot modify this task".to_string(),
        ));
    }

    let updated = Task::complete(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    Ok(Json(updated))
}

/// Saves the caller's submitted work, assignees only
///
/// Each assignee holds one entry; saving again replaces it and leaves
/// everyone else's work untouched.
pub async fn save_content(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(req): Json<SaveContentRequest>,
) -> ApiResult<Json<Task>> {
    let task = load_task(&state, id).await?;

    if !Task::is_assignee(&state.db, task.id, current.id()).await? {
        return Err(ApiError::Forbidden(
            "Only assignees can submit work on this task".to_string(),
        ));
    }

    let entry = SubmissionEntry {
        user_id: current.id(),
        username: current.0.username.clone(),
        content: req.content,
        timestamp: Utc::now(),
    };

    let updated = Task::save_submission(&state.db, id, entry)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    broadcast_task(&state, &updated, TaskEventKind::TaskUpdated);

    Ok(Json(updated))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::types::Json as Db;

    fn personal_task(status: TaskStatus) -> Task {
        Task {
            id: Uuid::new_v4(),
            title: "Write weekly report".to_string(),
            description: String::new(),
            notes: String::new(),
            priority: TaskPriority::Medium,
            status,
            project_id: None,
            owner_id: Some(Uuid::new_v4()),
            assigned_by: None,
            submission_content: Db(Vec::new()),
            created_at: Utc::now(),
            updated_at: Utc::now(),
            assigned_at: None,
            completed_at: None,
            deadline: None,
        }
    }

    fn project_task(status: TaskStatus) -> Task {
        Task {
            project_id: Some(Uuid::new_v4()),
            owner_id: None,
            assigned_by: Some(Uuid::new_v4()),
            ..personal_task(status)
        }
    }

    const ALL_STATUSES: [TaskStatus; 4] = [
        TaskStatus::Todo,
        TaskStatus::InProgress,
        TaskStatus::PendingApproval,
        TaskStatus::Completed,
    ];

    #[test]
    fn test_submit_requires_open_project_task() {
        assert!(check_lifecycle(&project_task(TaskStatus::Todo), LifecycleVerb::Submit).is_ok());
        assert!(
            check_lifecycle(&project_task(TaskStatus::InProgress), LifecycleVerb::Submit).is_ok()
        );

        for status in [TaskStatus::PendingApproval, TaskStatus::Completed] {
            assert!(matches!(
                check_lifecycle(&project_task(status), LifecycleVerb::Submit),
                Err(ApiError::InvalidTransition(_))
            ));
        }
    }

    #[test]
    fn test_submit_personal_task_is_a_validation_error() {
        assert!(matches!(
            check_lifecycle(&personal_task(TaskStatus::InProgress), LifecycleVerb::Submit),
            Err(ApiError::ValidationError(_))
        ));
    }

    #[test]
    fn test_review_verbs_require_pending_approval() {
        for verb in [
            LifecycleVerb::Recall,
            LifecycleVerb::Approve,
            LifecycleVerb::RequestChanges,
        ] {
            assert!(
                check_lifecycle(&project_task(TaskStatus::PendingApproval), verb).is_ok()
            );
            for status in [TaskStatus::Todo, TaskStatus::InProgress, TaskStatus::Completed] {
                assert!(matches!(
                    check_lifecycle(&project_task(status), verb),
                    Err(ApiError::InvalidTransition(_))
                ));
            }
        }
    }

    #[test]
    fn test_reopen_accepts_any_state() {
        for status in ALL_STATUSES {
            assert!(check_lifecycle(&project_task(status), LifecycleVerb::Reopen).is_ok());
            assert!(check_lifecycle(&personal_task(status), LifecycleVerb::Reopen).is_ok());
        }
    }

    #[test]
    fn test_general_update_applies_any_status() {
        for status in ALL_STATUSES {
            for target in ALL_STATUSES {
                let verb = LifecycleVerb::Edit {
                    target: Some(target),
                };
                assert!(check_lifecycle(&project_task(status), verb).is_ok());
            }
            assert!(
                check_lifecycle(&project_task(status), LifecycleVerb::Edit { target: None })
                    .is_ok()
            );
        }
    }

    #[test]
    fn test_complete_personal_accepts_any_state_but_only_personal_tasks() {
        for status in ALL_STATUSES {
            assert!(
                check_lifecycle(&personal_task(status), LifecycleVerb::CompletePersonal).is_ok()
            );
        }
        assert!(matches!(
            check_lifecycle(&project_task(TaskStatus::Todo), LifecycleVerb::CompletePersonal),
            Err(ApiError::InvalidTransition(_))
        ));
    }
}
