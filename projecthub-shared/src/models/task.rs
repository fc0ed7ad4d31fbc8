/// Task model and database operations
///
/// This module provides the Task model representing work items inside a
/// project (or a user's personal list). Tasks are the core entity of
/// the ProjectHub system and move through an approval lifecycle.
///
/// # State Machine
///
/// ```text
/// todo        → in_progress
/// todo        → pending_approval   (assignee submits)
/// in_progress → pending_approval   (assignee submits)
/// pending_approval → in_progress   (recall / changes requested)
/// pending_approval → completed     (owner approves)
/// any         → completed          (personal tasks only)
/// any         → in_progress        (reopen)
/// ```
///
/// The review verbs (submit, recall, approve, request changes) are
/// guarded on their exact source state; reopen, personal completion,
/// and a direct status edit through the general update accept any
/// source state.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE task_status AS ENUM (
///     'todo', 'in_progress', 'pending_approval', 'completed'
/// );
///
/// CREATE TYPE task_priority AS ENUM ('low', 'medium', 'high', 'critical');
///
/// CREATE TABLE tasks (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     title VARCHAR(255) NOT NULL,
///     description TEXT NOT NULL DEFAULT '',
///     notes TEXT NOT NULL DEFAULT '',
///     priority task_priority NOT NULL DEFAULT 'medium',
///     status task_status NOT NULL DEFAULT 'todo',
///     project_id UUID REFERENCES projects(id) ON DELETE CASCADE,
///     owner_id UUID REFERENCES users(id),
///     assigned_by UUID REFERENCES users(id),
///     submission_content JSONB NOT NULL DEFAULT '[]',
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     assigned_at TIMESTAMPTZ,
///     completed_at TIMESTAMPTZ,
///     deadline TIMESTAMPTZ
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use projecthub_shared::models::task::{Task, CreateTask, TaskPriority};
/// use projecthub_shared::db::pool::{create_pool, DatabaseConfig};
/// use uuid::Uuid;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let task = Task::create(&pool, CreateTask {
///     title: "Write launch notes".to_string(),
///     description: "Draft and circulate".to_string(),
///     notes: String::new(),
///     priority: TaskPriority::High,
///     project_id: Some(Uuid::new_v4()),
///     owner_id: None,
///     assigned_by: Some(Uuid::new_v4()),
///     deadline: None,
///     assignee_ids: vec![Uuid::new_v4()],
/// }).await?;
///
/// // Assignee submits the work for review
/// Task::submit_for_approval(&pool, task.id).await?;
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

/// Task lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Task has not been started
    Todo,

    /// Task is being worked on
    InProgress,

    /// Assignee submitted the task, waiting for owner review
    PendingApproval,

    /// Task was approved or completed
    Completed,
}

impl TaskStatus {
    /// Converts status to string for database storage
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "todo",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::PendingApproval => "pending_approval",
            TaskStatus::Completed => "completed",
        }
    }

    /// Checks if the task is open (not completed)
    pub fn is_open(&self) -> bool {
        !matches!(self, TaskStatus::Completed)
    }

    /// Checks if transition to target status is valid via the
    /// dedicated lifecycle verbs
    ///
    /// A direct status edit through the general update bypasses this
    /// table and applies any target.
    pub fn can_transition_to(&self, target: TaskStatus) -> bool {
        match (self, target) {
            // Open tasks can be submitted for review or completed directly
            (TaskStatus::Todo, TaskStatus::InProgress) => true,
            (TaskStatus::InProgress, TaskStatus::Todo) => true,
            (TaskStatus::Todo, TaskStatus::PendingApproval) => true,
            (TaskStatus::InProgress, TaskStatus::PendingApproval) => true,
            (TaskStatus::Todo, TaskStatus::Completed) => true,
            (TaskStatus::InProgress, TaskStatus::Completed) => true,

            // Review outcomes
            (TaskStatus::PendingApproval, TaskStatus::InProgress) => true,
            (TaskStatus::PendingApproval, TaskStatus::Completed) => true,

            // Completed tasks can only be reopened
            (TaskStatus::Completed, TaskStatus::InProgress) => true,

            _ => false,
        }
    }
}

/// Task priority level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_priority", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    Low,
    Medium,
    High,
    Critical,
}

/// One assignee's submitted work, stored inside the task's
/// `submission_content` JSONB array
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionEntry {
    /// Submitting user
    pub user_id: Uuid,

    /// Username captured at submission time
    pub username: String,

    /// Submitted text
    pub content: String,

    /// When this entry was last written
    pub timestamp: DateTime<Utc>,
}

/// Replaces the caller's entry in a submission list, preserving
/// everyone else's entries and their order
///
/// Each user holds at most one entry. A user's first save appends;
/// later saves overwrite their own entry in place.
pub fn upsert_submission(entries: &mut Vec<SubmissionEntry>, entry: SubmissionEntry) {
    match entries.iter_mut().find(|e| e.user_id == entry.user_id) {
        Some(existing) => *existing = entry,
        None => entries.push(entry),
    }
}

/// Task model representing a work item
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    /// Unique task ID
    pub id: Uuid,

    /// Task title
    pub title: String,

    /// Task description
    pub description: String,

    /// Free-form notes
    pub notes: String,

    /// Priority level
    pub priority: TaskPriority,

    /// Current lifecycle status
    pub status: TaskStatus,

    /// Project this task belongs to (null for personal tasks)
    pub project_id: Option<Uuid>,

    /// Owning user for personal tasks (null for project tasks)
    pub owner_id: Option<Uuid>,

    /// User who assigned the task (the project owner)
    pub assigned_by: Option<Uuid>,

    /// Per-assignee submitted work
    pub submission_content: Json<Vec<SubmissionEntry>>,

    /// When the task was created
    pub created_at: DateTime<Utc>,

    /// When the task was last updated
    pub updated_at: DateTime<Utc>,

    /// When assignees were last set
    pub assigned_at: Option<DateTime<Utc>>,

    /// When the task was completed (null while open)
    pub completed_at: Option<DateTime<Utc>>,

    /// Optional deadline
    pub deadline: Option<DateTime<Utc>>,
}

/// Input for creating a new task
#[derive(Debug, Clone)]
pub struct CreateTask {
    /// Task title
    pub title: String,

    /// Task description
    pub description: String,

    /// Free-form notes
    pub notes: String,

    /// Priority level
    pub priority: TaskPriority,

    /// Project to create the task in (None for a personal task)
    pub project_id: Option<Uuid>,

    /// Owning user for personal tasks
    pub owner_id: Option<Uuid>,

    /// Assigning user
    pub assigned_by: Option<Uuid>,

    /// Optional deadline
    pub deadline: Option<DateTime<Utc>>,

    /// Initial assignees
    pub assignee_ids: Vec<Uuid>,
}

/// Typed partial update for a task
///
/// The project a task belongs to is fixed at creation; there is
/// deliberately no `project_id` field here.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTask {
    /// New title
    pub title: Option<String>,

    /// New description
    pub description: Option<String>,

    /// New notes
    pub notes: Option<String>,

    /// New priority
    pub priority: Option<TaskPriority>,

    /// Direct status change (owner edits only)
    pub status: Option<TaskStatus>,

    /// New deadline
    pub deadline: Option<DateTime<Utc>>,

    /// Replacement assignee roster
    pub assignee_ids: Option<Vec<Uuid>>,
}

const TASK_COLUMNS: &str = "id, title, description, notes, priority, status, project_id, \
     owner_id, assigned_by, submission_content, created_at, updated_at, \
     assigned_at, completed_at, deadline";

impl Task {
    /// Creates a task and its assignee roster in one transaction
    pub async fn create(pool: &PgPool, data: CreateTask) -> Result<Self, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let assigned_at = if data.assignee_ids.is_empty() {
            None
        } else {
            Some(Utc::now())
        };

        let task = sqlx::query_as::<_, Task>(&format!(
            r#"
            INSERT INTO tasks (title, description, notes, priority, project_id,
                               owner_id, assigned_by, deadline, assigned_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {TASK_COLUMNS}
            "#,
        ))
        .bind(&data.title)
        .bind(&data.description)
        .bind(&data.notes)
        .bind(data.priority)
        .bind(data.project_id)
        .bind(data.owner_id)
        .bind(data.assigned_by)
        .bind(data.deadline)
        .bind(assigned_at)
        .fetch_one(&mut *tx)
        .await?;

        for user_id in &data.assignee_ids {
            sqlx::query(
                "INSERT INTO task_assignees (task_id, user_id) VALUES ($1, $2)
                 ON CONFLICT DO NOTHING",
            )
            .bind(task.id)
            .bind(user_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(task)
    }

    /// Finds a task by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Task>(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE id = $1",
        ))
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Applies a typed partial update; replaces the assignee roster
    /// when `assignee_ids` is present
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateTask,
    ) -> Result<Option<Self>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let task = sqlx::query_as::<_, Task>(&format!(
            r#"
            UPDATE tasks
            SET title = COALESCE($2, title),
                description = COALESCE($3, description),
                notes = COALESCE($4, notes),
                priority = COALESCE($5, priority),
                status = COALESCE($6, status),
                deadline = COALESCE($7, deadline),
                completed_at = CASE
                    WHEN $6::task_status = 'completed' THEN NOW()
                    WHEN $6::task_status IS NOT NULL THEN NULL
                    ELSE completed_at
                END,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {TASK_COLUMNS}
            "#,
        ))
        .bind(id)
        .bind(data.title)
        .bind(data.description)
        .bind(data.notes)
        .bind(data.priority)
        .bind(data.status)
        .bind(data.deadline)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(task) = task else {
            tx.rollback().await?;
            return Ok(None);
        };

        if let Some(assignee_ids) = data.assignee_ids {
            sqlx::query("DELETE FROM task_assignees WHERE task_id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?;

            for user_id in assignee_ids {
                sqlx::query(
                    "INSERT INTO task_assignees (task_id, user_id) VALUES ($1, $2)
                     ON CONFLICT DO NOTHING",
                )
                .bind(id)
                .bind(user_id)
                .execute(&mut *tx)
                .await?;
            }

            sqlx::query("UPDATE tasks SET assigned_at = NOW() WHERE id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(Some(task))
    }

    /// Submits the task for owner review
    ///
    /// Guarded on the current status so concurrent submissions race
    /// safely; the loser gets `None`.
    pub async fn submit_for_approval(
        pool: &PgPool,
        id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Task>(&format!(
            r#"
            UPDATE tasks
            SET status = 'pending_approval',
                updated_at = NOW()
            WHERE id = $1 AND status IN ('todo', 'in_progress')
            RETURNING {TASK_COLUMNS}
            "#,
        ))
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Recalls a submitted task back to in-progress
    pub async fn recall(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Task>(&format!(
            r#"
            UPDATE tasks
            SET status = 'in_progress',
                updated_at = NOW()
            WHERE id = $1 AND status = 'pending_approval'
            RETURNING {TASK_COLUMNS}
            "#,
        ))
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Approves a submitted task, marking it completed
    pub async fn approve(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Task>(&format!(
            r#"
            UPDATE tasks
            SET status = 'completed',
                completed_at = NOW(),
                updated_at = NOW()
            WHERE id = $1 AND status = 'pending_approval'
            RETURNING {TASK_COLUMNS}
            "#,
        ))
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Sends a submitted task back to its assignees for more work
    pub async fn request_changes(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Task>(&format!(
            r#"
            UPDATE tasks
            SET status = 'in_progress',
                updated_at = NOW()
            WHERE id = $1 AND status = 'pending_approval'
            RETURNING {TASK_COLUMNS}
            "#,
        ))
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Reopens a task from any state
    ///
    /// Clears `completed_at` so the task reads as open again.
    pub async fn reopen(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Task>(&format!(
            r#"
            UPDATE tasks
            SET status = 'in_progress',
                completed_at = NULL,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {TASK_COLUMNS}
            "#,
        ))
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Completes a task directly without review (personal tasks),
    /// from any state
    pub async fn complete(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Task>(&format!(
            r#"
            UPDATE tasks
            SET status = 'completed',
                completed_at = NOW(),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {TASK_COLUMNS}
            "#,
        ))
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Saves one user's submitted work on the task
    ///
    /// Reads the submission array under a row lock so concurrent saves
    /// by different users cannot overwrite each other.
    pub async fn save_submission(
        pool: &PgPool,
        id: Uuid,
        entry: SubmissionEntry,
    ) -> Result<Option<Self>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let row: Option<(Json<Vec<SubmissionEntry>>,)> = sqlx::query_as(
            "SELECT submission_content FROM tasks WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some((Json(mut entries),)) = row else {
            tx.rollback().await?;
            return Ok(None);
        };

        upsert_submission(&mut entries, entry);

        let task = sqlx::query_as::<_, Task>(&format!(
            r#"
            UPDATE tasks
            SET submission_content = $2,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {TASK_COLUMNS}
            "#,
        ))
        .bind(id)
        .bind(Json(entries))
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(Some(task))
    }

    /// Lists assignee ids for the task
    pub async fn assignee_ids(pool: &PgPool, task_id: Uuid) -> Result<Vec<Uuid>, sqlx::Error> {
        let rows: Vec<(Uuid,)> =
            sqlx::query_as("SELECT user_id FROM task_assignees WHERE task_id = $1")
                .bind(task_id)
                .fetch_all(pool)
                .await?;

        Ok(rows.into_iter().map(|(id,)| id).collect())
    }

    /// Checks assignment via a set-membership query
    pub async fn is_assignee(
        pool: &PgPool,
        task_id: Uuid,
        user_id: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let row: Option<(Uuid,)> = sqlx::query_as(
            "SELECT task_id FROM task_assignees WHERE task_id = $1 AND user_id = $2",
        )
        .bind(task_id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        Ok(row.is_some())
    }

    /// Lists tasks in a project with pagination
    ///
    /// When `visible_to` is set, only tasks assigned to that user are
    /// returned (non-owner members see just their own assignments).
    pub async fn list_by_project(
        pool: &PgPool,
        project_id: Uuid,
        status: Option<TaskStatus>,
        visible_to: Option<Uuid>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Task>(&format!(
            r#"
            SELECT {TASK_COLUMNS}
            FROM tasks t
            WHERE t.project_id = $1
              AND ($2::task_status IS NULL OR t.status = $2)
              AND ($3::uuid IS NULL OR EXISTS (
                   SELECT 1 FROM task_assignees ta
                   WHERE ta.task_id = t.id AND ta.user_id = $3))
            ORDER BY t.created_at DESC
            LIMIT $4 OFFSET $5
            "#,
        ))
        .bind(project_id)
        .bind(status)
        .bind(visible_to)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
    }

    /// Counts tasks in a project under the same visibility rules as
    /// [`Task::list_by_project`]
    pub async fn count_by_project(
        pool: &PgPool,
        project_id: Uuid,
        status: Option<TaskStatus>,
        visible_to: Option<Uuid>,
    ) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*)
            FROM tasks t
            WHERE t.project_id = $1
              AND ($2::task_status IS NULL OR t.status = $2)
              AND ($3::uuid IS NULL OR EXISTS (
                   SELECT 1 FROM task_assignees ta
                   WHERE ta.task_id = t.id AND ta.user_id = $3))
            "#,
        )
        .bind(project_id)
        .bind(status)
        .bind(visible_to)
        .fetch_one(pool)
        .await?;

        Ok(count)
    }

    /// Lists the user's working set with pagination
    ///
    /// Personal tasks appear in every status; assigned project tasks
    /// drop out once completed.
    pub async fn list_assigned(
        pool: &PgPool,
        user_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Task>(&format!(
            r#"
            SELECT {TASK_COLUMNS}
            FROM tasks t
            WHERE (t.project_id IS NULL AND t.owner_id = $1)
               OR (t.project_id IS NOT NULL
                   AND t.status <> 'completed'
                   AND EXISTS (SELECT 1 FROM task_assignees ta
                               WHERE ta.task_id = t.id AND ta.user_id = $1))
            ORDER BY t.created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        ))
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
    }

    /// Counts the user's working set
    pub async fn count_assigned(pool: &PgPool, user_id: Uuid) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*)
            FROM tasks t
            WHERE (t.project_id IS NULL AND t.owner_id = $1)
               OR (t.project_id IS NOT NULL
                   AND t.status <> 'completed'
                   AND EXISTS (SELECT 1 FROM task_assignees ta
                               WHERE ta.task_id = t.id AND ta.user_id = $1))
            "#,
        )
        .bind(user_id)
        .fetch_one(pool)
        .await?;

        Ok(count)
    }

    /// Lists the user's personal tasks, optionally filtered by status
    pub async fn list_personal(
        pool: &PgPool,
        owner_id: Uuid,
        status: Option<TaskStatus>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Task>(&format!(
            r#"
            SELECT {TASK_COLUMNS}
            FROM tasks
            WHERE project_id IS NULL AND owner_id = $1
              AND ($2::task_status IS NULL OR status = $2)
            ORDER BY created_at DESC
            LIMIT $3 OFFSET $4
            "#,
        ))
        .bind(owner_id)
        .bind(status)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
    }

    /// Counts the user's personal tasks
    pub async fn count_personal(
        pool: &PgPool,
        owner_id: Uuid,
        status: Option<TaskStatus>,
    ) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*)
            FROM tasks
            WHERE project_id IS NULL AND owner_id = $1
              AND ($2::task_status IS NULL OR status = $2)
            "#,
        )
        .bind(owner_id)
        .bind(status)
        .fetch_one(pool)
        .await?;

        Ok(count)
    }

    /// Lists tasks awaiting the project owner's review
    pub async fn list_pending_approval(
        pool: &PgPool,
        project_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Task>(&format!(
            r#"
            SELECT {TASK_COLUMNS}
            FROM tasks
            WHERE project_id = $1 AND status = 'pending_approval'
            ORDER BY updated_at ASC
            "#,
        ))
        .bind(project_id)
        .fetch_all(pool)
        .await
    }

    /// Deletes a task
    ///
    /// Assignee rows are removed by CASCADE.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_status_as_str() {
        assert_eq!(TaskStatus::Todo.as_str(), "todo");
        assert_eq!(TaskStatus::InProgress.as_str(), "in_progress");
        assert_eq!(TaskStatus::PendingApproval.as_str(), "pending_approval");
        assert_eq!(TaskStatus::Completed.as_str(), "completed");
    }

    #[test]
    fn test_task_status_is_open() {
        assert!(TaskStatus::Todo.is_open());
        assert!(TaskStatus::InProgress.is_open());
        assert!(TaskStatus::PendingApproval.is_open());
        assert!(!TaskStatus::Completed.is_open());
    }

    #[test]
    fn test_task_status_transitions() {
        // Submitting for review
        assert!(TaskStatus::Todo.can_transition_to(TaskStatus::PendingApproval));
        assert!(TaskStatus::InProgress.can_transition_to(TaskStatus::PendingApproval));
        assert!(!TaskStatus::Completed.can_transition_to(TaskStatus::PendingApproval));

        // Review outcomes
        assert!(TaskStatus::PendingApproval.can_transition_to(TaskStatus::InProgress));
        assert!(TaskStatus::PendingApproval.can_transition_to(TaskStatus::Completed));
        assert!(!TaskStatus::PendingApproval.can_transition_to(TaskStatus::Todo));

        // Reopening
        assert!(TaskStatus::Completed.can_transition_to(TaskStatus::InProgress));
        assert!(!TaskStatus::Completed.can_transition_to(TaskStatus::Todo));
        assert!(!TaskStatus::Completed.can_transition_to(TaskStatus::Completed));
    }

    #[test]
    fn test_task_status_serde_snake_case() {
        let json = serde_json::to_string(&TaskStatus::PendingApproval).unwrap();
        assert_eq!(json, "\"pending_approval\"");

        let status: TaskStatus = serde_json::from_str("\"in_progress\"").unwrap();
        assert_eq!(status, TaskStatus::InProgress);
    }

    fn entry(user_id: Uuid, content: &str) -> SubmissionEntry {
        SubmissionEntry {
            user_id,
            username: "worker".to_string(),
            content: content.to_string(),
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn test_upsert_submission_appends_new_user() {
        let mut entries = vec![entry(Uuid::new_v4(), "first")];
        let newcomer = Uuid::new_v4();

        upsert_submission(&mut entries, entry(newcomer, "second"));

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].user_id, newcomer);
        assert_eq!(entries[1].content, "second");
    }

    #[test]
    fn test_upsert_submission_replaces_own_entry_in_place() {
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();
        let mut entries = vec![entry(alice, "draft"), entry(bob, "done")];

        upsert_submission(&mut entries, entry(alice, "final"));

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].user_id, alice);
        assert_eq!(entries[0].content, "final");
        assert_eq!(entries[1].user_id, bob);
        assert_eq!(entries[1].content, "done");
    }
}
