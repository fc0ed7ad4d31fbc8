/// Notification model and database operations
///
/// Notifications are per-user inbox entries written by the dispatcher
/// when something relevant happens (assignment, approval, invitation).
/// The only mutation after creation is flipping the read flag; rows
/// are never deleted here (retention is an external concern).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Notification category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    TaskAssigned,
    TaskStatusChanged,
    TaskSubmittedForApproval,
    TaskApproved,
    TaskReopened,
    TaskChangesRequested,
    TeamInvitation,
    ProjectInvitation,
    RemoveFromTeam,
    ProjectDeleted,
    RoleChanged,
    General,
}

impl NotificationKind {
    /// Converts kind to string for database storage
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::TaskAssigned => "task_assigned",
            NotificationKind::TaskStatusChanged => "task_status_changed",
            NotificationKind::TaskSubmittedForApproval => "task_submitted_for_approval",
            NotificationKind::TaskApproved => "task_approved",
            NotificationKind::TaskReopened => "task_reopened",
            NotificationKind::TaskChangesRequested => "task_changes_requested",
            NotificationKind::TeamInvitation => "team_invitation",
            NotificationKind::ProjectInvitation => "project_invitation",
            NotificationKind::RemoveFromTeam => "remove_from_team",
            NotificationKind::ProjectDeleted => "project_deleted",
            NotificationKind::RoleChanged => "role_changed",
            NotificationKind::General => "general",
        }
    }
}

/// Notification model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Notification {
    /// Unique notification ID
    pub id: Uuid,

    /// Receiving user
    pub user_id: Uuid,

    /// Short title
    pub title: String,

    /// Human-readable message
    pub message: String,

    /// Notification category
    pub kind: NotificationKind,

    /// Whether the user has read it
    pub is_read: bool,

    /// Related entity (task, project, or team), if any
    pub related_id: Option<Uuid>,

    /// When the notification was created
    pub created_at: DateTime<Utc>,
}

/// Input for creating a notification
#[derive(Debug, Clone)]
pub struct CreateNotification {
    /// Receiving user
    pub user_id: Uuid,

    /// Short title
    pub title: String,

    /// Human-readable message
    pub message: String,

    /// Notification category
    pub kind: NotificationKind,

    /// Related entity, if any
    pub related_id: Option<Uuid>,
}

impl Notification {
    /// Creates a notification
    pub async fn create(pool: &PgPool, data: CreateNotification) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Notification>(
            r#"
            INSERT INTO notifications (user_id, title, message, kind, related_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, user_id, title, message, kind, is_read, related_id, created_at
            "#,
        )
        .bind(data.user_id)
        .bind(&data.title)
        .bind(&data.message)
        .bind(data.kind)
        .bind(data.related_id)
        .fetch_one(pool)
        .await
    }

    /// Lists a user's notifications, newest first, with pagination
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: Uuid,
        unread_only: bool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Notification>(
            r#"
            SELECT id, user_id, title, message, kind, is_read, related_id, created_at
            FROM notifications
            WHERE user_id = $1 AND (NOT $2 OR is_read = FALSE)
            ORDER BY created_at DESC
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(user_id)
        .bind(unread_only)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
    }

    /// Counts a user's notifications
    pub async fn count_for_user(
        pool: &PgPool,
        user_id: Uuid,
        unread_only: bool,
    ) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM notifications WHERE user_id = $1 AND (NOT $2 OR is_read = FALSE)",
        )
        .bind(user_id)
        .bind(unread_only)
        .fetch_one(pool)
        .await?;

        Ok(count)
    }

    /// Counts a user's unread notifications
    pub async fn unread_count(pool: &PgPool, user_id: Uuid) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM notifications WHERE user_id = $1 AND is_read = FALSE",
        )
        .bind(user_id)
        .fetch_one(pool)
        .await?;

        Ok(count)
    }

    /// Marks one notification read
    ///
    /// Scoped to the owning user so nobody can mark someone else's
    /// notification; a miss reads as not-found.
    pub async fn mark_read(
        pool: &PgPool,
        id: Uuid,
        user_id: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE notifications SET is_read = TRUE WHERE id = $1 AND user_id = $2",
        )
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Marks all of a user's notifications read
    pub async fn mark_all_read(pool: &PgPool, user_id: Uuid) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE notifications SET is_read = TRUE WHERE user_id = $1 AND is_read = FALSE",
        )
        .bind(user_id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notification_kind_as_str() {
        assert_eq!(NotificationKind::TaskAssigned.as_str(), "task_assigned");
        assert_eq!(
            NotificationKind::TaskSubmittedForApproval.as_str(),
            "task_submitted_for_approval"
        );
        assert_eq!(NotificationKind::ProjectDeleted.as_str(), "project_deleted");
        assert_eq!(NotificationKind::General.as_str(), "general");
    }

    #[test]
    fn test_notification_kind_serde_snake_case() {
        let json = serde_json::to_string(&NotificationKind::TaskChangesRequested).unwrap();
        assert_eq!(json, "\"task_changes_requested\"");

        let kind: NotificationKind = serde_json::from_str("\"team_invitation\"").unwrap();
        assert_eq!(kind, NotificationKind::TeamInvitation);
    }
}
