/// Project roster entries
///
/// Each row links a user to a project with a free-form role name. The
/// catalog seeds `Owner` and `Member` but assignment is not restricted
/// to those two. The owner's entry is created alongside the project
/// and is never removable through roster operations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Roster entry for a project
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ProjectMember {
    /// Project the entry belongs to
    pub project_id: Uuid,

    /// Member user
    pub user_id: Uuid,

    /// Role name (free-form; `Owner` and `Member` are seeded)
    pub role: String,

    /// When the user joined the roster
    pub joined_at: DateTime<Utc>,
}

/// Roster entry joined with the member's public profile
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ProjectMemberDetail {
    /// Member user
    pub user_id: Uuid,

    /// Member username
    pub username: String,

    /// Member full name
    pub full_name: String,

    /// Member email
    pub email: String,

    /// Role name
    pub role: String,

    /// When the user joined the roster
    pub joined_at: DateTime<Utc>,
}

impl ProjectMember {
    /// Finds a single roster entry
    pub async fn find(
        pool: &PgPool,
        project_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, ProjectMember>(
            "SELECT project_id, user_id, role, joined_at
             FROM project_members WHERE project_id = $1 AND user_id = $2",
        )
        .bind(project_id)
        .bind(user_id)
        .fetch_optional(pool)
        .await
    }

    /// Lists the roster with member profiles
    pub async fn list_detailed(
        pool: &PgPool,
        project_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ProjectMemberDetail>, sqlx::Error> {
        sqlx::query_as::<_, ProjectMemberDetail>(
            r#"
            SELECT pm.user_id, u.username, u.full_name, u.email, pm.role, pm.joined_at
            FROM project_members pm
            JOIN users u ON u.id = pm.user_id
            WHERE pm.project_id = $1
            ORDER BY pm.joined_at
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(project_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
    }

    /// Counts roster entries for the project
    pub async fn count(pool: &PgPool, project_id: Uuid) -> Result<i64, sqlx::Error> {
        let row: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM project_members WHERE project_id = $1")
                .bind(project_id)
                .fetch_one(pool)
                .await?;

        Ok(row.0)
    }

    /// Adds a member with the `Member` role
    ///
    /// Returns `false` when the user was already on the roster.
    pub async fn add(
        pool: &PgPool,
        project_id: Uuid,
        user_id: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO project_members (project_id, user_id, role) VALUES ($1, $2, 'Member')
             ON CONFLICT DO NOTHING",
        )
        .bind(project_id)
        .bind(user_id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Removes a member from the roster
    ///
    /// The owner's entry is excluded from the delete so it can never
    /// be removed here.
    pub async fn remove(
        pool: &PgPool,
        project_id: Uuid,
        user_id: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM project_members
             WHERE project_id = $1 AND user_id = $2 AND role <> 'Owner'",
        )
        .bind(project_id)
        .bind(user_id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Changes a member's role name
    pub async fn set_role(
        pool: &PgPool,
        project_id: Uuid,
        user_id: Uuid,
        role: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE project_members SET role = $3 WHERE project_id = $1 AND user_id = $2",
        )
        .bind(project_id)
        .bind(user_id)
        .bind(role)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
