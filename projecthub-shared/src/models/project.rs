/// Project model and database operations
///
/// A project is either personal (no team, roster is just the owner) or
/// team-affiliated. A team project's roster is snapshotted from the
/// team's membership at creation time and does not track later team
/// changes. The owner holds the `Owner` role in the roster; everyone
/// else starts as `Member`. Roster entries live in `project_members`
/// (see [`super::project_member`]). The team affiliation is set at
/// creation and immutable afterwards.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE projects (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     name VARCHAR(255) NOT NULL,
///     description TEXT NOT NULL DEFAULT '',
///     team_id UUID REFERENCES teams(id) ON DELETE CASCADE,
///     owner_id UUID NOT NULL REFERENCES users(id),
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Project model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Project {
    /// Unique project ID
    pub id: Uuid,

    /// Project name
    pub name: String,

    /// Project description
    pub description: String,

    /// Team the project belongs to, if any
    pub team_id: Option<Uuid>,

    /// Creating user, who owns the project
    pub owner_id: Uuid,

    /// When the project was created
    pub created_at: DateTime<Utc>,

    /// When the project was last updated
    pub updated_at: DateTime<Utc>,
}

/// Project with its roster size, for list endpoints
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ProjectSummary {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub team_id: Option<Uuid>,
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    /// Number of roster members, owner included
    pub member_count: i64,
}

/// Input for creating a new project
#[derive(Debug, Clone)]
pub struct CreateProject {
    /// Project name
    pub name: String,

    /// Project description
    pub description: String,

    /// Team the project belongs to; `None` makes a personal project
    pub team_id: Option<Uuid>,

    /// Creating user
    pub owner_id: Uuid,
}

const SUMMARY_QUERY: &str = r#"
    SELECT p.id, p.name, p.description, p.team_id, p.owner_id,
           p.created_at, p.updated_at,
           COUNT(pm.user_id) AS member_count
    FROM projects p
    JOIN project_members pm ON pm.project_id = p.id
"#;

impl Project {
    /// Creates a project and its member roster in one transaction
    ///
    /// The owner always gets a roster row with the `Owner` role. For a
    /// team project, the rest of the team's current membership is
    /// copied in as `Member`; a personal project gets no further rows.
    pub async fn create(pool: &PgPool, data: CreateProject) -> Result<Self, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let project = sqlx::query_as::<_, Project>(
            r#"
            INSERT INTO projects (name, description, team_id, owner_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, description, team_id, owner_id, created_at, updated_at
            "#,
        )
        .bind(&data.name)
        .bind(&data.description)
        .bind(data.team_id)
        .bind(data.owner_id)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            "INSERT INTO project_members (project_id, user_id, role) VALUES ($1, $2, 'Owner')",
        )
        .bind(project.id)
        .bind(data.owner_id)
        .execute(&mut *tx)
        .await?;

        if let Some(team_id) = data.team_id {
            // Snapshot of the team roster at creation time; later team
            // changes do not touch the project roster.
            sqlx::query(
                r#"
                INSERT INTO project_members (project_id, user_id, role)
                SELECT $1, user_id, 'Member'
                FROM team_members
                WHERE team_id = $2 AND user_id <> $3
                "#,
            )
            .bind(project.id)
            .bind(team_id)
            .bind(data.owner_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(project)
    }

    /// Finds a project by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Project>(
            "SELECT id, name, description, team_id, owner_id, created_at, updated_at
             FROM projects WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Lists projects the user holds a roster row in, newest first
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ProjectSummary>, sqlx::Error> {
        let query = format!(
            r#"{SUMMARY_QUERY}
            WHERE p.id IN (SELECT project_id FROM project_members WHERE user_id = $1)
            GROUP BY p.id
            ORDER BY p.created_at DESC
            LIMIT $2 OFFSET $3
            "#
        );

        sqlx::query_as::<_, ProjectSummary>(&query)
            .bind(user_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Counts projects the user belongs to
    pub async fn count_for_user(pool: &PgPool, user_id: Uuid) -> Result<i64, sqlx::Error> {
        let row: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM project_members WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_one(pool)
        .await?;

        Ok(row.0)
    }

    /// Lists the user's personal projects (no team affiliation), newest first
    pub async fn list_personal(
        pool: &PgPool,
        owner_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ProjectSummary>, sqlx::Error> {
        let query = format!(
            r#"{SUMMARY_QUERY}
            WHERE p.team_id IS NULL AND p.owner_id = $1
            GROUP BY p.id
            ORDER BY p.created_at DESC
            LIMIT $2 OFFSET $3
            "#
        );

        sqlx::query_as::<_, ProjectSummary>(&query)
            .bind(owner_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Counts the user's personal projects
    pub async fn count_personal(pool: &PgPool, owner_id: Uuid) -> Result<i64, sqlx::Error> {
        let row: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM projects WHERE team_id IS NULL AND owner_id = $1",
        )
        .bind(owner_id)
        .fetch_one(pool)
        .await?;

        Ok(row.0)
    }

    /// Lists projects within a team
    pub async fn list_for_team(pool: &PgPool, team_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Project>(
            "SELECT id, name, description, team_id, owner_id, created_at, updated_at
             FROM projects WHERE team_id = $1 ORDER BY created_at DESC",
        )
        .bind(team_id)
        .fetch_all(pool)
        .await
    }

    /// Deletes the project, cascading to its tasks and roster
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Checks roster membership via a set-membership query
    pub async fn is_member(
        pool: &PgPool,
        project_id: Uuid,
        user_id: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let row: Option<(Uuid,)> = sqlx::query_as(
            "SELECT project_id FROM project_members WHERE project_id = $1 AND user_id = $2",
        )
        .bind(project_id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        Ok(row.is_some())
    }

    /// Lists roster member ids for the project
    pub async fn member_ids(pool: &PgPool, project_id: Uuid) -> Result<Vec<Uuid>, sqlx::Error> {
        let rows: Vec<(Uuid,)> =
            sqlx::query_as("SELECT user_id FROM project_members WHERE project_id = $1")
                .bind(project_id)
                .fetch_all(pool)
                .await?;

        Ok(rows.into_iter().map(|(id,)| id).collect())
    }
}
