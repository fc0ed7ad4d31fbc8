/// Team model and database operations
///
/// A team has exactly one owner and a member roster. The owner is
/// always treated as a member and can never be removed; only the owner
/// may mutate the roster or delete the team. Deleting a team cascades
/// to its projects (and transitively their tasks and membership rows).
///
/// # Schema
///
/// ```sql
/// CREATE TABLE teams (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     name VARCHAR(255) NOT NULL,
///     description TEXT NOT NULL DEFAULT '',
///     owner_id UUID NOT NULL REFERENCES users(id),
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     CONSTRAINT teams_owner_name_key UNIQUE (owner_id, name)
/// );
///
/// CREATE TABLE team_members (
///     team_id UUID NOT NULL REFERENCES teams(id) ON DELETE CASCADE,
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     PRIMARY KEY (team_id, user_id)
/// );
/// ```

use super::user::User;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Team model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Team {
    /// Unique team ID
    pub id: Uuid,

    /// Team name, unique per owner
    pub name: String,

    /// Team description
    pub description: String,

    /// Owning user
    pub owner_id: Uuid,

    /// When the team was created
    pub created_at: DateTime<Utc>,

    /// When the team was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new team
#[derive(Debug, Clone)]
pub struct CreateTeam {
    /// Team name
    pub name: String,

    /// Team description
    pub description: String,

    /// Owning user (implicitly added to the roster)
    pub owner_id: Uuid,

    /// Initial member ids (deduplicated; owner always included)
    pub member_ids: Vec<Uuid>,
}

/// Typed partial update for a team
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTeam {
    /// New name
    pub name: Option<String>,

    /// New description
    pub description: Option<String>,

    /// Replacement member roster (owner is re-added if omitted)
    pub member_ids: Option<Vec<Uuid>>,
}

impl Team {
    /// Creates a team with its initial roster in one transaction
    ///
    /// The owner is always part of the roster regardless of
    /// `member_ids`.
    pub async fn create(pool: &PgPool, data: CreateTeam) -> Result<Self, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let team = sqlx::query_as::<_, Team>(
            r#"
            INSERT INTO teams (name, description, owner_id)
            VALUES ($1, $2, $3)
            RETURNING id, name, description, owner_id, created_at, updated_at
            "#,
        )
        .bind(&data.name)
        .bind(&data.description)
        .bind(data.owner_id)
        .fetch_one(&mut *tx)
        .await?;

        let mut member_ids = data.member_ids;
        if !member_ids.contains(&data.owner_id) {
            member_ids.push(data.owner_id);
        }

        for user_id in member_ids {
            sqlx::query(
                "INSERT INTO team_members (team_id, user_id) VALUES ($1, $2)
                 ON CONFLICT DO NOTHING",
            )
            .bind(team.id)
            .bind(user_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(team)
    }

    /// Finds a team by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Team>(
            "SELECT id, name, description, owner_id, created_at, updated_at
             FROM teams WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Checks whether the owner already has a team with this name
    pub async fn name_taken(
        pool: &PgPool,
        owner_id: Uuid,
        name: &str,
    ) -> Result<bool, sqlx::Error> {
        let row: Option<(Uuid,)> =
            sqlx::query_as("SELECT id FROM teams WHERE owner_id = $1 AND name = $2")
                .bind(owner_id)
                .bind(name)
                .fetch_optional(pool)
                .await?;

        Ok(row.is_some())
    }

    /// Lists teams the user owns or belongs to
    pub async fn list_for_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Team>(
            r#"
            SELECT DISTINCT t.id, t.name, t.description, t.owner_id, t.created_at, t.updated_at
            FROM teams t
            LEFT JOIN team_members tm ON tm.team_id = t.id
            WHERE t.owner_id = $1 OR tm.user_id = $1
            ORDER BY t.created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    /// Applies a typed partial update; replaces the roster when
    /// `member_ids` is present
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        owner_id: Uuid,
        data: UpdateTeam,
    ) -> Result<Option<Self>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let team = sqlx::query_as::<_, Team>(
            r#"
            UPDATE teams
            SET name = COALESCE($2, name),
                description = COALESCE($3, description),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, description, owner_id, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(data.name)
        .bind(data.description)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(team) = team else {
            tx.rollback().await?;
            return Ok(None);
        };

        if let Some(mut member_ids) = data.member_ids {
            if !member_ids.contains(&owner_id) {
                member_ids.push(owner_id);
            }

            sqlx::query("DELETE FROM team_members WHERE team_id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?;

            for user_id in member_ids {
                sqlx::query(
                    "INSERT INTO team_members (team_id, user_id) VALUES ($1, $2)
                     ON CONFLICT DO NOTHING",
                )
                .bind(id)
                .bind(user_id)
                .execute(&mut *tx)
                .await?;
            }
        }

        tx.commit().await?;
        Ok(Some(team))
    }

    /// Deletes the team, cascading to projects and their tasks
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM teams WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Checks membership via a set-membership query (owner counts)
    pub async fn is_member(
        pool: &PgPool,
        team_id: Uuid,
        user_id: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let row: Option<(Uuid,)> = sqlx::query_as(
            r#"
            SELECT t.id FROM teams t
            WHERE t.id = $1
              AND (t.owner_id = $2
                   OR EXISTS (SELECT 1 FROM team_members tm
                              WHERE tm.team_id = t.id AND tm.user_id = $2))
            "#,
        )
        .bind(team_id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        Ok(row.is_some())
    }

    /// Lists member ids for the team
    pub async fn member_ids(pool: &PgPool, team_id: Uuid) -> Result<Vec<Uuid>, sqlx::Error> {
        let rows: Vec<(Uuid,)> =
            sqlx::query_as("SELECT user_id FROM team_members WHERE team_id = $1")
                .bind(team_id)
                .fetch_all(pool)
                .await?;

        Ok(rows.into_iter().map(|(id,)| id).collect())
    }

    /// Lists team members with pagination
    pub async fn members(
        pool: &PgPool,
        team_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT u.id, u.username, u.email, u.full_name, u.password_hash, u.is_active, u.created_at
            FROM users u
            JOIN team_members tm ON tm.user_id = u.id
            WHERE tm.team_id = $1
            ORDER BY u.username
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(team_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
    }

    /// Counts team members
    pub async fn member_count(pool: &PgPool, team_id: Uuid) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM team_members WHERE team_id = $1")
                .bind(team_id)
                .fetch_one(pool)
                .await?;

        Ok(count)
    }

    /// Adds a member to the roster
    ///
    /// Returns `false` when the user was already a member.
    pub async fn add_member(
        pool: &PgPool,
        team_id: Uuid,
        user_id: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO team_members (team_id, user_id) VALUES ($1, $2)
             ON CONFLICT DO NOTHING",
        )
        .bind(team_id)
        .bind(user_id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Removes a member from the roster
    ///
    /// Returns `false` when the user was not a member.
    pub async fn remove_member(
        pool: &PgPool,
        team_id: Uuid,
        user_id: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM team_members WHERE team_id = $1 AND user_id = $2")
                .bind(team_id)
                .bind(user_id)
                .execute(pool)
                .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Searches team members by username substring
    pub async fn search_members(
        pool: &PgPool,
        team_id: Uuid,
        query: &str,
    ) -> Result<Vec<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT u.id, u.username, u.email, u.full_name, u.password_hash, u.is_active, u.created_at
            FROM users u
            JOIN team_members tm ON tm.user_id = u.id
            WHERE tm.team_id = $1 AND u.username ILIKE $2
            ORDER BY u.username
            "#,
        )
        .bind(team_id)
        .bind(format!("%{}%", query))
        .fetch_all(pool)
        .await
    }
}
