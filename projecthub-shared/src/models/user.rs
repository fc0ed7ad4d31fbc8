/// User model and database operations
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     username VARCHAR(100) NOT NULL UNIQUE,
///     email VARCHAR(255) NOT NULL UNIQUE,
///     full_name VARCHAR(255) NOT NULL,
///     password_hash TEXT NOT NULL,
///     is_active BOOLEAN NOT NULL DEFAULT TRUE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// User model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Unique user ID
    pub id: Uuid,

    /// Unique username (login handle, shown in notifications)
    pub username: String,

    /// Unique email address
    pub email: String,

    /// Display name
    pub full_name: String,

    /// Argon2id password hash (never serialized in responses)
    #[serde(skip_serializing)]
    pub password_hash: String,

    /// Whether the account is active
    pub is_active: bool,

    /// When the account was created
    pub created_at: DateTime<Utc>,
}

/// Input for creating a new user
#[derive(Debug, Clone)]
pub struct CreateUser {
    /// Unique username
    pub username: String,

    /// Unique email
    pub email: String,

    /// Display name
    pub full_name: String,

    /// Pre-hashed password
    pub password_hash: String,
}

/// Typed partial update for the mutable profile fields
///
/// Only fields present in the payload are written; identity (id, email,
/// credential hash) is not updatable through this path.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateUser {
    /// New display name
    pub full_name: Option<String>,

    /// New username (must remain unique)
    pub username: Option<String>,
}

impl UpdateUser {
    /// True when no field is present
    pub fn is_empty(&self) -> bool {
        self.full_name.is_none() && self.username.is_none()
    }
}

impl User {
    /// Creates a new user
    ///
    /// # Errors
    ///
    /// Surfaces the unique-constraint violation when the username or
    /// email is already registered.
    pub async fn create(pool: &PgPool, data: CreateUser) -> Result<Self, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, email, full_name, password_hash)
            VALUES ($1, $2, $3, $4)
            RETURNING id, username, email, full_name, password_hash, is_active, created_at
            "#,
        )
        .bind(data.username)
        .bind(data.email)
        .bind(data.full_name)
        .bind(data.password_hash)
        .fetch_one(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            "SELECT id, username, email, full_name, password_hash, is_active, created_at
             FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Finds a user by email (login path)
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            "SELECT id, username, email, full_name, password_hash, is_active, created_at
             FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(pool)
        .await
    }

    /// Searches users by username substring, excluding the searcher
    pub async fn search(
        pool: &PgPool,
        query: &str,
        exclude: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, full_name, password_hash, is_active, created_at
            FROM users
            WHERE username ILIKE $1 AND id != $2
            ORDER BY username
            "#,
        )
        .bind(format!("%{}%", query))
        .bind(exclude)
        .fetch_all(pool)
        .await
    }

    /// Applies a typed partial update to the user's profile
    pub async fn update_profile(
        pool: &PgPool,
        id: Uuid,
        data: UpdateUser,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET full_name = COALESCE($2, full_name),
                username = COALESCE($3, username)
            WHERE id = $1
            RETURNING id, username, email, full_name, password_hash, is_active, created_at
            "#,
        )
        .bind(id)
        .bind(data.full_name)
        .bind(data.username)
        .fetch_optional(pool)
        .await
    }

    /// Filters a set of ids down to ids of existing users
    pub async fn existing_ids(pool: &PgPool, ids: &[Uuid]) -> Result<Vec<Uuid>, sqlx::Error> {
        let rows: Vec<(Uuid,)> =
            sqlx::query_as("SELECT id FROM users WHERE id = ANY($1)")
                .bind(ids)
                .fetch_all(pool)
                .await?;

        Ok(rows.into_iter().map(|(id,)| id).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_user_is_empty() {
        assert!(UpdateUser::default().is_empty());

        let update = UpdateUser {
            full_name: Some("New Name".to_string()),
            username: None,
        };
        assert!(!update.is_empty());
    }

    #[test]
    fn test_password_hash_not_serialized() {
        let user = User {
            id: Uuid::new_v4(),
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            full_name: "Alice Doe".to_string(),
            password_hash: "$argon2id$secret".to_string(),
            is_active: true,
            created_at: Utc::now(),
        };

        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["username"], "alice");
    }
}
