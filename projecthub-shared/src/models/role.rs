/// Role definitions
///
/// Roles are named permission sets seeded once per deployment: `Owner`
/// carries the wildcard permission `*` and `Member` carries `read`.
/// Roster entries reference roles by name.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Role model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Role {
    /// Unique role ID
    pub id: Uuid,

    /// Role name
    pub name: String,

    /// Role description
    pub description: String,

    /// Permission strings (`*` means all)
    pub permissions: Vec<String>,

    /// When the role was created
    pub created_at: DateTime<Utc>,
}

impl Role {
    /// Seeds the built-in roles if they do not exist yet
    pub async fn seed_defaults(pool: &PgPool) -> Result<(), sqlx::Error> {
        let defaults = [
            ("Owner", "Full control over the project", vec!["*"]),
            ("Member", "Read access to the project", vec!["read"]),
        ];

        for (name, description, permissions) in defaults {
            sqlx::query(
                "INSERT INTO roles (name, description, permissions) VALUES ($1, $2, $3)
                 ON CONFLICT (name) DO NOTHING",
            )
            .bind(name)
            .bind(description)
            .bind(&permissions)
            .execute(pool)
            .await?;
        }

        Ok(())
    }

    /// Lists all roles
    pub async fn list(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Role>(
            "SELECT id, name, description, permissions, created_at FROM roles ORDER BY name",
        )
        .fetch_all(pool)
        .await
    }

    /// Finds a role by id
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Role>(
            "SELECT id, name, description, permissions, created_at FROM roles WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }
}
