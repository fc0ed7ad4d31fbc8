/// Database models for ProjectHub
///
/// This module contains all database models and their CRUD operations.
///
/// # Models
///
/// - `user`: User accounts
/// - `team`: Teams (owner + member roster)
/// - `project`: Projects, personal or team-affiliated
/// - `project_member`: Project membership rows with roles
/// - `role`: Named permission sets seeded at init
/// - `task`: Tasks and the approval-workflow state machine
/// - `notification`: Persisted user notifications
///
/// # Example
///
/// ```no_run
/// use projecthub_shared::models::user::{User, CreateUser};
/// use projecthub_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let user = User::create(&pool, CreateUser {
///     username: "alice".to_string(),
///     email: "alice@example.com".to_string(),
///     full_name: "Alice Doe".to_string(),
///     password_hash: "$argon2id$...".to_string(),
/// }).await?;
/// # Ok(())
/// # }
/// ```

pub mod notification;
pub mod project;
pub mod project_member;
pub mod role;
pub mod task;
pub mod team;
pub mod user;
