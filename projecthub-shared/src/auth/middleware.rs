/// Request authentication context
///
/// The API server's auth layer validates the bearer token, loads the
/// user row, and inserts a [`CurrentUser`] into request extensions.
/// Handlers extract it with Axum's `Extension` extractor.
///
/// # Example
///
/// ```
/// use axum::Extension;
/// use projecthub_shared::auth::middleware::CurrentUser;
///
/// async fn handler(Extension(current_user): Extension<CurrentUser>) -> String {
///     format!("Hello, {}!", current_user.0.username)
/// }
/// ```

use crate::models::user::User;

/// Authenticated user attached to the request
///
/// Loaded from the database per request, so a deleted or deactivated
/// account is rejected even if its token is still live.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

impl CurrentUser {
    /// Gets the authenticated user's id
    pub fn id(&self) -> uuid::Uuid {
        self.0.id
    }
}

/// Error type for authentication failures
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// No Authorization header present
    #[error("Missing credentials")]
    MissingCredentials,

    /// Header present but not a Bearer token
    #[error("Invalid authorization format: {0}")]
    InvalidFormat(String),

    /// Token failed validation
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    /// Token is valid but the user no longer exists or is inactive
    #[error("Unknown user")]
    UnknownUser,

    /// Database failure while resolving the user
    #[error("Database error: {0}")]
    DatabaseError(String),
}
