/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Health check endpoint
/// - `auth`: Authentication endpoints (register, login, refresh)
/// - `users`: Profile and user search
/// - `teams`: Teams and their rosters
/// - `projects`: Projects
/// - `project_members`: Project rosters and roles
/// - `tasks`: Tasks and their lifecycle events
/// - `notifications`: Per-user inbox
/// - `roles`: Role catalog
/// - `ws`: WebSocket live updates

pub mod health;
pub mod auth;
pub mod users;
pub mod teams;
pub mod projects;
pub mod project_members;
pub mod tasks;
pub mod notifications;
pub mod roles;
pub mod ws;

use serde::{Deserialize, Serialize};

/// Page query parameters shared by list endpoints
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Pagination {
    /// 1-based page number
    #[serde(default = "default_page")]
    pub page: i64,

    /// Items per page
    #[serde(default = "default_per_page")]
    pub per_page: i64,
}

fn default_page() -> i64 {
    1
}

fn default_per_page() -> i64 {
    20
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: default_page(),
            per_page: default_per_page(),
        }
    }
}

impl Pagination {
    /// Items per page, clamped to a sane range
    pub fn limit(&self) -> i64 {
        self.per_page.clamp(1, 100)
    }

    /// Row offset for the requested page
    pub fn offset(&self) -> i64 {
        (self.page.max(1) - 1) * self.limit()
    }
}

/// Paginated list response
#[derive(Debug, Serialize)]
pub struct Paginated<T> {
    /// Items on this page
    pub items: Vec<T>,

    /// Total matching items across all pages
    pub total_count: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_defaults() {
        let p = Pagination::default();
        assert_eq!(p.limit(), 20);
        assert_eq!(p.offset(), 0);
    }

    #[test]
    fn test_pagination_offset() {
        let p = Pagination {
            page: 3,
            per_page: 25,
        };
        assert_eq!(p.limit(), 25);
        assert_eq!(p.offset(), 50);
    }

    #[test]
    fn test_pagination_clamps_bad_input() {
        let p = Pagination {
            page: 0,
            per_page: 10_000,
        };
        assert_eq!(p.limit(), 100);
        assert_eq!(p.offset(), 0);
    }
}
