//! # ProjectHub Shared Library
//!
//! This crate contains shared types, database models, and auth utilities used
//! by the ProjectHub API server.
//!
//! ## Module Organization
//!
//! - `models`: Database models (users, teams, projects, tasks, notifications)
//! - `auth`: Authentication (JWT, password hashing) and authorization predicates
//! - `db`: Connection pool and migration runner

pub mod auth;
pub mod db;
pub mod models;

/// Current version of the ProjectHub shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
