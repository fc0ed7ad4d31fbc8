//! # ProjectHub API
//!
//! HTTP API server for ProjectHub: teams, projects, tasks with an
//! approval workflow, per-user notifications, and live project updates
//! over WebSockets.

pub mod app;
pub mod config;
pub mod error;
pub mod notify;
pub mod realtime;
pub mod routes;
