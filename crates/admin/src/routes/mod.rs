//! HTTP route handlers for the admin panel.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness check (database)
//!
//! # Dashboard (admin only)
//! GET  /                       - Dashboard overview
//!
//! # Auth
//! GET  /auth/login             - Login page
//! POST /auth/login             - Submit email/password
//! POST /auth/logout            - Sign out
//!
//! # API (401 instead of redirect when not signed in)
//! GET  /api/session            - Current session as JSON
//! ```

pub mod auth;
pub mod dashboard;

use axum::Router;

use crate::state::AppState;

/// Build the application router (excluding health endpoints).
pub fn routes() -> Router<AppState> {
    Router::new().merge(dashboard::router()).merge(auth::router())
}
