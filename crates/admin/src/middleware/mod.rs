//! Middleware and extractors for the admin panel.

mod auth;

pub use auth::{AdminGuardRejection, RequireAdmin, RequireSuperAdmin};
