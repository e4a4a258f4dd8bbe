//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::AdminConfig;
use crate::db::{AdminProfileRepository, AllowedAdminRepository};
use crate::idp::IdpClient;
use crate::services::auth::{AdminDirectory, SessionManager};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AdminConfig,
    pool: PgPool,
    session: SessionManager,
}

impl AppState {
    /// Build the state from config and a database pool, wiring the identity
    /// provider client and the Postgres-backed directory into the session
    /// manager.
    #[must_use]
    pub fn new(config: AdminConfig, pool: PgPool) -> Self {
        let directory = AdminDirectory::new(
            Arc::new(AllowedAdminRepository::new(pool.clone())),
            Arc::new(AdminProfileRepository::new(pool.clone())),
            config.superadmin_email.clone(),
        );
        let provider = Arc::new(IdpClient::new(config.idp()));
        let session = SessionManager::new(directory, provider, config.resolve_timeout);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                session,
            }),
        }
    }

    /// Build the state around an externally constructed session manager.
    ///
    /// Used by tests that inject in-memory stores and a mocked provider.
    #[must_use]
    pub fn with_session(config: AdminConfig, pool: PgPool, session: SessionManager) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                session,
            }),
        }
    }

    /// Application configuration.
    #[must_use]
    pub fn config(&self) -> &AdminConfig {
        &self.inner.config
    }

    /// Database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// The process-local admin session manager.
    #[must_use]
    pub fn session(&self) -> &SessionManager {
        &self.inner.session
    }
}
