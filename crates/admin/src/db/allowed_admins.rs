//! Allow-list repository.
//!
//! The allow-list is an existence-only set of normalized emails that are
//! pre-approved to become admins. Rows are created out-of-band by a
//! superadmin; the application only ever reads them.

use async_trait::async_trait;
use sqlx::PgPool;

use rptra_core::Email;

use super::RepositoryError;
use crate::services::auth::AllowList;

/// Repository for allow-list lookups.
#[derive(Clone)]
pub struct AllowedAdminRepository {
    pool: PgPool,
}

impl AllowedAdminRepository {
    /// Create a new allow-list repository.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AllowList for AllowedAdminRepository {
    /// Check whether an email is on the allow-list.
    ///
    /// Existence alone grants eligibility; the row carries no other
    /// meaningful fields. Lookups are by the normalized form, which
    /// [`Email`] guarantees.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails. Callers that
    /// gate access must treat an error as "not allowed" (fail closed).
    async fn contains(&self, email: &Email) -> Result<bool, RepositoryError> {
        let exists = sqlx::query_scalar::<_, bool>(
            r"
            SELECT EXISTS(
                SELECT 1 FROM admin.allowed_admin
                WHERE email = $1
            )
            ",
        )
        .bind(email.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }
}
