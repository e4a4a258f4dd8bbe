//! Admin profile repository.
//!
//! Stores the application's own record of each admin (role, active flag,
//! timestamps), keyed by the provider-assigned uid. The sign-in flow only
//! ever creates profiles and refreshes `last_login`; role and active-flag
//! changes happen out-of-band.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use rptra_core::{AdminRole, Email, IdentityId};

use super::RepositoryError;
use crate::models::AdminProfile;
use crate::services::auth::ProfileStore;

/// Internal row type for `PostgreSQL` profile queries.
///
/// Role is stored as TEXT and parsed on the way out so a bad value surfaces
/// as data corruption instead of a decode panic.
#[derive(Debug, sqlx::FromRow)]
struct AdminProfileRow {
    uid: String,
    email: String,
    role: String,
    is_active: bool,
    created_at: DateTime<Utc>,
    last_login: Option<DateTime<Utc>>,
    created_by: Option<String>,
    updated_by: Option<String>,
}

impl TryFrom<AdminProfileRow> for AdminProfile {
    type Error = RepositoryError;

    fn try_from(row: AdminProfileRow) -> Result<Self, Self::Error> {
        let email = Email::parse(&row.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;
        let role: AdminRole = row.role.parse().map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid role in database: {e}"))
        })?;

        Ok(Self {
            uid: IdentityId::new(row.uid),
            email,
            role,
            is_active: row.is_active,
            created_at: row.created_at,
            last_login: row.last_login,
            created_by: row.created_by,
            updated_by: row.updated_by,
        })
    }
}

/// Repository for admin profile database operations.
#[derive(Clone)]
pub struct AdminProfileRepository {
    pool: PgPool,
}

impl AdminProfileRepository {
    /// Create a new profile repository.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProfileStore for AdminProfileRepository {
    /// Get a profile by the provider-assigned uid.
    ///
    /// Returns `Ok(None)` when no profile exists, so callers can tell "not
    /// an admin" apart from "backend unreachable" (which is an `Err`).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the data is invalid.
    async fn get(&self, uid: &IdentityId) -> Result<Option<AdminProfile>, RepositoryError> {
        let row = sqlx::query_as::<_, AdminProfileRow>(
            r"
            SELECT uid, email, role, is_active, created_at, last_login,
                   created_by, updated_by
            FROM admin.admin_profile
            WHERE uid = $1
            ",
        )
        .bind(uid.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    /// Create the profile on first sign-in, or refresh `last_login` on a
    /// later one.
    ///
    /// Idempotent: the insert carries role and active flag, but on conflict
    /// only `last_login` is touched, so a deactivated admin is never
    /// reactivated (and a role never changed) by signing in again.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the statement fails.
    /// Returns `RepositoryError::DataCorruption` if the returned data is
    /// invalid.
    async fn upsert_on_login(
        &self,
        uid: &IdentityId,
        email: &Email,
        role: AdminRole,
        record_login: bool,
    ) -> Result<AdminProfile, RepositoryError> {
        let row = sqlx::query_as::<_, AdminProfileRow>(
            r"
            INSERT INTO admin.admin_profile (uid, email, role, is_active, last_login)
            VALUES ($1, $2, $3, TRUE, CASE WHEN $4 THEN NOW() ELSE NULL END)
            ON CONFLICT (uid) DO UPDATE
                SET last_login = CASE
                    WHEN $4 THEN NOW()
                    ELSE admin.admin_profile.last_login
                END
            RETURNING uid, email, role, is_active, created_at, last_login,
                      created_by, updated_by
            ",
        )
        .bind(uid.as_str())
        .bind(email.as_str())
        .bind(role.as_str())
        .bind(record_login)
        .fetch_one(&self.pool)
        .await?;

        row.try_into()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_row_conversion() {
        let row = AdminProfileRow {
            uid: "uid-1".to_string(),
            email: "staff@rptra.example".to_string(),
            role: "superadmin".to_string(),
            is_active: true,
            created_at: Utc::now(),
            last_login: None,
            created_by: Some("cli".to_string()),
            updated_by: None,
        };

        let profile = AdminProfile::try_from(row).unwrap();
        assert_eq!(profile.role, AdminRole::SuperAdmin);
        assert!(profile.is_active);
        assert_eq!(profile.email.as_str(), "staff@rptra.example");
    }

    #[test]
    fn test_row_conversion_rejects_unknown_role() {
        let row = AdminProfileRow {
            uid: "uid-1".to_string(),
            email: "staff@rptra.example".to_string(),
            role: "editor".to_string(),
            is_active: true,
            created_at: Utc::now(),
            last_login: None,
            created_by: None,
            updated_by: None,
        };

        assert!(matches!(
            AdminProfile::try_from(row),
            Err(RepositoryError::DataCorruption(_))
        ));
    }
}
