//! Admin directory: allow-list plus profile store behind one fail-closed
//! facade.

use std::sync::Arc;

use tracing::warn;

use rptra_core::{AdminRole, Email};

use crate::models::{AdminProfile, Identity};

use super::{AdminAuthError, AllowList, ProfileStore};

/// Outcome of resolving an identity against the directory.
#[derive(Debug)]
pub enum Resolution {
    /// The identity is an active admin.
    Admin(AdminProfile),
    /// Disallowed, inactive, unknown, or the backend failed.
    NotAdmin,
}

/// Directory of admins: who may sign in, and what role they hold.
///
/// Every read that gates access collapses backend errors to a denial. The
/// only operation that surfaces an error to the caller is the profile
/// upsert, because silently dropping a write would leave the directory
/// inconsistent with the provider.
#[derive(Clone)]
pub struct AdminDirectory {
    allow_list: Arc<dyn AllowList>,
    profiles: Arc<dyn ProfileStore>,
    superadmin_email: Email,
}

impl AdminDirectory {
    /// Create a new directory.
    #[must_use]
    pub fn new(
        allow_list: Arc<dyn AllowList>,
        profiles: Arc<dyn ProfileStore>,
        superadmin_email: Email,
    ) -> Self {
        Self {
            allow_list,
            profiles,
            superadmin_email,
        }
    }

    /// Check whether an email is allow-listed, treating lookup failures as
    /// "not allowed".
    ///
    /// The denial is logged at WARN so an allow-list outage locking every
    /// admin out is visible in the logs.
    pub async fn is_allowed(&self, email: &Email) -> bool {
        match self.allow_list.contains(email).await {
            Ok(allowed) => allowed,
            Err(error) => {
                warn!(%email, %error, "allow-list lookup failed, denying access");
                false
            }
        }
    }

    /// The role an email receives on first sign-in.
    ///
    /// The configured superadmin email gets `superadmin`; everyone else on
    /// the allow-list gets `admin`.
    #[must_use]
    pub fn role_for(&self, email: &Email) -> AdminRole {
        if *email == self.superadmin_email {
            AdminRole::SuperAdmin
        } else {
            AdminRole::Admin
        }
    }

    /// Create or refresh the admin profile for a signed-in identity.
    ///
    /// Idempotent: a first call creates the profile with the derived role
    /// and `is_active = true`; later calls only refresh `last_login` (and
    /// only when `is_login_event` is set). Role and active flag of an
    /// existing profile are never touched.
    ///
    /// # Errors
    ///
    /// Returns `AdminAuthError::MissingEmail` if the identity carries no
    /// email, or `AdminAuthError::UpsertFailed` if the write fails.
    pub async fn upsert_on_auth(
        &self,
        identity: &Identity,
        is_login_event: bool,
    ) -> Result<AdminProfile, AdminAuthError> {
        let email = identity.email.as_ref().ok_or(AdminAuthError::MissingEmail)?;
        let role = self.role_for(email);

        self.profiles
            .upsert_on_login(&identity.id, email, role, is_login_event)
            .await
            .map_err(AdminAuthError::UpsertFailed)
    }

    /// Resolve an identity to its admin status.
    ///
    /// The chain is: identity must carry an email, the email must be
    /// allow-listed, a profile must exist, and the profile must be active.
    /// Any backend failure resolves to [`Resolution::NotAdmin`].
    pub async fn resolve(&self, identity: &Identity) -> Resolution {
        let Some(email) = identity.email.as_ref() else {
            warn!(uid = %identity.id, "identity has no email, resolving as non-admin");
            return Resolution::NotAdmin;
        };

        if !self.is_allowed(email).await {
            return Resolution::NotAdmin;
        }

        match self.profiles.get(&identity.id).await {
            Ok(Some(profile)) if profile.is_active => Resolution::Admin(profile),
            Ok(_) => Resolution::NotAdmin,
            Err(error) => {
                // Distinct from "no record": the backend was unreachable.
                warn!(uid = %identity.id, %error, "failed to load admin record, resolving as non-admin");
                Resolution::NotAdmin
            }
        }
    }
}
