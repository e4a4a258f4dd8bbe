//! Admin profile domain type.
//!
//! The profile is the application's own record of an admin, distinct from
//! the identity held by the external auth service. It is created the first
//! time a permitted identity signs in and is never deleted by the sign-in
//! flow.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use rptra_core::{AdminRole, Email, IdentityId};

/// An admin's profile record, keyed by the provider-assigned uid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminProfile {
    /// Provider-assigned uid of the owning identity.
    pub uid: IdentityId,
    /// Admin's email address (normalized; matches the identity's email at
    /// creation time).
    pub email: Email,
    /// Admin's role/permission level.
    pub role: AdminRole,
    /// Whether this admin may currently sign in. Toggled out-of-band by a
    /// superadmin; a login never changes it.
    pub is_active: bool,
    /// When the profile was created (server-assigned).
    pub created_at: DateTime<Utc>,
    /// When the admin last signed in, if ever (server-assigned).
    pub last_login: Option<DateTime<Utc>>,
    /// Who created the record, when known.
    pub created_by: Option<String>,
    /// Who last changed role or active flag, when known.
    pub updated_by: Option<String>,
}

impl AdminProfile {
    /// Returns true if this profile holds the superadmin role.
    #[must_use]
    pub fn is_superadmin(&self) -> bool {
        self.role == AdminRole::SuperAdmin
    }
}
