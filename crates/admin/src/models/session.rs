//! Session types for admin authentication.
//!
//! The session is process-local and never persisted: it is the
//! application's current view of "who is signed in and are they an admin".
//! Consumers receive immutable [`SessionSnapshot`]s through a watch
//! subscription and mutate the session only via the session manager's
//! `sign_in` / `sign_out` operations.

use serde::{Deserialize, Serialize};

use rptra_core::{Email, IdentityId};

use super::admin_profile::AdminProfile;

/// An authenticated principal as reported by the external auth service.
///
/// The application never creates or destroys identities directly, only
/// indirectly via sign-in/sign-out calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Provider-assigned uid.
    pub id: IdentityId,
    /// Email address, when the provider reports one.
    pub email: Option<Email>,
}

/// Resolution phase of the current session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// No identity is signed in.
    Unresolved,
    /// An identity is present but its admin status is not yet determined.
    Resolving,
    /// The identity is an active admin with a loaded profile.
    ResolvedAdmin,
    /// The identity is signed in but disallowed, inactive, or unknown.
    ResolvedNotAdmin,
}

/// Immutable view of the admin session at one point in time.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    /// Currently signed-in identity, if any.
    pub identity: Option<Identity>,
    /// Whether the identity resolved to an active admin.
    pub is_admin: bool,
    /// Loaded profile; present exactly when `is_admin` is true.
    pub profile: Option<AdminProfile>,
    /// True while a resolution is in flight. Guards must wait for `false`
    /// before deciding.
    pub loading: bool,
}

impl SessionSnapshot {
    /// State at application start, before the first auth event settles.
    #[must_use]
    pub const fn initial() -> Self {
        Self {
            identity: None,
            is_admin: false,
            profile: None,
            loading: true,
        }
    }

    /// Fully signed-out state.
    #[must_use]
    pub const fn signed_out() -> Self {
        Self {
            identity: None,
            is_admin: false,
            profile: None,
            loading: false,
        }
    }

    /// An identity arrived; resolution is in flight.
    #[must_use]
    pub const fn resolving(identity: Identity) -> Self {
        Self {
            identity: Some(identity),
            is_admin: false,
            profile: None,
            loading: true,
        }
    }

    /// Resolved: the identity is an active admin.
    #[must_use]
    pub const fn admin(identity: Identity, profile: AdminProfile) -> Self {
        Self {
            identity: Some(identity),
            is_admin: true,
            profile: Some(profile),
            loading: false,
        }
    }

    /// Resolved: signed in but not an admin (disallowed, inactive, unknown,
    /// or any resolution failure).
    #[must_use]
    pub const fn not_admin(identity: Identity) -> Self {
        Self {
            identity: Some(identity),
            is_admin: false,
            profile: None,
            loading: false,
        }
    }

    /// Derives the resolution phase from the snapshot fields.
    #[must_use]
    pub const fn phase(&self) -> SessionPhase {
        match (&self.identity, self.loading, self.is_admin) {
            (None, _, _) => SessionPhase::Unresolved,
            (Some(_), true, _) => SessionPhase::Resolving,
            (Some(_), false, true) => SessionPhase::ResolvedAdmin,
            (Some(_), false, false) => SessionPhase::ResolvedNotAdmin,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn identity() -> Identity {
        Identity {
            id: IdentityId::new("uid-1"),
            email: Some(Email::parse("staff@rptra.example").unwrap()),
        }
    }

    #[test]
    fn test_initial_state_matches_lifecycle() {
        let snap = SessionSnapshot::initial();
        assert!(snap.identity.is_none());
        assert!(!snap.is_admin);
        assert!(snap.profile.is_none());
        assert!(snap.loading);
        assert_eq!(snap.phase(), SessionPhase::Unresolved);
    }

    #[test]
    fn test_phase_transitions() {
        assert_eq!(
            SessionSnapshot::signed_out().phase(),
            SessionPhase::Unresolved
        );
        assert_eq!(
            SessionSnapshot::resolving(identity()).phase(),
            SessionPhase::Resolving
        );
        assert_eq!(
            SessionSnapshot::not_admin(identity()).phase(),
            SessionPhase::ResolvedNotAdmin
        );
    }

    #[test]
    fn test_admin_snapshot_carries_profile() {
        let profile = AdminProfile {
            uid: IdentityId::new("uid-1"),
            email: Email::parse("staff@rptra.example").unwrap(),
            role: rptra_core::AdminRole::Admin,
            is_active: true,
            created_at: chrono::Utc::now(),
            last_login: None,
            created_by: None,
            updated_by: None,
        };
        let snap = SessionSnapshot::admin(identity(), profile);
        assert!(snap.is_admin);
        assert!(snap.profile.is_some());
        assert_eq!(snap.phase(), SessionPhase::ResolvedAdmin);
    }
}
