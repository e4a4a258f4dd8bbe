//! Admin authentication and session service.
//!
//! Credentials are verified by the hosted identity provider; this module
//! decides whether a verified identity is an admin. The decision chain is
//! allow-list membership, then the admin record's active flag, and every
//! backend failure along the way resolves to "not an admin" rather than
//! granting access.

mod directory;
mod error;
mod session;

pub use directory::{AdminDirectory, Resolution};
pub use error::AdminAuthError;
pub use session::SessionManager;

use async_trait::async_trait;
use secrecy::SecretString;

use rptra_core::{AdminRole, Email, IdentityId};

use crate::db::RepositoryError;
use crate::idp::IdpError;
use crate::models::{AdminProfile, Identity};

/// Read access to the set of emails pre-approved to become admins.
#[async_trait]
pub trait AllowList: Send + Sync {
    /// Check whether an email is on the allow-list.
    async fn contains(&self, email: &Email) -> Result<bool, RepositoryError>;
}

/// Storage for admin profile records.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Get a profile by the provider-assigned uid.
    async fn get(&self, uid: &IdentityId) -> Result<Option<AdminProfile>, RepositoryError>;

    /// Create the profile if missing; refresh `last_login` when
    /// `record_login` is set. Never changes role or the active flag of an
    /// existing profile.
    async fn upsert_on_login(
        &self,
        uid: &IdentityId,
        email: &Email,
        role: AdminRole,
        record_login: bool,
    ) -> Result<AdminProfile, RepositoryError>;
}

/// Credential verification delegated to the external identity provider.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Verify email/password and return the signed-in identity.
    async fn sign_in_with_password(
        &self,
        email: &Email,
        password: &SecretString,
    ) -> Result<Identity, IdpError>;

    /// End the provider-side session.
    async fn sign_out(&self) -> Result<(), IdpError>;
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod test_support {
    //! In-memory fakes shared by the auth service tests.

    use std::collections::HashMap;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use chrono::Utc;
    use secrecy::SecretString;
    use tokio::sync::{Mutex, Notify};

    use rptra_core::{AdminRole, Email, IdentityId};

    use crate::db::RepositoryError;
    use crate::idp::IdpError;
    use crate::models::{AdminProfile, Identity};

    use super::{AllowList, AuthProvider, ProfileStore};

    pub fn identity(uid: &str, email: &str) -> Identity {
        Identity {
            id: IdentityId::new(uid),
            email: Some(Email::parse(email).unwrap()),
        }
    }

    pub fn profile(uid: &str, email: &str, role: AdminRole, is_active: bool) -> AdminProfile {
        AdminProfile {
            uid: IdentityId::new(uid),
            email: Email::parse(email).unwrap(),
            role,
            is_active,
            created_at: Utc::now(),
            last_login: None,
            created_by: None,
            updated_by: None,
        }
    }

    /// Allow-list backed by a vector, with an optional simulated outage.
    pub struct FakeAllowList {
        allowed: Vec<Email>,
        pub fail: bool,
    }

    impl FakeAllowList {
        pub fn with(emails: &[&str]) -> Self {
            Self {
                allowed: emails.iter().map(|e| Email::parse(e).unwrap()).collect(),
                fail: false,
            }
        }

        pub fn failing() -> Self {
            Self {
                allowed: Vec::new(),
                fail: true,
            }
        }
    }

    #[async_trait]
    impl AllowList for FakeAllowList {
        async fn contains(&self, email: &Email) -> Result<bool, RepositoryError> {
            if self.fail {
                return Err(RepositoryError::Database(sqlx::Error::PoolClosed));
            }
            Ok(self.allowed.contains(email))
        }
    }

    /// Profile store over a `HashMap`, mirroring the insert-or-refresh
    /// semantics of the real repository.
    #[derive(Default)]
    pub struct FakeProfileStore {
        profiles: Mutex<HashMap<String, AdminProfile>>,
        pub upsert_calls: AtomicUsize,
        pub fail_get: bool,
    }

    impl FakeProfileStore {
        pub fn with(profiles: Vec<AdminProfile>) -> Self {
            let map = profiles
                .into_iter()
                .map(|p| (p.uid.as_str().to_owned(), p))
                .collect();
            Self {
                profiles: Mutex::new(map),
                upsert_calls: AtomicUsize::new(0),
                fail_get: false,
            }
        }

        pub fn failing_get() -> Self {
            Self {
                profiles: Mutex::new(HashMap::new()),
                upsert_calls: AtomicUsize::new(0),
                fail_get: true,
            }
        }

        pub async fn count(&self) -> usize {
            self.profiles.lock().await.len()
        }

        pub async fn get_by_uid(&self, uid: &str) -> Option<AdminProfile> {
            self.profiles.lock().await.get(uid).cloned()
        }
    }

    #[async_trait]
    impl ProfileStore for FakeProfileStore {
        async fn get(&self, uid: &IdentityId) -> Result<Option<AdminProfile>, RepositoryError> {
            if self.fail_get {
                return Err(RepositoryError::Database(sqlx::Error::PoolClosed));
            }
            Ok(self.profiles.lock().await.get(uid.as_str()).cloned())
        }

        async fn upsert_on_login(
            &self,
            uid: &IdentityId,
            email: &Email,
            role: AdminRole,
            record_login: bool,
        ) -> Result<AdminProfile, RepositoryError> {
            self.upsert_calls.fetch_add(1, Ordering::SeqCst);
            let mut map = self.profiles.lock().await;
            let entry = map
                .entry(uid.as_str().to_owned())
                .or_insert_with(|| AdminProfile {
                    uid: uid.clone(),
                    email: email.clone(),
                    role,
                    is_active: true,
                    created_at: Utc::now(),
                    last_login: None,
                    created_by: None,
                    updated_by: None,
                });
            if record_login {
                entry.last_login = Some(Utc::now());
            }
            Ok(entry.clone())
        }
    }

    /// Profile store that blocks inside `get` until released, for exercising
    /// in-flight resolutions.
    pub struct GatedProfileStore {
        result: AdminProfile,
        pub started: Arc<Notify>,
        pub release: Arc<Notify>,
    }

    impl GatedProfileStore {
        pub fn new(result: AdminProfile) -> Self {
            Self {
                result,
                started: Arc::new(Notify::new()),
                release: Arc::new(Notify::new()),
            }
        }
    }

    #[async_trait]
    impl ProfileStore for GatedProfileStore {
        async fn get(&self, _uid: &IdentityId) -> Result<Option<AdminProfile>, RepositoryError> {
            self.started.notify_one();
            self.release.notified().await;
            Ok(Some(self.result.clone()))
        }

        async fn upsert_on_login(
            &self,
            _uid: &IdentityId,
            _email: &Email,
            _role: AdminRole,
            _record_login: bool,
        ) -> Result<AdminProfile, RepositoryError> {
            Ok(self.result.clone())
        }
    }

    /// Profile store whose `get` never completes, for exercising the
    /// resolution timeout.
    pub struct StalledProfileStore;

    #[async_trait]
    impl ProfileStore for StalledProfileStore {
        async fn get(&self, _uid: &IdentityId) -> Result<Option<AdminProfile>, RepositoryError> {
            std::future::pending().await
        }

        async fn upsert_on_login(
            &self,
            _uid: &IdentityId,
            _email: &Email,
            _role: AdminRole,
            _record_login: bool,
        ) -> Result<AdminProfile, RepositoryError> {
            std::future::pending().await
        }
    }

    /// Identity provider fake with call counters.
    pub struct FakeProvider {
        identity: Identity,
        sign_in_error: Mutex<Option<IdpError>>,
        sign_out_error: Mutex<Option<IdpError>>,
        pub sign_in_calls: AtomicUsize,
        pub sign_out_calls: AtomicUsize,
    }

    impl FakeProvider {
        pub fn returning(identity: Identity) -> Self {
            Self {
                identity,
                sign_in_error: Mutex::new(None),
                sign_out_error: Mutex::new(None),
                sign_in_calls: AtomicUsize::new(0),
                sign_out_calls: AtomicUsize::new(0),
            }
        }

        pub fn rejecting(identity: Identity, error: IdpError) -> Self {
            let provider = Self::returning(identity);
            *provider.sign_in_error.try_lock().unwrap() = Some(error);
            provider
        }

        pub fn failing_sign_out(identity: Identity, error: IdpError) -> Self {
            let provider = Self::returning(identity);
            *provider.sign_out_error.try_lock().unwrap() = Some(error);
            provider
        }
    }

    #[async_trait]
    impl AuthProvider for FakeProvider {
        async fn sign_in_with_password(
            &self,
            _email: &Email,
            _password: &SecretString,
        ) -> Result<Identity, IdpError> {
            self.sign_in_calls.fetch_add(1, Ordering::SeqCst);
            if let Some(err) = self.sign_in_error.lock().await.take() {
                return Err(err);
            }
            Ok(self.identity.clone())
        }

        async fn sign_out(&self) -> Result<(), IdpError> {
            self.sign_out_calls.fetch_add(1, Ordering::SeqCst);
            if let Some(err) = self.sign_out_error.lock().await.take() {
                return Err(err);
            }
            Ok(())
        }
    }
}
