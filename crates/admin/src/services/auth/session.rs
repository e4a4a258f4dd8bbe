//! Process-local admin session manager.
//!
//! Holds the single operator session as a [`SessionSnapshot`] behind a
//! watch channel. Auth events (an identity arriving or leaving) drive the
//! resolution cycle; each event bumps an epoch counter, and a resolution
//! that finishes after a newer event began is discarded so stale backend
//! responses can never overwrite fresher state.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use secrecy::SecretString;
use tokio::sync::{mpsc, watch};
use tracing::{info, warn};

use rptra_core::Email;

use crate::models::{Identity, SessionSnapshot};

use super::{AdminAuthError, AdminDirectory, AuthProvider, Resolution};

/// Manager for the process-local admin session.
///
/// Cheap to clone; all clones share one session. Reads go through
/// [`SessionManager::subscribe`] or the snapshot accessors, writes only
/// through [`SessionManager::sign_in`] / [`SessionManager::sign_out`] and
/// the auth-event stream.
#[derive(Clone)]
pub struct SessionManager {
    inner: Arc<SessionManagerInner>,
}

struct SessionManagerInner {
    directory: AdminDirectory,
    provider: Arc<dyn AuthProvider>,
    resolve_timeout: Duration,
    tx: watch::Sender<SessionSnapshot>,
    /// Bumped at the start of every auth event. A resolution may only
    /// publish while its epoch is still current.
    epoch: Mutex<u64>,
}

impl SessionManager {
    /// Create a new session manager in the initial (loading) state.
    ///
    /// The session stays `loading` until the first auth event settles, so
    /// callers should feed one (typically `handle_auth_event(None)` at
    /// startup) before serving requests.
    #[must_use]
    pub fn new(
        directory: AdminDirectory,
        provider: Arc<dyn AuthProvider>,
        resolve_timeout: Duration,
    ) -> Self {
        let (tx, _rx) = watch::channel(SessionSnapshot::initial());
        Self {
            inner: Arc::new(SessionManagerInner {
                directory,
                provider,
                resolve_timeout,
                tx,
                epoch: Mutex::new(0),
            }),
        }
    }

    /// Subscribe to session snapshot changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.inner.tx.subscribe()
    }

    /// The current snapshot, which may still be `loading`.
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        self.inner.tx.borrow().clone()
    }

    /// The current snapshot, waiting first for any in-flight resolution to
    /// settle. Guards use this so protected content never renders off a
    /// `loading` state.
    pub async fn settled_snapshot(&self) -> SessionSnapshot {
        let mut rx = self.inner.tx.subscribe();
        match rx.wait_for(|s| !s.loading).await {
            Ok(snapshot) => snapshot.clone(),
            // The sender lives in `self`, so the channel cannot close while
            // we hold it; fall back to the current view regardless.
            Err(_) => self.snapshot(),
        }
    }

    /// Process one auth event: an identity arrived (`Some`) or left
    /// (`None`).
    ///
    /// Publishes `Resolving` immediately for an arriving identity, resolves
    /// it against the directory, then publishes the settled snapshot. The
    /// returned snapshot is the settled result of *this* event even when a
    /// newer event superseded it on the channel.
    pub async fn handle_auth_event(&self, identity: Option<Identity>) -> SessionSnapshot {
        let epoch = self.begin_epoch();

        match identity {
            None => {
                let snapshot = SessionSnapshot::signed_out();
                self.commit(epoch, snapshot.clone());
                snapshot
            }
            Some(identity) => {
                self.commit(epoch, SessionSnapshot::resolving(identity.clone()));
                let snapshot = self.resolve_with_timeout(identity).await;
                if !self.commit(epoch, snapshot.clone()) {
                    info!("discarding stale session resolution");
                }
                snapshot
            }
        }
    }

    /// Spawn a task consuming an auth-event stream.
    ///
    /// Each event is handled on its own task so a newer event is never
    /// queued behind a slow resolution; the epoch check makes the slow one
    /// harmless.
    pub fn spawn_listener(
        &self,
        mut events: mpsc::Receiver<Option<Identity>>,
    ) -> tokio::task::JoinHandle<()> {
        let manager = self.clone();
        tokio::spawn(async move {
            while let Some(event) = events.recv().await {
                let manager = manager.clone();
                tokio::spawn(async move {
                    manager.handle_auth_event(event).await;
                });
            }
        })
    }

    /// Sign in with email and password.
    ///
    /// Validates locally, checks the allow-list *before* any credential
    /// call, verifies credentials with the provider, upserts the admin
    /// profile, and resolves the session synchronously. On success the
    /// returned snapshot has `loading == false` and `is_admin` reflects the
    /// directory's decision (a verified but inactive admin gets a signed-in,
    /// non-admin session).
    ///
    /// # Errors
    ///
    /// Returns `AdminAuthError` for validation failures, allow-list
    /// rejection (generic, no enumeration), provider rejections (distinct
    /// messages per category), and profile write failures.
    pub async fn sign_in(
        &self,
        email: &str,
        password: &str,
    ) -> Result<SessionSnapshot, AdminAuthError> {
        let email = Email::parse(email)?;
        if password.is_empty() {
            return Err(AdminAuthError::EmptyPassword);
        }

        // Allow-list first: a non-listed email never reaches the provider.
        if !self.inner.directory.is_allowed(&email).await {
            return Err(AdminAuthError::NotAuthorized);
        }

        let password = SecretString::from(password.to_owned());
        let identity = self
            .inner
            .provider
            .sign_in_with_password(&email, &password)
            .await?;

        self.inner.directory.upsert_on_auth(&identity, true).await?;

        Ok(self.handle_auth_event(Some(identity)).await)
    }

    /// Sign out.
    ///
    /// Delegates to the provider and clears the local session regardless of
    /// the delegate's outcome, so a provider outage can never pin the
    /// operator in a signed-in state.
    ///
    /// # Errors
    ///
    /// Returns `AdminAuthError::SignOutFailed` if the provider call failed.
    /// The local session is already cleared when this is returned.
    pub async fn sign_out(&self) -> Result<SessionSnapshot, AdminAuthError> {
        let provider_result = self.inner.provider.sign_out().await;
        let snapshot = self.handle_auth_event(None).await;

        match provider_result {
            Ok(()) => Ok(snapshot),
            Err(error) => {
                warn!(%error, "provider sign-out failed, local session cleared anyway");
                Err(AdminAuthError::SignOutFailed)
            }
        }
    }

    /// Resolve an identity, bounded by the configured timeout. A timeout
    /// fails closed to a signed-in, non-admin snapshot.
    async fn resolve_with_timeout(&self, identity: Identity) -> SessionSnapshot {
        let resolution = tokio::time::timeout(
            self.inner.resolve_timeout,
            self.inner.directory.resolve(&identity),
        )
        .await;

        match resolution {
            Ok(Resolution::Admin(profile)) => SessionSnapshot::admin(identity, profile),
            Ok(Resolution::NotAdmin) => SessionSnapshot::not_admin(identity),
            Err(_) => {
                warn!(uid = %identity.id, "session resolution timed out, failing closed");
                SessionSnapshot::not_admin(identity)
            }
        }
    }

    /// Start a new epoch, invalidating any in-flight resolution.
    fn begin_epoch(&self) -> u64 {
        let mut epoch = self.inner.epoch.lock().expect("epoch lock poisoned");
        *epoch += 1;
        *epoch
    }

    /// Publish a snapshot if `epoch` is still current. Returns whether the
    /// snapshot was published.
    fn commit(&self, epoch: u64, snapshot: SessionSnapshot) -> bool {
        let current = self.inner.epoch.lock().expect("epoch lock poisoned");
        if *current == epoch {
            self.inner.tx.send_replace(snapshot);
            true
        } else {
            false
        }
    }
}
