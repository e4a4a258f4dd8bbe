//! Integration test harness for the RPTRA admin panel.
//!
//! Builds the real application router around an in-memory admin directory
//! and a mocked identity-provider HTTP API, so tests exercise the full
//! sign-in flow (form post, provider call, profile upsert, session
//! resolution, route guard) without a database or network.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p rptra-integration-tests
//! ```

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response, header};
use chrono::Utc;
use secrecy::SecretString;
use serde_json::json;
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use rptra_admin::config::{AdminConfig, IdpConfig};
use rptra_admin::db::RepositoryError;
use rptra_admin::idp::IdpClient;
use rptra_admin::models::AdminProfile;
use rptra_admin::routes;
use rptra_admin::services::auth::{
    AdminDirectory, AllowList, ProfileStore, SessionManager,
};
use rptra_admin::state::AppState;
use rptra_core::{AdminRole, Email, IdentityId};

pub const SUPERADMIN_EMAIL: &str = "kepala@rptra.example";

/// Allow-list over a vector.
pub struct InMemoryAllowList {
    allowed: Vec<Email>,
}

#[async_trait]
impl AllowList for InMemoryAllowList {
    async fn contains(&self, email: &Email) -> Result<bool, RepositoryError> {
        Ok(self.allowed.contains(email))
    }
}

/// Profile store over a `HashMap`, mirroring the insert-or-refresh
/// semantics of the Postgres repository.
#[derive(Default)]
pub struct InMemoryProfiles {
    profiles: tokio::sync::Mutex<HashMap<String, AdminProfile>>,
}

impl InMemoryProfiles {
    pub async fn count(&self) -> usize {
        self.profiles.lock().await.len()
    }

    pub async fn get_by_uid(&self, uid: &str) -> Option<AdminProfile> {
        self.profiles.lock().await.get(uid).cloned()
    }

    async fn seed(&self, profiles: Vec<AdminProfile>) {
        let mut map = self.profiles.lock().await;
        for profile in profiles {
            map.insert(profile.uid.as_str().to_owned(), profile);
        }
    }
}

#[async_trait]
impl ProfileStore for InMemoryProfiles {
    async fn get(&self, uid: &IdentityId) -> Result<Option<AdminProfile>, RepositoryError> {
        Ok(self.profiles.lock().await.get(uid.as_str()).cloned())
    }

    async fn upsert_on_login(
        &self,
        uid: &IdentityId,
        email: &Email,
        role: AdminRole,
        record_login: bool,
    ) -> Result<AdminProfile, RepositoryError> {
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

/// A fully wired test application.
pub struct TestApp {
    pub router: Router,
    pub session: SessionManager,
    pub idp: MockServer,
    pub profiles: Arc<InMemoryProfiles>,
}

/// Build an inactive seed profile for tests.
#[must_use]
pub fn inactive_profile(uid: &str, email: &str) -> AdminProfile {
    AdminProfile {
        uid: IdentityId::new(uid),
        email: Email::parse(email).unwrap(),
        role: AdminRole::Admin,
        is_active: false,
        created_at: Utc::now(),
        last_login: None,
        created_by: None,
        updated_by: None,
    }
}

impl TestApp {
    /// Spawn the app with the given allow-list and seeded profiles. The
    /// session starts settled and signed out.
    pub async fn spawn(allowed: &[&str], seeded: Vec<AdminProfile>) -> Self {
        let idp = MockServer::start().await;

        let config = AdminConfig {
            database_url: SecretString::from("postgres://localhost/unused"),
            host: "127.0.0.1".parse().unwrap(),
            port: 0,
            base_url: "http://localhost".to_owned(),
            superadmin_email: Email::parse(SUPERADMIN_EMAIL).unwrap(),
            idp: IdpConfig {
                api_url: format!("{}/v1", idp.uri()).parse().unwrap(),
                api_key: SecretString::from("k9X$mQ2!vB7@wZ4#"),
            },
            resolve_timeout: Duration::from_secs(5),
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 1.0,
            tls: None,
        };

        let profiles = Arc::new(InMemoryProfiles::default());
        profiles.seed(seeded).await;

        let directory = AdminDirectory::new(
            Arc::new(InMemoryAllowList {
                allowed: allowed.iter().map(|e| Email::parse(e).unwrap()).collect(),
            }),
            profiles.clone(),
            Email::parse(SUPERADMIN_EMAIL).unwrap(),
        );
        let provider = Arc::new(IdpClient::new(config.idp()));
        let session = SessionManager::new(directory, provider, config.resolve_timeout);
        session.handle_auth_event(None).await;

        let pool = sqlx::postgres::PgPoolOptions::new()
            .connect_lazy("postgres://localhost/unused")
            .unwrap();
        let state = AppState::with_session(config, pool, session.clone());

        Self {
            router: routes::routes().with_state(state),
            session,
            idp,
            profiles,
        }
    }

    /// Mount a successful `signInWithPassword` response.
    pub async fn mock_sign_in_success(&self, uid: &str, email: &str) {
        Mock::given(method("POST"))
            .and(path("/v1/accounts:signInWithPassword"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "localId": uid,
                "email": email,
                "idToken": "tok-1",
                "refreshToken": "ref-1"
            })))
            .mount(&self.idp)
            .await;
    }

    /// Mount a coded `signInWithPassword` error.
    pub async fn mock_sign_in_error(&self, code: &str) {
        Mock::given(method("POST"))
            .and(path("/v1/accounts:signInWithPassword"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": { "code": 400, "message": code }
            })))
            .mount(&self.idp)
            .await;
    }

    /// Mount a successful `signOut` response.
    pub async fn mock_sign_out(&self) {
        Mock::given(method("POST"))
            .and(path("/v1/accounts:signOut"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .mount(&self.idp)
            .await;
    }

    /// Issue a GET request against the in-process router.
    pub async fn get(&self, uri: &str) -> Response<Body> {
        self.router
            .clone()
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    /// Post the login form.
    pub async fn post_login(&self, email: &str, password: &str, next: &str) -> Response<Body> {
        let body = format!(
            "email={}&password={}&next={}",
            urlencoding::encode(email),
            urlencoding::encode(password),
            urlencoding::encode(next),
        );
        self.router
            .clone()
            .oneshot(
                Request::post("/auth/login")
                    .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap()
    }

    /// Post the logout form.
    pub async fn post_logout(&self) -> Response<Body> {
        self.router
            .clone()
            .oneshot(
                Request::post("/auth/logout")
                    .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap()
    }
}

/// Read a response body to a string.
pub async fn body_string(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}
