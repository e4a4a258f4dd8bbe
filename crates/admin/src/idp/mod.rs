//! Identity provider client.
//!
//! Credential verification is delegated entirely to a hosted identity
//! service; this client wraps its REST API (`accounts:signInWithPassword`
//! and `accounts:signOut`) and maps its coded errors to typed ones. The
//! application never stores passwords or verifies credentials itself.

pub mod error;
pub mod types;

pub use error::IdpError;

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use tracing::instrument;
use url::Url;

use rptra_core::{Email, IdentityId};

use crate::config::IdpConfig;
use crate::models::Identity;
use crate::services::auth::AuthProvider;

use error::ApiErrorResponse;
use types::{SignInRequest, SignInResponse, SignOutRequest};

/// Identity provider API client.
///
/// Cheap to clone; all clones share one HTTP connection pool and the
/// current session token.
#[derive(Clone)]
pub struct IdpClient {
    inner: Arc<IdpClientInner>,
}

struct IdpClientInner {
    client: reqwest::Client,
    api_url: Url,
    api_key: SecretString,
    /// Session token from the last successful sign-in; revoked on sign-out.
    id_token: Mutex<Option<String>>,
}

impl IdpClient {
    /// Create a new identity provider client.
    ///
    /// # Panics
    ///
    /// Panics if the underlying HTTP client cannot be built.
    #[must_use]
    pub fn new(config: &IdpConfig) -> Self {
        let client = reqwest::Client::builder()
            .build()
            .expect("Failed to build HTTP client");

        Self {
            inner: Arc::new(IdpClientInner {
                client,
                api_url: config.api_url.clone(),
                api_key: config.api_key.clone(),
                id_token: Mutex::new(None),
            }),
        }
    }

    /// Build the URL for one account operation.
    fn endpoint(&self, op: &str) -> String {
        let base = self.inner.api_url.as_str().trim_end_matches('/');
        let key = urlencoding::encode(self.inner.api_key.expose_secret()).into_owned();
        format!("{base}/accounts:{op}?key={key}")
    }

    /// Convert a non-success response into a typed error.
    async fn check(response: reqwest::Response) -> Result<reqwest::Response, IdpError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let err = match response.json::<ApiErrorResponse>().await {
            Ok(body) => IdpError::from_code(&body.error.message),
            Err(_) => IdpError::Api {
                code: format!("HTTP_{}", status.as_u16()),
            },
        };
        Err(err)
    }
}

#[async_trait]
impl AuthProvider for IdpClient {
    /// Verify credentials with the provider and return the signed-in
    /// identity.
    ///
    /// # Errors
    ///
    /// Returns a typed [`IdpError`] for the provider's failure categories
    /// (user not found, wrong password, malformed email, disabled account,
    /// rate-limited); anything else surfaces as a generic API error.
    #[instrument(skip(self, password), fields(email = %email))]
    async fn sign_in_with_password(
        &self,
        email: &Email,
        password: &SecretString,
    ) -> Result<Identity, IdpError> {
        let request = SignInRequest {
            email: email.as_str(),
            password: password.expose_secret(),
            return_secure_token: true,
        };

        let response = self
            .inner
            .client
            .post(self.endpoint("signInWithPassword"))
            .json(&request)
            .send()
            .await?;

        let body: SignInResponse = Self::check(response).await?.json().await?;

        *self
            .inner
            .id_token
            .lock()
            .expect("id token lock poisoned") = Some(body.id_token);

        Ok(Identity {
            id: IdentityId::new(body.local_id),
            email: body.email.as_deref().and_then(|e| Email::parse(e).ok()),
        })
    }

    /// Revoke the current session token, if any.
    ///
    /// # Errors
    ///
    /// Returns [`IdpError`] if the revocation call fails. The local token is
    /// dropped either way.
    #[instrument(skip(self))]
    async fn sign_out(&self) -> Result<(), IdpError> {
        let token = self
            .inner
            .id_token
            .lock()
            .expect("id token lock poisoned")
            .take();

        let Some(token) = token else {
            return Ok(());
        };

        let response = self
            .inner
            .client
            .post(self.endpoint("signOut"))
            .json(&SignOutRequest { id_token: &token })
            .send()
            .await?;

        Self::check(response).await?;
        Ok(())
    }
}
