//! Route guard extractors over the admin session.
//!
//! The guards read the session through `settled_snapshot`, so a request
//! that arrives while a resolution is in flight waits for it to settle
//! instead of seeing (and acting on) a transient `loading` state.

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Redirect, Response},
};

use crate::models::AdminProfile;
use crate::state::AppState;

/// Extractor that requires a resolved admin session.
///
/// Non-admin requests are redirected to the login page with the requested
/// location preserved in `?next=`; API requests get `401` instead.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAdmin(profile): RequireAdmin,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", profile.email)
/// }
/// ```
pub struct RequireAdmin(pub AdminProfile);

/// Extractor that requires a resolved superadmin session.
///
/// Rejects like [`RequireAdmin`], and additionally returns `403` when the
/// session belongs to a plain admin.
pub struct RequireSuperAdmin(pub AdminProfile);

/// Rejection for the session guards.
pub enum AdminGuardRejection {
    /// Redirect to the login page, preserving the requested location.
    RedirectToLogin {
        /// Originally requested path and query.
        next: String,
    },
    /// Unauthorized response (for API requests).
    Unauthorized,
    /// Signed in as an admin, but the route needs a superadmin.
    Forbidden,
}

impl IntoResponse for AdminGuardRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin { next } => {
                let location = format!("/auth/login?next={}", urlencoding::encode(&next));
                Redirect::to(&location).into_response()
            }
            Self::Unauthorized => StatusCode::UNAUTHORIZED.into_response(),
            Self::Forbidden => (
                StatusCode::FORBIDDEN,
                "Only superadmins can access this resource",
            )
                .into_response(),
        }
    }
}

/// Build the non-admin rejection for a request: `401` for API paths, a
/// login redirect carrying the requested location for everything else.
fn reject(parts: &Parts) -> AdminGuardRejection {
    if parts.uri.path().starts_with("/api/") {
        AdminGuardRejection::Unauthorized
    } else {
        let next = parts
            .uri
            .path_and_query()
            .map_or_else(|| "/".to_owned(), |pq| pq.as_str().to_owned());
        AdminGuardRejection::RedirectToLogin { next }
    }
}

impl<S> FromRequestParts<S> for RequireAdmin
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = AdminGuardRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app = AppState::from_ref(state);
        let snapshot = app.session().settled_snapshot().await;

        // The profile is present exactly when the session resolved to an
        // active admin.
        snapshot.profile.map(Self).ok_or_else(|| reject(parts))
    }
}

impl<S> FromRequestParts<S> for RequireSuperAdmin
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = AdminGuardRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let RequireAdmin(profile) = RequireAdmin::from_request_parts(parts, state).await?;

        if !profile.is_superadmin() {
            return Err(AdminGuardRejection::Forbidden);
        }

        Ok(Self(profile))
    }
}
