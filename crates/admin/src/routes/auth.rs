//! Authentication route handlers.
//!
//! The login form drives [`SessionManager::sign_in`]; every outcome is
//! either a redirect to the requested page or the login page re-rendered
//! with a single-line error.
//!
//! [`SessionManager::sign_in`]: crate::services::auth::SessionManager::sign_in

use askama::Template;
use axum::{
    Router,
    extract::{Query, State},
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
    Form, Json,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::{AppError, clear_sentry_user, set_sentry_user};
use crate::middleware::RequireAdmin;
use crate::state::AppState;

/// Login page template.
#[derive(Template)]
#[template(path = "auth/login.html")]
struct LoginPageTemplate<'a> {
    error: Option<&'a str>,
    next: &'a str,
}

/// Query parameters for the login page.
#[derive(Debug, Deserialize)]
struct LoginPageQuery {
    #[serde(default)]
    next: String,
}

/// Login form fields.
#[derive(Debug, Deserialize)]
struct LoginForm {
    email: String,
    password: String,
    #[serde(default)]
    next: String,
}

/// Current session, as exposed on `/api/session`.
#[derive(Debug, Serialize)]
struct SessionResponse {
    uid: String,
    email: String,
    role: String,
}

/// Build the auth router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/auth/login", get(login_page).post(login_submit))
        .route("/auth/logout", post(logout))
        .route("/api/session", get(current_session))
}

/// Only ever redirect back into the panel itself.
fn safe_next(next: &str) -> &str {
    if next.starts_with('/') && !next.starts_with("//") {
        next
    } else {
        "/"
    }
}

fn render_login(error: Option<&str>, next: &str) -> Result<Html<String>, AppError> {
    let page = LoginPageTemplate { error, next };
    Ok(Html(page.render()?))
}

/// Render the login page.
///
/// GET /auth/login
async fn login_page(Query(query): Query<LoginPageQuery>) -> Result<Html<String>, AppError> {
    render_login(None, &query.next)
}

/// Handle a login attempt.
///
/// POST /auth/login
#[instrument(skip(state, form), fields(email = %form.email))]
async fn login_submit(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    match state.session().sign_in(&form.email, &form.password).await {
        Ok(snapshot) if snapshot.is_admin => {
            if let Some(profile) = &snapshot.profile {
                set_sentry_user(profile.uid.as_str(), Some(profile.email.as_str()));
            }
            Ok(Redirect::to(safe_next(&form.next)).into_response())
        }
        // Credentials verified but the directory said no (deactivated,
        // record missing, or backend down). Same generic line as an
        // allow-list miss.
        Ok(_) => Ok(render_login(
            Some("This account is not an authorized admin."),
            &form.next,
        )?
        .into_response()),
        Err(error) => {
            tracing::info!(%error, "login attempt rejected");
            Ok(render_login(Some(error.user_message()), &form.next)?.into_response())
        }
    }
}

/// Sign out and return to the login page.
///
/// POST /auth/logout
#[instrument(skip(state))]
async fn logout(State(state): State<AppState>) -> Result<Response, AppError> {
    clear_sentry_user();

    match state.session().sign_out().await {
        Ok(_) => Ok(Redirect::to("/auth/login").into_response()),
        // Local session is already cleared; tell the operator the
        // provider-side revocation failed.
        Err(error) => Ok(render_login(Some(error.user_message()), "")?.into_response()),
    }
}

/// Current session as JSON. Guarded, so signed-out callers get 401.
///
/// GET /api/session
async fn current_session(RequireAdmin(profile): RequireAdmin) -> Json<SessionResponse> {
    Json(SessionResponse {
        uid: profile.uid.as_str().to_owned(),
        email: profile.email.as_str().to_owned(),
        role: profile.role.as_str().to_owned(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_next_keeps_local_paths() {
        assert_eq!(safe_next("/settings?tab=a"), "/settings?tab=a");
        assert_eq!(safe_next("/"), "/");
    }

    #[test]
    fn test_safe_next_rejects_external_targets() {
        assert_eq!(safe_next("https://evil.example"), "/");
        assert_eq!(safe_next("//evil.example"), "/");
        assert_eq!(safe_next(""), "/");
    }
}
