//! Dashboard route handler.

use askama::Template;
use axum::{
    Router,
    response::Html,
    routing::get,
};
use tracing::instrument;

use crate::error::AppError;
use crate::middleware::RequireAdmin;
use crate::state::AppState;

/// Dashboard page template.
#[derive(Template)]
#[template(path = "dashboard.html")]
struct DashboardTemplate {
    email: String,
    role: String,
    last_login: Option<String>,
}

/// Build the dashboard router.
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(index))
}

/// Dashboard overview page.
///
/// GET /
#[instrument(skip(profile))]
async fn index(RequireAdmin(profile): RequireAdmin) -> Result<Html<String>, AppError> {
    let page = DashboardTemplate {
        email: profile.email.as_str().to_owned(),
        role: profile.role.as_str().to_owned(),
        last_login: profile
            .last_login
            .map(|t| t.format("%Y-%m-%d %H:%M UTC").to_string()),
    };
    Ok(Html(page.render()?))
}
