//! End-to-end sign-in and sign-out flow over the assembled router.

#![allow(clippy::unwrap_used)]

use axum::http::{StatusCode, header};
use rptra_core::AdminRole;
use rptra_integration_tests::{SUPERADMIN_EMAIL, TestApp, body_string, inactive_profile};

const STAFF: &str = "staff@rptra.example";

#[tokio::test]
async fn test_sign_in_happy_path() {
    let app = TestApp::spawn(&[STAFF], vec![]).await;
    app.mock_sign_in_success("uid-1", STAFF).await;

    let response = app.post_login(STAFF, "hunter2", "").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/");

    // The profile was created with the admin role and a login timestamp.
    let profile = app.profiles.get_by_uid("uid-1").await.unwrap();
    assert_eq!(profile.role, AdminRole::Admin);
    assert!(profile.last_login.is_some());

    // The dashboard is reachable and shows the operator.
    let response = app.get("/").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_string(response).await;
    assert!(body.contains(STAFF));

    // The session API agrees.
    let response = app.get("/api/session").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_string(response).await;
    let session: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(session["email"], STAFF);
    assert_eq!(session["role"], "admin");
}

#[tokio::test]
async fn test_superadmin_email_receives_superadmin_role() {
    let app = TestApp::spawn(&[SUPERADMIN_EMAIL], vec![]).await;
    app.mock_sign_in_success("uid-9", SUPERADMIN_EMAIL).await;

    let response = app.post_login(SUPERADMIN_EMAIL, "hunter2", "").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let response = app.get("/api/session").await;
    let body = body_string(response).await;
    let session: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(session["role"], "superadmin");
}

#[tokio::test]
async fn test_unlisted_email_is_rejected_without_provider_call() {
    // No sign-in mock mounted: a provider request would 404 and the error
    // message would differ from the generic one asserted below.
    let app = TestApp::spawn(&[], vec![]).await;

    let response = app.post_login("outsider@example.com", "hunter2", "").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_string(response).await;
    assert!(body.contains("not an authorized admin"));

    assert_eq!(app.profiles.count().await, 0);
    assert_eq!(app.idp.received_requests().await.unwrap().len(), 0);
}

#[tokio::test]
async fn test_wrong_password_shows_distinct_message() {
    let app = TestApp::spawn(&[STAFF], vec![]).await;
    app.mock_sign_in_error("INVALID_PASSWORD").await;

    let response = app.post_login(STAFF, "wrong", "").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_string(response).await;
    assert!(body.contains("Incorrect password."));

    // Rejected credentials never create a profile.
    assert_eq!(app.profiles.count().await, 0);
}

#[tokio::test]
async fn test_disabled_account_shows_distinct_message() {
    let app = TestApp::spawn(&[STAFF], vec![]).await;
    app.mock_sign_in_error("USER_DISABLED").await;

    let response = app.post_login(STAFF, "hunter2", "").await;
    let body = body_string(response).await;
    assert!(body.contains("This account has been disabled."));
}

#[tokio::test]
async fn test_inactive_profile_signs_in_but_stays_locked_out() {
    let app = TestApp::spawn(&[STAFF], vec![inactive_profile("uid-1", STAFF)]).await;
    app.mock_sign_in_success("uid-1", STAFF).await;

    // Credentials verify, but the session resolves to non-admin.
    let response = app.post_login(STAFF, "hunter2", "").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_string(response).await;
    assert!(body.contains("not an authorized admin"));

    // Signing in did not reactivate the profile.
    let profile = app.profiles.get_by_uid("uid-1").await.unwrap();
    assert!(!profile.is_active);

    // The guard keeps the dashboard shut.
    let response = app.get("/").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn test_sign_out_resets_session() {
    let app = TestApp::spawn(&[STAFF], vec![]).await;
    app.mock_sign_in_success("uid-1", STAFF).await;
    app.mock_sign_out().await;

    app.post_login(STAFF, "hunter2", "").await;
    assert!(app.session.snapshot().is_admin);

    let response = app.post_logout().await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/auth/login");

    let snapshot = app.session.snapshot();
    assert!(snapshot.identity.is_none());
    assert!(!snapshot.is_admin);
    assert!(snapshot.profile.is_none());

    let response = app.get("/").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
}
