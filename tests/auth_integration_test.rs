mod common;

use axum::http::{Method, StatusCode};
use common::TestApp;
use serde_json::json;

#[tokio::test]
async fn register_then_login_round_trip() {
    let app = TestApp::new().await;

    let (status, body) = app
        .request(
            Method::POST,
            "/auth/register",
            None,
            Some(json!({
                "name": "Ana Silva",
                "email": "ana@example.com",
                "password": "s3cret-pass",
                "confirm_password": "s3cret-pass"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["access_token"].as_str().is_some());
    assert_eq!(body["token_type"], "Bearer");

    let (status, body) = app
        .request(
            Method::POST,
            "/auth/login",
            None,
            Some(json!({"email": "ana@example.com", "password": "s3cret-pass"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["access_token"].as_str().is_some());
}

#[tokio::test]
async fn login_with_wrong_password_is_unauthorized() {
    let app = TestApp::new().await;
    app.seed_user("Bo Chen", "bo@example.com", "right-password", "User")
        .await;

    let (status, _) = app
        .request(
            Method::POST,
            "/auth/login",
            None,
            Some(json!({"email": "bo@example.com", "password": "wrong-password"})),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app
        .request(
            Method::POST,
            "/auth/login",
            None,
            Some(json!({"email": "nobody@example.com", "password": "whatever"})),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn duplicate_registration_conflicts() {
    let app = TestApp::new().await;
    app.seed_user("Ana Silva", "ana@example.com", "s3cret-pass", "User")
        .await;

    let (status, _) = app
        .request(
            Method::POST,
            "/auth/register",
            None,
            Some(json!({
                "name": "Ana Again",
                "email": "ana@example.com",
                "password": "other-pass",
                "confirm_password": "other-pass"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn password_reset_requires_and_burns_the_token() {
    let app = TestApp::new().await;
    app.seed_user("Ana Silva", "ana@example.com", "old-password", "User")
        .await;

    // Unknown email cannot open the flow
    let (status, _) = app
        .request(
            Method::POST,
            "/auth/verify-email",
            None,
            Some(json!({"email": "ghost@example.com"})),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Known email yields a reset token
    let (status, body) = app
        .request(
            Method::POST,
            "/auth/verify-email",
            None,
            Some(json!({"email": "ana@example.com"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let reset_token = body["reset_token"].as_str().expect("token expected").to_string();

    // The reset token is single-purpose: it cannot authenticate API calls
    let (status, _) = app
        .request(
            Method::GET,
            "/api/v1/locations",
            Some(&reset_token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Completing the flow changes the credential
    let (status, _) = app
        .request(
            Method::POST,
            "/auth/change-password",
            None,
            Some(json!({
                "reset_token": reset_token,
                "new_password": "new-password",
                "confirm_new_password": "new-password"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    // Old credential no longer works, new one does
    let (status, _) = app
        .request(
            Method::POST,
            "/auth/login",
            None,
            Some(json!({"email": "ana@example.com", "password": "old-password"})),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app
        .request(
            Method::POST,
            "/auth/login",
            None,
            Some(json!({"email": "ana@example.com", "password": "new-password"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    // The token was burned on use
    let (status, _) = app
        .request(
            Method::POST,
            "/auth/change-password",
            None,
            Some(json!({
                "reset_token": body["reset_token"],
                "new_password": "another-password",
                "confirm_new_password": "another-password"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn logout_revokes_the_access_token() {
    let app = TestApp::new().await;
    app.seed_user("Ana Silva", "ana@example.com", "s3cret-pass", "User")
        .await;
    let token = app.token_for("ana@example.com").await;

    // Token works before logout
    let (status, _) = app
        .request(Method::GET, "/api/v1/locations", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .request(Method::POST, "/auth/logout", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .request(Method::GET, "/api/v1/locations", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn registration_validation_failures_are_bad_requests() {
    let app = TestApp::new().await;

    let (status, _) = app
        .request(
            Method::POST,
            "/auth/register",
            None,
            Some(json!({
                "name": "Short Pass",
                "email": "short@example.com",
                "password": "tiny",
                "confirm_password": "tiny"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .request(
            Method::POST,
            "/auth/register",
            None,
            Some(json!({
                "name": "Mismatch",
                "email": "mismatch@example.com",
                "password": "s3cret-pass",
                "confirm_password": "different-pass"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
