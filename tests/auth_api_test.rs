//! Registration, login, refresh rotation and logout through the public routes.

mod common;

use axum::http::Method;
use common::{response_json, TestApp, TEST_PASSWORD};
use serde_json::{json, Value};
use std::time::{Duration, Instant};

async fn login(app: &TestApp, email: &str, password: &str) -> (u16, Value) {
    let response = app
        .request(
            Method::POST,
            "/api/auth/login",
            Some(json!({"email": email, "password": password})),
            None,
        )
        .await;
    let status = response.status().as_u16();
    (status, response_json(response).await)
}

async fn fastest_failed_login(app: &TestApp, email: &str, password: &str) -> Duration {
    let mut best = Duration::MAX;
    for _ in 0..2 {
        let started = Instant::now();
        let (status, _) = login(app, email, password).await;
        assert_eq!(status, 401);
        best = best.min(started.elapsed());
    }
    best
}

#[tokio::test]
async fn register_hides_the_password_hash() {
    let app = TestApp::new().await;
    let response = app
        .request(
            Method::POST,
            "/api/auth/register",
            Some(json!({
                "name": "Ada",
                "email": "Ada@Example.com",
                "password": "analytical-engine",
                "password_confirm": "analytical-engine",
            })),
            None,
        )
        .await;
    assert_eq!(response.status(), 201);

    let body = response_json(response).await;
    assert_eq!(body["status"], "success");
    assert_eq!(body["data"]["email"], "ada@example.com");
    assert_eq!(body["data"]["role"], "user");
    assert_eq!(body["data"]["verified"], false);
    assert!(body["data"].get("password").is_none());
    assert!(body["data"].get("password_hash").is_none());
}

#[tokio::test]
async fn register_rejects_bad_input_and_duplicates() {
    let app = TestApp::new().await;

    let mismatch = json!({
        "name": "Bob",
        "email": "bob@example.com",
        "password": "password-one",
        "password_confirm": "password-two",
    });
    let response = app
        .request(Method::POST, "/api/auth/register", Some(mismatch), None)
        .await;
    assert_eq!(response.status(), 400);
    assert_eq!(response_json(response).await["message"], "passwords do not match");

    let short = json!({
        "name": "Bob",
        "email": "bob@example.com",
        "password": "short",
        "password_confirm": "short",
    });
    let response = app
        .request(Method::POST, "/api/auth/register", Some(short), None)
        .await;
    assert_eq!(response.status(), 400);

    let duplicate = json!({
        "name": "Again",
        "email": app.user_email.to_uppercase(),
        "password": TEST_PASSWORD,
        "password_confirm": TEST_PASSWORD,
    });
    let response = app
        .request(Method::POST, "/api/auth/register", Some(duplicate), None)
        .await;
    assert_eq!(response.status(), 409);
}

#[tokio::test]
async fn login_issues_a_bearer_pair() {
    let app = TestApp::new().await;
    let (status, body) = login(&app, &app.user_email, TEST_PASSWORD).await;
    assert_eq!(status, 200);
    assert_eq!(body["status"], "success");
    assert_eq!(body["token_type"], "Bearer");
    assert!(body["expires_in"].as_i64().unwrap_or_default() > 0);

    let access = body["access_token"].as_str().expect("access token");
    let response = app
        .request(Method::GET, "/api/users/me", None, Some(access))
        .await;
    assert_eq!(response.status(), 200);
    let me = response_json(response).await;
    assert_eq!(me["data"]["id"], app.user_id.to_string());
}

#[tokio::test]
async fn bad_credentials_share_one_message() {
    let app = TestApp::new().await;

    let (status, wrong_password) = login(&app, &app.user_email, "not-the-password").await;
    assert_eq!(status, 401);
    let (status, unknown_email) = login(&app, "nobody@example.com", TEST_PASSWORD).await;
    assert_eq!(status, 401);

    assert_eq!(wrong_password["message"], unknown_email["message"]);
    assert_eq!(wrong_password["status"], "fail");
}

#[tokio::test]
async fn unknown_email_costs_as_much_as_a_wrong_password() {
    let app = TestApp::new().await;

    let wrong_password = fastest_failed_login(&app, &app.user_email, "not-the-password").await;
    let unknown_email = fastest_failed_login(&app, "nobody@example.com", TEST_PASSWORD).await;

    assert!(
        unknown_email * 3 >= wrong_password,
        "unknown email answered in {:?}, wrong password in {:?}",
        unknown_email,
        wrong_password
    );
}

#[tokio::test]
async fn refresh_rotates_and_revokes() {
    let app = TestApp::new().await;
    let (_, tokens) = login(&app, &app.user_email, TEST_PASSWORD).await;
    let refresh = tokens["refresh_token"].as_str().expect("refresh token").to_string();
    let access = tokens["access_token"].as_str().expect("access token").to_string();

    let response = app
        .request(
            Method::POST,
            "/api/auth/refresh",
            Some(json!({"refresh_token": refresh})),
            None,
        )
        .await;
    assert_eq!(response.status(), 200);
    let rotated = response_json(response).await;
    assert_ne!(rotated["refresh_token"], tokens["refresh_token"]);

    let response = app
        .request(
            Method::POST,
            "/api/auth/refresh",
            Some(json!({"refresh_token": refresh})),
            None,
        )
        .await;
    assert_eq!(response.status(), 401);

    let response = app
        .request(
            Method::POST,
            "/api/auth/refresh",
            Some(json!({"refresh_token": access})),
            None,
        )
        .await;
    assert_eq!(response.status(), 401);
}

#[tokio::test]
async fn simultaneous_refreshes_rotate_once() {
    let app = TestApp::new().await;
    let (_, tokens) = login(&app, &app.user_email, TEST_PASSWORD).await;
    let refresh = tokens["refresh_token"].as_str().expect("refresh token").to_string();
    let body = json!({"refresh_token": refresh});

    let (first, second) = tokio::join!(
        app.request(Method::POST, "/api/auth/refresh", Some(body.clone()), None),
        app.request(Method::POST, "/api/auth/refresh", Some(body), None),
    );
    let mut statuses = [first.status().as_u16(), second.status().as_u16()];
    statuses.sort_unstable();
    assert_eq!(statuses, [200, 401]);
}

#[tokio::test]
async fn refresh_token_cannot_authenticate_requests() {
    let app = TestApp::new().await;
    let (_, tokens) = login(&app, &app.user_email, TEST_PASSWORD).await;
    let refresh = tokens["refresh_token"].as_str().expect("refresh token");

    let response = app
        .request(Method::GET, "/api/users/me", None, Some(refresh))
        .await;
    assert_eq!(response.status(), 401);
}

#[tokio::test]
async fn logout_revokes_the_access_token() {
    let app = TestApp::new().await;
    let (_, tokens) = login(&app, &app.user_email, TEST_PASSWORD).await;
    let access = tokens["access_token"].as_str().expect("access token");

    let response = app
        .request(Method::GET, "/api/auth/logout", None, Some(access))
        .await;
    assert_eq!(response.status(), 200);
    assert_eq!(response_json(response).await["message"], "logged out");

    let response = app
        .request(Method::GET, "/api/users/me", None, Some(access))
        .await;
    assert_eq!(response.status(), 401);

    // Other sessions stay valid
    let response = app.request_authenticated(Method::GET, "/api/users/me", None).await;
    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn missing_token_is_unauthorized() {
    let app = TestApp::new().await;
    let response = app.request(Method::GET, "/api/users/me", None, None).await;
    assert_eq!(response.status(), 401);
    let body = response_json(response).await;
    assert_eq!(body["status"], "fail");
    assert_eq!(body["message"], "You are not logged in");
}
