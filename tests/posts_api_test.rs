mod common;

use axum::http::Method;
use common::{response_json, TestApp};
use serde_json::json;

#[tokio::test]
async fn post_lifecycle() {
    let app = TestApp::new().await;

    let response = app
        .request_authenticated(
            Method::POST,
            "/api/posts",
            Some(json!({"title": "Spring sale", "content": "Everything 20% off"})),
        )
        .await;
    assert_eq!(response.status(), 201);
    let created = response_json(response).await;
    let id = created["data"]["id"].as_str().expect("id").to_string();
    assert_eq!(created["data"]["user_id"], app.user_id.to_string());

    let uri = format!("/api/posts/{}", id);
    let response = app
        .request_authenticated(Method::PATCH, &uri, Some(json!({"content": "Now 30% off"})))
        .await;
    assert_eq!(response.status(), 200);
    let updated = response_json(response).await;
    assert_eq!(updated["data"]["title"], "Spring sale");
    assert_eq!(updated["data"]["content"], "Now 30% off");

    let list = response_json(app.request(Method::GET, "/api/posts", None, None).await).await;
    assert_eq!(list["results"], 1);

    let response = app.request_authenticated(Method::DELETE, &uri, None).await;
    assert_eq!(response.status(), 204);
    let response = app.request(Method::GET, &uri, None, None).await;
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn post_titles_are_unique() {
    let app = TestApp::new().await;
    let body = json!({"title": "Launch", "content": "We are live"});

    let first = app
        .request_authenticated(Method::POST, "/api/posts", Some(body.clone()))
        .await;
    assert_eq!(first.status(), 201);

    let second = app
        .request_authenticated(Method::POST, "/api/posts", Some(body))
        .await;
    assert_eq!(second.status(), 409);
    assert_eq!(
        response_json(second).await["message"],
        "post with that title already exists"
    );
}

#[tokio::test]
async fn anonymous_post_is_rejected() {
    let app = TestApp::new().await;
    let response = app
        .request(
            Method::POST,
            "/api/posts",
            Some(json!({"title": "Anon", "content": "x"})),
            None,
        )
        .await;
    assert_eq!(response.status(), 401);
}
