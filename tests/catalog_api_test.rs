//! Brands and categories share one controller contract; both are driven through it here.
//! The plain paged lists (posts, reviews) ride along for the pagination edge cases.

mod common;

use axum::http::Method;
use common::{response_json, TestApp};
use rstest::rstest;
use serde_json::json;

#[rstest]
#[case("/api/brands", "brand")]
#[case("/api/categories", "category")]
#[tokio::test]
async fn titled_resource_lifecycle(#[case] base: &str, #[case] resource: &str) {
    let app = TestApp::new().await;

    let response = app
        .request_authenticated(
            Method::POST,
            base,
            Some(json!({"title": "Outdoor", "description": "Gear for outside"})),
        )
        .await;
    assert_eq!(response.status(), 201);
    let created = response_json(response).await;
    let id = created["data"]["id"].as_str().expect("id").to_string();
    assert_eq!(created["data"]["title"], "Outdoor");

    let response = app
        .request_authenticated(Method::POST, base, Some(json!({"title": "Outdoor"})))
        .await;
    assert_eq!(response.status(), 409);
    assert_eq!(
        response_json(response).await["message"],
        format!("{} with that title already exists", resource)
    );

    let item = format!("{}/{}", base, id);
    let response = app
        .request_authenticated(Method::PATCH, &item, Some(json!({"image": "outdoor.png"})))
        .await;
    assert_eq!(response.status(), 200);
    let updated = response_json(response).await;
    assert_eq!(updated["data"]["image"], "outdoor.png");
    assert_eq!(updated["data"]["description"], "Gear for outside");

    let response = app.request(Method::GET, &item, None, None).await;
    assert_eq!(response.status(), 200);

    let response = app.request_authenticated(Method::DELETE, &item, None).await;
    assert_eq!(response.status(), 204);

    let response = app.request(Method::GET, &item, None, None).await;
    assert_eq!(response.status(), 404);
    assert_eq!(
        response_json(response).await["message"],
        format!("no {} with that Id exists", resource)
    );
}

#[rstest]
#[case("/api/brands")]
#[case("/api/categories")]
#[tokio::test]
async fn titled_resource_lists_are_paginated(#[case] base: &str) {
    let app = TestApp::new().await;
    for n in 1..=12 {
        let response = app
            .request_authenticated(Method::POST, base, Some(json!({"title": format!("T{:02}", n)})))
            .await;
        assert_eq!(response.status(), 201);
    }

    let body = response_json(app.request(Method::GET, base, None, None).await).await;
    assert_eq!(body["status"], "success");
    assert_eq!(body["results"], 10);

    let body = response_json(
        app.request(Method::GET, &format!("{}?page=2&limit=10", base), None, None)
            .await,
    )
    .await;
    assert_eq!(body["results"], 2);
    assert_eq!(body["data"][0]["title"], "T11");
    assert_eq!(body["data"][1]["title"], "T12");
}

#[rstest]
#[case("/api/brands")]
#[case("/api/categories")]
#[case("/api/posts")]
#[case("/api/reviews")]
#[tokio::test]
async fn lists_far_past_the_end_are_empty(#[case] base: &str) {
    let app = TestApp::new().await;

    for query in ["page=1000000000000000000", "page=9223372036854775807&limit=9223372036854775807"] {
        let response = app
            .request(Method::GET, &format!("{}?{}", base, query), None, None)
            .await;
        assert_eq!(response.status(), 200, "{}?{}", base, query);
        let body = response_json(response).await;
        assert_eq!(body["results"], 0);
        assert_eq!(body["data"], json!([]));
    }
}

#[rstest]
#[case("/api/brands")]
#[case("/api/categories")]
#[tokio::test]
async fn titled_resource_writes_need_a_token(#[case] base: &str) {
    let app = TestApp::new().await;

    let response = app
        .request(Method::POST, base, Some(json!({"title": "Anon"})), None)
        .await;
    assert_eq!(response.status(), 401);

    let response = app
        .request(
            Method::DELETE,
            &format!("{}/{}", base, uuid::Uuid::new_v4()),
            None,
            None,
        )
        .await;
    assert_eq!(response.status(), 401);

    let response = app
        .request_authenticated(Method::POST, base, Some(json!({"title": ""})))
        .await;
    assert_eq!(response.status(), 400);
}
