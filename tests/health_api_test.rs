mod common;

use axum::http::Method;
use common::{response_json, TestApp};

#[tokio::test]
async fn healthchecker_reports_each_dependency() {
    let app = TestApp::new().await;

    let response = app.request(Method::GET, "/api/healthchecker", None, None).await;
    // The harness cache points at a closed port
    assert_eq!(response.status(), 503);

    let body = response_json(response).await;
    assert_eq!(body["status"], "fail");
    assert_eq!(body["message"], "cache unavailable");
    assert_eq!(body["checks"]["database"], "up");
    assert_eq!(body["checks"]["cache"], "down");
}

#[tokio::test]
async fn responses_carry_a_request_id() {
    let app = TestApp::new().await;
    let response = app.request(Method::GET, "/api/brands", None, None).await;
    assert_eq!(response.status(), 200);
    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn openapi_document_is_served() {
    let app = TestApp::new().await;
    let response = app
        .request(Method::GET, "/api-docs/openapi.json", None, None)
        .await;
    assert_eq!(response.status(), 200);

    let doc = response_json(response).await;
    assert_eq!(doc["info"]["title"], "Storefront API");
    assert!(doc["paths"].get("/api/products/search").is_some());
    assert!(doc["paths"].get("/api/healthchecker").is_some());
}
