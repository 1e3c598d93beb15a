#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::{self, Body},
    http::{header, Method, Request},
    response::Response,
    Router,
};
use serde_json::Value;
use storefront_api::{
    auth::{AuthConfig, AuthService},
    config::AppConfig,
    db,
    handlers::AppServices,
    services::user_service::RegisterUserInput,
    AppState,
};
use tempfile::TempDir;
use tower::ServiceExt;
use uuid::Uuid;

pub const TEST_PASSWORD: &str = "correct-horse-battery";

/// Application wired exactly like the binary, over a throwaway SQLite file.
/// The cache points at a closed port, so the liveness probe always reports it down.
pub struct TestApp {
    router: Router,
    pub state: AppState,
    pub user_id: Uuid,
    pub user_email: String,
    token: String,
    _dir: TempDir,
}

impl TestApp {
    pub async fn new() -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let db_path = dir.path().join("storefront_test.db");

        let mut cfg = AppConfig::new(
            format!("sqlite://{}?mode=rwc", db_path.display()),
            "redis://127.0.0.1:1".to_string(),
            "storefront_integration_secret_7h2k9d4m1q".to_string(),
            900,
            86_400,
            "127.0.0.1".to_string(),
            18_080,
            "test".to_string(),
        );
        cfg.db_max_connections = 1;
        cfg.db_min_connections = 1;

        let pool = db::establish_connection_from_app_config(&cfg)
            .await
            .expect("failed to create test database");
        db::run_migrations(&pool)
            .await
            .expect("failed to run migrations in tests");

        let db_arc = Arc::new(pool);
        let redis_client = Arc::new(
            redis::Client::open(cfg.redis_url.clone()).expect("invalid redis url for tests"),
        );
        let auth_service = Arc::new(AuthService::new(AuthConfig::from(&cfg), db_arc.clone()));
        let services = AppServices::new(db_arc.clone());

        let user_email = "tester@example.com".to_string();
        let user = services
            .users
            .register(RegisterUserInput {
                name: "Test User".to_string(),
                email: user_email.clone(),
                password: TEST_PASSWORD.to_string(),
                password_confirm: TEST_PASSWORD.to_string(),
            })
            .await
            .expect("register test user");
        let token = auth_service
            .generate_token(user.id)
            .expect("issue test token")
            .access_token;

        let state = AppState {
            db: db_arc,
            config: cfg,
            services,
            auth: auth_service,
            redis: redis_client,
        };
        let router = storefront_api::build_router(state.clone());

        Self {
            router,
            state,
            user_id: user.id,
            user_email,
            token,
            _dir: dir,
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }

        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("build request");

        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible")
    }

    pub async fn request_authenticated(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> Response {
        self.request(method, uri, body, Some(&self.token)).await
    }

    /// Sends a raw body with a JSON content type, for malformed-payload checks
    pub async fn request_raw(&self, method: Method, uri: &str, raw: &str) -> Response {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {}", self.token))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(raw.to_string()))
            .expect("build request");

        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible")
    }

    /// Creates a product through the API and returns its id
    pub async fn create_product(&self, name: &str, brand: &str, category: Option<&str>) -> String {
        let mut body = serde_json::json!({
            "name": name,
            "price": "19.99",
            "brand": brand,
            "description": format!("{} description", name),
        });
        if let Some(category) = category {
            body["category"] = Value::from(category);
        }

        let response = self
            .request_authenticated(Method::POST, "/api/products", Some(body))
            .await;
        assert_eq!(response.status(), 201, "create product {}", name);
        let json = response_json(response).await;
        json["data"]["id"].as_str().expect("product id").to_string()
    }
}

pub async fn response_json(response: Response) -> Value {
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("response body bytes");
    serde_json::from_slice(&bytes).expect("json response")
}
