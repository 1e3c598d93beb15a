//! Storefront API library
//!
//! Catalog backend for an online store. The binary in `main.rs` is the
//! dependency-injection root; everything it wires together lives here so
//! the integration tests can build the exact same router.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

// Core modules
pub mod auth;
pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod handlers;
pub mod health;
pub mod middleware_helpers;
pub mod migrator;
pub mod openapi;
pub mod repositories;
pub mod services;
pub mod tracing;

use axum::{
    http::{header, HeaderValue, Method, StatusCode},
    response::IntoResponse,
    routing::get,
    Extension, Json, Router,
};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::{compression::CompressionLayer, cors::CorsLayer};

use crate::errors::ErrorResponse;

// App state definition
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub config: config::AppConfig,
    pub services: handlers::AppServices,
    pub auth: Arc<auth::AuthService>,
    pub redis: Arc<redis::Client>,
}

/// Every resource under `/api`
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/healthchecker", get(health::healthchecker))
        .nest("/products", handlers::products::product_routes())
        .nest("/categories", handlers::categories::category_routes())
        .nest("/brands", handlers::brands::brand_routes())
        .nest("/reviews", handlers::reviews::review_routes())
        .nest("/posts", handlers::posts::post_routes())
        .nest("/auth", handlers::auth::auth_routes())
        .nest("/users", handlers::users::user_routes())
}

/// CORS restricted to the configured origins
pub fn cors_layer(config: &config::AppConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .cors_origins()
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                ::tracing::warn!(origin = %origin, "ignoring malformed CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .allow_credentials(config.cors_allow_credentials)
}

async fn route_not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse::fail("route not found")),
    )
}

/// Full application: API routes, OpenAPI document and the middleware stack
pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config);
    let auth_service = state.auth.clone();

    Router::new()
        .nest("/api", api_routes())
        .merge(openapi::openapi_routes())
        .fallback(route_not_found)
        // HTTP tracing layer for consistent request/response telemetry
        .layer(crate::tracing::http_trace_layer())
        .layer(CompressionLayer::new())
        .layer(cors)
        // Auth gate reads the service from request extensions
        .layer(Extension(auth_service))
        // Ensure every request carries a request id for traceability
        .layer(axum::middleware::from_fn(
            middleware_helpers::request_id::request_id_middleware,
        ))
        .with_state(state)
}
