use axum::{routing::get, Json, Router};
use utoipa::{
    openapi::security::{Http, HttpAuthScheme, SecurityScheme},
    Modify, OpenApi,
};

use crate::AppState;

pub const OPENAPI_PATH: &str = "/api-docs/openapi.json";

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Storefront API",
        version = "0.1.0",
        description = r#"
Catalog backend for an online store: products, brands, categories, reviews and posts,
plus account registration and JWT login.

Protected routes expect `Authorization: Bearer <access_token>` from `/api/auth/login`.

Every response uses the envelope `{"status": "success", "data": ...}` or
`{"status": "fail", "message": ...}`. List endpoints take `page` and `limit`
(defaults 1 and 10) and add `results`.
        "#
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Products", description = "Product catalog and search"),
        (name = "Categories", description = "Catalog categories"),
        (name = "Brands", description = "Catalog brands"),
        (name = "Reviews", description = "Product reviews"),
        (name = "Posts", description = "Editorial posts"),
        (name = "Auth", description = "Registration, login and token rotation"),
        (name = "Users", description = "Account profile"),
        (name = "Health", description = "Liveness probe")
    ),
    paths(
        // Products
        crate::handlers::products::create_product,
        crate::handlers::products::search_products,
        crate::handlers::products::get_product,
        crate::handlers::products::update_product,
        crate::handlers::products::delete_product,
        crate::handlers::products::list_product_reviews,
        // Categories
        crate::handlers::categories::create_category,
        crate::handlers::categories::list_categories,
        crate::handlers::categories::get_category,
        crate::handlers::categories::update_category,
        crate::handlers::categories::delete_category,
        // Brands
        crate::handlers::brands::create_brand,
        crate::handlers::brands::list_brands,
        crate::handlers::brands::get_brand,
        crate::handlers::brands::update_brand,
        crate::handlers::brands::delete_brand,
        // Reviews
        crate::handlers::reviews::create_review,
        crate::handlers::reviews::list_reviews,
        crate::handlers::reviews::get_review,
        crate::handlers::reviews::update_review,
        crate::handlers::reviews::delete_review,
        // Posts
        crate::handlers::posts::create_post,
        crate::handlers::posts::list_posts,
        crate::handlers::posts::get_post,
        crate::handlers::posts::update_post,
        crate::handlers::posts::delete_post,
        // Accounts
        crate::handlers::auth::register,
        crate::handlers::auth::login,
        crate::handlers::auth::refresh,
        crate::handlers::auth::logout,
        crate::handlers::users::get_me,
        // Health
        crate::health::healthchecker
    ),
    components(
        schemas(
            crate::entities::product::Model,
            crate::entities::category::Model,
            crate::entities::brand::Model,
            crate::entities::review::Model,
            crate::entities::post::Model,
            crate::entities::user::UserResponse,
            crate::errors::ErrorResponse
        )
    )
)]
pub struct ApiDoc;

/// Registers the `bearer` scheme referenced by protected paths
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

pub fn openapi_routes() -> Router<AppState> {
    Router::new().route(OPENAPI_PATH, get(openapi_json))
}
