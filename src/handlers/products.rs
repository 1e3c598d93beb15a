use super::common::{
    created_response, list_response, no_content_response, parse_id, success_response,
    DataResponse, ListResponse, PaginationParams,
};
use crate::{
    auth::{AuthRouterExt, AuthUser},
    entities::{product::Model as ProductModel, review::Model as ReviewModel},
    errors::{ApiError, ErrorResponse},
    repositories::{PageRequest, ProductFilter},
    services::product_service::{CreateProductInput, UpdateProductInput},
    AppState,
};
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Search filters and paging
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ProductSearchParams {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    /// Exact category match
    pub category: Option<String>,
    /// Exact brand match
    pub brand: Option<String>,
    /// Case-insensitive substring of the product name
    pub query: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProductSearchResponse {
    #[schema(example = "success")]
    pub status: String,
    pub results: usize,
    pub data: Vec<ProductModel>,
    /// Matching products across all pages
    pub total: u64,
    pub page: u64,
    /// `ceil(total / limit)`
    pub pages: u64,
    /// Every brand in the catalog, sorted
    pub brands: Vec<String>,
    /// Every category in the catalog, sorted
    pub categories: Vec<String>,
}

/// Create a product
#[utoipa::path(
    post,
    path = "/api/products",
    request_body = CreateProductInput,
    responses(
        (status = 201, description = "Product created", body = DataResponse<ProductModel>),
        (status = 400, description = "Malformed or incomplete body", body = ErrorResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 409, description = "Name already taken", body = ErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "Products"
)]
pub async fn create_product(
    State(state): State<AppState>,
    _user: AuthUser,
    payload: Result<Json<CreateProductInput>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(input) = payload?;
    let product = state.services.products.create(input).await?;
    Ok(created_response(product))
}

/// Search products by category, brand and name
#[utoipa::path(
    get,
    path = "/api/products/search",
    params(ProductSearchParams),
    responses(
        (status = 200, description = "Matching products with facets", body = ProductSearchResponse),
        (status = 400, description = "Malformed query string", body = ErrorResponse)
    ),
    tag = "Products"
)]
pub async fn search_products(
    State(state): State<AppState>,
    params: Result<Query<ProductSearchParams>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Query(params) = params?;
    let page = PageRequest::new(params.page, params.limit);
    let filter = ProductFilter {
        category: params.category,
        brand: params.brand,
        query: params.query,
    };

    let result = state.services.products.search(page, filter).await?;

    Ok(Json(ProductSearchResponse {
        status: "success".to_string(),
        results: result.products.len(),
        data: result.products,
        total: result.total,
        page: result.page,
        pages: result.pages,
        brands: result.brands,
        categories: result.categories,
    }))
}

/// Get a product by id
#[utoipa::path(
    get,
    path = "/api/products/{id}",
    params(("id" = String, Path, description = "Product id")),
    responses(
        (status = 200, description = "Product found", body = DataResponse<ProductModel>),
        (status = 404, description = "No such product", body = ErrorResponse)
    ),
    tag = "Products"
)]
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&id, "product")?;
    let product = state.services.products.find_by_id(id).await?;
    Ok(success_response(product))
}

/// Partially update a product
#[utoipa::path(
    patch,
    path = "/api/products/{id}",
    params(("id" = String, Path, description = "Product id")),
    request_body = UpdateProductInput,
    responses(
        (status = 200, description = "Product updated", body = DataResponse<ProductModel>),
        (status = 404, description = "No such product", body = ErrorResponse),
        (status = 409, description = "Name already taken", body = ErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "Products"
)]
pub async fn update_product(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<String>,
    payload: Result<Json<UpdateProductInput>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&id, "product")?;
    let Json(input) = payload?;
    let product = state.services.products.update(id, input).await?;
    Ok(success_response(product))
}

/// Delete a product that has no reviews
#[utoipa::path(
    delete,
    path = "/api/products/{id}",
    params(("id" = String, Path, description = "Product id")),
    responses(
        (status = 204, description = "Product deleted"),
        (status = 404, description = "No such product", body = ErrorResponse),
        (status = 409, description = "Product still has reviews", body = ErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "Products"
)]
pub async fn delete_product(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&id, "product")?;
    state.services.products.delete(id).await?;
    Ok(no_content_response())
}

/// Reviews of one product, oldest first
#[utoipa::path(
    get,
    path = "/api/products/{id}/reviews",
    params(("id" = String, Path, description = "Product id"), PaginationParams),
    responses(
        (status = 200, description = "Reviews of the product", body = ListResponse<ReviewModel>),
        (status = 404, description = "No such product", body = ErrorResponse)
    ),
    tag = "Products"
)]
pub async fn list_product_reviews(
    State(state): State<AppState>,
    Path(id): Path<String>,
    params: Result<Query<PaginationParams>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&id, "product")?;
    let Query(params) = params?;
    let reviews = state
        .services
        .products
        .reviews(id, params.page_request())
        .await?;
    Ok(list_response(reviews))
}

pub fn product_routes() -> Router<AppState> {
    let public = Router::new()
        .route("/search", get(search_products))
        .route("/:id", get(get_product))
        .route("/:id/reviews", get(list_product_reviews));

    let protected = Router::new()
        .route("/", post(create_product))
        .route("/:id", axum::routing::patch(update_product).delete(delete_product))
        .with_auth();

    public.merge(protected)
}
