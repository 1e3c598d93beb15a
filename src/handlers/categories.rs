use super::common::{
    created_response, list_response, no_content_response, parse_id, success_response,
    DataResponse, ListResponse, PaginationParams,
};
use crate::{
    auth::{AuthRouterExt, AuthUser},
    entities::category::Model as CategoryModel,
    errors::{ApiError, ErrorResponse},
    services::category_service::{CreateCategoryInput, UpdateCategoryInput},
    AppState,
};
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    response::IntoResponse,
    routing::{get, patch},
    Json, Router,
};

/// Create a category
#[utoipa::path(
    post,
    path = "/api/categories",
    request_body = CreateCategoryInput,
    responses(
        (status = 201, description = "Category created", body = DataResponse<CategoryModel>),
        (status = 400, description = "Malformed or incomplete body", body = ErrorResponse),
        (status = 409, description = "Title already taken", body = ErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "Categories"
)]
pub async fn create_category(
    State(state): State<AppState>,
    _user: AuthUser,
    payload: Result<Json<CreateCategoryInput>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(input) = payload?;
    let category = state.services.categories.create(input).await?;
    Ok(created_response(category))
}

/// List categories
#[utoipa::path(
    get,
    path = "/api/categories",
    params(PaginationParams),
    responses(
        (status = 200, description = "One page of categories", body = ListResponse<CategoryModel>),
        (status = 400, description = "Malformed page or limit", body = ErrorResponse)
    ),
    tag = "Categories"
)]
pub async fn list_categories(
    State(state): State<AppState>,
    params: Result<Query<PaginationParams>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Query(params) = params?;
    let categories = state.services.categories.list(params.page_request()).await?;
    Ok(list_response(categories))
}

/// Get a category by id
#[utoipa::path(
    get,
    path = "/api/categories/{id}",
    params(("id" = String, Path, description = "Category id")),
    responses(
        (status = 200, description = "Category found", body = DataResponse<CategoryModel>),
        (status = 404, description = "No such category", body = ErrorResponse)
    ),
    tag = "Categories"
)]
pub async fn get_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&id, "category")?;
    let category = state.services.categories.find_by_id(id).await?;
    Ok(success_response(category))
}

/// Partially update a category
#[utoipa::path(
    patch,
    path = "/api/categories/{id}",
    params(("id" = String, Path, description = "Category id")),
    request_body = UpdateCategoryInput,
    responses(
        (status = 200, description = "Category updated", body = DataResponse<CategoryModel>),
        (status = 404, description = "No such category", body = ErrorResponse),
        (status = 409, description = "Title already taken", body = ErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "Categories"
)]
pub async fn update_category(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<String>,
    payload: Result<Json<UpdateCategoryInput>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&id, "category")?;
    let Json(input) = payload?;
    let category = state.services.categories.update(id, input).await?;
    Ok(success_response(category))
}

/// Delete a category
#[utoipa::path(
    delete,
    path = "/api/categories/{id}",
    params(("id" = String, Path, description = "Category id")),
    responses(
        (status = 204, description = "Category deleted"),
        (status = 404, description = "No such category", body = ErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "Categories"
)]
pub async fn delete_category(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&id, "category")?;
    state.services.categories.delete(id).await?;
    Ok(no_content_response())
}

pub fn category_routes() -> Router<AppState> {
    let public = Router::new()
        .route("/", get(list_categories))
        .route("/:id", get(get_category));

    let protected = Router::new()
        .route("/", axum::routing::post(create_category))
        .route("/:id", patch(update_category).delete(delete_category))
        .with_auth();

    public.merge(protected)
}
