use super::common::{
    created_response, list_response, no_content_response, parse_id, success_response,
    DataResponse, ListResponse, PaginationParams,
};
use crate::{
    auth::{AuthRouterExt, AuthUser},
    entities::brand::Model as BrandModel,
    errors::{ApiError, ErrorResponse},
    services::brand_service::{CreateBrandInput, UpdateBrandInput},
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

/// Create a brand
#[utoipa::path(
    post,
    path = "/api/brands",
    request_body = CreateBrandInput,
    responses(
        (status = 201, description = "Brand created", body = DataResponse<BrandModel>),
        (status = 400, description = "Malformed or incomplete body", body = ErrorResponse),
        (status = 409, description = "Title already taken", body = ErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "Brands"
)]
pub async fn create_brand(
    State(state): State<AppState>,
    _user: AuthUser,
    payload: Result<Json<CreateBrandInput>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(input) = payload?;
    let brand = state.services.brands.create(input).await?;
    Ok(created_response(brand))
}

/// List brands
#[utoipa::path(
    get,
    path = "/api/brands",
    params(PaginationParams),
    responses(
        (status = 200, description = "One page of brands", body = ListResponse<BrandModel>),
        (status = 400, description = "Malformed page or limit", body = ErrorResponse)
    ),
    tag = "Brands"
)]
pub async fn list_brands(
    State(state): State<AppState>,
    params: Result<Query<PaginationParams>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Query(params) = params?;
    let brands = state.services.brands.list(params.page_request()).await?;
    Ok(list_response(brands))
}

/// Get a brand by id
#[utoipa::path(
    get,
    path = "/api/brands/{id}",
    params(("id" = String, Path, description = "Brand id")),
    responses(
        (status = 200, description = "Brand found", body = DataResponse<BrandModel>),
        (status = 404, description = "No such brand", body = ErrorResponse)
    ),
    tag = "Brands"
)]
pub async fn get_brand(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&id, "brand")?;
    let brand = state.services.brands.find_by_id(id).await?;
    Ok(success_response(brand))
}

/// Partially update a brand
#[utoipa::path(
    patch,
    path = "/api/brands/{id}",
    params(("id" = String, Path, description = "Brand id")),
    request_body = UpdateBrandInput,
    responses(
        (status = 200, description = "Brand updated", body = DataResponse<BrandModel>),
        (status = 404, description = "No such brand", body = ErrorResponse),
        (status = 409, description = "Title already taken", body = ErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "Brands"
)]
pub async fn update_brand(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<String>,
    payload: Result<Json<UpdateBrandInput>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&id, "brand")?;
    let Json(input) = payload?;
    let brand = state.services.brands.update(id, input).await?;
    Ok(success_response(brand))
}

/// Delete a brand
#[utoipa::path(
    delete,
    path = "/api/brands/{id}",
    params(("id" = String, Path, description = "Brand id")),
    responses(
        (status = 204, description = "Brand deleted"),
        (status = 404, description = "No such brand", body = ErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "Brands"
)]
pub async fn delete_brand(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&id, "brand")?;
    state.services.brands.delete(id).await?;
    Ok(no_content_response())
}

pub fn brand_routes() -> Router<AppState> {
    let public = Router::new()
        .route("/", get(list_brands))
        .route("/:id", get(get_brand));

    let protected = Router::new()
        .route("/", axum::routing::post(create_brand))
        .route("/:id", patch(update_brand).delete(delete_brand))
        .with_auth();

    public.merge(protected)
}
