use super::common::{
    created_response, list_response, no_content_response, parse_id, success_response,
    DataResponse, ListResponse, PaginationParams,
};
use crate::{
    auth::{AuthRouterExt, AuthUser},
    entities::review::Model as ReviewModel,
    errors::{ApiError, ErrorResponse},
    services::review_service::{CreateReviewInput, UpdateReviewInput},
    AppState,
};
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    response::IntoResponse,
    routing::{get, patch, post},
    Json, Router,
};

/// Review a product as the authenticated user
#[utoipa::path(
    post,
    path = "/api/reviews",
    request_body = CreateReviewInput,
    responses(
        (status = 201, description = "Review created", body = DataResponse<ReviewModel>),
        (status = 400, description = "Malformed or incomplete body", body = ErrorResponse),
        (status = 404, description = "Referenced product does not exist", body = ErrorResponse),
        (status = 409, description = "Review name already taken", body = ErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "Reviews"
)]
pub async fn create_review(
    State(state): State<AppState>,
    user: AuthUser,
    payload: Result<Json<CreateReviewInput>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(input) = payload?;
    let review = state.services.reviews.create(user.user_id, input).await?;
    Ok(created_response(review))
}

/// List reviews
#[utoipa::path(
    get,
    path = "/api/reviews",
    params(PaginationParams),
    responses(
        (status = 200, description = "One page of reviews", body = ListResponse<ReviewModel>),
        (status = 400, description = "Malformed page or limit", body = ErrorResponse)
    ),
    tag = "Reviews"
)]
pub async fn list_reviews(
    State(state): State<AppState>,
    params: Result<Query<PaginationParams>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Query(params) = params?;
    let reviews = state.services.reviews.list(params.page_request()).await?;
    Ok(list_response(reviews))
}

/// Get a review by id
#[utoipa::path(
    get,
    path = "/api/reviews/{id}",
    params(("id" = String, Path, description = "Review id")),
    responses(
        (status = 200, description = "Review found", body = DataResponse<ReviewModel>),
        (status = 404, description = "No such review", body = ErrorResponse)
    ),
    tag = "Reviews"
)]
pub async fn get_review(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&id, "review")?;
    let review = state.services.reviews.find_by_id(id).await?;
    Ok(success_response(review))
}

/// Partially update a review
#[utoipa::path(
    patch,
    path = "/api/reviews/{id}",
    params(("id" = String, Path, description = "Review id")),
    request_body = UpdateReviewInput,
    responses(
        (status = 200, description = "Review updated", body = DataResponse<ReviewModel>),
        (status = 404, description = "No such review", body = ErrorResponse),
        (status = 409, description = "Review name already taken", body = ErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "Reviews"
)]
pub async fn update_review(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<String>,
    payload: Result<Json<UpdateReviewInput>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&id, "review")?;
    let Json(input) = payload?;
    let review = state.services.reviews.update(id, input).await?;
    Ok(success_response(review))
}

/// Delete a review
#[utoipa::path(
    delete,
    path = "/api/reviews/{id}",
    params(("id" = String, Path, description = "Review id")),
    responses(
        (status = 204, description = "Review deleted"),
        (status = 404, description = "No such review", body = ErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "Reviews"
)]
pub async fn delete_review(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&id, "review")?;
    state.services.reviews.delete(id).await?;
    Ok(no_content_response())
}

pub fn review_routes() -> Router<AppState> {
    let public = Router::new()
        .route("/", get(list_reviews))
        .route("/:id", get(get_review));

    let protected = Router::new()
        .route("/", post(create_review))
        .route("/:id", patch(update_review).delete(delete_review))
        .with_auth();

    public.merge(protected)
}
