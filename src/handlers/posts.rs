use super::common::{
    created_response, list_response, no_content_response, parse_id, success_response,
    DataResponse, ListResponse, PaginationParams,
};
use crate::{
    auth::{AuthRouterExt, AuthUser},
    entities::post::Model as PostModel,
    errors::{ApiError, ErrorResponse},
    services::post_service::{CreatePostInput, UpdatePostInput},
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

/// Publish a post authored by the caller
#[utoipa::path(
    post,
    path = "/api/posts",
    request_body = CreatePostInput,
    responses(
        (status = 201, description = "Post created", body = DataResponse<PostModel>),
        (status = 400, description = "Malformed or incomplete body", body = ErrorResponse),
        (status = 409, description = "Title already taken", body = ErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "Posts"
)]
pub async fn create_post(
    State(state): State<AppState>,
    user: AuthUser,
    payload: Result<Json<CreatePostInput>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(input) = payload?;
    let post = state.services.posts.create(user.user_id, input).await?;
    Ok(created_response(post))
}

#[utoipa::path(
    get,
    path = "/api/posts",
    params(PaginationParams),
    responses(
        (status = 200, description = "One page of posts", body = ListResponse<PostModel>),
        (status = 400, description = "Malformed page or limit", body = ErrorResponse)
    ),
    tag = "Posts"
)]
pub async fn list_posts(
    State(state): State<AppState>,
    params: Result<Query<PaginationParams>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Query(params) = params?;
    let posts = state.services.posts.list(params.page_request()).await?;
    Ok(list_response(posts))
}

#[utoipa::path(
    get,
    path = "/api/posts/{id}",
    params(("id" = String, Path, description = "Post id")),
    responses(
        (status = 200, description = "Post found", body = DataResponse<PostModel>),
        (status = 404, description = "No such post", body = ErrorResponse)
    ),
    tag = "Posts"
)]
pub async fn get_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&id, "post")?;
    let post = state.services.posts.find_by_id(id).await?;
    Ok(success_response(post))
}

#[utoipa::path(
    patch,
    path = "/api/posts/{id}",
    params(("id" = String, Path, description = "Post id")),
    request_body = UpdatePostInput,
    responses(
        (status = 200, description = "Post updated", body = DataResponse<PostModel>),
        (status = 404, description = "No such post", body = ErrorResponse),
        (status = 409, description = "Title already taken", body = ErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "Posts"
)]
pub async fn update_post(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<String>,
    payload: Result<Json<UpdatePostInput>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&id, "post")?;
    let Json(input) = payload?;
    let post = state.services.posts.update(id, input).await?;
    Ok(success_response(post))
}

#[utoipa::path(
    delete,
    path = "/api/posts/{id}",
    params(("id" = String, Path, description = "Post id")),
    responses(
        (status = 204, description = "Post deleted"),
        (status = 404, description = "No such post", body = ErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "Posts"
)]
pub async fn delete_post(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&id, "post")?;
    state.services.posts.delete(id).await?;
    Ok(no_content_response())
}

pub fn post_routes() -> Router<AppState> {
    let public = Router::new()
        .route("/", get(list_posts))
        .route("/:id", get(get_post));

    let protected = Router::new()
        .route("/", post(create_post))
        .route("/:id", patch(update_post).delete(delete_post))
        .with_auth();

    public.merge(protected)
}
