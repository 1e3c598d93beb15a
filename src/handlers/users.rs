use super::common::{success_response, DataResponse};
use crate::{
    auth::{AuthRouterExt, AuthUser},
    entities::user::UserResponse,
    errors::{ApiError, ErrorResponse},
    AppState,
};
use axum::{extract::State, response::IntoResponse, routing::get, Router};

/// Profile of the authenticated user
#[utoipa::path(
    get,
    path = "/api/users/me",
    responses(
        (status = 200, description = "Current user", body = DataResponse<UserResponse>),
        (status = 401, description = "Not authenticated", body = ErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "Users"
)]
pub async fn get_me(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<impl IntoResponse, ApiError> {
    let user = state.services.users.find_by_id(user.user_id).await?;
    Ok(success_response(UserResponse::from(user)))
}

pub fn user_routes() -> Router<AppState> {
    Router::new().route("/me", get(get_me)).with_auth()
}
