use super::common::{created_response, DataResponse};
use crate::{
    auth::{AuthRouterExt, AuthUser, TokenPair},
    entities::user::UserResponse,
    errors::{ApiError, ErrorResponse},
    services::user_service::{LoginInput, RegisterUserInput},
    AppState,
};
use axum::{
    extract::{rejection::JsonRejection, Json, State},
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;

/// Token pair inside the success envelope
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TokenResponse {
    #[schema(example = "success")]
    pub status: String,
    #[serde(flatten)]
    pub tokens: TokenPair,
}

impl TokenResponse {
    fn new(tokens: TokenPair) -> Self {
        Self {
            status: "success".to_string(),
            tokens,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    #[schema(example = "success")]
    pub status: String,
    pub message: String,
}

/// Register a new account
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterUserInput,
    responses(
        (status = 201, description = "Account created", body = DataResponse<UserResponse>),
        (status = 400, description = "Invalid registration data", body = ErrorResponse),
        (status = 409, description = "Email already registered", body = ErrorResponse)
    ),
    tag = "Auth"
)]
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterUserInput>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(input) = payload?;
    let user = state.services.users.register(input).await?;
    Ok(created_response(UserResponse::from(user)))
}

/// Exchange credentials for a token pair
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginInput,
    responses(
        (status = 200, description = "Logged in", body = TokenResponse),
        (status = 401, description = "Invalid email or password", body = ErrorResponse)
    ),
    tag = "Auth"
)]
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginInput>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(input) = payload?;
    let user = state.services.users.verify_credentials(input).await?;
    let tokens = state.auth.generate_token(user.id)?;

    info!(user_id = %user.id, "user logged in");
    Ok(Json(TokenResponse::new(tokens)))
}

/// Rotate a refresh token into a new pair
#[utoipa::path(
    post,
    path = "/api/auth/refresh",
    request_body = RefreshTokenRequest,
    responses(
        (status = 200, description = "New token pair", body = TokenResponse),
        (status = 401, description = "Refresh token invalid, expired or already used", body = ErrorResponse)
    ),
    tag = "Auth"
)]
pub async fn refresh(
    State(state): State<AppState>,
    payload: Result<Json<RefreshTokenRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(request) = payload?;
    let tokens = state.auth.refresh_token(&request.refresh_token).await?;
    Ok(Json(TokenResponse::new(tokens)))
}

/// Revoke the presented access token
#[utoipa::path(
    get,
    path = "/api/auth/logout",
    responses(
        (status = 200, description = "Logged out", body = MessageResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "Auth"
)]
pub async fn logout(State(state): State<AppState>, user: AuthUser) -> impl IntoResponse {
    state.auth.revoke(&user.token_id, user.expires_at).await;
    info!(user_id = %user.user_id, "user logged out");

    Json(MessageResponse {
        status: "success".to_string(),
        message: "logged out".to_string(),
    })
}

pub fn auth_routes() -> Router<AppState> {
    let protected = Router::new()
        .route("/logout", get(logout))
        .with_auth();

    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/refresh", post(refresh))
        .merge(protected)
}
