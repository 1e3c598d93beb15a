/*!
 * # Liveness probe
 *
 * `GET /api/healthchecker` checks both external collaborators:
 *
 * - the SQL store, via a connection ping
 * - the cache, by reading the `welcome` key and seeding it on first contact
 *
 * Either one being unreachable turns the response into a 503.
 */

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use redis::AsyncCommands;
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{error, info};
use utoipa::ToSchema;

use crate::AppState;

/// Key holding the cached welcome message
pub const WELCOME_KEY: &str = "welcome";

const CACHE_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Up,
    Down,
}

#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct HealthChecks {
    pub database: HealthStatus,
    pub cache: HealthStatus,
}

#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct HealthResponse {
    /// "success" when every check is up, "fail" otherwise
    pub status: String,
    pub message: String,
    pub checks: HealthChecks,
}

async fn check_database(db: &DatabaseConnection) -> HealthStatus {
    match crate::db::check_connection(db).await {
        Ok(()) => HealthStatus::Up,
        Err(_) => HealthStatus::Down,
    }
}

/// Returns the cached welcome message, seeding it when the key is absent
async fn welcome_from_cache(client: &redis::Client, seed: &str) -> redis::RedisResult<String> {
    let mut con = client.get_async_connection().await?;

    let cached: Option<String> = con.get(WELCOME_KEY).await?;
    if let Some(message) = cached {
        return Ok(message);
    }

    con.set::<_, _, ()>(WELCOME_KEY, seed).await?;
    Ok(seed.to_string())
}

async fn check_cache(client: &redis::Client, seed: &str) -> Result<String, String> {
    match tokio::time::timeout(CACHE_TIMEOUT, welcome_from_cache(client, seed)).await {
        Ok(Ok(message)) => Ok(message),
        Ok(Err(e)) => {
            error!("Cache health check failed: {}", e);
            Err(e.to_string())
        }
        Err(_) => {
            error!("Cache health check timed out after {:?}", CACHE_TIMEOUT);
            Err("cache timed out".to_string())
        }
    }
}

/// Liveness probe over the store and the cache
#[utoipa::path(
    get,
    path = "/api/healthchecker",
    responses(
        (status = 200, description = "Store and cache reachable", body = HealthResponse),
        (status = 503, description = "A dependency is down", body = HealthResponse)
    ),
    tag = "Health"
)]
pub async fn healthchecker(State(state): State<AppState>) -> impl IntoResponse {
    let database = check_database(&state.db).await;
    let cache = check_cache(&state.redis, &state.config.welcome_message).await;

    let (status_code, body) = match (database, cache) {
        (HealthStatus::Up, Ok(message)) => {
            info!("Health check passed");
            (
                StatusCode::OK,
                HealthResponse {
                    status: "success".to_string(),
                    message,
                    checks: HealthChecks {
                        database,
                        cache: HealthStatus::Up,
                    },
                },
            )
        }
        (database, cache) => {
            let message = match (&database, &cache) {
                (HealthStatus::Down, Err(_)) => "database and cache unavailable",
                (HealthStatus::Down, Ok(_)) => "database unavailable",
                _ => "cache unavailable",
            };
            (
                StatusCode::SERVICE_UNAVAILABLE,
                HealthResponse {
                    status: "fail".to_string(),
                    message: message.to_string(),
                    checks: HealthChecks {
                        database,
                        cache: if cache.is_ok() {
                            HealthStatus::Up
                        } else {
                            HealthStatus::Down
                        },
                    },
                },
            )
        }
    };

    (status_code, Json(body))
}
