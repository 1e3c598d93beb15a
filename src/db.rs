//! Store connection and schema provisioning.

use crate::config::AppConfig;
use crate::errors::ServiceError;
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use sea_orm_migration::MigratorTrait;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

pub type DbPool = DatabaseConnection;

/// Backends the migrations are written for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    Sqlite,
}

impl StoreBackend {
    pub fn from_url(url: &str) -> Option<Self> {
        let scheme = url.split_once(':')?.0.to_ascii_lowercase();
        match scheme.as_str() {
            "postgres" | "postgresql" => Some(Self::Postgres),
            "sqlite" => Some(Self::Sqlite),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Postgres => "postgres",
            Self::Sqlite => "sqlite",
        }
    }
}

/// Pool tuning, taken from [`AppConfig`]
#[derive(Debug, Clone)]
pub struct PoolSettings {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout: Duration,
    pub idle_timeout: Duration,
    pub acquire_timeout: Duration,
}

impl From<&AppConfig> for PoolSettings {
    fn from(cfg: &AppConfig) -> Self {
        Self {
            url: cfg.database_url.clone(),
            max_connections: cfg.db_max_connections,
            min_connections: cfg.db_min_connections,
            connect_timeout: Duration::from_secs(cfg.db_connect_timeout_secs),
            idle_timeout: Duration::from_secs(cfg.db_idle_timeout_secs),
            acquire_timeout: Duration::from_secs(cfg.db_acquire_timeout_secs),
        }
    }
}

impl PoolSettings {
    fn connect_options(&self, backend: StoreBackend) -> ConnectOptions {
        let mut opt = ConnectOptions::new(self.url.clone());

        // A sqlite file serialises writers; extra connections only queue on the lock
        let max = match backend {
            StoreBackend::Sqlite if self.max_connections > 1 => {
                debug!(requested = self.max_connections, "capping sqlite pool to one writer");
                1
            }
            _ => self.max_connections,
        };

        opt.max_connections(max)
            .min_connections(self.min_connections.min(max))
            .connect_timeout(self.connect_timeout)
            .acquire_timeout(self.acquire_timeout)
            .idle_timeout(self.idle_timeout)
            .sqlx_logging(false);
        opt
    }
}

/// Opens the pool described by `settings`
pub async fn connect(settings: &PoolSettings) -> Result<DbPool, ServiceError> {
    let backend = StoreBackend::from_url(&settings.url).ok_or_else(|| {
        error!("database_url must use a postgres:// or sqlite:// scheme");
        ServiceError::DatabaseError(DbErr::Custom("unsupported database url scheme".to_string()))
    })?;

    let pool = Database::connect(settings.connect_options(backend))
        .await
        .map_err(|e| {
            error!(backend = backend.name(), "could not open the store: {}", e);
            ServiceError::DatabaseError(e)
        })?;

    info!(backend = backend.name(), "store connection pool ready");
    Ok(pool)
}

pub async fn establish_connection_from_app_config(cfg: &AppConfig) -> Result<DbPool, ServiceError> {
    connect(&PoolSettings::from(cfg)).await
}

/// Creates every collection and its indexes. Safe to run on every start.
pub async fn run_migrations(pool: &DbPool) -> Result<(), ServiceError> {
    let started = Instant::now();

    match crate::migrator::Migrator::up(pool, None).await {
        Ok(()) => {
            info!(elapsed = ?started.elapsed(), "collections and indexes provisioned");
            Ok(())
        }
        Err(e) => {
            error!(elapsed = ?started.elapsed(), "index provisioning failed: {}", e);
            Err(ServiceError::DatabaseError(e))
        }
    }
}

/// Round-trips a ping to the store
pub async fn check_connection(pool: &DbPool) -> Result<(), ServiceError> {
    let started = Instant::now();
    pool.ping().await.map_err(|e| {
        warn!(elapsed = ?started.elapsed(), "store ping failed: {}", e);
        ServiceError::DatabaseError(e)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("postgres://u:p@localhost/shop", Some(StoreBackend::Postgres))]
    #[case("postgresql://localhost/shop", Some(StoreBackend::Postgres))]
    #[case("sqlite://storefront.db?mode=rwc", Some(StoreBackend::Sqlite))]
    #[case("mongodb://localhost:27017", None)]
    #[case("storefront.db", None)]
    fn backend_follows_url_scheme(#[case] url: &str, #[case] expected: Option<StoreBackend>) {
        assert_eq!(StoreBackend::from_url(url), expected);
    }

    #[tokio::test]
    async fn unsupported_scheme_is_a_storage_error() {
        let settings = PoolSettings {
            url: "mysql://localhost/shop".to_string(),
            max_connections: 2,
            min_connections: 1,
            connect_timeout: Duration::from_secs(1),
            idle_timeout: Duration::from_secs(1),
            acquire_timeout: Duration::from_secs(1),
        };
        let err = connect(&settings).await.unwrap_err();
        assert_eq!(err.kind(), crate::errors::ErrorKind::Storage);
    }
}
