//! Runtime settings.
//!
//! Sources, later ones winning: built-in defaults, `config/default.toml`,
//! `config/{RUN_ENV}.toml`, then `APP__*` environment variables
//! (`APP__JWT_SECRET`, `APP__DATABASE_URL`, ...). The JWT secret has no
//! default and must be supplied.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::collections::HashSet;
use std::env;
use std::path::Path;
use thiserror::Error;
use tracing::{error, info, warn};
use validator::{Validate, ValidationError, ValidationErrors};

use crate::db::StoreBackend;

const CONFIG_DIR: &str = "config";
const DEFAULT_RUN_ENV: &str = "development";
const DEFAULT_PORT: u16 = 8000;
const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_CORS_ORIGINS: &str = "http://localhost:3000,http://localhost:5000";
const DEFAULT_WELCOME_MESSAGE: &str = "Welcome to the storefront API";
const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

#[derive(Clone, Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    #[validate(custom = "validate_database_url")]
    pub database_url: String,

    /// Cache used only by the liveness probe
    #[validate(custom = "validate_redis_url")]
    pub redis_url: String,

    #[validate(custom = "validate_jwt_secret")]
    pub jwt_secret: String,

    /// Access token lifetime, seconds
    #[validate(range(min = 60, max = 86400))]
    pub jwt_expiration: u64,

    /// Refresh token lifetime, seconds
    #[validate(range(min = 3600, max = 2592000))]
    pub refresh_token_expiration: u64,

    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    pub environment: String,

    #[serde(default = "default_log_level")]
    #[validate(custom = "validate_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub log_json: bool,

    /// Provision collections and indexes at startup
    #[serde(default)]
    pub auto_migrate: bool,

    /// Comma-separated
    #[serde(default = "default_cors_origins")]
    pub cors_allowed_origins: Option<String>,

    #[serde(default = "default_true")]
    pub cors_allow_credentials: bool,

    #[serde(default = "default_max_connections")]
    #[validate(range(min = 1))]
    pub db_max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub db_min_connections: u32,
    #[serde(default = "default_connect_timeout")]
    pub db_connect_timeout_secs: u64,
    #[serde(default = "default_idle_timeout")]
    pub db_idle_timeout_secs: u64,
    #[serde(default = "default_acquire_timeout")]
    pub db_acquire_timeout_secs: u64,

    #[serde(default = "default_issuer")]
    pub auth_issuer: String,
    #[serde(default = "default_audience")]
    pub auth_audience: String,

    /// Seeded into the cache under `welcome` by the liveness probe
    #[serde(default = "default_welcome_message")]
    #[validate(length(min = 1))]
    pub welcome_message: String,
}

impl AppConfig {
    /// Builds a config from the required settings; everything else takes its default
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        database_url: String,
        redis_url: String,
        jwt_secret: String,
        jwt_expiration: u64,
        refresh_token_expiration: u64,
        host: String,
        port: u16,
        environment: String,
    ) -> Self {
        Self {
            database_url,
            redis_url,
            jwt_secret,
            jwt_expiration,
            refresh_token_expiration,
            host,
            port,
            environment,
            log_level: default_log_level(),
            log_json: false,
            auto_migrate: false,
            cors_allowed_origins: default_cors_origins(),
            cors_allow_credentials: true,
            db_max_connections: default_max_connections(),
            db_min_connections: default_min_connections(),
            db_connect_timeout_secs: default_connect_timeout(),
            db_idle_timeout_secs: default_idle_timeout(),
            db_acquire_timeout_secs: default_acquire_timeout(),
            auth_issuer: default_issuer(),
            auth_audience: default_audience(),
            welcome_message: default_welcome_message(),
        }
    }

    pub fn log_level(&self) -> &str {
        &self.log_level
    }

    pub fn is_production(&self) -> bool {
        self.environment.eq_ignore_ascii_case("production")
    }

    /// Configured CORS origins, trimmed, blanks dropped
    pub fn cors_origins(&self) -> Vec<String> {
        let Some(raw) = self.cors_allowed_origins.as_deref() else {
            return Vec::new();
        };
        raw.split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(String::from)
            .collect()
    }

    /// Rules that span more than one field
    fn check_cross_field(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if self.is_production() && self.cors_origins().is_empty() {
            errors.add(
                "cors_allowed_origins",
                invalid("cors_allowed_origins", "production needs at least one CORS origin"),
            );
        }
        if self.db_min_connections > self.db_max_connections {
            errors.add(
                "db_min_connections",
                invalid("db_min_connections", "db_min_connections exceeds db_max_connections"),
            );
        }
        if self.refresh_token_expiration <= self.jwt_expiration {
            errors.add(
                "refresh_token_expiration",
                invalid(
                    "refresh_token_expiration",
                    "refresh tokens must outlive access tokens",
                ),
            );
        }

        if errors.errors().is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[derive(Debug, Error)]
pub enum AppConfigError {
    #[error("Configuration loading failed: {0}")]
    Load(#[from] ConfigError),

    #[error("Configuration validation failed: {0}")]
    Validation(#[from] ValidationErrors),
}

fn default_port() -> u16 {
    DEFAULT_PORT
}
fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}
fn default_cors_origins() -> Option<String> {
    Some(DEFAULT_CORS_ORIGINS.to_string())
}
fn default_true() -> bool {
    true
}
fn default_max_connections() -> u32 {
    10
}
fn default_min_connections() -> u32 {
    1
}
fn default_connect_timeout() -> u64 {
    30
}
fn default_idle_timeout() -> u64 {
    600
}
fn default_acquire_timeout() -> u64 {
    8
}
fn default_issuer() -> String {
    "storefront-auth".to_string()
}
fn default_audience() -> String {
    "storefront-api".to_string()
}
fn default_welcome_message() -> String {
    DEFAULT_WELCOME_MESSAGE.to_string()
}

fn invalid(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(message.into());
    err
}

fn validate_database_url(url: &str) -> Result<(), ValidationError> {
    StoreBackend::from_url(url)
        .map(|_| ())
        .ok_or_else(|| invalid("database_url", "database_url must be postgres:// or sqlite://"))
}

fn validate_redis_url(url: &str) -> Result<(), ValidationError> {
    if url.starts_with("redis://") || url.starts_with("rediss://") {
        Ok(())
    } else {
        Err(invalid("redis_url", "redis_url must be redis:// or rediss://"))
    }
}

fn validate_log_level(level: &str) -> Result<(), ValidationError> {
    if LOG_LEVELS.contains(&level.to_ascii_lowercase().as_str()) {
        Ok(())
    } else {
        Err(invalid("log_level", "log_level must be trace, debug, info, warn or error"))
    }
}

/// At least 32 characters drawn from at least 10 distinct ones, and not a known placeholder
fn validate_jwt_secret(secret: &str) -> Result<(), ValidationError> {
    const PLACEHOLDERS: [&str; 4] = [
        "secret",
        "changeme",
        "your-secret-key",
        "storefront-secret",
    ];

    let secret = secret.trim();
    if secret.len() < 32 {
        return Err(invalid("jwt_secret", "jwt_secret needs at least 32 characters"));
    }
    if PLACEHOLDERS.iter().any(|p| secret.eq_ignore_ascii_case(p)) {
        return Err(invalid("jwt_secret", "jwt_secret is a placeholder value"));
    }
    if secret.chars().collect::<HashSet<_>>().len() < 10 {
        return Err(invalid("jwt_secret", "jwt_secret is not random enough"));
    }
    Ok(())
}

/// Installs the global subscriber. `RUST_LOG` overrides `level` when set.
pub fn init_tracing(level: &str, json: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let directives = env::var("RUST_LOG")
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| format!("storefront_api={level},tower_http={level}"));

    let builder = fmt().with_env_filter(EnvFilter::new(directives));
    // A subscriber may already be set, e.g. in tests
    let _ = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
}

pub fn load_config() -> Result<AppConfig, AppConfigError> {
    load_config_from(CONFIG_DIR)
}

pub fn load_config_from(config_dir: &str) -> Result<AppConfig, AppConfigError> {
    let run_env = env::var("RUN_ENV").unwrap_or_else(|_| DEFAULT_RUN_ENV.to_string());
    if !Path::new(config_dir).is_dir() {
        warn!(config_dir, "no config directory; using defaults and APP__* variables");
    }

    let settings = Config::builder()
        .set_default("database_url", "sqlite://storefront.db?mode=rwc")?
        .set_default("redis_url", "redis://localhost:6379")?
        .set_default("jwt_expiration", 900)?
        .set_default("refresh_token_expiration", 604800)?
        .set_default("host", "0.0.0.0")?
        .set_default("port", i64::from(DEFAULT_PORT))?
        .set_default("environment", run_env.as_str())?
        .add_source(File::with_name(&format!("{config_dir}/default")).required(false))
        .add_source(File::with_name(&format!("{config_dir}/{run_env}")).required(false))
        .add_source(Environment::with_prefix("APP").separator("__"))
        .build()?;

    if settings.get_string("jwt_secret").is_err() {
        error!("APP__JWT_SECRET is not set");
        return Err(ConfigError::NotFound("jwt_secret".into()).into());
    }

    let cfg: AppConfig = settings.try_deserialize()?;
    cfg.validate()
        .and_then(|()| cfg.check_cross_field())
        .map_err(|e| {
            error!("invalid configuration: {}", e);
            AppConfigError::Validation(e)
        })?;

    info!(environment = %cfg.environment, "configuration loaded");
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const SECRET: &str = "storefront_unit_test_secret_9f3k2m1x8q7w";

    fn production() -> AppConfig {
        AppConfig::new(
            "postgres://shop:shop@db/storefront".into(),
            "redis://cache:6379".into(),
            SECRET.into(),
            900,
            86_400,
            "0.0.0.0".into(),
            8000,
            "production".into(),
        )
    }

    fn field_errors(cfg: &AppConfig) -> Vec<&'static str> {
        let mut fields: Vec<_> = match cfg.validate() {
            Ok(()) => Vec::new(),
            Err(e) => e.field_errors().into_keys().collect(),
        };
        fields.sort_unstable();
        fields
    }

    #[test]
    fn production_defaults_pass() {
        let cfg = production();
        assert!(field_errors(&cfg).is_empty());
        assert!(cfg.check_cross_field().is_ok());
    }

    #[rstest]
    #[case("short")]
    #[case("changeme")]
    #[case("abababababababababababababababababababab")]
    fn weak_secrets_are_rejected(#[case] secret: &str) {
        assert!(validate_jwt_secret(secret).is_err());
    }

    #[test]
    fn url_schemes_are_checked() {
        let mut cfg = production();
        cfg.database_url = "mysql://db/storefront".into();
        cfg.redis_url = "http://cache".into();
        assert_eq!(field_errors(&cfg), ["database_url", "redis_url"]);
    }

    #[test]
    fn token_lifetimes_are_bounded() {
        let mut cfg = production();
        cfg.jwt_expiration = 5;
        cfg.refresh_token_expiration = 10;
        assert_eq!(
            field_errors(&cfg),
            ["jwt_expiration", "refresh_token_expiration"]
        );
    }

    #[test]
    fn refresh_must_outlive_access() {
        let mut cfg = production();
        cfg.jwt_expiration = 7200;
        cfg.refresh_token_expiration = 3600;
        assert!(cfg.check_cross_field().is_err());
    }

    #[test]
    fn production_requires_cors_origins() {
        let mut cfg = production();
        cfg.cors_allowed_origins = Some(" , ".into());
        assert!(cfg.check_cross_field().is_err());

        cfg.environment = "development".into();
        assert!(cfg.check_cross_field().is_ok());
    }

    #[test]
    fn cors_origins_are_trimmed() {
        let mut cfg = production();
        cfg.cors_allowed_origins = Some("http://a.test , ,http://b.test".into());
        assert_eq!(cfg.cors_origins(), ["http://a.test", "http://b.test"]);
    }

    #[test]
    fn empty_welcome_message_is_rejected() {
        let mut cfg = production();
        cfg.welcome_message.clear();
        assert_eq!(field_errors(&cfg), ["welcome_message"]);
    }
}
