//! Persistence gateways, one per collection.
//!
//! Gateways translate domain operations into store queries and classify
//! store failures: a unique-index violation becomes
//! [`ServiceError::AlreadyExists`], anything else a storage error unless a
//! gateway gives a foreign-key refusal its own meaning.

use chrono::{DateTime, SubsecRound, Utc};
use sea_orm::{DatabaseConnection, DbErr, SqlErr};
use std::sync::Arc;
use tracing::error;
use uuid::Uuid;

use crate::errors::ServiceError;

pub mod brand_repository;
pub mod category_repository;
pub mod post_repository;
pub mod product_repository;
pub mod review_repository;
pub mod user_repository;

pub use brand_repository::BrandRepository;
pub use category_repository::CategoryRepository;
pub use post_repository::PostRepository;
pub use product_repository::{ProductFacet, ProductFilter, ProductRepository};
pub use review_repository::ReviewRepository;
pub use user_repository::UserRepository;

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_LIMIT: u64 = 10;

/// Repository trait for common database operations
pub trait Repository {
    fn get_db(&self) -> &DatabaseConnection;
}

#[derive(Debug, Clone)]
pub struct BaseRepository {
    db: Arc<DatabaseConnection>,
}

impl BaseRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

impl Repository for BaseRepository {
    fn get_db(&self) -> &DatabaseConnection {
        &self.db
    }
}

/// Normalized page window. Non-positive inputs fall back to page 1 / limit 10.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub limit: u64,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl PageRequest {
    pub fn new(page: Option<i64>, limit: Option<i64>) -> Self {
        let page = match page {
            Some(p) if p > 0 => p as u64,
            _ => DEFAULT_PAGE,
        };
        let limit = match limit {
            Some(l) if l > 0 => l as u64,
            _ => DEFAULT_LIMIT,
        };
        Self { page, limit }
    }

    /// Zero-based offset `(page - 1) * limit`, or `None` when the window
    /// `offset + limit` does not fit a signed 64-bit bind. Such a page lies
    /// past any row the store can hold, so callers answer it with no rows.
    pub fn offset(&self) -> Option<u64> {
        let offset = (self.page - 1).checked_mul(self.limit)?;
        let end = offset.checked_add(self.limit)?;
        (end <= i64::MAX as u64).then_some(offset)
    }

    /// `ceil(total / limit)`; zero when nothing matched
    pub fn page_count(&self, total: u64) -> u64 {
        if total == 0 {
            0
        } else {
            (total + self.limit - 1) / self.limit
        }
    }
}

/// Timestamp used for `created_at`/`updated_at`, truncated to what every backend stores exactly.
pub fn timestamp_now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

/// Drops absent and empty values from a partial update.
pub fn changed_fields<C>(fields: Vec<(C, Option<String>)>) -> Vec<(C, String)> {
    fields
        .into_iter()
        .filter_map(|(column, value)| match value {
            Some(v) if !v.is_empty() => Some((column, v)),
            _ => None,
        })
        .collect()
}

/// Classifies a failed insert or update.
pub(crate) fn write_error(err: DbErr, resource: &str, unique_field: &str) -> ServiceError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => {
            ServiceError::already_exists(resource, unique_field)
        }
        _ => storage_error(err),
    }
}

/// True when the store refused a write because of a foreign key.
pub(crate) fn is_reference_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::ForeignKeyConstraintViolation(_)))
}

/// A row we just inserted must be readable; its absence is our fault, not the caller's.
pub(crate) fn read_back<T>(
    found: Result<T, ServiceError>,
    resource: &str,
    id: Uuid,
) -> Result<T, ServiceError> {
    found.map_err(|err| match err {
        ServiceError::NotFound(_) => {
            error!(%id, resource, "inserted row missing on read-back");
            ServiceError::InternalError(format!("inserted {} {} could not be read back", resource, id))
        }
        other => other,
    })
}

pub(crate) fn storage_error(err: DbErr) -> ServiceError {
    error!(error = %err, "storage operation failed");
    ServiceError::DatabaseError(err)
}
