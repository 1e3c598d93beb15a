use crate::errors::{ApiError, ServiceError};
use crate::repositories::PageRequest;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

const SUCCESS: &str = "success";

/// `{"status": "success", "data": ...}`
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DataResponse<T> {
    #[schema(example = "success")]
    pub status: String,
    pub data: T,
}

impl<T> DataResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            status: SUCCESS.to_string(),
            data,
        }
    }
}

/// `{"status": "success", "results": n, "data": [...]}`
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ListResponse<T> {
    #[schema(example = "success")]
    pub status: String,
    /// Number of records in `data`
    pub results: usize,
    pub data: Vec<T>,
}

impl<T> ListResponse<T> {
    pub fn new(data: Vec<T>) -> Self {
        Self {
            status: SUCCESS.to_string(),
            results: data.len(),
            data,
        }
    }
}

/// Standard success response
pub fn success_response<T: Serialize>(data: T) -> Response {
    (StatusCode::OK, Json(DataResponse::new(data))).into_response()
}

/// Standard created response
pub fn created_response<T: Serialize>(data: T) -> Response {
    (StatusCode::CREATED, Json(DataResponse::new(data))).into_response()
}

pub fn list_response<T: Serialize>(data: Vec<T>) -> Response {
    (StatusCode::OK, Json(ListResponse::new(data))).into_response()
}

/// Standard no content response
pub fn no_content_response() -> Response {
    StatusCode::NO_CONTENT.into_response()
}

/// Path ids that are not UUIDs cannot name a stored record, so they are reported as absent
pub fn parse_id(raw: &str, resource: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw.trim()).map_err(|_| ApiError::ServiceError(ServiceError::not_found(resource)))
}

/// Pagination parameters for list operations. Missing or non-positive values use page 1 / limit 10.
#[derive(Debug, Default, Deserialize, Serialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PaginationParams {
    #[param(example = 1)]
    pub page: Option<i64>,
    #[param(example = 10)]
    pub limit: Option<i64>,
}

impl PaginationParams {
    pub fn page_request(&self) -> PageRequest {
        PageRequest::new(self.page, self.limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn malformed_ids_read_as_not_found() {
        let err = parse_id("not-a-uuid", "brand").unwrap_err();
        assert_matches!(err, ApiError::ServiceError(ServiceError::NotFound(ref msg)) if msg == "no brand with that Id exists");
    }

    #[test]
    fn list_envelope_counts_results() {
        let body = serde_json::to_value(ListResponse::new(vec!["a", "b"])).unwrap();
        assert_eq!(body["status"], "success");
        assert_eq!(body["results"], 2);
        assert_eq!(body["data"], serde_json::json!(["a", "b"]));
    }

    #[test]
    fn pagination_defaults_apply() {
        let params = PaginationParams::default();
        assert_eq!(params.page_request(), PageRequest::new(Some(1), Some(10)));
    }
}
