use crate::tracing::{with_request_id, RequestId};
use axum::{
    extract::Request,
    http::{header::HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Reuses a well-formed incoming `x-request-id` or mints one, then echoes it on the response.
pub async fn request_id_middleware(mut request: Request, next: Next) -> Response {
    let header = HeaderName::from_static(REQUEST_ID_HEADER);

    let request_id = request
        .headers()
        .get(&header)
        .and_then(RequestId::from_header)
        .unwrap_or_else(RequestId::generate);
    let echoed = HeaderValue::from_str(request_id.as_str()).ok();

    if let Some(value) = &echoed {
        request.headers_mut().insert(header.clone(), value.clone());
    }
    request.extensions_mut().insert(request_id.clone());

    let mut response = with_request_id(request_id, next.run(request)).await;

    if let Some(value) = echoed {
        response.headers_mut().insert(header, value);
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        extract::Extension,
        http::{Request as HttpRequest, StatusCode},
        routing::get,
        Router,
    };
    use tower::ServiceExt;

    async fn echo_id(Extension(request_id): Extension<RequestId>) -> (StatusCode, String) {
        let scoped = crate::tracing::current_request_id();
        assert_eq!(scoped.as_ref(), Some(&request_id));
        (StatusCode::OK, request_id.to_string())
    }

    fn app() -> Router {
        Router::new()
            .route("/", get(echo_id))
            .layer(axum::middleware::from_fn(request_id_middleware))
    }

    async fn send(request_id: Option<&str>) -> (Option<String>, String) {
        let mut builder = HttpRequest::builder().uri("/");
        if let Some(id) = request_id {
            builder = builder.header(REQUEST_ID_HEADER, id);
        }
        let response = app()
            .oneshot(builder.body(Body::empty()).unwrap())
            .await
            .unwrap();

        let header = response
            .headers()
            .get(REQUEST_ID_HEADER)
            .map(|v| v.to_str().unwrap().to_string());
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (header, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn fresh_id_is_minted_when_absent() {
        let (header, body) = send(None).await;
        assert_eq!(header.as_deref(), Some(body.as_str()));
        assert_eq!(body.len(), 32);
    }

    #[tokio::test]
    async fn upstream_id_is_kept() {
        let (header, body) = send(Some("lb-7f3a")).await;
        assert_eq!(header.as_deref(), Some("lb-7f3a"));
        assert_eq!(body, "lb-7f3a");
    }

    #[tokio::test]
    async fn unprintable_upstream_id_is_replaced() {
        let (header, body) = send(Some("two words")).await;
        assert_ne!(body, "two words");
        assert_eq!(header.as_deref(), Some(body.as_str()));
    }
}
