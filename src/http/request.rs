//! Request identification and conversion into dispatch requests.
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing (outermost layer)
//! - An ID supplied by the client is kept and echoed back
//! - The body is buffered up to the configured limit; handlers are synchronous

use axum::body::{to_bytes, Body};
use axum::http::{HeaderMap, HeaderName, Request};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};

use crate::routing::RequestContext;

/// Header carrying the request ID.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Layer assigning a UUID v4 request ID when the client did not send one.
pub fn set_request_id_layer() -> SetRequestIdLayer<MakeRequestUuid> {
    SetRequestIdLayer::new(HeaderName::from_static(X_REQUEST_ID), MakeRequestUuid)
}

/// Layer copying the request ID onto the response.
pub fn propagate_request_id_layer() -> PropagateRequestIdLayer {
    PropagateRequestIdLayer::new(HeaderName::from_static(X_REQUEST_ID))
}

/// Request ID of a request, or `unknown`.
pub fn request_id(headers: &HeaderMap) -> &str {
    headers
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
}

/// Buffer the body and build the context handed to the dispatcher.
pub async fn into_context(request: Request<Body>, max_body_bytes: usize) -> Result<RequestContext, axum::Error> {
    let (parts, body) = request.into_parts();
    let body = to_bytes(body, max_body_bytes).await?;
    Ok(RequestContext::new(parts.method, parts.uri, parts.headers, body))
}
