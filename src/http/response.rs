//! Conversion of handler output into HTTP responses.

use axum::body::Body;
use axum::response::{IntoResponse, Response};

use crate::routing::ResponseBuffer;

impl IntoResponse for ResponseBuffer {
    fn into_response(self) -> Response {
        let (status, headers, body) = self.into_parts();
        let mut response = Response::new(Body::from(body));
        *response.status_mut() = status;
        response.headers_mut().extend(headers);
        response
    }
}
