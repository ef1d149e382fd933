//! Handler capability and the request/response types it works with.
//!
//! # Responsibilities
//! - Define what the dispatcher may invoke (`Handler`)
//! - Carry request data plus typed captures to the handler (`RequestContext`)
//! - Collect the handler's output (`ResponseBuffer`)
//!
//! # Design Decisions
//! - Handlers are synchronous; the host server owns all I/O
//! - Any `Fn(&mut ResponseBuffer, &RequestContext) -> Result<(), HandlerError>` is a handler
//! - Handler errors become responses, they never abort the host

use std::fmt;
use std::sync::Arc;

use axum::body::Bytes;
use axum::http::{header, HeaderMap, HeaderValue, Method, StatusCode, Uri};
use thiserror::Error;

use crate::routing::captures::Captures;
use crate::routing::error::CoercionError;

/// Shared reference to a handler, as stored in routes and the fallback slot.
pub type HandlerRef = Arc<dyn Handler>;

/// Something that can answer a dispatched request.
pub trait Handler: Send + Sync + 'static {
    fn handle(&self, res: &mut ResponseBuffer, req: &RequestContext) -> Result<(), HandlerError>;
}

impl<F> Handler for F
where
    F: Fn(&mut ResponseBuffer, &RequestContext) -> Result<(), HandlerError> + Send + Sync + 'static,
{
    fn handle(&self, res: &mut ResponseBuffer, req: &RequestContext) -> Result<(), HandlerError> {
        self(res, req)
    }
}

/// Wrap a function or closure as a [`HandlerRef`].
pub fn handler<F>(f: F) -> HandlerRef
where
    F: Fn(&mut ResponseBuffer, &RequestContext) -> Result<(), HandlerError> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Errors a handler may signal instead of writing a response.
#[derive(Debug, Clone, Error)]
pub enum HandlerError {
    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl HandlerError {
    /// HTTP status the host should answer with.
    pub fn status(&self) -> StatusCode {
        match self {
            HandlerError::BadRequest(_) => StatusCode::BAD_REQUEST,
            HandlerError::NotFound(_) => StatusCode::NOT_FOUND,
            HandlerError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<CoercionError> for HandlerError {
    fn from(err: CoercionError) -> Self {
        HandlerError::BadRequest(err.to_string())
    }
}

impl From<fmt::Error> for HandlerError {
    fn from(err: fmt::Error) -> Self {
        HandlerError::Internal(err.to_string())
    }
}

/// Response sink handed to handlers.
///
/// Starts as an empty `200 OK`. Implements [`fmt::Write`], so `write!` appends to the body.
#[derive(Debug, Clone)]
pub struct ResponseBuffer {
    status: StatusCode,
    headers: HeaderMap,
    body: Vec<u8>,
}

impl ResponseBuffer {
    pub fn new() -> Self {
        Self {
            status: StatusCode::OK,
            headers: HeaderMap::new(),
            body: Vec::new(),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn set_status(&mut self, status: StatusCode) {
        self.status = status;
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    /// Set the `Content-Type` header. Values that are not valid header text are ignored.
    pub fn set_content_type(&mut self, content_type: &str) {
        if let Ok(value) = HeaderValue::from_str(content_type) {
            self.headers.insert(header::CONTENT_TYPE, value);
        }
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.body.extend_from_slice(bytes);
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Body as text, for logging and tests.
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn into_parts(self) -> (StatusCode, HeaderMap, Vec<u8>) {
        (self.status, self.headers, self.body)
    }
}

impl Default for ResponseBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Write for ResponseBuffer {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.body.extend_from_slice(s.as_bytes());
        Ok(())
    }
}

/// Request data visible to a handler.
#[derive(Debug, Clone)]
pub struct RequestContext {
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
    route: Option<String>,
    captures: Captures,
}

impl RequestContext {
    pub fn new(method: Method, uri: Uri, headers: HeaderMap, body: Bytes) -> Self {
        Self {
            method,
            uri,
            headers,
            body,
            route: None,
            captures: Captures::new(),
        }
    }

    /// A bodiless `GET` for the given path. Unparseable paths fall back to `/`.
    pub fn get(path: &str) -> Self {
        let uri = path.parse().unwrap_or_default();
        Self::new(Method::GET, uri, HeaderMap::new(), Bytes::new())
    }

    pub(crate) fn with_match(mut self, route: &str, captures: Captures) -> Self {
        self.route = Some(route.to_string());
        self.captures = captures;
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    /// Escaped request path, as matched against route patterns.
    pub fn path(&self) -> &str {
        self.uri.path()
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Name of the route that matched, if any.
    pub fn route(&self) -> Option<&str> {
        self.route.as_deref()
    }

    pub fn captures(&self) -> &Captures {
        &self.captures
    }

    /// Look up a form value.
    ///
    /// An `application/x-www-form-urlencoded` body takes precedence over the query string.
    pub fn form_value(&self, key: &str) -> Option<String> {
        if self.has_form_body() {
            if let Some(value) = find_pair(&self.body, key) {
                return Some(value);
            }
        }
        self.uri
            .query()
            .and_then(|query| find_pair(query.as_bytes(), key))
    }

    fn has_form_body(&self) -> bool {
        self.headers
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.starts_with("application/x-www-form-urlencoded"))
            .unwrap_or(false)
    }
}

fn find_pair(input: &[u8], key: &str) -> Option<String> {
    url::form_urlencoded::parse(input)
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.into_owned())
}
