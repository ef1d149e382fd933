//! Request dispatch.
//!
//! # Responsibilities
//! - Find the first route whose pattern matches the request path
//! - Extract captures and convert `int` captures to integers
//! - Invoke the matched handler, the landing page, or the not-found handler
//!
//! # Design Decisions
//! - First match wins, in registry order
//! - Each request works against one registry snapshot
//! - A capture that fails to convert is attached to the request; the handler still runs
//! - A capture group that took no part in the match reads as the empty string

use std::fmt::Write;
use std::sync::Arc;
use std::time::Instant;

use crate::observability::metrics;
use crate::routing::captures::{CaptureValue, Captures};
use crate::routing::error::CoercionError;
use crate::routing::fallback::{landing_page, FallbackSlot};
use crate::routing::handler::{HandlerRef, RequestContext, ResponseBuffer};
use crate::routing::pattern::{CaptureKind, CompiledPattern};
use crate::routing::registry::{Route, RouteRegistry};

/// Result of matching a path against the route table.
#[derive(Debug)]
pub enum DispatchOutcome {
    /// The table is empty; the built-in landing page answers.
    DefaultPage,
    /// A route matched.
    Matched(RouteMatch),
    /// Routes exist but none matched.
    NoMatch,
}

impl DispatchOutcome {
    pub fn route_name(&self) -> Option<&str> {
        match self {
            DispatchOutcome::Matched(m) => Some(m.route.name()),
            _ => None,
        }
    }
}

/// The matched route and the captures taken from the path.
#[derive(Debug, Clone)]
pub struct RouteMatch {
    route: Arc<Route>,
    captures: Captures,
}

impl RouteMatch {
    pub fn route(&self) -> &Arc<Route> {
        &self.route
    }

    pub fn captures(&self) -> &Captures {
        &self.captures
    }

    pub fn handler(&self) -> &HandlerRef {
        self.route.handler()
    }
}

/// Match `path` against one pattern and pull out typed captures.
pub fn extract(pattern: &CompiledPattern, path: &str) -> Option<Captures> {
    let found = pattern.regex().captures(path)?;
    let mut captures = Captures::new();

    for (name, kind) in pattern.captures() {
        let raw = found.name(name).map(|m| m.as_str()).unwrap_or("");
        let value = match kind {
            CaptureKind::Integer => match raw.parse::<i64>() {
                Ok(n) => CaptureValue::Int(n),
                Err(source) => CaptureValue::Failed(CoercionError::IntegerParseFailure {
                    name: name.clone(),
                    raw: raw.to_string(),
                    source,
                }),
            },
            CaptureKind::StringAlpha | CaptureKind::AlphaNumeric | CaptureKind::Any => {
                CaptureValue::Str(raw.to_string())
            }
        };
        captures.push(name.clone(), value);
    }

    Some(captures)
}

/// Dispatches request paths through a [`RouteRegistry`].
pub struct Dispatcher {
    registry: Arc<RouteRegistry>,
    not_found: FallbackSlot,
}

impl Dispatcher {
    pub fn new(registry: Arc<RouteRegistry>) -> Self {
        Self {
            registry,
            not_found: FallbackSlot::new(),
        }
    }

    pub fn registry(&self) -> &Arc<RouteRegistry> {
        &self.registry
    }

    pub fn not_found_handler(&self) -> HandlerRef {
        self.not_found.get()
    }

    pub fn set_not_found_handler(&self, handler: HandlerRef) {
        self.not_found.set(handler);
    }

    pub fn reset_not_found_handler(&self) {
        self.not_found.reset();
    }

    /// Match `path` without invoking anything.
    pub fn dispatch(&self, path: &str) -> DispatchOutcome {
        let routes = self.registry.snapshot();
        if routes.is_empty() {
            return DispatchOutcome::DefaultPage;
        }

        for route in routes.iter() {
            if let Some(captures) = extract(route.pattern(), path) {
                return DispatchOutcome::Matched(RouteMatch {
                    route: Arc::clone(route),
                    captures,
                });
            }
        }

        DispatchOutcome::NoMatch
    }

    /// Dispatch a request and run whichever handler answers it.
    pub fn serve(&self, req: RequestContext) -> ResponseBuffer {
        let start = Instant::now();
        let outcome = self.dispatch(req.path());

        let (label, outcome_label, handler, req): (String, &str, HandlerRef, RequestContext) =
            match outcome {
                DispatchOutcome::DefaultPage => {
                    tracing::debug!(path = %req.path(), "Route table empty, serving landing page");
                    let landing: HandlerRef = Arc::new(landing_page);
                    ("none".into(), "default_page", landing, req)
                }
                DispatchOutcome::Matched(m) => {
                    let name = m.route.name().to_string();
                    tracing::debug!(
                        path = %req.path(),
                        route = %name,
                        captures = m.captures.len(),
                        "Route matched"
                    );
                    for err in m.captures.errors() {
                        tracing::debug!(route = %name, error = %err, "Capture coercion failed");
                    }
                    let handler = HandlerRef::clone(m.route.handler());
                    let req = req.with_match(&name, m.captures);
                    (name, "matched", handler, req)
                }
                DispatchOutcome::NoMatch => {
                    tracing::debug!(path = %req.path(), "No route matched");
                    ("none".into(), "not_found", self.not_found.get(), req)
                }
            };

        let mut res = ResponseBuffer::new();
        let outcome_label = match handler.handle(&mut res, &req) {
            Ok(()) => outcome_label,
            Err(err) => {
                tracing::warn!(path = %req.path(), route = %label, error = %err, "Handler failed");
                res = ResponseBuffer::new();
                res.set_status(err.status());
                res.set_content_type("text/plain; charset=utf-8");
                // Writing into a Vec-backed buffer cannot fail.
                let _ = res.write_str(&err.to_string());
                "handler_error"
            }
        };

        metrics::record_dispatch(&label, outcome_label, start);
        res
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("registry", &self.registry)
            .finish()
    }
}
