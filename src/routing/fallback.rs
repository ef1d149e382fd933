//! Not-found handler slot and the built-in landing page.

use std::fmt::Write;
use std::sync::Arc;

use arc_swap::ArcSwap;
use axum::http::StatusCode;

use crate::routing::handler::{HandlerError, HandlerRef, RequestContext, ResponseBuffer};

/// Default not-found responder: `404 Page not found`.
pub fn default_not_found(res: &mut ResponseBuffer, _req: &RequestContext) -> Result<(), HandlerError> {
    res.set_status(StatusCode::NOT_FOUND);
    res.set_content_type("text/plain; charset=utf-8");
    res.write_str("Page not found")?;
    Ok(())
}

const LANDING_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>typed-router is running</title>
</head>
<body>
<h1>typed-router is running</h1>
<p>No routes are registered yet. Add routes to the configuration file or register them
through the library API, and this page will be replaced by your handlers.</p>
</body>
</html>
"#;

/// Page served while the route table is empty.
pub fn landing_page(res: &mut ResponseBuffer, _req: &RequestContext) -> Result<(), HandlerError> {
    res.set_content_type("text/html; charset=utf-8");
    res.write_str(LANDING_PAGE)?;
    Ok(())
}

/// Holds the single active not-found handler.
///
/// Replacement takes effect for every dispatch that starts afterwards.
pub struct FallbackSlot {
    handler: ArcSwap<HandlerRef>,
}

impl FallbackSlot {
    pub fn new() -> Self {
        Self::with_handler(Arc::new(default_not_found))
    }

    pub fn with_handler(handler: HandlerRef) -> Self {
        Self {
            handler: ArcSwap::from_pointee(handler),
        }
    }

    pub fn get(&self) -> HandlerRef {
        HandlerRef::clone(&self.handler.load())
    }

    pub fn set(&self, handler: HandlerRef) {
        self.handler.store(Arc::new(handler));
        tracing::debug!("Not-found handler replaced");
    }

    /// Put the built-in responder back.
    pub fn reset(&self) {
        self.set(Arc::new(default_not_found));
    }
}

impl Default for FallbackSlot {
    fn default() -> Self {
        Self::new()
    }
}
