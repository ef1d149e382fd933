//! Typed path-template router.
//!
//! Compiles templates such as `/<all:user>/posts/<int:id>$` into patterns, keeps them in an
//! ordered, uniquely named route table and dispatches request paths to the first matching
//! route with typed captures.
//!
//! ```
//! use std::fmt::Write;
//! use std::sync::Arc;
//! use typed_router::routing::{handler, Dispatcher, RequestContext, RouteRegistry};
//!
//! let dispatcher = Dispatcher::new(Arc::new(RouteRegistry::new()));
//! dispatcher
//!     .registry()
//!     .add("/<all:user>/posts/<int:id>$", "post", handler(|res, req| {
//!         let user = req.captures().str("user").unwrap_or_default();
//!         let id = req.captures().int("id")?.unwrap_or_default();
//!         write!(res, "{} {}", user, id)?;
//!         Ok(())
//!     }))
//!     .unwrap();
//!
//! let res = dispatcher.serve(RequestContext::get("/aki/posts/898"));
//! assert_eq!(res.body_text(), "aki 898");
//! ```

// Core
pub mod routing;

// Hosting
pub mod admin;
pub mod config;
pub mod http;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;

pub use config::RouterConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use routing::{Dispatcher, RouteRegistry};
