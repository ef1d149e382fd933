//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Registration:
//!     template "/<all:user>/<int:id>$"
//!     → pattern.rs (placeholders → named capture groups, compiled regex)
//!     → registry.rs (unique name, appended in order, snapshot published)
//!
//! Dispatch (per request):
//!     escaped request path
//!     → dispatcher.rs (load snapshot, first matching route wins)
//!     → captures.rs (typed values, coercion failures attached)
//!     → handler.rs (matched handler, landing page, or fallback.rs not-found slot)
//!     → ResponseBuffer
//! ```
//!
//! # Design Decisions
//! - First match wins; registration order is dispatch priority
//! - Routes are never mutated in place; the registry publishes new snapshots
//! - Compile and registry errors go back to the caller, coercion errors go to the handler

pub mod app;
pub mod captures;
pub mod dispatcher;
pub mod error;
pub mod fallback;
pub mod handler;
pub mod pattern;
pub mod registry;
pub mod responder;

pub use app::{RouteGroup, RouteSpec};
pub use captures::{CaptureValue, Captures};
pub use dispatcher::{DispatchOutcome, Dispatcher, RouteMatch};
pub use error::{CoercionError, CompileError, RegistryError};
pub use fallback::FallbackSlot;
pub use handler::{handler, Handler, HandlerError, HandlerRef, RequestContext, ResponseBuffer};
pub use pattern::{compile, CaptureKind, CompiledPattern};
pub use registry::{Route, RouteRegistry};
pub use responder::TemplateResponder;
