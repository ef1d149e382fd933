//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! routing (compile, register, dispatch)
//!     → logging.rs (structured events through `tracing`)
//!     → metrics.rs (counters, histogram, gauge through `metrics`)
//!
//! Consumers:
//!     → stdout (pretty or JSON)
//!     → Prometheus scrape endpoint (optional)
//! ```

pub mod logging;
pub mod metrics;
