//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks, every pattern compiled once)
//!     → RouterConfig (validated, immutable)
//!     → lifecycle::startup builds the route table from it
//!
//! On file change:
//!     watcher.rs detects change
//!     → loader.rs loads new config
//!     → validation.rs validates
//!     → update sent to the server, which swaps the route table in one step
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require full reload
//! - All fields have defaults to allow minimal configs
//! - An invalid reload is logged and ignored; the running table stays

pub mod loader;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{
    AdminConfig, GroupConfig, ListenerConfig, ObservabilityConfig, ResponderConfig, RouteConfig,
    RouterConfig,
};
pub use validation::{validate_config, ValidationError};
pub use watcher::ConfigWatcher;
