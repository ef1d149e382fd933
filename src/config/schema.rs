//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the router service.
//! All types derive Serde traits for deserialization from TOML files.

use serde::{Deserialize, Serialize};

/// Root configuration for the router service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RouterConfig {
    /// Listener configuration (bind address, limits).
    pub listener: ListenerConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Admin API settings.
    pub admin: AdminConfig,

    /// Response used when no route matches. `None` keeps the built-in responder.
    pub not_found: Option<ResponderConfig>,

    /// Top-level routes, in dispatch order.
    pub routes: Vec<RouteConfig>,

    /// Route groups, registered after the top-level routes.
    pub groups: Vec<GroupConfig>,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Total time allowed for one request.
    pub request_timeout_secs: u64,

    /// Largest request body accepted.
    pub max_body_bytes: usize,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            request_timeout_secs: 30,
            max_body_bytes: 2 * 1024 * 1024, // 2MB
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log format (pretty, json).
    pub log_format: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: "pretty".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Admin API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AdminConfig {
    /// Enable the admin API.
    pub enabled: bool,

    /// API key for authentication (Bearer token).
    pub api_key: String,

    /// Admin API bind address.
    pub bind_address: String,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            api_key: String::new(),
            bind_address: "127.0.0.1:8081".to_string(),
        }
    }
}

/// A fixed response; `{name}` in the body is filled from captures.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ResponderConfig {
    #[serde(default = "default_status")]
    pub status: u16,

    #[serde(default = "default_content_type")]
    pub content_type: String,

    #[serde(default)]
    pub body: String,
}

/// A route declared in configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RouteConfig {
    /// Unique route name.
    pub name: String,

    /// Path template, e.g. `^/<all:user>/posts/<int:id>$`.
    pub pattern: String,

    #[serde(flatten)]
    pub response: ResponderConfig,
}

/// Routes sharing a base path.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GroupConfig {
    /// Prepended to every member pattern.
    pub base: String,

    #[serde(default)]
    pub routes: Vec<RouteConfig>,
}

fn default_status() -> u16 {
    200
}

fn default_content_type() -> String {
    "text/plain; charset=utf-8".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config: RouterConfig = toml::from_str("").unwrap();
        assert_eq!(config.listener.bind_address, "0.0.0.0:8080");
        assert_eq!(config.observability.log_level, "info");
        assert!(!config.admin.enabled);
        assert!(config.routes.is_empty());
        assert!(config.not_found.is_none());
    }

    #[test]
    fn test_routes_and_groups() {
        let config: RouterConfig = toml::from_str(
            r#"
            [listener]
            bind_address = "127.0.0.1:3000"

            [not_found]
            status = 404
            body = "nothing at {path}"

            [[routes]]
            name = "post"
            pattern = "^/<all:user>/posts/<int:id>$"
            body = "{user} wrote {id}"

            [[groups]]
            base = "^/api"

            [[groups.routes]]
            name = "api-user"
            pattern = "/users/<int:id>$"
            status = 201
            content_type = "application/json"
            body = '{"id": {id}}'
            "#,
        )
        .unwrap();

        assert_eq!(config.listener.bind_address, "127.0.0.1:3000");
        assert_eq!(config.listener.request_timeout_secs, 30);
        assert_eq!(config.not_found.as_ref().unwrap().status, 404);
        assert_eq!(config.routes[0].response.status, 200);
        assert_eq!(config.routes[0].response.body, "{user} wrote {id}");
        assert_eq!(config.groups[0].routes[0].response.status, 201);
        assert_eq!(config.groups[0].routes[0].response.content_type, "application/json");
    }
}
