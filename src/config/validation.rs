//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check that every route pattern compiles
//! - Check route name uniqueness across top-level routes and groups
//! - Validate addresses, status codes and log settings
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: RouterConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;
use std::net::SocketAddr;

use axum::http::StatusCode;
use thiserror::Error;

use crate::config::schema::{ResponderConfig, RouteConfig, RouterConfig};
use crate::routing::{compile, CompileError};

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];
const LOG_FORMATS: [&str; 2] = ["pretty", "json"];

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, Error)]
pub enum ValidationError {
    #[error("{field}: `{value}` is not a socket address")]
    InvalidAddress { field: &'static str, value: String },

    #[error("observability.log_level: `{0}` is not one of trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("observability.log_format: `{0}` is not one of pretty, json")]
    InvalidLogFormat(String),

    #[error("admin.api_key must be set when the admin API is enabled")]
    MissingAdminKey,

    #[error("route `{route}`: {status} is not a valid HTTP status")]
    InvalidStatus { route: String, status: u16 },

    #[error("route `{route}`: {source}")]
    InvalidPattern {
        route: String,
        #[source]
        source: CompileError,
    },

    #[error("route name `{0}` is used more than once")]
    DuplicateRouteName(String),
}

/// Validate a configuration, collecting every problem found.
pub fn validate_config(config: &RouterConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    check_address(&mut errors, "listener.bind_address", &config.listener.bind_address);

    let obs = &config.observability;
    if !LOG_LEVELS.contains(&obs.log_level.as_str()) {
        errors.push(ValidationError::InvalidLogLevel(obs.log_level.clone()));
    }
    if !LOG_FORMATS.contains(&obs.log_format.as_str()) {
        errors.push(ValidationError::InvalidLogFormat(obs.log_format.clone()));
    }
    if obs.metrics_enabled {
        check_address(&mut errors, "observability.metrics_address", &obs.metrics_address);
    }

    if config.admin.enabled {
        check_address(&mut errors, "admin.bind_address", &config.admin.bind_address);
        if config.admin.api_key.is_empty() {
            errors.push(ValidationError::MissingAdminKey);
        }
    }

    if let Some(not_found) = &config.not_found {
        check_status(&mut errors, "not_found", not_found);
    }

    let mut names = HashSet::new();
    for (pattern, route) in expand_routes(config) {
        if !names.insert(route.name.as_str()) {
            errors.push(ValidationError::DuplicateRouteName(route.name.clone()));
        }
        check_status(&mut errors, &route.name, &route.response);
        if let Err(source) = compile(&pattern) {
            errors.push(ValidationError::InvalidPattern {
                route: route.name.clone(),
                source,
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Every configured route with its full pattern, in registration order.
pub fn expand_routes(config: &RouterConfig) -> Vec<(String, &RouteConfig)> {
    let top = config
        .routes
        .iter()
        .map(|route| (route.pattern.clone(), route));
    let grouped = config.groups.iter().flat_map(|group| {
        group
            .routes
            .iter()
            .map(move |route| (format!("{}{}", group.base, route.pattern), route))
    });
    top.chain(grouped).collect()
}

fn check_address(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    if value.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field,
            value: value.to_string(),
        });
    }
}

fn check_status(errors: &mut Vec<ValidationError>, route: &str, response: &ResponderConfig) {
    if StatusCode::from_u16(response.status).is_err() {
        errors.push(ValidationError::InvalidStatus {
            route: route.to_string(),
            status: response.status,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::{GroupConfig, ResponderConfig};

    fn route(name: &str, pattern: &str) -> RouteConfig {
        RouteConfig {
            name: name.into(),
            pattern: pattern.into(),
            response: ResponderConfig {
                status: 200,
                content_type: "text/plain".into(),
                body: String::new(),
            },
        }
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&RouterConfig::default()).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = RouterConfig::default();
        config.listener.bind_address = "nowhere".into();
        config.observability.log_level = "loud".into();
        config.admin.enabled = true;
        config.routes.push(route("a", "/<int:x>/<int:x>"));
        config.routes.push(route("a", "/ok$"));
        let mut bad_status = route("b", "/b$");
        bad_status.response.status = 42;
        config.routes.push(bad_status);

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 6, "{:?}", errors);
        assert!(errors.iter().any(|e| matches!(e, ValidationError::InvalidAddress { .. })));
        assert!(errors.iter().any(|e| matches!(e, ValidationError::InvalidLogLevel(_))));
        assert!(errors.iter().any(|e| matches!(e, ValidationError::MissingAdminKey)));
        assert!(errors.iter().any(|e| matches!(e, ValidationError::InvalidPattern { .. })));
        assert!(errors.iter().any(|e| matches!(e, ValidationError::DuplicateRouteName(n) if n == "a")));
        assert!(errors.iter().any(|e| matches!(e, ValidationError::InvalidStatus { status: 42, .. })));
    }

    #[test]
    fn test_group_names_share_namespace() {
        let mut config = RouterConfig::default();
        config.routes.push(route("users", "^/users$"));
        config.groups.push(GroupConfig {
            base: "^/api".into(),
            routes: vec![route("users", "/users$")],
        });

        let errors = validate_config(&config).unwrap_err();
        assert!(matches!(errors[0], ValidationError::DuplicateRouteName(_)));
    }

    #[test]
    fn test_expand_routes_prefixes_groups() {
        let mut config = RouterConfig::default();
        config.routes.push(route("home", "^/$"));
        config.groups.push(GroupConfig {
            base: "^/api".into(),
            routes: vec![route("user", "/users/<int:id>$")],
        });

        let expanded: Vec<_> = expand_routes(&config)
            .into_iter()
            .map(|(pattern, route)| (pattern, route.name.clone()))
            .collect();
        assert_eq!(
            expanded,
            vec![
                ("^/$".to_string(), "home".to_string()),
                ("^/api/users/<int:id>$".to_string(), "user".to_string()),
            ]
        );
    }
}
