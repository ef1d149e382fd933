//! Startup orchestration.
//!
//! # Responsibilities
//! - Turn a validated configuration into compiled routes
//! - Build the dispatcher and its not-found handler
//! - Re-apply configuration on hot reload
//!
//! # Design Decisions
//! - Fail fast: a route that does not compile aborts startup
//! - A reload either swaps the whole table or changes nothing

use std::sync::Arc;

use axum::http::StatusCode;

use crate::config::validation::expand_routes;
use crate::config::{ResponderConfig, RouterConfig};
use crate::routing::{
    Dispatcher, HandlerRef, RegistryError, Route, RouteRegistry, TemplateResponder,
};

/// Handler answering with a configured fixed response.
pub fn responder(config: &ResponderConfig) -> HandlerRef {
    let status = StatusCode::from_u16(config.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    Arc::new(TemplateResponder::new(status, config.body.clone()).content_type(config.content_type.clone()))
}

/// Compile every configured route, top-level routes first, then groups.
pub fn build_routes(config: &RouterConfig) -> Result<Vec<Route>, RegistryError> {
    expand_routes(config)
        .into_iter()
        .map(|(pattern, route)| {
            Route::new(pattern, route.name.clone(), responder(&route.response))
                .map_err(RegistryError::from)
        })
        .collect()
}

/// Build a dispatcher serving the configured routes.
pub fn build_dispatcher(config: &RouterConfig) -> Result<Dispatcher, RegistryError> {
    let dispatcher = Dispatcher::new(Arc::new(RouteRegistry::new()));
    apply_config(&dispatcher, config)?;
    Ok(dispatcher)
}

/// Replace the dispatcher's routes and not-found handler with the configured ones.
pub fn apply_config(dispatcher: &Dispatcher, config: &RouterConfig) -> Result<(), RegistryError> {
    let routes = build_routes(config)?;
    dispatcher.registry().replace_all(routes)?;

    match &config.not_found {
        Some(not_found) => dispatcher.set_not_found_handler(responder(not_found)),
        None => dispatcher.reset_not_found_handler(),
    }

    tracing::info!(routes = dispatcher.registry().len(), "Configuration applied");
    Ok(())
}
