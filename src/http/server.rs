//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router that sends every path to the dispatcher
//! - Wire up middleware (request ID, tracing, timeout)
//! - Bind server to listener
//! - Apply configuration updates to the live route table
//! - Stop on the shutdown broadcast

use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwap;
use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::RouterConfig;
use crate::http::request::{
    into_context, propagate_request_id_layer, request_id, set_request_id_layer,
};
use crate::lifecycle::startup::{apply_config, build_dispatcher};
use crate::routing::{Dispatcher, RegistryError};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<Dispatcher>,
    pub config: Arc<ArcSwap<RouterConfig>>,
}

/// HTTP host for the dispatcher.
pub struct HttpServer {
    router: Router,
    state: AppState,
}

impl HttpServer {
    /// Serve an existing dispatcher, e.g. one with routes registered through the library API.
    pub fn new(config: RouterConfig, dispatcher: Arc<Dispatcher>) -> Self {
        let router_config = config.clone();
        let state = AppState {
            dispatcher,
            config: Arc::new(ArcSwap::from_pointee(config)),
        };
        let router = Self::build_router(&router_config, state.clone());
        Self { router, state }
    }

    /// Build the dispatcher from the configured routes and serve it.
    pub fn from_config(config: RouterConfig) -> Result<Self, RegistryError> {
        let dispatcher = Arc::new(build_dispatcher(&config)?);
        Ok(Self::new(config, dispatcher))
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &RouterConfig, state: AppState) -> Router {
        Router::new()
            .route("/", any(dispatch_handler))
            .route("/{*path}", any(dispatch_handler))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(config.listener.request_timeout_secs)))
            .layer(propagate_request_id_layer())
            .layer(TraceLayer::new_for_http())
            .layer(set_request_id_layer())
    }

    pub fn dispatcher(&self) -> &Arc<Dispatcher> {
        &self.state.dispatcher
    }

    /// The Axum router, for driving the server without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server, accepting connections on the given listener.
    ///
    /// Configuration updates received on `config_updates` replace the route table.
    pub async fn run(
        self,
        listener: TcpListener,
        mut config_updates: mpsc::UnboundedReceiver<RouterConfig>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            routes = self.state.dispatcher.registry().len(),
            "HTTP server starting"
        );

        let state = self.state.clone();
        let mut reload_shutdown = shutdown.resubscribe();
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    update = config_updates.recv() => {
                        let Some(config) = update else { break };
                        match apply_config(&state.dispatcher, &config) {
                            Ok(()) => state.config.store(Arc::new(config)),
                            Err(e) => tracing::error!(error = %e, "Rejected configuration update"),
                        }
                    }
                    _ = reload_shutdown.recv() => break,
                }
            }
        });

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Sends every request through the dispatcher.
async fn dispatch_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let request_id = request_id(request.headers()).to_string();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    tracing::debug!(
        request_id = %request_id,
        method = %method,
        path = %path,
        "Dispatching request"
    );

    let max_body_bytes = state.config.load().listener.max_body_bytes;
    let context = match into_context(request, max_body_bytes).await {
        Ok(context) => context,
        Err(e) => {
            tracing::warn!(request_id = %request_id, error = %e, "Failed to read request body");
            return (StatusCode::PAYLOAD_TOO_LARGE, "Request body too large").into_response();
        }
    };

    let response = state.dispatcher.serve(context);
    tracing::debug!(
        request_id = %request_id,
        path = %path,
        status = %response.status(),
        "Request dispatched"
    );
    response.into_response()
}
