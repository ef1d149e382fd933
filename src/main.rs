//! Typed router service.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request        ┌──────────────────────────────────────────────────────┐
//!     ──────────────────────┼─▶ http server ──▶ Dispatcher ──▶ route handler       │
//!                           │                       │                               │
//!                           │                       ▼                               │
//!                           │            RouteRegistry snapshot                     │
//!                           │            (compiled templates, first match wins)    │
//!                           │                       ▲                               │
//!     config.toml ──────────┼─▶ loader ─▶ validation ─▶ startup / hot reload        │
//!                           │                                                       │
//!     Operator ─────────────┼─▶ admin API (routes, validate)                        │
//!                           └──────────────────────────────────────────────────────┘
//! ```
//!
//! Usage: `typed-router [config.toml]`. Without a file the defaults apply and the landing page
//! is served until routes are configured.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::sync::mpsc;

use typed_router::admin::{setup_admin_router, AdminState};
use typed_router::config::{load_config, ConfigWatcher, RouterConfig};
use typed_router::observability::{logging, metrics};
use typed_router::{HttpServer, Shutdown};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = std::env::args_os().nth(1).map(PathBuf::from);

    let config = match &config_path {
        Some(path) => load_config(path)?,
        None => RouterConfig::default(),
    };

    logging::init_logging(&config.observability);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "typed-router starting");
    tracing::info!(
        config = ?config_path,
        bind_address = %config.listener.bind_address,
        routes = config.routes.len(),
        groups = config.groups.len(),
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        let addr: SocketAddr = config.observability.metrics_address.parse()?;
        metrics::init_metrics(addr);
    }

    let shutdown = Shutdown::new();
    tokio::spawn(shutdown.clone().trigger_on_signal());

    // Keep the watcher alive for the lifetime of the server.
    let (_watcher, config_updates) = match &config_path {
        Some(path) => {
            let (watcher, updates) = ConfigWatcher::new(path);
            (Some(watcher.run()?), updates)
        }
        None => {
            let (_, updates) = mpsc::unbounded_channel();
            (None, updates)
        }
    };

    let server = HttpServer::from_config(config.clone())?;

    if config.admin.enabled {
        let admin = setup_admin_router(AdminState {
            dispatcher: Arc::clone(server.dispatcher()),
            api_key: config.admin.api_key.clone(),
        });
        let admin_listener = TcpListener::bind(&config.admin.bind_address).await?;
        tracing::info!(address = %admin_listener.local_addr()?, "Admin API listening");
        let mut admin_shutdown = shutdown.subscribe();
        tokio::spawn(async move {
            let served = axum::serve(admin_listener, admin)
                .with_graceful_shutdown(async move {
                    let _ = admin_shutdown.recv().await;
                })
                .await;
            if let Err(e) = served {
                tracing::error!(error = %e, "Admin API stopped");
            }
        });
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    server
        .run(listener, config_updates, shutdown.subscribe())
        .await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
