use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};

use crate::admin::AdminState;
use crate::routing::{compile, CompiledPattern};

#[derive(Debug, Serialize, Deserialize)]
pub struct SystemStatus {
    pub version: String,
    pub status: String,
    pub routes: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CaptureInfo {
    pub name: String,
    pub kind: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RouteInfo {
    pub position: usize,
    pub name: String,
    pub template: String,
    pub pattern: String,
    pub captures: Vec<CaptureInfo>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ValidateRequest {
    pub template: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ValidateResponse {
    pub valid: bool,
    pub pattern: Option<String>,
    pub captures: Vec<CaptureInfo>,
    pub error: Option<String>,
}

fn capture_info(pattern: &CompiledPattern) -> Vec<CaptureInfo> {
    pattern
        .captures()
        .iter()
        .map(|(name, kind)| CaptureInfo {
            name: name.clone(),
            kind: kind.tag().to_string(),
        })
        .collect()
}

pub async fn get_status(State(state): State<AdminState>) -> Json<SystemStatus> {
    Json(SystemStatus {
        version: env!("CARGO_PKG_VERSION").to_string(),
        status: "operational".to_string(),
        routes: state.dispatcher.registry().len(),
    })
}

/// Routes in dispatch order.
pub async fn get_routes(State(state): State<AdminState>) -> Json<Vec<RouteInfo>> {
    let routes = state
        .dispatcher
        .registry()
        .snapshot()
        .iter()
        .enumerate()
        .map(|(position, route)| RouteInfo {
            position,
            name: route.name().to_string(),
            template: route.template().to_string(),
            pattern: route.pattern().as_str().to_string(),
            captures: capture_info(route.pattern()),
        })
        .collect();
    Json(routes)
}

/// Compile a template without registering it.
pub async fn validate_template(
    Json(request): Json<ValidateRequest>,
) -> (StatusCode, Json<ValidateResponse>) {
    match compile(&request.template) {
        Ok(pattern) => (
            StatusCode::OK,
            Json(ValidateResponse {
                valid: true,
                pattern: Some(pattern.as_str().to_string()),
                captures: capture_info(&pattern),
                error: None,
            }),
        ),
        Err(e) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ValidateResponse {
                valid: false,
                pattern: None,
                captures: Vec::new(),
                error: Some(e.to_string()),
            }),
        ),
    }
}
