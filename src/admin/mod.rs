//! Read-only admin API over the live route table.
//!
//! - `GET /admin/status`: version and route count
//! - `GET /admin/routes`: routes in dispatch order with compiled patterns
//! - `POST /admin/validate`: compile a template without registering it
//!
//! Every endpoint requires `Authorization: Bearer <admin.api_key>`.

pub mod auth;
pub mod handlers;

use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::routing::Dispatcher;
use self::auth::admin_auth_middleware;
use self::handlers::*;

#[derive(Clone)]
pub struct AdminState {
    pub dispatcher: Arc<Dispatcher>,
    pub api_key: String,
}

pub fn setup_admin_router(state: AdminState) -> Router {
    Router::new()
        .route("/admin/status", get(get_status))
        .route("/admin/routes", get(get_routes))
        .route("/admin/validate", post(validate_template))
        .layer(middleware::from_fn_with_state(state.clone(), admin_auth_middleware))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::{handler, RouteRegistry};
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    fn app() -> Router {
        let dispatcher = Arc::new(Dispatcher::new(Arc::new(RouteRegistry::new())));
        let noop = handler(|_, _| Ok(()));
        dispatcher.registry().add("^/<int:id>$", "A", noop.clone()).unwrap();
        dispatcher.registry().add("^/<all:name>$", "B", noop).unwrap();
        setup_admin_router(AdminState {
            dispatcher,
            api_key: "secret".into(),
        })
    }

    fn authed(builder: axum::http::request::Builder) -> axum::http::request::Builder {
        builder.header("Authorization", "Bearer secret")
    }

    #[tokio::test]
    async fn test_requires_key() {
        let res = app()
            .oneshot(Request::get("/admin/status").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

        let res = app()
            .oneshot(
                Request::get("/admin/status")
                    .header("Authorization", "Bearer wrong")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_routes_listing() {
        let res = app()
            .oneshot(authed(Request::get("/admin/routes")).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);

        let body = to_bytes(res.into_body(), 64 * 1024).await.unwrap();
        let routes: Vec<RouteInfo> = serde_json::from_slice(&body).unwrap();
        assert_eq!(routes.len(), 2);
        assert_eq!(routes[0].name, "A");
        assert_eq!(routes[0].pattern, "^/(?P<id>[[:digit:]]+)$");
        assert_eq!(routes[0].captures[0].kind, "int");
        assert_eq!(routes[1].position, 1);
    }

    #[tokio::test]
    async fn test_validate_endpoint() {
        let res = app()
            .oneshot(
                authed(Request::post("/admin/validate"))
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"template": "/<all:x>/<str:x>"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = to_bytes(res.into_body(), 64 * 1024).await.unwrap();
        let parsed: ValidateResponse = serde_json::from_slice(&body).unwrap();
        assert!(!parsed.valid);
        assert!(parsed.error.unwrap().contains("more than once"));
    }
}
