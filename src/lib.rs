use std::{sync::Arc, time::Duration};

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;

pub mod backend;
pub mod config;
pub mod credential;
pub mod errors;
pub mod http;
pub mod logging;
pub mod mcp;
pub mod tools;

use backend::BackendFactory;
use config::Config;
use credential::BackendCredential;
use http::openapi::OPENAPI_PATH;
use mcp::sse::{MESSAGES_PATH, SSE_PATH};
use tools::{ToolBinding, ToolRegistry};

#[derive(Clone)]
pub struct AppState {
    pub binding: ToolBinding,
    pub credential: Option<BackendCredential>,
    pub keepalive_interval: Duration,
}

impl AppState {
    pub fn new(
        registry: Arc<ToolRegistry>,
        backend_factory: Arc<dyn BackendFactory>,
        credential: Option<BackendCredential>,
        backend_timeout: Duration,
        keepalive_interval: Duration,
    ) -> Self {
        Self {
            binding: ToolBinding::new(registry, backend_factory, backend_timeout),
            credential,
            keepalive_interval,
        }
    }

    pub fn from_config(
        config: &Config,
        registry: Arc<ToolRegistry>,
        backend_factory: Arc<dyn BackendFactory>,
    ) -> Self {
        Self::new(
            registry,
            backend_factory,
            config.notion_api_key.clone().map(BackendCredential::new),
            config.backend_timeout,
            config.keepalive_interval,
        )
    }
}

pub fn build_app(state: AppState) -> Router {
    let protected = Router::new()
        .route(MESSAGES_PATH, post(http::handlers::messages_endpoint))
        .merge(http::rest::tool_routes(state.binding.registry()))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            credential::require_backend_credential,
        ));

    Router::new()
        .route("/health", get(http::handlers::health))
        .route("/.well-known/mcp", get(http::handlers::discovery))
        .route(OPENAPI_PATH, get(http::handlers::openapi_document))
        .route(SSE_PATH, get(http::handlers::sse_endpoint))
        .merge(protected)
        .layer(CorsLayer::permissive())
        .layer(middleware::from_fn(logging::request_logging_middleware))
        .with_state(state)
}
