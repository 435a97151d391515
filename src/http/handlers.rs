//! Axum handlers for the MCP transport and the public metadata endpoints

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, Uri},
    response::sse::{Event, Sse},
    Extension, Json,
};
use futures::Stream;
use serde::Serialize;
use serde_json::Value;
use std::convert::Infallible;

use crate::credential::BackendCredential;
use crate::http::{
    openapi::{build_openapi_document, OPENAPI_PATH},
    origin::request_origin,
};
use crate::mcp::{
    server::handle_message,
    sse::{SseSession, MESSAGES_PATH, SSE_PATH},
};
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[derive(Debug, Serialize)]
pub struct DiscoveryResponse {
    pub name: &'static str,
    pub version: &'static str,
    pub sse_endpoint: &'static str,
    pub messages_endpoint: &'static str,
    pub openapi_endpoint: &'static str,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

pub async fn discovery() -> Json<DiscoveryResponse> {
    Json(DiscoveryResponse {
        name: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        sse_endpoint: SSE_PATH,
        messages_endpoint: MESSAGES_PATH,
        openapi_endpoint: OPENAPI_PATH,
    })
}

/// `GET /sse`: opens a session and streams its events until the client goes away.
pub async fn sse_endpoint(
    State(state): State<AppState>,
    headers: HeaderMap,
    uri: Uri,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let origin = request_origin(&headers, &uri);
    let session = SseSession::open(&origin, state.keepalive_interval);
    Sse::new(session.into_stream())
}

/// `POST /messages`: protocol-level outcomes, errors included, are always HTTP 200.
pub async fn messages_endpoint(
    State(state): State<AppState>,
    Extension(credential): Extension<BackendCredential>,
    body: Bytes,
) -> Json<Value> {
    Json(handle_message(&state.binding, &credential, &body).await)
}

pub async fn openapi_document(
    State(state): State<AppState>,
    headers: HeaderMap,
    uri: Uri,
) -> Json<Value> {
    let origin = request_origin(&headers, &uri);
    Json(build_openapi_document(&origin, state.binding.registry()))
}
