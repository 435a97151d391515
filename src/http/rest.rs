//! Stateless REST variant of the tools: one `POST` route per registered tool.

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Extension, Json, Router,
};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::warn;

use crate::{credential::BackendCredential, tools::ToolRegistry, AppState};

#[derive(Debug, Serialize)]
pub struct RestSuccess {
    pub result: String,
}

#[derive(Debug, Serialize)]
pub struct RestFailure {
    pub error: String,
}

pub fn tool_routes(registry: &ToolRegistry) -> Router<AppState> {
    registry
        .descriptors()
        .iter()
        .fold(Router::new(), |router, descriptor| {
            let tool_name = descriptor.name;
            router.route(
                descriptor.route,
                post(
                    move |State(state): State<AppState>,
                          Extension(credential): Extension<BackendCredential>,
                          body: Bytes| async move {
                        invoke_tool(&state, &credential, tool_name, &body).await
                    },
                ),
            )
        })
}

pub async fn invoke_tool(
    state: &AppState,
    credential: &BackendCredential,
    tool_name: &str,
    body: &[u8],
) -> Response {
    let arguments: Map<String, Value> = match serde_json::from_slice(body) {
        Ok(arguments) => arguments,
        Err(err) => return failure(format!("invalid request body: {err}")),
    };

    match state.binding.execute(tool_name, arguments, credential).await {
        Ok(result) => (StatusCode::OK, Json(RestSuccess { result })).into_response(),
        Err(err) => failure(err.to_string()),
    }
}

fn failure(error: String) -> Response {
    warn!(error = %error, "rest tool call failed");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(RestFailure { error }),
    )
        .into_response()
}
