//! JSON-RPC method dispatcher
//!
//! Every call is handled on its own: nothing negotiated by `initialize` is remembered,
//! so `tools/call` is accepted without a prior handshake. The tool registry and the
//! backend factory reach the dispatcher only through the injected [`ToolBinding`].

use rust_mcp_sdk::schema::{
    CallToolResult, ContentBlock, Implementation, InitializeResult, ProtocolVersion,
    ServerCapabilities, ServerCapabilitiesTools, TextContent,
};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tracing::info;

use crate::credential::BackendCredential;
use crate::mcp::rpc::{
    decode_request, is_json_rpc_error, json_rpc_acknowledgement, json_rpc_error,
    json_rpc_result, tool_error_to_json_rpc, JsonRpcRequest, INVALID_PARAMS, METHOD_NOT_FOUND,
    PARSE_ERROR,
};
use crate::tools::{ToolBinding, ToolRegistry};

pub const SUPPORTED_PROTOCOL_VERSION: &str = "2024-11-05";

const SENSITIVE_KEY_FRAGMENTS: [&str; 7] = [
    "token",
    "secret",
    "password",
    "credential",
    "authorization",
    "api_key",
    "apikey",
];

#[derive(Debug, Deserialize)]
struct ToolCallParams {
    name: String,
    #[serde(default)]
    arguments: Option<Map<String, Value>>,
}

/// Handles one raw `POST /messages` body and always produces a response envelope.
pub async fn handle_message(
    binding: &ToolBinding,
    credential: &BackendCredential,
    body: &[u8],
) -> Value {
    let payload: Value = match serde_json::from_slice(body) {
        Ok(value) => value,
        Err(_) => return json_rpc_error(Value::Null, PARSE_ERROR, "Parse error"),
    };

    match decode_request(payload) {
        Ok(request) => handle_json_rpc_request(binding, credential, request).await,
        Err(error_response) => error_response,
    }
}

pub async fn handle_json_rpc_request(
    binding: &ToolBinding,
    credential: &BackendCredential,
    request: JsonRpcRequest,
) -> Value {
    let audit_params = redact_audit_params(request.params.as_ref());
    let JsonRpcRequest {
        method, params, id, ..
    } = request;

    let response = match method.as_str() {
        "initialize" => json_rpc_result(id, initialize_result()),
        "ping" => json_rpc_result(id, json!({})),
        "tools/list" => json_rpc_result(id, tools_list_result(binding.registry())),
        "tools/call" => handle_tools_call(binding, credential, id, params).await,
        // Notifications expect no reply; some clients still read one off the POST.
        "notifications/initialized" => json_rpc_acknowledgement(),
        other if other.starts_with("notifications/") && id.is_null() => {
            json_rpc_acknowledgement()
        }
        _ => json_rpc_error(id, METHOD_NOT_FOUND, "Method not found"),
    };

    info!(
        method = %method,
        params = %audit_params,
        outcome = if is_json_rpc_error(&response) { "failure" } else { "success" },
        "mcp action audited"
    );

    response
}

fn initialize_result() -> Value {
    let result = InitializeResult {
        server_info: Implementation {
            name: env!("CARGO_PKG_NAME").to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            title: None,
            description: None,
            icons: vec![],
            website_url: None,
        },
        capabilities: ServerCapabilities {
            tools: Some(ServerCapabilitiesTools {
                list_changed: Some(false),
            }),
            ..Default::default()
        },
        protocol_version: ProtocolVersion::V2024_11_05.into(),
        instructions: None,
        meta: None,
    };

    serde_json::to_value(result).expect("initialize result serialization")
}

fn tools_list_result(registry: &ToolRegistry) -> Value {
    json!({ "tools": registry.list() })
}

async fn handle_tools_call(
    binding: &ToolBinding,
    credential: &BackendCredential,
    id: Value,
    params: Option<Value>,
) -> Value {
    let Some(raw_params) = params else {
        return json_rpc_error(id, INVALID_PARAMS, "Invalid params");
    };

    let tool_call: ToolCallParams = match serde_json::from_value(raw_params) {
        Ok(value) => value,
        Err(_) => return json_rpc_error(id, INVALID_PARAMS, "Invalid params"),
    };

    let arguments = tool_call.arguments.unwrap_or_default();
    match binding.execute(&tool_call.name, arguments, credential).await {
        Ok(text) => json_rpc_result(
            id,
            serde_json::to_value(CallToolResult {
                content: vec![ContentBlock::from(TextContent::new(text, None, None))],
                is_error: None,
                meta: None,
                structured_content: None,
            })
            .expect("tool result serialization"),
        ),
        Err(err) => tool_error_to_json_rpc(id, &err),
    }
}

pub fn redact_audit_params(params: Option<&Value>) -> Value {
    params.map(redact_audit_value).unwrap_or(Value::Null)
}

fn redact_audit_value(value: &Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(key, item)| {
                    let redacted = if is_sensitive_key(key) {
                        Value::String("[REDACTED]".to_string())
                    } else {
                        redact_audit_value(item)
                    };
                    (key.clone(), redacted)
                })
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.iter().map(redact_audit_value).collect()),
        _ => value.clone(),
    }
}

fn is_sensitive_key(key: &str) -> bool {
    let normalized = key.trim().to_ascii_lowercase().replace('-', "_");
    normalized == "bearer"
        || SENSITIVE_KEY_FRAGMENTS
            .iter()
            .any(|fragment| normalized.contains(fragment))
}
