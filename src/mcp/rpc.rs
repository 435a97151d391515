//! JSON-RPC envelope decoding and response formatting
//!
//! Also maps tool failures onto protocol-level error objects.

use rust_mcp_sdk::schema::{
    JsonrpcErrorResponse, JsonrpcResultResponse, RequestId, Result as McpResult, RpcError,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::tools::ToolError;

pub const PARSE_ERROR: i32 = -32700;
pub const INVALID_REQUEST: i32 = -32600;
pub const METHOD_NOT_FOUND: i32 = -32601;
pub const INVALID_PARAMS: i32 = -32602;
pub const APPLICATION_ERROR: i32 = -32000;

#[derive(Debug, Clone, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    pub method: String,
    #[serde(default)]
    pub params: Option<Value>,
    /// `Value::Null` when the client sent no id.
    #[serde(default)]
    pub id: Value,
}

/// Validates the envelope, returning a ready-made error response when it is unusable.
pub fn decode_request(payload: Value) -> Result<JsonRpcRequest, Value> {
    if !payload.is_object() {
        return Err(json_rpc_error(Value::Null, INVALID_REQUEST, "Invalid Request"));
    }

    let id = payload.get("id").cloned().unwrap_or(Value::Null);
    let request: JsonRpcRequest = serde_json::from_value(payload)
        .map_err(|_| json_rpc_error(id.clone(), INVALID_REQUEST, "Invalid Request"))?;

    if request.jsonrpc != "2.0" || request.method.trim().is_empty() {
        return Err(json_rpc_error(id, INVALID_REQUEST, "Invalid Request"));
    }

    Ok(request)
}

pub fn is_json_rpc_error(value: &Value) -> bool {
    value.get("error").is_some()
}

pub fn tool_error_to_json_rpc(id: Value, err: &ToolError) -> Value {
    json_rpc_error(id, APPLICATION_ERROR, &err.to_string())
}

pub fn json_rpc_error(id: Value, code: i32, message: &str) -> Value {
    if let Some(request_id) = value_to_request_id(&id) {
        let response = JsonrpcErrorResponse::new(
            RpcError {
                code: i64::from(code),
                data: None,
                message: message.to_string(),
            },
            Some(request_id),
        );
        return serde_json::to_value(response).expect("jsonrpc error response serialization");
    }

    json!({
        "jsonrpc": "2.0",
        "id": id,
        "error": {
            "code": code,
            "message": message
        }
    })
}

pub fn json_rpc_result(id: Value, result: Value) -> Value {
    if let Some(request_id) = value_to_request_id(&id) {
        let extra = result.as_object().cloned();
        let response = JsonrpcResultResponse::new(request_id, McpResult { meta: None, extra });
        return serde_json::to_value(response).expect("jsonrpc result response serialization");
    }

    json!({
        "jsonrpc": "2.0",
        "id": id,
        "result": result
    })
}

/// Envelope-only reply sent for notifications.
pub fn json_rpc_acknowledgement() -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": null
    })
}

pub fn value_to_request_id(value: &Value) -> Option<RequestId> {
    match value {
        Value::String(id) => Some(RequestId::String(id.clone())),
        Value::Number(number) => number.as_i64().map(RequestId::Integer),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::backend::BackendError;

    #[test]
    fn decode_rejects_non_object_payload() {
        let response = decode_request(json!([1, 2, 3])).expect_err("array is invalid");
        assert_eq!(response["error"]["code"], INVALID_REQUEST);
        assert!(response["id"].is_null());
    }

    #[test]
    fn decode_echoes_id_for_wrong_version() {
        let response = decode_request(json!({"jsonrpc": "1.0", "id": 9, "method": "ping"}))
            .expect_err("wrong version");
        assert_eq!(response["error"]["code"], INVALID_REQUEST);
        assert_eq!(response["id"], 9);
    }

    #[test]
    fn decode_rejects_blank_method() {
        let response = decode_request(json!({"jsonrpc": "2.0", "id": "a", "method": "  "}))
            .expect_err("blank method");
        assert_eq!(response["id"], "a");
    }

    #[test]
    fn decode_defaults_missing_id_to_null() {
        let request = decode_request(json!({"jsonrpc": "2.0", "method": "ping"})).expect("valid");
        assert!(request.id.is_null());
        assert!(request.params.is_none());
    }

    #[test]
    fn error_with_null_id_keeps_id_field() {
        let response = json_rpc_error(Value::Null, PARSE_ERROR, "Parse error");
        assert_eq!(response["jsonrpc"], "2.0");
        assert!(response.as_object().expect("object").contains_key("id"));
        assert!(response["id"].is_null());
        assert_eq!(response["error"]["code"], PARSE_ERROR);
    }

    #[test]
    fn result_echoes_string_and_fractional_ids() {
        let response = json_rpc_result(json!("req-7"), json!({}));
        assert_eq!(response["id"], "req-7");
        assert!(response["result"].is_object());

        let response = json_rpc_result(json!(1.5), json!({}));
        assert_eq!(response["id"], 1.5);
    }

    #[test]
    fn tool_errors_translate_to_application_error() {
        let response = tool_error_to_json_rpc(
            json!(4),
            &ToolError::Backend(BackendError::new("Could not find page with ID: p1")),
        );
        assert_eq!(response["id"], 4);
        assert_eq!(response["error"]["code"], APPLICATION_ERROR);
        assert_eq!(response["error"]["message"], "Could not find page with ID: p1");
        assert!(response.get("result").is_none());
    }
}
