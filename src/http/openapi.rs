//! OpenAPI 3.1 description of the REST tool routes, generated from the registry.

use serde_json::{json, Map, Value};

use crate::tools::{ToolDescriptor, ToolRegistry};

pub const OPENAPI_PATH: &str = "/openapi.json";

pub fn build_openapi_document(origin: &str, registry: &ToolRegistry) -> Value {
    let paths: Map<String, Value> = registry
        .descriptors()
        .iter()
        .map(|tool| (tool.route.to_string(), json!({ "post": operation(tool) })))
        .collect();

    json!({
        "openapi": "3.1.0",
        "info": {
            "title": "Notion Tool",
            "description": "Search, read, write and update Notion pages.",
            "version": env!("CARGO_PKG_VERSION")
        },
        "servers": [
            {
                "url": origin,
                "description": "Notion MCP gateway"
            }
        ],
        "paths": paths
    })
}

fn operation(tool: &ToolDescriptor) -> Value {
    json!({
        "operationId": tool.operation_id,
        "summary": tool.summary,
        "description": tool.description,
        "requestBody": {
            "required": true,
            "content": {
                "application/json": { "schema": tool.input_schema }
            }
        },
        "responses": {
            "200": {
                "description": "Success",
                "content": {
                    "application/json": {
                        "schema": text_field_schema("result")
                    }
                }
            },
            "500": {
                "description": "Backend or configuration failure",
                "content": {
                    "application/json": {
                        "schema": text_field_schema("error")
                    }
                }
            }
        }
    })
}

fn text_field_schema(field: &str) -> Value {
    json!({
        "type": "object",
        "properties": { field: { "type": "string" } },
        "required": [field]
    })
}
