//! HTTP transport layer
//!
//! The MCP surface (`/sse` plus `/messages`), the REST tool routes, the generated
//! OpenAPI document and the public health/discovery endpoints.

pub mod handlers;
pub mod openapi;
pub mod origin;
pub mod rest;
