//! Model Context Protocol (MCP) engine
//!
//! JSON-RPC envelope handling and error translation (`rpc`), the method dispatcher
//! (`server`) and the SSE session stream that hands clients the message endpoint (`sse`).

pub mod rpc;
pub mod server;
pub mod sse;
