//! Tool registry and executor binding
//!
//! A tool is a named, schema-described capability backed by exactly one
//! [`ContentBackend`](crate::backend::ContentBackend) operation. Both the MCP
//! dispatcher and the REST routes invoke tools through [`ToolBinding`].

pub mod binding;
pub mod catalog;
pub mod registry;

use std::time::Duration;

use thiserror::Error;

use crate::backend::BackendError;

pub use binding::ToolBinding;
pub use registry::{ToolDefinition, ToolDescriptor, ToolExecutor, ToolRegistry};

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Unknown tool: {0}")]
    UnknownTool(String),
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),
    #[error(transparent)]
    Backend(#[from] BackendError),
    #[error("Backend call timed out after {}s", .0.as_secs())]
    TimedOut(Duration),
}
