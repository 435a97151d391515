//! Read-only table of tool descriptors

use std::{collections::HashSet, sync::Arc};

use async_trait::async_trait;
use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

use super::{catalog, ToolError};
use crate::backend::ContentBackend;

/// Executable half of a tool. Never serialized.
#[async_trait]
pub trait ToolExecutor: Send + Sync {
    async fn execute(
        &self,
        backend: &dyn ContentBackend,
        arguments: Map<String, Value>,
    ) -> Result<String, ToolError>;
}

#[derive(Clone)]
pub struct ToolDescriptor {
    pub name: &'static str,
    pub description: &'static str,
    pub input_schema: Value,
    /// Path of the equivalent REST route, e.g. `/search`.
    pub route: &'static str,
    pub operation_id: &'static str,
    pub summary: &'static str,
    pub executor: Arc<dyn ToolExecutor>,
}

impl ToolDescriptor {
    pub fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name.to_string(),
            description: self.description.to_string(),
            input_schema: self.input_schema.clone(),
        }
    }
}

/// Public view of a tool as advertised by `tools/list`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("duplicate tool name: {0}")]
    DuplicateName(&'static str),
    #[error("duplicate tool route: {0}")]
    DuplicateRoute(&'static str),
}

pub struct ToolRegistry {
    tools: Vec<ToolDescriptor>,
}

impl ToolRegistry {
    pub fn new(tools: Vec<ToolDescriptor>) -> Result<Self, RegistryError> {
        let mut names = HashSet::new();
        let mut routes = HashSet::new();
        for tool in &tools {
            if !names.insert(tool.name) {
                return Err(RegistryError::DuplicateName(tool.name));
            }
            if !routes.insert(tool.route) {
                return Err(RegistryError::DuplicateRoute(tool.route));
            }
        }

        Ok(Self { tools })
    }

    /// The Notion tool catalog.
    pub fn notion() -> Result<Self, RegistryError> {
        Self::new(catalog::notion_tools())
    }

    /// Tool definitions in registration order.
    pub fn list(&self) -> Vec<ToolDefinition> {
        self.tools.iter().map(ToolDescriptor::definition).collect()
    }

    pub fn lookup(&self, name: &str) -> Option<&ToolDescriptor> {
        self.tools.iter().find(|tool| tool.name == name)
    }

    pub fn descriptors(&self) -> &[ToolDescriptor] {
        &self.tools
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}
