use std::{sync::Arc, time::Duration};

use serde_json::{Map, Value};
use tokio::time::timeout;
use tracing::{debug, warn};

use super::{ToolError, ToolRegistry};
use crate::{backend::BackendFactory, credential::BackendCredential};

/// Invokes registered tools against a freshly connected backend.
#[derive(Clone)]
pub struct ToolBinding {
    registry: Arc<ToolRegistry>,
    factory: Arc<dyn BackendFactory>,
    deadline: Duration,
}

impl ToolBinding {
    pub fn new(
        registry: Arc<ToolRegistry>,
        factory: Arc<dyn BackendFactory>,
        deadline: Duration,
    ) -> Self {
        Self {
            registry,
            factory,
            deadline,
        }
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    pub async fn execute(
        &self,
        tool_name: &str,
        arguments: Map<String, Value>,
        credential: &BackendCredential,
    ) -> Result<String, ToolError> {
        let descriptor = self
            .registry
            .lookup(tool_name)
            .ok_or_else(|| ToolError::UnknownTool(tool_name.to_string()))?;

        let backend = self.factory.connect(credential)?;
        let outcome = timeout(
            self.deadline,
            descriptor.executor.execute(backend.as_ref(), arguments),
        )
        .await
        .unwrap_or(Err(ToolError::TimedOut(self.deadline)));

        match &outcome {
            Ok(text) => debug!(tool = tool_name, bytes = text.len(), "tool executed"),
            Err(err) => warn!(tool = tool_name, error = %err, "tool execution failed"),
        }

        outcome
    }
}
