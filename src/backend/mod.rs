//! Content-store backend consumed by the tool executors
//!
//! The gateway only talks to the backend through [`ContentBackend`]; a fresh handle is
//! obtained from a [`BackendFactory`] for every tool invocation.

pub mod notion;

use async_trait::async_trait;
use thiserror::Error;

use crate::credential::BackendCredential;

/// A backend operation failed; the message is surfaced verbatim to callers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct BackendError {
    pub message: String,
}

impl BackendError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    pub title: String,
    pub id: String,
}

#[async_trait]
pub trait ContentBackend: Send + Sync {
    /// Pages matching `query`, most recently edited first. An empty list is not an error.
    async fn search(&self, query: &str) -> Result<Vec<SearchHit>, BackendError>;

    /// Text of each top-level block of the page, in document order.
    async fn read_content(&self, id: &str) -> Result<Vec<String>, BackendError>;

    async fn create_entry(
        &self,
        parent_id: &str,
        title: &str,
        content: &str,
    ) -> Result<(), BackendError>;

    async fn append_content(&self, id: &str, content: &str) -> Result<(), BackendError>;

    async fn add_comment(&self, id: &str, text: &str) -> Result<(), BackendError>;

    async fn update_property(
        &self,
        id: &str,
        property_name: &str,
        value: &str,
    ) -> Result<(), BackendError>;

    async fn archive(&self, id: &str) -> Result<(), BackendError>;
}

pub trait BackendFactory: Send + Sync {
    fn connect(
        &self,
        credential: &BackendCredential,
    ) -> Result<Box<dyn ContentBackend>, BackendError>;
}
