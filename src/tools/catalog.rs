//! Notion tools: descriptors, argument types and executors

use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Map, Value};

use super::{ToolDescriptor, ToolError, ToolExecutor};
use crate::backend::{ContentBackend, SearchHit};

pub fn notion_tools() -> Vec<ToolDescriptor> {
    vec![
        ToolDescriptor {
            name: "search_notion",
            description: "Search Notion pages by keyword",
            input_schema: object_schema(&[("query", "Keyword to search for")]),
            route: "/search",
            operation_id: "searchNotion",
            summary: "Search Notion",
            executor: Arc::new(SearchNotion),
        },
        ToolDescriptor {
            name: "read_page",
            description: "Read the text content of a page by its ID",
            input_schema: object_schema(&[("page_id", "Page ID")]),
            route: "/read",
            operation_id: "readPage",
            summary: "Read page",
            executor: Arc::new(ReadPage),
        },
        ToolDescriptor {
            name: "create_page",
            description: "Create a new page in a database",
            input_schema: object_schema(&[
                ("database_id", "Database ID"),
                ("title", "Page title"),
                ("content", "Body text"),
            ]),
            route: "/write",
            operation_id: "writePage",
            summary: "Create page",
            executor: Arc::new(CreatePage),
        },
        ToolDescriptor {
            name: "append_content",
            description: "Append a paragraph to the end of an existing page",
            input_schema: object_schema(&[
                ("page_id", "Page ID"),
                ("content", "Text to append"),
            ]),
            route: "/append",
            operation_id: "appendContent",
            summary: "Append content",
            executor: Arc::new(AppendContent),
        },
        ToolDescriptor {
            name: "add_comment",
            description: "Add a comment to a page",
            input_schema: object_schema(&[("page_id", "Page ID"), ("text", "Comment text")]),
            route: "/comment",
            operation_id: "addComment",
            summary: "Add comment",
            executor: Arc::new(AddComment),
        },
        ToolDescriptor {
            name: "update_status",
            description: "Change the value of a status property on a page",
            input_schema: object_schema(&[
                ("page_id", "Page ID"),
                ("property_name", "Name of the status property"),
                ("status_name", "New status value"),
            ]),
            route: "/status",
            operation_id: "updateStatus",
            summary: "Update status",
            executor: Arc::new(UpdateStatus),
        },
        ToolDescriptor {
            name: "archive_page",
            description: "Archive (delete) a page",
            input_schema: object_schema(&[("page_id", "Page ID")]),
            route: "/archive",
            operation_id: "archivePage",
            summary: "Archive page",
            executor: Arc::new(ArchivePage),
        },
    ]
}

/// Object schema where every listed property is a required string.
fn object_schema(properties: &[(&str, &str)]) -> Value {
    let schema_properties: Map<String, Value> = properties
        .iter()
        .map(|(name, description)| {
            (
                name.to_string(),
                json!({ "type": "string", "description": description }),
            )
        })
        .collect();
    let required: Vec<&str> = properties.iter().map(|(name, _)| *name).collect();

    json!({
        "type": "object",
        "properties": schema_properties,
        "required": required
    })
}

fn decode_arguments<T: DeserializeOwned>(arguments: Map<String, Value>) -> Result<T, ToolError> {
    serde_json::from_value(Value::Object(arguments))
        .map_err(|err| ToolError::InvalidArguments(err.to_string()))
}

pub fn format_search_hits(hits: &[SearchHit]) -> String {
    if hits.is_empty() {
        return "No results found".to_string();
    }

    hits.iter()
        .map(|hit| format!("- [{}] (ID: {})", hit.title, hit.id))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn format_page_content(fragments: &[String]) -> String {
    let text = fragments.join("\n");
    if text.is_empty() {
        return "(empty page)".to_string();
    }
    text
}

#[derive(Debug, Deserialize)]
struct SearchArgs {
    query: String,
}

#[derive(Debug, Deserialize)]
struct PageArgs {
    page_id: String,
}

#[derive(Debug, Deserialize)]
struct CreatePageArgs {
    database_id: String,
    title: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct AppendArgs {
    page_id: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct CommentArgs {
    page_id: String,
    text: String,
}

#[derive(Debug, Deserialize)]
struct StatusArgs {
    page_id: String,
    property_name: String,
    status_name: String,
}

struct SearchNotion;

#[async_trait]
impl ToolExecutor for SearchNotion {
    async fn execute(
        &self,
        backend: &dyn ContentBackend,
        arguments: Map<String, Value>,
    ) -> Result<String, ToolError> {
        let args: SearchArgs = decode_arguments(arguments)?;
        let hits = backend.search(&args.query).await?;
        Ok(format_search_hits(&hits))
    }
}

struct ReadPage;

#[async_trait]
impl ToolExecutor for ReadPage {
    async fn execute(
        &self,
        backend: &dyn ContentBackend,
        arguments: Map<String, Value>,
    ) -> Result<String, ToolError> {
        let args: PageArgs = decode_arguments(arguments)?;
        let fragments = backend.read_content(&args.page_id).await?;
        Ok(format_page_content(&fragments))
    }
}

struct CreatePage;

#[async_trait]
impl ToolExecutor for CreatePage {
    async fn execute(
        &self,
        backend: &dyn ContentBackend,
        arguments: Map<String, Value>,
    ) -> Result<String, ToolError> {
        let args: CreatePageArgs = decode_arguments(arguments)?;
        backend
            .create_entry(&args.database_id, &args.title, &args.content)
            .await?;
        Ok("Page created".to_string())
    }
}

struct AppendContent;

#[async_trait]
impl ToolExecutor for AppendContent {
    async fn execute(
        &self,
        backend: &dyn ContentBackend,
        arguments: Map<String, Value>,
    ) -> Result<String, ToolError> {
        let args: AppendArgs = decode_arguments(arguments)?;
        backend.append_content(&args.page_id, &args.content).await?;
        Ok("Content appended".to_string())
    }
}

struct AddComment;

#[async_trait]
impl ToolExecutor for AddComment {
    async fn execute(
        &self,
        backend: &dyn ContentBackend,
        arguments: Map<String, Value>,
    ) -> Result<String, ToolError> {
        let args: CommentArgs = decode_arguments(arguments)?;
        backend.add_comment(&args.page_id, &args.text).await?;
        Ok("Comment added".to_string())
    }
}

struct UpdateStatus;

#[async_trait]
impl ToolExecutor for UpdateStatus {
    async fn execute(
        &self,
        backend: &dyn ContentBackend,
        arguments: Map<String, Value>,
    ) -> Result<String, ToolError> {
        let args: StatusArgs = decode_arguments(arguments)?;
        backend
            .update_property(&args.page_id, &args.property_name, &args.status_name)
            .await?;
        Ok("Status updated".to_string())
    }
}

struct ArchivePage;

#[async_trait]
impl ToolExecutor for ArchivePage {
    async fn execute(
        &self,
        backend: &dyn ContentBackend,
        arguments: Map<String, Value>,
    ) -> Result<String, ToolError> {
        let args: PageArgs = decode_arguments(arguments)?;
        backend.archive(&args.page_id).await?;
        Ok("Page archived".to_string())
    }
}
