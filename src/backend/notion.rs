//! Notion REST API client

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use super::{BackendError, BackendFactory, ContentBackend, SearchHit};
use crate::credential::BackendCredential;

const SEARCH_PAGE_SIZE: u32 = 5;
const READ_PAGE_SIZE: u32 = 100;
const UNTITLED: &str = "Untitled";

#[derive(Debug, Clone)]
pub struct NotionBackendFactory {
    base_url: String,
    notion_version: String,
    timeout: Duration,
}

impl NotionBackendFactory {
    pub fn new(
        base_url: impl Into<String>,
        notion_version: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            notion_version: notion_version.into(),
            timeout,
        }
    }
}

impl BackendFactory for NotionBackendFactory {
    fn connect(
        &self,
        credential: &BackendCredential,
    ) -> Result<Box<dyn ContentBackend>, BackendError> {
        let http = reqwest::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|err| BackendError::new(format!("failed to build notion client: {err}")))?;

        Ok(Box::new(NotionBackend {
            http,
            base_url: self.base_url.clone(),
            notion_version: self.notion_version.clone(),
            credential: credential.clone(),
        }))
    }
}

pub struct NotionBackend {
    http: reqwest::Client,
    base_url: String,
    notion_version: String,
    credential: BackendCredential,
}

#[derive(Debug, Deserialize)]
struct NotionErrorBody {
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ListBody {
    #[serde(default)]
    results: Vec<Value>,
}

impl NotionBackend {
    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http
            .request(method, format!("{}{}", self.base_url, path))
            .bearer_auth(self.credential.expose())
            .header("Notion-Version", &self.notion_version)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Value, BackendError> {
        let response = request
            .send()
            .await
            .map_err(|err| BackendError::new(format!("notion request failed: {err}")))?;
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|err| BackendError::new(format!("failed to read notion response: {err}")))?;

        debug!(status = status.as_u16(), bytes = body.len(), "notion response received");

        if !status.is_success() {
            let message = serde_json::from_slice::<NotionErrorBody>(&body)
                .ok()
                .and_then(|error| error.message)
                .unwrap_or_else(|| format!("notion returned HTTP {}", status.as_u16()));
            return Err(BackendError::new(message));
        }

        serde_json::from_slice(&body)
            .map_err(|err| BackendError::new(format!("invalid notion response: {err}")))
    }

    async fn send_list(&self, request: RequestBuilder) -> Result<Vec<Value>, BackendError> {
        let body = self.send(request).await?;
        let list: ListBody = serde_json::from_value(body)
            .map_err(|err| BackendError::new(format!("invalid notion response: {err}")))?;
        Ok(list.results)
    }
}

#[async_trait]
impl ContentBackend for NotionBackend {
    async fn search(&self, query: &str) -> Result<Vec<SearchHit>, BackendError> {
        let results = self
            .send_list(self.request(Method::POST, "/search").json(&json!({
                "query": query,
                "page_size": SEARCH_PAGE_SIZE,
                "sort": { "direction": "descending", "timestamp": "last_edited_time" }
            })))
            .await?;

        Ok(results.iter().map(search_hit).collect())
    }

    async fn read_content(&self, id: &str) -> Result<Vec<String>, BackendError> {
        let path = format!("/blocks/{id}/children?page_size={READ_PAGE_SIZE}");
        let blocks = self.send_list(self.request(Method::GET, &path)).await?;
        Ok(blocks.iter().map(block_text).collect())
    }

    async fn create_entry(
        &self,
        parent_id: &str,
        title: &str,
        content: &str,
    ) -> Result<(), BackendError> {
        self.send(self.request(Method::POST, "/pages").json(&json!({
            "parent": { "database_id": parent_id },
            "properties": { "title": { "title": [rich_text(title)] } },
            "children": [paragraph(content)]
        })))
        .await
        .map(drop)
    }

    async fn append_content(&self, id: &str, content: &str) -> Result<(), BackendError> {
        let path = format!("/blocks/{id}/children");
        self.send(
            self.request(Method::PATCH, &path)
                .json(&json!({ "children": [paragraph(content)] })),
        )
        .await
        .map(drop)
    }

    async fn add_comment(&self, id: &str, text: &str) -> Result<(), BackendError> {
        self.send(self.request(Method::POST, "/comments").json(&json!({
            "parent": { "page_id": id },
            "rich_text": [rich_text(text)]
        })))
        .await
        .map(drop)
    }

    async fn update_property(
        &self,
        id: &str,
        property_name: &str,
        value: &str,
    ) -> Result<(), BackendError> {
        let mut properties = serde_json::Map::new();
        properties.insert(
            property_name.to_string(),
            json!({ "status": { "name": value } }),
        );

        let path = format!("/pages/{id}");
        self.send(
            self.request(Method::PATCH, &path)
                .json(&json!({ "properties": properties })),
        )
        .await
        .map(drop)
    }

    async fn archive(&self, id: &str) -> Result<(), BackendError> {
        let path = format!("/pages/{id}");
        self.send(
            self.request(Method::PATCH, &path)
                .json(&json!({ "archived": true })),
        )
        .await
        .map(drop)
    }
}

fn rich_text(content: &str) -> Value {
    json!({ "text": { "content": content } })
}

fn paragraph(content: &str) -> Value {
    json!({
        "object": "block",
        "type": "paragraph",
        "paragraph": { "rich_text": [rich_text(content)] }
    })
}

fn search_hit(result: &Value) -> SearchHit {
    let properties = &result["properties"];
    let title = [&properties["Name"]["title"], &properties["title"]["title"]]
        .into_iter()
        .find_map(|title| {
            title[0]["plain_text"]
                .as_str()
                .filter(|text| !text.is_empty())
        })
        .unwrap_or(UNTITLED);

    SearchHit {
        title: title.to_string(),
        id: result["id"].as_str().unwrap_or_default().to_string(),
    }
}

fn block_text(block: &Value) -> String {
    let Some(kind) = block["type"].as_str() else {
        return String::new();
    };

    block[kind]["rich_text"]
        .as_array()
        .map(|runs| {
            runs.iter()
                .filter_map(|run| run["plain_text"].as_str())
                .collect::<String>()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{block_text, search_hit, UNTITLED};

    #[test]
    fn search_hit_prefers_name_property() {
        let hit = search_hit(&json!({
            "id": "page-1",
            "properties": {
                "Name": { "title": [{ "plain_text": "Roadmap" }] },
                "title": { "title": [{ "plain_text": "ignored" }] }
            }
        }));

        assert_eq!(hit.title, "Roadmap");
        assert_eq!(hit.id, "page-1");
    }

    #[test]
    fn search_hit_falls_back_to_title_property() {
        let hit = search_hit(&json!({
            "id": "page-2",
            "properties": { "title": { "title": [{ "plain_text": "Meeting notes" }] } }
        }));

        assert_eq!(hit.title, "Meeting notes");
    }

    #[test]
    fn search_hit_skips_blank_name_for_title_property() {
        let hit = search_hit(&json!({
            "id": "page-4",
            "properties": {
                "Name": { "title": [{ "plain_text": "" }] },
                "title": { "title": [{ "plain_text": "Real title" }] }
            }
        }));

        assert_eq!(hit.title, "Real title");
    }

    #[test]
    fn search_hit_without_title_is_untitled() {
        let hit = search_hit(&json!({ "id": "db-1", "properties": {} }));
        assert_eq!(hit.title, UNTITLED);

        let hit = search_hit(&json!({
            "id": "page-3",
            "properties": { "Name": { "title": [] } }
        }));
        assert_eq!(hit.title, UNTITLED);
    }

    #[test]
    fn block_text_concatenates_rich_text_runs() {
        let text = block_text(&json!({
            "type": "paragraph",
            "paragraph": {
                "rich_text": [{ "plain_text": "Hello, " }, { "plain_text": "world" }]
            }
        }));

        assert_eq!(text, "Hello, world");
    }

    #[test]
    fn block_text_is_empty_for_blocks_without_rich_text() {
        assert_eq!(block_text(&json!({ "type": "divider", "divider": {} })), "");
        assert_eq!(block_text(&json!({ "object": "block" })), "");
    }
}
