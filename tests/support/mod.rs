#![allow(dead_code)]

use std::{
    collections::{HashMap, HashSet},
    sync::{
        atomic::{AtomicUsize, Ordering},
        Mutex,
    },
    time::Duration,
};

use async_trait::async_trait;
use iron_archive_lib::{
    core::errors::{AppError, AppResult},
    providers::notion::{remote_error, NotionApi},
    reader::block::{
        Block, BlockChildren, BlockKind, DatabaseQuery, DatabaseSchema, Page, RichText,
    },
};
use serde_json::{json, Value};

pub const PAGE_ID: &str = "2d9834013f708023a99df368afc2338a";

pub fn block(id: &str, kind: &str) -> Block {
    Block::new(id, BlockKind::parse(kind))
        .with_property(kind, json!({ "rich_text": [{ "plain_text": id }] }))
}

/// A block that reports children without carrying them, as the remote API
/// returns it before nested resolution.
pub fn parent(id: &str, kind: &str) -> Block {
    let mut block = block(id, kind);
    block.has_children = true;
    block
}

pub fn ids(blocks: &[Block]) -> Vec<&str> {
    blocks.iter().map(|block| block.id.as_str()).collect()
}

pub fn titled_page(id: &str, title: &str) -> Page {
    let properties = json!({
        "Name": {
            "id": "title",
            "type": "title",
            "title": [{ "type": "text", "plain_text": title }]
        }
    });
    Page {
        id: id.to_string(),
        url: Some(format!("https://www.notion.so/{id}")),
        properties: properties.as_object().cloned().unwrap_or_default(),
    }
}

/// In-memory stand-in for the Notion REST API.
#[derive(Default)]
pub struct FakeNotion {
    pages: HashMap<String, Page>,
    children: HashMap<String, Vec<Vec<Block>>>,
    database_pages: HashMap<String, Vec<Vec<Page>>>,
    database_schemas: HashMap<String, DatabaseSchema>,
    failing_blocks: HashSet<String>,
    delays: HashMap<String, Duration>,
    pub page_calls: AtomicUsize,
    pub children_calls: AtomicUsize,
    pub children_log: Mutex<Vec<(String, Option<String>)>>,
}

impl FakeNotion {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, page: Page) -> Self {
        self.pages.insert(page.id.clone(), page);
        self
    }

    pub fn with_children(self, block_id: &str, blocks: Vec<Block>) -> Self {
        self.with_paged_children(block_id, vec![blocks])
    }

    pub fn with_paged_children(mut self, block_id: &str, pages: Vec<Vec<Block>>) -> Self {
        self.children.insert(block_id.to_string(), pages);
        self
    }

    pub fn with_database(mut self, database_id: &str, pages: Vec<Vec<Page>>) -> Self {
        self.database_pages.insert(database_id.to_string(), pages);
        self
    }

    pub fn with_database_schema(
        mut self,
        database_id: &str,
        title: &str,
        columns: &[&str],
    ) -> Self {
        let properties = columns
            .iter()
            .map(|name| (name.to_string(), json!({ "name": name, "type": "rich_text" })))
            .collect();
        let schema = DatabaseSchema {
            id: database_id.to_string(),
            title: vec![RichText::plain(title)],
            properties,
        };
        self.database_schemas.insert(database_id.to_string(), schema);
        self
    }

    pub fn failing(mut self, block_id: &str) -> Self {
        self.failing_blocks.insert(block_id.to_string());
        self
    }

    pub fn delayed(mut self, block_id: &str, delay: Duration) -> Self {
        self.delays.insert(block_id.to_string(), delay);
        self
    }

    pub fn children_call_count(&self) -> usize {
        self.children_calls.load(Ordering::SeqCst)
    }

    pub fn page_call_count(&self) -> usize {
        self.page_calls.load(Ordering::SeqCst)
    }

    pub fn logged_children_calls(&self) -> Vec<(String, Option<String>)> {
        self.children_log.lock().map(|log| log.clone()).unwrap_or_default()
    }
}

fn cursor_for(id: &str, index: usize) -> String {
    format!("{id}-cursor-{index}")
}

fn page_index(id: &str, cursor: Option<&str>) -> AppResult<usize> {
    match cursor {
        None => Ok(0),
        Some(raw) => raw
            .strip_prefix(&format!("{id}-cursor-"))
            .and_then(|index| index.parse().ok())
            .ok_or_else(|| {
                let body = r#"{"code":"validation_error","message":"invalid start_cursor"}"#;
                remote_error(400, Some("Bad Request"), body, "block children lookup failed")
            }),
    }
}

#[async_trait]
impl NotionApi for FakeNotion {
    async fn retrieve_page(&self, page_id: &str) -> AppResult<Page> {
        self.page_calls.fetch_add(1, Ordering::SeqCst);
        self.pages.get(page_id).cloned().ok_or_else(|| {
            let body = json!({
                "object": "error",
                "status": 404,
                "code": "object_not_found",
                "message": format!("Could not find page with ID: {page_id}.")
            });
            remote_error(404, Some("Not Found"), &body.to_string(), "page lookup failed")
        })
    }

    async fn list_block_children(
        &self,
        block_id: &str,
        start_cursor: Option<&str>,
    ) -> AppResult<BlockChildren> {
        self.children_calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut log) = self.children_log.lock() {
            log.push((block_id.to_string(), start_cursor.map(ToString::to_string)));
        }
        if let Some(delay) = self.delays.get(block_id) {
            tokio::time::sleep(*delay).await;
        }
        if self.failing_blocks.contains(block_id) {
            let status_text = Some("Internal Server Error");
            return Err(remote_error(500, status_text, "", "block children lookup failed"));
        }

        let pages = self.children.get(block_id).cloned().unwrap_or_default();
        let index = page_index(block_id, start_cursor)?;
        let results = pages.get(index).cloned().unwrap_or_default();
        let has_more = index + 1 < pages.len();
        Ok(BlockChildren {
            results,
            has_more,
            next_cursor: has_more.then(|| cursor_for(block_id, index + 1)),
        })
    }

    async fn query_database(
        &self,
        database_id: &str,
        start_cursor: Option<&str>,
    ) -> AppResult<DatabaseQuery> {
        let pages = self
            .database_pages
            .get(database_id)
            .cloned()
            .ok_or_else(|| AppError::RemoteRequestFailed {
                status: 404,
                code: Some("object_not_found".to_string()),
                message: format!("database query failed: no database {database_id}"),
            })?;
        let index = page_index(database_id, start_cursor)?;
        let has_more = index + 1 < pages.len();
        Ok(DatabaseQuery {
            results: pages.get(index).cloned().unwrap_or_default(),
            has_more,
            next_cursor: has_more.then(|| cursor_for(database_id, index + 1)),
        })
    }

    async fn retrieve_database(&self, database_id: &str) -> AppResult<DatabaseSchema> {
        self.database_schemas.get(database_id).cloned().ok_or_else(|| {
            let body = json!({
                "code": "object_not_found",
                "message": format!("Could not find database with ID: {database_id}.")
            });
            remote_error(404, Some("Not Found"), &body.to_string(), "database lookup failed")
        })
    }
}

pub fn payload_text(block: &Block) -> Option<&str> {
    block
        .payload()
        .and_then(|payload| payload.get("rich_text"))
        .and_then(Value::as_array)
        .and_then(|items| items.first())
        .and_then(|item| item.get("plain_text"))
        .and_then(Value::as_str)
}
