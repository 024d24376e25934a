use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::{
    core::{
        config::NotionConfig,
        errors::{AppError, AppResult},
    },
    reader::block::{BlockChildren, DatabaseQuery, DatabaseSchema, Page},
};

const DATABASE_PAGE_SIZE: u32 = 100;

/// The remote operations the reader consumes.
#[async_trait]
pub trait NotionApi: Send + Sync {
    async fn retrieve_page(&self, page_id: &str) -> AppResult<Page>;

    async fn list_block_children(
        &self,
        block_id: &str,
        start_cursor: Option<&str>,
    ) -> AppResult<BlockChildren>;

    async fn query_database(
        &self,
        database_id: &str,
        start_cursor: Option<&str>,
    ) -> AppResult<DatabaseQuery>;

    async fn retrieve_database(&self, database_id: &str) -> AppResult<DatabaseSchema>;
}

#[async_trait]
impl<T: NotionApi + ?Sized> NotionApi for Arc<T> {
    async fn retrieve_page(&self, page_id: &str) -> AppResult<Page> {
        (**self).retrieve_page(page_id).await
    }

    async fn list_block_children(
        &self,
        block_id: &str,
        start_cursor: Option<&str>,
    ) -> AppResult<BlockChildren> {
        (**self).list_block_children(block_id, start_cursor).await
    }

    async fn query_database(
        &self,
        database_id: &str,
        start_cursor: Option<&str>,
    ) -> AppResult<DatabaseQuery> {
        (**self).query_database(database_id, start_cursor).await
    }

    async fn retrieve_database(&self, database_id: &str) -> AppResult<DatabaseSchema> {
        (**self).retrieve_database(database_id).await
    }
}

#[derive(Debug, Clone)]
pub struct NotionClient {
    http: reqwest::Client,
    api_base: String,
    version: String,
    token: Option<String>,
}

impl NotionClient {
    pub fn new(config: &NotionConfig) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|err| AppError::Network(err.to_string()))?;
        Ok(Self {
            http,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            version: config.version.clone(),
            token: config.token.clone(),
        })
    }

    pub fn children_url(&self, block_id: &str) -> String {
        format!("{}/blocks/{}/children", self.api_base, block_id)
    }

    pub fn page_url(&self, page_id: &str) -> String {
        format!("{}/pages/{}", self.api_base, page_id)
    }

    pub fn database_url(&self, database_id: &str) -> String {
        format!("{}/databases/{}", self.api_base, database_id)
    }

    pub fn database_query_url(&self, database_id: &str) -> String {
        format!("{}/databases/{}/query", self.api_base, database_id)
    }

    fn authorized(&self, request: RequestBuilder) -> AppResult<RequestBuilder> {
        let token = self.token.as_deref().ok_or(AppError::MissingCredential)?;
        Ok(request
            .bearer_auth(token)
            .header("Notion-Version", &self.version)
            .header(reqwest::header::CONTENT_TYPE, "application/json"))
    }

    fn children_request(
        &self,
        block_id: &str,
        start_cursor: Option<&str>,
    ) -> AppResult<RequestBuilder> {
        let mut request = self.http.get(self.children_url(block_id));
        if let Some(cursor) = start_cursor {
            request = request.query(&[("start_cursor", cursor)]);
        }
        self.authorized(request)
    }

    async fn send_json<T>(&self, request: RequestBuilder, context: &str) -> AppResult<T>
    where
        T: DeserializeOwned,
    {
        let response = request.send().await?;
        let response = ensure_success(response, context).await?;
        let body = response.bytes().await?;
        decode_body(&body, context)
    }
}

#[async_trait]
impl NotionApi for NotionClient {
    async fn retrieve_page(&self, page_id: &str) -> AppResult<Page> {
        tracing::debug!(page_id, "retrieving notion page");
        let request = self.authorized(self.http.get(self.page_url(page_id)))?;
        self.send_json(request, "page lookup failed").await
    }

    async fn list_block_children(
        &self,
        block_id: &str,
        start_cursor: Option<&str>,
    ) -> AppResult<BlockChildren> {
        tracing::debug!(block_id, cursor = start_cursor, "listing block children");
        let request = self.children_request(block_id, start_cursor)?;
        self.send_json(request, "block children lookup failed").await
    }

    async fn query_database(
        &self,
        database_id: &str,
        start_cursor: Option<&str>,
    ) -> AppResult<DatabaseQuery> {
        tracing::debug!(database_id, cursor = start_cursor, "querying notion database");
        let mut payload = serde_json::json!({ "page_size": DATABASE_PAGE_SIZE });
        if let Some(cursor) = start_cursor {
            payload["start_cursor"] = Value::String(cursor.to_string());
        }
        let request = self
            .authorized(self.http.post(self.database_query_url(database_id)))?
            .json(&payload);
        self.send_json(request, "database query failed").await
    }

    async fn retrieve_database(&self, database_id: &str) -> AppResult<DatabaseSchema> {
        tracing::debug!(database_id, "retrieving notion database");
        let request = self.authorized(self.http.get(self.database_url(database_id)))?;
        self.send_json(request, "database lookup failed").await
    }
}

async fn ensure_success(response: Response, context: &str) -> AppResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let err = remote_error(status.as_u16(), status.canonical_reason(), &body, context);
    tracing::warn!(status = status.as_u16(), error = %err, "notion request failed");
    Err(err)
}

/// Decodes a success body. A body of the wrong shape will not change on a
/// second attempt, so it is reported as [`AppError::InvalidResponse`].
fn decode_body<T: DeserializeOwned>(body: &[u8], context: &str) -> AppResult<T> {
    serde_json::from_slice(body)
        .map_err(|err| AppError::InvalidResponse(format!("{context}: {err}")))
}

/// Builds the error for a non-success response, preferring the `message` and
/// `code` of a Notion error body over the bare status text.
pub fn remote_error(
    status: u16,
    status_text: Option<&str>,
    body: &str,
    context: &str,
) -> AppError {
    let parsed: Option<Value> = serde_json::from_str(body).ok();
    let field = |name: &str| {
        parsed
            .as_ref()
            .and_then(|value| value.get(name))
            .and_then(Value::as_str)
            .filter(|text| !text.is_empty())
            .map(ToString::to_string)
    };
    let detail = field("message")
        .or_else(|| status_text.map(ToString::to_string))
        .unwrap_or_else(|| format!("status {status}"));
    AppError::RemoteRequestFailed {
        status,
        code: field("code"),
        message: format!("{context}: {detail}"),
    }
}
