use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{
    core::errors::AppResult,
    providers::notion::NotionApi,
    reader::{
        block::{DatabaseSchema, Page},
        title::{extract_page_title, plain_text},
    },
};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatabasePage {
    pub id: String,
    pub url: String,
    pub title: String,
    pub properties: Map<String, Value>,
}

impl From<Page> for DatabasePage {
    fn from(page: Page) -> Self {
        Self {
            title: extract_page_title(&page.properties).unwrap_or_default(),
            url: page.url.unwrap_or_default(),
            id: page.id,
            properties: page.properties,
        }
    }
}

/// Shape of a database: its title and the names of its property columns.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseStructure {
    pub id: String,
    pub title: String,
    pub property_count: usize,
    pub property_names: Vec<String>,
    pub properties: Map<String, Value>,
}

impl From<DatabaseSchema> for DatabaseStructure {
    fn from(schema: DatabaseSchema) -> Self {
        Self {
            title: plain_text(&schema.title),
            property_count: schema.properties.len(),
            property_names: schema.properties.keys().cloned().collect(),
            id: schema.id,
            properties: schema.properties,
        }
    }
}

pub async fn database_structure<A>(api: &A, database_id: &str) -> AppResult<DatabaseStructure>
where
    A: NotionApi + ?Sized,
{
    let structure = DatabaseStructure::from(api.retrieve_database(database_id).await?);
    tracing::debug!(
        database_id,
        properties = structure.property_count,
        "retrieved database structure"
    );
    Ok(structure)
}

pub async fn list_database_pages<A>(api: &A, database_id: &str) -> AppResult<Vec<DatabasePage>>
where
    A: NotionApi + ?Sized,
{
    let mut pages = Vec::new();
    let mut cursor: Option<String> = None;

    loop {
        let response = api.query_database(database_id, cursor.as_deref()).await?;
        pages.extend(response.results.into_iter().map(DatabasePage::from));
        match response.next_cursor {
            Some(next) if response.has_more && !next.is_empty() => cursor = Some(next),
            _ => break,
        }
    }

    tracing::debug!(database_id, count = pages.len(), "listed database pages");
    Ok(pages)
}
