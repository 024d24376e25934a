use crate::{
    core::{
        errors::{AppError, AppResult},
        types::DatabasePagesResponse,
    },
    reader::{
        block::PageContent,
        database::{self, DatabaseStructure},
    },
    AppState,
};

pub async fn get_page_content(state: &AppState, page_url: &str) -> AppResult<PageContent> {
    if page_url.trim().is_empty() {
        return Err(AppError::InvalidIdentifier("page url cannot be empty".to_string()));
    }
    state.reader.fetch_page_content(page_url).await
}

fn configured_database_id(state: &AppState) -> AppResult<&str> {
    state
        .config
        .notion
        .contents_database_id
        .as_deref()
        .ok_or_else(|| {
            AppError::InvalidInput("NOTION_CONTENTS_DATABASE_ID is not configured".to_string())
        })
}

pub async fn list_database_pages(state: &AppState) -> AppResult<DatabasePagesResponse> {
    let database_id = configured_database_id(state)?;
    let pages = database::list_database_pages(state.reader.api(), database_id).await?;
    Ok(DatabasePagesResponse { pages })
}

pub async fn get_database_structure(state: &AppState) -> AppResult<DatabaseStructure> {
    let database_id = configured_database_id(state)?;
    database::database_structure(state.reader.api(), database_id).await
}
