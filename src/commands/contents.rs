use uuid::Uuid;

use crate::{
    core::{
        errors::{AppError, AppResult},
        types::{
            ContentDetailResponse, CreateContentResponse, DeleteContentResponse, DocumentState,
            ListContentsResponse, NewContent,
        },
    },
    db::repositories::contents,
    reader::page_id::extract_page_id,
    AppState,
};

fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
}

fn normalized_content(input: NewContent) -> AppResult<NewContent> {
    let title = input.title.trim();
    if title.is_empty() {
        return Err(AppError::InvalidInput("content title cannot be empty".to_string()));
    }
    let notion_url = optional_text(input.notion_url);
    if let Some(url) = notion_url.as_deref() {
        if extract_page_id(url).is_none() {
            return Err(AppError::InvalidIdentifier(format!(
                "document url {url:?} does not reference a notion page"
            )));
        }
    }
    Ok(NewContent {
        title: title.to_string(),
        description: optional_text(input.description),
        thumbnail_url: optional_text(input.thumbnail_url),
        status: input.status,
        notion_url,
    })
}

pub async fn list_contents(state: &AppState) -> AppResult<ListContentsResponse> {
    let contents = contents::list_contents(state.db.pool()).await?;
    Ok(ListContentsResponse { contents })
}

pub async fn create_content(
    state: &AppState,
    input: NewContent,
) -> AppResult<CreateContentResponse> {
    let id = Uuid::new_v4().to_string();
    let normalized = normalized_content(input)?;
    let content = contents::insert_content(state.db.pool(), &id, &normalized).await?;
    tracing::info!(content_id = %content.id, "created content record");
    Ok(CreateContentResponse { content })
}

pub async fn delete_content(
    state: &AppState,
    content_id: &str,
) -> AppResult<DeleteContentResponse> {
    let deleted = contents::delete_content(state.db.pool(), content_id).await?;
    Ok(DeleteContentResponse { deleted })
}

/// Catalog record plus its rendered document. Only the record lookup can fail
/// this call; document problems come back as [`DocumentState::Failed`].
pub async fn get_content_detail(
    state: &AppState,
    content_id: &str,
) -> AppResult<ContentDetailResponse> {
    let content = contents::get_content(state.db.pool(), content_id).await?;

    let document = match content.notion_url.as_deref() {
        None => DocumentState::Missing,
        Some(url) => match state.reader.fetch_page_content(url).await {
            Ok(page) => DocumentState::Loaded { page },
            Err(err) => {
                tracing::warn!(content_id, error = %err, "document fetch failed");
                DocumentState::Failed {
                    code: err.code().to_string(),
                    message: err.to_string(),
                    retryable: err.retryable(),
                }
            }
        },
    };

    Ok(ContentDetailResponse { content, document })
}
