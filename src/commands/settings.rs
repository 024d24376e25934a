use crate::{
    core::{
        errors::{AppError, AppResult},
        types::SetNotionTokenResponse,
    },
    security::keyring,
};

pub fn set_notion_token(token: &str) -> AppResult<SetNotionTokenResponse> {
    let token = token.trim();
    if token.is_empty() {
        return Err(AppError::InvalidInput("notion token cannot be empty".to_string()));
    }
    keyring::set_notion_token(token)?;
    tracing::info!("stored notion token in keyring");
    Ok(SetNotionTokenResponse { stored: true })
}
