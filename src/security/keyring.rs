use crate::core::errors::{AppError, AppResult};

const SERVICE: &str = "iron-archive";
const NOTION_USER: &str = "notion";

pub fn set_notion_token(token: &str) -> AppResult<()> {
    let entry = keyring::Entry::new(SERVICE, NOTION_USER)
        .map_err(|err| AppError::Internal(err.to_string()))?;
    entry
        .set_password(token)
        .map_err(|err| AppError::Internal(err.to_string()))
}

pub fn get_notion_token() -> AppResult<String> {
    let entry = keyring::Entry::new(SERVICE, NOTION_USER)
        .map_err(|err| AppError::Internal(err.to_string()))?;
    entry
        .get_password()
        .map_err(|_err| AppError::MissingCredential)
}
