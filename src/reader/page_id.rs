use std::sync::LazyLock;

use regex::Regex;
use url::Url;

use crate::core::errors::{AppError, AppResult};

static UUID_EXACT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}$")
        .expect("static pattern")
});
static HEX32_EXACT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^[0-9a-f]{32}$").expect("static pattern"));
static UUID_ANYWHERE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}")
        .expect("static pattern")
});
static HEX32_ANYWHERE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)[0-9a-f]{32}").expect("static pattern"));

fn is_bare_id(candidate: &str) -> bool {
    UUID_EXACT.is_match(candidate) || HEX32_EXACT.is_match(candidate)
}

/// Hyphenated UUIDs win over any 32-hex run anywhere in `haystack`.
fn find_embedded_id(haystack: &str) -> Option<&str> {
    UUID_ANYWHERE
        .find(haystack)
        .or_else(|| HEX32_ANYWHERE.find(haystack))
        .map(|found| found.as_str())
}

/// Pulls a page id out of a bare id or a Notion URL. The URL path is searched
/// before anything else so that `?v=<32hex>` view ids never shadow the page.
pub fn extract_page_id(input: &str) -> Option<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }
    if is_bare_id(trimmed) {
        return Some(trimmed.to_string());
    }

    match Url::parse(trimmed) {
        Ok(parsed) => {
            let path = parsed.path();
            if let Some(found) = find_embedded_id(path) {
                return Some(found.to_string());
            }
            let path_only = path.strip_prefix('/').unwrap_or(path);
            is_bare_id(path_only).then(|| path_only.to_string())
        }
        Err(_) => find_embedded_id(trimmed).map(ToString::to_string),
    }
}

/// Canonical form used on the wire: the id with every hyphen removed.
pub fn canonical_page_id(page_id: &str) -> String {
    page_id.replace('-', "")
}

pub fn normalize_page_id(input: &str) -> AppResult<String> {
    extract_page_id(input).ok_or_else(|| {
        AppError::InvalidIdentifier(format!("no notion page id in {:?}", input.trim()))
    })
}
