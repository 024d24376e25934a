use serde_json::{Map, Value};

use crate::reader::block::{PageProperty, RichText};

pub fn plain_text(fragments: &[RichText]) -> String {
    fragments
        .iter()
        .map(|fragment| fragment.plain_text.as_str())
        .collect::<String>()
        .trim()
        .to_string()
}

/// Title of a page from its property map.
///
/// Notion pages carry at most one `title`-typed property, under whatever name
/// the workspace chose. The scan takes the first non-empty one it meets and
/// assumes there is no second to disagree with.
pub fn extract_page_title(properties: &Map<String, Value>) -> Option<String> {
    properties
        .values()
        .filter(|value| value.get("type").and_then(Value::as_str) == Some("title"))
        .filter_map(|value| serde_json::from_value::<PageProperty>(value.clone()).ok())
        .find_map(|property| property.title.filter(|fragments| !fragments.is_empty()))
        .map(|fragments| plain_text(&fragments))
        .filter(|title| !title.is_empty())
}
