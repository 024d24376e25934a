use std::path::PathBuf;
use std::time::Duration;

use crate::security::keyring;

pub const DEFAULT_API_BASE: &str = "https://api.notion.com/v1";
pub const DEFAULT_NOTION_VERSION: &str = "2022-06-28";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_FETCH_CONCURRENCY: usize = 1;

#[derive(Debug, Clone)]
pub struct NotionConfig {
    pub token: Option<String>,
    pub api_base: String,
    pub version: String,
    pub timeout: Duration,
    pub contents_database_id: Option<String>,
}

impl Default for NotionConfig {
    fn default() -> Self {
        Self {
            token: None,
            api_base: DEFAULT_API_BASE.to_string(),
            version: DEFAULT_NOTION_VERSION.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            contents_database_id: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub notion: NotionConfig,
    pub fetch_concurrency: usize,
    pub data_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            notion: NotionConfig::default(),
            fetch_concurrency: DEFAULT_FETCH_CONCURRENCY,
            data_dir: PathBuf::from(".iron-archive"),
        }
    }
}

impl AppConfig {
    /// Reads the process environment, falling back to the keyring entry for
    /// the Notion token when `NOTION_TOKEN` is unset.
    pub fn from_env() -> Self {
        let mut config = Self::from_lookup(|key| std::env::var(key).ok());
        if config.notion.token.is_none() {
            match keyring::get_notion_token() {
                Ok(token) => config.notion.token = Some(token),
                Err(err) => tracing::debug!(error = %err, "no notion token in keyring"),
            }
        }
        config
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let defaults = Self::default();

        let timeout_secs = parse_or_default(
            "IRON_ARCHIVE_HTTP_TIMEOUT_SECS",
            non_empty("IRON_ARCHIVE_HTTP_TIMEOUT_SECS"),
            DEFAULT_TIMEOUT_SECS,
        );
        let fetch_concurrency = parse_or_default(
            "IRON_ARCHIVE_FETCH_CONCURRENCY",
            non_empty("IRON_ARCHIVE_FETCH_CONCURRENCY"),
            DEFAULT_FETCH_CONCURRENCY,
        )
        .max(1);

        Self {
            notion: NotionConfig {
                token: non_empty("NOTION_TOKEN"),
                api_base: non_empty("NOTION_API_BASE")
                    .map(|base| base.trim_end_matches('/').to_string())
                    .unwrap_or(defaults.notion.api_base),
                version: non_empty("NOTION_VERSION").unwrap_or(defaults.notion.version),
                timeout: Duration::from_secs(timeout_secs),
                contents_database_id: non_empty("NOTION_CONTENTS_DATABASE_ID"),
            },
            fetch_concurrency,
            data_dir: non_empty("IRON_ARCHIVE_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
        }
    }
}

fn parse_or_default<T>(key: &str, raw: Option<String>, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    match raw {
        None => default,
        Some(value) => value.parse().unwrap_or_else(|_| {
            tracing::warn!(key, value = %value, "ignoring unparsable setting");
            default
        }),
    }
}

pub fn env_flag(key: &str) -> bool {
    matches!(
        std::env::var(key)
            .unwrap_or_default()
            .to_ascii_lowercase()
            .as_str(),
        "1" | "true" | "yes" | "on"
    )
}
