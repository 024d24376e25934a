pub mod cli;
pub mod commands;
pub mod core;
pub mod db;
pub mod providers;
pub mod reader;
pub mod security;

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::core::{
    config::{env_flag, AppConfig},
    errors::AppResult,
};
use db::Database;
use providers::notion::{NotionApi, NotionClient};
use reader::fetcher::BlockFetcher;

fn log_filter_from_env() -> EnvFilter {
    let directive = std::env::var("IRON_ARCHIVE_LOG")
        .or_else(|_| std::env::var("RUST_LOG"))
        .unwrap_or_else(|_| "info".to_string())
        .to_ascii_lowercase();
    let directive = if env_flag("IRON_ARCHIVE_SQLX_DEBUG") {
        directive
    } else {
        format!("{directive},sqlx::query=warn")
    };
    EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new("info,sqlx::query=warn"))
}

/// Installs the global subscriber. Output goes to stderr so stdout stays
/// reserved for command results.
pub fn init_tracing() {
    let filter = log_filter_from_env();
    if env_flag("IRON_ARCHIVE_LOG_JSON") {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub reader: BlockFetcher<Arc<dyn NotionApi>>,
    pub config: AppConfig,
}

impl AppState {
    pub async fn new(config: AppConfig) -> AppResult<Self> {
        let db = Database::new(&config.data_dir).await?;
        let client = NotionClient::new(&config.notion)?;
        Ok(Self::with_api(db, Arc::new(client), config))
    }

    pub fn with_api(db: Database, api: Arc<dyn NotionApi>, config: AppConfig) -> Self {
        let reader = BlockFetcher::new(api, config.fetch_concurrency);
        Self { db, reader, config }
    }
}
