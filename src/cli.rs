use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use serde::Serialize;

use crate::{
    commands,
    core::{
        config::AppConfig,
        errors::AppResult,
        types::{ContentStatus, NewContent},
    },
    AppState,
};

#[derive(Parser)]
#[command(name = "iron-archive")]
#[command(version, about = "Browse the content catalog and read its Notion documents")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch a Notion page (id or URL) as a flat block sequence
    Page { page: String },
    /// Content catalog operations
    #[command(subcommand)]
    Contents(ContentsCommand),
    /// Notion database operations
    #[command(subcommand)]
    Database(DatabaseCommand),
    /// Local settings
    #[command(subcommand)]
    Settings(SettingsCommand),
}

#[derive(Debug, Subcommand)]
pub enum ContentsCommand {
    /// List catalog records, newest first
    List,
    /// Show a record together with its rendered document
    Show { id: String },
    /// Add a record
    Add(AddContent),
    /// Remove a record
    Remove { id: String },
}

#[derive(Debug, Args)]
pub struct AddContent {
    #[arg(long)]
    pub title: String,
    #[arg(long)]
    pub notion_url: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub thumbnail_url: Option<String>,
    #[arg(long, default_value = "published", value_parser = parse_status)]
    pub status: ContentStatus,
}

#[derive(Debug, Subcommand)]
pub enum DatabaseCommand {
    /// List pages of the configured contents database
    Pages,
    /// Show the title and property columns of the configured contents database
    Structure,
}

#[derive(Debug, Subcommand)]
pub enum SettingsCommand {
    /// Store the Notion integration token in the OS keyring
    SetToken { token: String },
}

fn parse_status(raw: &str) -> Result<ContentStatus, String> {
    ContentStatus::from_str(raw)
        .ok_or_else(|| format!("unknown status {raw:?}; expected draft, published or archived"))
}

fn print_json<T: Serialize>(value: &T) -> AppResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn load_state() -> AppResult<AppState> {
    AppState::new(AppConfig::from_env()).await
}

async fn execute(command: Command) -> AppResult<()> {
    match command {
        Command::Settings(SettingsCommand::SetToken { token }) => {
            print_json(&commands::settings::set_notion_token(&token)?)
        }
        Command::Page { page } => {
            let state = load_state().await?;
            print_json(&commands::notion::get_page_content(&state, &page).await?)
        }
        Command::Contents(ContentsCommand::List) => {
            let state = load_state().await?;
            print_json(&commands::contents::list_contents(&state).await?)
        }
        Command::Contents(ContentsCommand::Show { id }) => {
            let state = load_state().await?;
            print_json(&commands::contents::get_content_detail(&state, &id).await?)
        }
        Command::Contents(ContentsCommand::Add(add)) => {
            let state = load_state().await?;
            let input = NewContent {
                title: add.title,
                description: add.description,
                thumbnail_url: add.thumbnail_url,
                status: add.status,
                notion_url: add.notion_url,
            };
            print_json(&commands::contents::create_content(&state, input).await?)
        }
        Command::Contents(ContentsCommand::Remove { id }) => {
            let state = load_state().await?;
            print_json(&commands::contents::delete_content(&state, &id).await?)
        }
        Command::Database(DatabaseCommand::Pages) => {
            let state = load_state().await?;
            print_json(&commands::notion::list_database_pages(&state).await?)
        }
        Command::Database(DatabaseCommand::Structure) => {
            let state = load_state().await?;
            print_json(&commands::notion::get_database_structure(&state).await?)
        }
    }
}

pub async fn run(args: Vec<String>) -> ExitCode {
    let cli = Cli::try_parse_from(args).unwrap_or_else(|e| {
        e.exit();
    });

    match execute(cli.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(code = err.code(), error = %err, "command failed");
            match serde_json::to_string_pretty(&err) {
                Ok(body) => eprintln!("{body}"),
                Err(_) => eprintln!("{err}"),
            }
            ExitCode::FAILURE
        }
    }
}
