//! Forkful CLI - favorites that survive flaky connectivity
//!
//! Thin client over forkful-core: toggles land locally first, `sync` pushes
//! pending changes, `refresh` reconciles against the backend.

mod cli;
mod error;
mod token_store;

use std::env;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{CommandFactory, Parser};
use clap_complete::aot::Generator;
use clap_complete::{generate, shells};
use serde::Serialize;

use forkful_core::auth::{CredentialProvider, StaticCredential};
use forkful_core::net::{AssumeOffline, AssumeOnline, ConnectivityProbe};
use forkful_core::remote::HttpFavoriteApi;
use forkful_core::{FavoriteHub, Recipe, RecipeId, RecipeRecord, RecipeStore, SyncOutcome};

use crate::cli::{AuthCommands, Cli, Commands, CompletionShell};
use crate::error::CliError;
use crate::token_store::TokenStore;

const DEFAULT_API_URL: &str = "http://localhost:3000/api";

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), CliError> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("forkful=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();
    let db_path = resolve_db_path(cli.db_path.clone());
    let api_url = resolve_api_url(cli.api_url.clone());

    match cli.command {
        Commands::List { json } => run_list(json, &db_path).await,
        Commands::Refresh { json } => {
            let hub = open_hub(&db_path, &api_url, cli.token, cli.offline).await?;
            let favorites = hub.load_favorites().await?;
            print_favorites(&favorites, json)
        }
        Commands::Toggle {
            id,
            name,
            description,
            instructions,
            cooking_time,
            difficulty,
            image_url,
            ingredients,
        } => {
            let hub = open_hub(&db_path, &api_url, cli.token, cli.offline).await?;
            run_toggle(
                &hub,
                RecipeId::new(id),
                ToggleContent {
                    name,
                    description,
                    instructions,
                    cooking_time,
                    difficulty,
                    image_url,
                    ingredients,
                },
                cli.offline,
            )
            .await
        }
        Commands::Check { id } => {
            let hub = open_hub(&db_path, &api_url, cli.token, cli.offline).await?;
            let favorite = hub.is_favorite(RecipeId::new(id)).await?;
            println!("{}", if favorite { "favorite" } else { "not favorite" });
            Ok(())
        }
        Commands::Sync => {
            let credentials = resolve_credentials(cli.token.clone());
            if credentials.credential().is_none() {
                return Err(CliError::NoToken);
            }
            let hub = open_hub(&db_path, &api_url, cli.token, cli.offline).await?;
            match hub.sync_now().await? {
                SyncOutcome::Success => {
                    println!("Sync completed");
                    Ok(())
                }
                SyncOutcome::RetryNeeded => Err(CliError::SyncIncomplete),
            }
        }
        Commands::Auth { command } => run_auth(&command),
        Commands::Completions { shell, output } => run_completions(shell, output.as_deref()),
    }
}

async fn open_hub(
    db_path: &Path,
    api_url: &str,
    token_override: Option<String>,
    offline: bool,
) -> Result<FavoriteHub, CliError> {
    tracing::debug!("opening database at {}", db_path.display());
    let store = RecipeStore::open_path(db_path).await?;
    let api = HttpFavoriteApi::new(api_url)?;
    let credentials = resolve_credentials(token_override);
    let probe: Arc<dyn ConnectivityProbe> = if offline {
        Arc::new(AssumeOffline)
    } else {
        Arc::new(AssumeOnline)
    };

    Ok(FavoriteHub::new(store, Arc::new(api), credentials, probe))
}

fn resolve_credentials(token_override: Option<String>) -> Arc<dyn CredentialProvider> {
    if let Some(token) = token_override.filter(|token| !token.trim().is_empty()) {
        return Arc::new(StaticCredential::new(token));
    }
    if let Ok(token) = env::var("FORKFUL_API_TOKEN") {
        if !token.trim().is_empty() {
            return Arc::new(StaticCredential::new(token));
        }
    }
    Arc::new(TokenStore)
}

async fn run_list(as_json: bool, db_path: &Path) -> Result<(), CliError> {
    let store = RecipeStore::open_path(db_path).await?;
    let favorites = store.favorites().await?;
    print_favorites(&favorites, as_json)
}

struct ToggleContent {
    name: Option<String>,
    description: Option<String>,
    instructions: Option<String>,
    cooking_time: Option<i64>,
    difficulty: Option<String>,
    image_url: Option<String>,
    ingredients: Vec<String>,
}

async fn run_toggle(
    hub: &FavoriteHub,
    id: RecipeId,
    content: ToggleContent,
    offline: bool,
) -> Result<(), CliError> {
    let recipe = match (hub.store().get(id).await?, content.name) {
        (_, Some(name)) => Recipe {
            name,
            description: content.description,
            instructions: content.instructions.unwrap_or_default(),
            cooking_time: content.cooking_time,
            difficulty: content.difficulty,
            image_url: content.image_url,
            ingredients: content.ingredients,
        },
        (Some(record), None) => record.recipe,
        (None, None) => return Err(CliError::MissingRecipeContent(id.get())),
    };

    let now_favorite = hub.toggle_favorite(id, &recipe).await?;
    println!(
        "{} '{}' ({id})",
        if now_favorite {
            "Favorited"
        } else {
            "Unfavorited"
        },
        recipe.name
    );

    if offline {
        println!("Offline: change kept locally, run `forkful sync` when back online");
        return Ok(());
    }

    match hub.sync_now().await? {
        SyncOutcome::Success => println!("Favorites synced"),
        SyncOutcome::RetryNeeded => {
            println!("Backend unreachable: change kept locally, run `forkful sync` later");
        }
    }
    Ok(())
}

fn run_auth(command: &AuthCommands) -> Result<(), CliError> {
    let store = TokenStore;
    match command {
        AuthCommands::SetToken { token } => {
            if token.trim().is_empty() {
                return Err(CliError::Auth("token must not be empty".to_string()));
            }
            store.save_token(token.trim())?;
            println!("Token stored");
            Ok(())
        }
        AuthCommands::Status => {
            if env::var("FORKFUL_API_TOKEN").is_ok_and(|token| !token.trim().is_empty()) {
                println!("Using token from FORKFUL_API_TOKEN");
            } else if store.load_token()?.is_some() {
                println!("Token stored in keychain");
            } else {
                println!("No token stored");
            }
            Ok(())
        }
        AuthCommands::Clear => {
            store.clear_token()?;
            println!("Token cleared");
            Ok(())
        }
    }
}

#[derive(Debug, Serialize)]
struct FavoriteListItem {
    id: i64,
    name: String,
    cooking_time: Option<i64>,
    difficulty: Option<String>,
    synced: bool,
    created_at: i64,
    created: String,
}

fn favorite_to_item(record: &RecipeRecord) -> FavoriteListItem {
    let created = chrono::DateTime::from_timestamp_millis(record.created_at)
        .map(|stamp| stamp.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_default();

    FavoriteListItem {
        id: record.id.get(),
        name: record.recipe.name.clone(),
        cooking_time: record.recipe.cooking_time,
        difficulty: record.recipe.difficulty.clone(),
        synced: record.is_synced,
        created_at: record.created_at,
        created,
    }
}

fn print_favorites(favorites: &[RecipeRecord], as_json: bool) -> Result<(), CliError> {
    if as_json {
        let items = favorites
            .iter()
            .map(favorite_to_item)
            .collect::<Vec<FavoriteListItem>>();
        println!("{}", serde_json::to_string_pretty(&items)?);
        return Ok(());
    }

    if favorites.is_empty() {
        println!("No favorites yet.");
        return Ok(());
    }

    for line in format_favorite_lines(favorites) {
        println!("{line}");
    }
    Ok(())
}

fn format_favorite_lines(favorites: &[RecipeRecord]) -> Vec<String> {
    favorites
        .iter()
        .map(|record| {
            let mut line = format!("{:>8}  {}", record.id.get(), record.recipe.name);
            if let Some(minutes) = record.recipe.cooking_time {
                line.push_str(&format!("  [{minutes} min]"));
            }
            if !record.is_synced {
                line.push_str("  (pending sync)");
            }
            line
        })
        .collect()
}

fn run_completions(shell: CompletionShell, output_path: Option<&Path>) -> Result<(), CliError> {
    let mut command = Cli::command();
    let mut buffer = Vec::new();

    match shell {
        CompletionShell::Bash => generate_for_shell(shells::Bash, &mut command, &mut buffer),
        CompletionShell::Zsh => generate_for_shell(shells::Zsh, &mut command, &mut buffer),
        CompletionShell::Fish => generate_for_shell(shells::Fish, &mut command, &mut buffer),
    }

    if let Some(path) = output_path {
        std::fs::write(path, &buffer)?;
        println!("{}", path.display());
    } else {
        io::stdout().write_all(&buffer)?;
    }

    Ok(())
}

fn generate_for_shell<G: Generator>(
    generator: G,
    command: &mut clap::Command,
    buffer: &mut Vec<u8>,
) {
    generate(generator, command, "forkful", buffer);
}

fn resolve_db_path(flag: Option<PathBuf>) -> PathBuf {
    if let Some(path) = flag {
        return path;
    }
    if let Ok(path) = env::var("FORKFUL_DB_PATH") {
        if !path.trim().is_empty() {
            return PathBuf::from(path);
        }
    }
    dirs::data_dir().map_or_else(
        || PathBuf::from("forkful.db"),
        |data| data.join("forkful").join("forkful.db"),
    )
}

fn resolve_api_url(flag: Option<String>) -> String {
    if let Some(url) = flag.filter(|url| !url.trim().is_empty()) {
        return url;
    }
    if let Ok(url) = env::var("FORKFUL_API_URL") {
        if !url.trim().is_empty() {
            return url;
        }
    }
    DEFAULT_API_URL.to_string()
}
