use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "forkful")]
#[command(about = "Keep your recipe favorites in sync, even offline")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Optional path to the local database file
    #[arg(long, global = true, value_name = "PATH")]
    pub db_path: Option<PathBuf>,

    /// Favorites API base URL (default: FORKFUL_API_URL or http://localhost:3000/api)
    #[arg(long, global = true, value_name = "URL")]
    pub api_url: Option<String>,

    /// Bearer token override (default: FORKFUL_API_TOKEN or the stored token)
    #[arg(long, global = true, value_name = "TOKEN")]
    pub token: Option<String>,

    /// Treat the network as unavailable
    #[arg(long, global = true)]
    pub offline: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List cached favorites
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Reload favorites from the backend, merging into the local cache
    Refresh {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Flip the favorite flag for a recipe
    Toggle {
        /// Recipe id (negative ids are AI-generated recipes)
        id: i64,
        /// Recipe name (required the first time a recipe is seen)
        #[arg(long)]
        name: Option<String>,
        /// Recipe description
        #[arg(long)]
        description: Option<String>,
        /// Cooking instructions
        #[arg(long)]
        instructions: Option<String>,
        /// Cooking time in minutes
        #[arg(long, value_name = "MINUTES")]
        cooking_time: Option<i64>,
        /// Difficulty label
        #[arg(long)]
        difficulty: Option<String>,
        /// Image URL
        #[arg(long, value_name = "URL")]
        image_url: Option<String>,
        /// Ingredient (repeatable)
        #[arg(long = "ingredient", value_name = "NAME")]
        ingredients: Vec<String>,
    },
    /// Check whether a recipe is favorited (local cache only)
    Check {
        /// Recipe id
        id: i64,
    },
    /// Push pending favorite changes to the backend now
    Sync,
    /// Manage the stored API token
    Auth {
        #[command(subcommand)]
        command: AuthCommands,
    },
    /// Generate shell completion scripts
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: CompletionShell,
        /// Optional output path (stdout when omitted)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum AuthCommands {
    /// Store an API token in the system keychain
    SetToken {
        /// Bearer token issued by the backend
        token: String,
    },
    /// Show whether a token is stored
    Status,
    /// Remove the stored token
    Clear,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum CompletionShell {
    Bash,
    Zsh,
    Fish,
}
