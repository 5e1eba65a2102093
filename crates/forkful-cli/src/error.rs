use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] forkful_core::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error("Authentication error: {0}")]
    Auth(String),
    #[error("Recipe {0} is not cached locally; pass at least --name to create it")]
    MissingRecipeContent(i64),
    #[error("Sync pass left records pending; run `forkful sync` again later")]
    SyncIncomplete,
    #[error("No API token stored. Run `forkful auth set-token <TOKEN>` or set FORKFUL_API_TOKEN.")]
    NoToken,
}
