//! Database layer for Forkful

mod connection;
mod migrations;
mod repository;

pub use connection::Database;
pub use repository::{LibSqlRecipeRepository, RecipeRepository};
