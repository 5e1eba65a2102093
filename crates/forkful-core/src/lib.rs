//! forkful-core - Core library for Forkful
//!
//! Offline-first favorites for a recipe client: a durable record store with a
//! live favorites stream, a reconciliation engine that merges remote truth
//! without clobbering pending local writes, and a background sync worker with
//! idempotent push semantics.

pub mod auth;
pub mod db;
pub mod error;
pub mod favorites;
pub mod models;
pub mod net;
pub mod remote;
pub mod store;
pub mod sync;

pub use error::{Error, Result};
pub use favorites::FavoriteHub;
pub use models::{Recipe, RecipeId, RecipeRecord};
pub use store::RecipeStore;
pub use sync::SyncOutcome;
