//! Data models for Forkful

mod recipe;

pub use recipe::{Recipe, RecipeId, RecipeRecord};
