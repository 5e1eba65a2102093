//! Wire shapes for the favorites backend.

use serde::{Deserialize, Serialize};

use crate::models::{Recipe, RecipeId, RecipeRecord};

/// Recipe as returned by the favorites endpoints (snake_case on the wire).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeDto {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub instructions: String,
    #[serde(default)]
    pub cooking_time: Option<i64>,
    #[serde(default)]
    pub difficulty: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub ingredients: Option<Vec<String>>,
}

impl RecipeDto {
    /// Convert into a stored record with the given flags, stamped now.
    #[must_use]
    pub fn into_record(self, is_favorite: bool, is_synced: bool) -> RecipeRecord {
        RecipeRecord::new(
            RecipeId::new(self.id),
            Recipe {
                name: self.name,
                description: self.description,
                instructions: self.instructions,
                cooking_time: self.cooking_time,
                difficulty: self.difficulty,
                image_url: self.image_url,
                ingredients: self.ingredients.unwrap_or_default(),
            },
            is_favorite,
            is_synced,
        )
    }
}

/// Payload pushed with an add-favorite call (camelCase on the wire).
///
/// Carries the full content because the favorite may not otherwise exist on
/// the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddFavoriteRequest {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub instructions: String,
    pub cooking_time: Option<i64>,
    pub difficulty: Option<String>,
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ingredients: Option<Vec<String>>,
}

impl AddFavoriteRequest {
    /// Build the push payload for a stored record.
    #[must_use]
    pub fn from_record(record: &RecipeRecord) -> Self {
        Self {
            id: record.id.get(),
            name: record.recipe.name.clone(),
            description: record.recipe.description.clone(),
            instructions: record.recipe.instructions.clone(),
            cooking_time: record.recipe.cooking_time,
            difficulty: record.recipe.difficulty.clone(),
            image_url: record.recipe.image_url.clone(),
            ingredients: if record.recipe.ingredients.is_empty() {
                None
            } else {
                Some(record.recipe.ingredients.clone())
            },
        }
    }
}
