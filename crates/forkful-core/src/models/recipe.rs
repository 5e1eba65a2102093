//! Recipe model

use serde::{Deserialize, Serialize};
use std::fmt;

/// A stable recipe identity.
///
/// Positive ids come from the recipe catalog. Negative ids mark recipes
/// minted locally for AI-generated content the catalog has never seen; the
/// partition only matters for routing detail lookups, never for sync.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct RecipeId(i64);

impl RecipeId {
    /// Wrap a raw catalog or generated id
    #[must_use]
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// Get the raw id value
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }

    /// Whether this id belongs to the AI-generated partition
    #[must_use]
    pub const fn is_generated(self) -> bool {
        self.0 < 0
    }
}

impl fmt::Display for RecipeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for RecipeId {
    fn from(raw: i64) -> Self {
        Self(raw)
    }
}

/// Recipe content as served by the catalog or the generation service.
///
/// The sync engine treats this as an opaque payload; only `name` is ever
/// inspected, for logging.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    pub name: String,
    pub description: Option<String>,
    pub instructions: String,
    /// Cooking time in minutes
    pub cooking_time: Option<i64>,
    pub difficulty: Option<String>,
    pub image_url: Option<String>,
    pub ingredients: Vec<String>,
}

impl Recipe {
    /// Create a minimal recipe with just a name
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// A stored recipe row together with its favorite and sync flags.
///
/// `is_synced` doubles as the implicit outbox: every record with
/// `is_synced = false` carries a local intent that has not been confirmed by
/// the remote authority yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeRecord {
    pub id: RecipeId,
    pub recipe: Recipe,
    /// Current local favorite state
    pub is_favorite: bool,
    /// True iff the remote authority is known to agree with `is_favorite`
    pub is_synced: bool,
    /// Creation timestamp (Unix ms), informational only
    pub created_at: i64,
}

impl RecipeRecord {
    /// Create a record stamped with the current time
    #[must_use]
    pub fn new(id: RecipeId, recipe: Recipe, is_favorite: bool, is_synced: bool) -> Self {
        Self {
            id,
            recipe,
            is_favorite,
            is_synced,
            created_at: chrono::Utc::now().timestamp_millis(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_partition() {
        assert!(RecipeId::new(-3).is_generated());
        assert!(!RecipeId::new(42).is_generated());
        assert!(!RecipeId::new(0).is_generated());
    }

    #[test]
    fn test_id_display_roundtrip() {
        let id = RecipeId::new(-17);
        assert_eq!(id.to_string(), "-17");
        assert_eq!(RecipeId::from(id.get()), id);
    }

    #[test]
    fn test_record_new() {
        let record = RecipeRecord::new(RecipeId::new(1), Recipe::named("Menemen"), true, false);
        assert_eq!(record.recipe.name, "Menemen");
        assert!(record.is_favorite);
        assert!(!record.is_synced);
        assert!(record.created_at > 0);
    }

    #[test]
    fn test_recipe_id_serde_transparent() {
        let json = serde_json::to_string(&RecipeId::new(42)).unwrap();
        assert_eq!(json, "42");
        let parsed: RecipeId = serde_json::from_str("42").unwrap();
        assert_eq!(parsed, RecipeId::new(42));
    }
}
