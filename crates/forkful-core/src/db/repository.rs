//! Recipe repository implementation

use crate::error::{Error, Result};
use crate::models::{Recipe, RecipeId, RecipeRecord};
use libsql::{Connection, Row, Value};

/// Trait for recipe storage operations (async)
///
/// `is_synced = false` rows form the implicit outbox: there is no separate
/// queue table, pending work and current truth live in the same row.
#[allow(async_fn_in_trait)]
pub trait RecipeRepository {
    /// Insert or replace a record by id
    async fn upsert(&self, record: &RecipeRecord) -> Result<()>;

    /// Get a record by id
    async fn get(&self, id: RecipeId) -> Result<Option<RecipeRecord>>;

    /// List favorite records, newest first
    async fn favorites(&self) -> Result<Vec<RecipeRecord>>;

    /// List records whose favorite state has not been confirmed remotely
    async fn unsynced(&self) -> Result<Vec<RecipeRecord>>;

    /// Update the sync flag without touching the favorite flag
    async fn set_synced(&self, id: RecipeId, synced: bool) -> Result<()>;

    /// Update the favorite flag without touching the sync flag
    async fn set_favorite(&self, id: RecipeId, favorite: bool) -> Result<()>;
}

/// libSQL implementation of `RecipeRepository`
pub struct LibSqlRecipeRepository<'a> {
    conn: &'a Connection,
}

const RECORD_COLUMNS: &str = "id, name, description, instructions, cooking_time, \
     difficulty, image_url, ingredients, is_favorite, is_synced, created_at";

impl<'a> LibSqlRecipeRepository<'a> {
    /// Create a new repository with the given connection
    pub const fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Parse a record from a database row
    fn parse_record(row: &Row) -> Result<RecipeRecord> {
        let ingredients_json: String = row.get(7)?;
        let ingredients: Vec<String> = serde_json::from_str(&ingredients_json)?;

        Ok(RecipeRecord {
            id: RecipeId::new(row.get::<i64>(0)?),
            recipe: Recipe {
                name: row.get(1)?,
                description: text_or_null(row, 2)?,
                instructions: row.get(3)?,
                cooking_time: integer_or_null(row, 4)?,
                difficulty: text_or_null(row, 5)?,
                image_url: text_or_null(row, 6)?,
                ingredients,
            },
            is_favorite: row.get::<i32>(8)? != 0,
            is_synced: row.get::<i32>(9)? != 0,
            created_at: row.get(10)?,
        })
    }

    async fn query_records(&self, sql: &str, params: Vec<Value>) -> Result<Vec<RecipeRecord>> {
        let mut rows = self.conn.query(sql, params).await?;
        let mut records = Vec::new();
        while let Some(row) = rows.next().await? {
            records.push(Self::parse_record(&row)?);
        }
        Ok(records)
    }
}

impl RecipeRepository for LibSqlRecipeRepository<'_> {
    async fn upsert(&self, record: &RecipeRecord) -> Result<()> {
        let ingredients = serde_json::to_string(&record.recipe.ingredients)?;
        let params: Vec<Value> = vec![
            Value::from(record.id.get()),
            Value::from(record.recipe.name.clone()),
            opt_text(record.recipe.description.as_deref()),
            Value::from(record.recipe.instructions.clone()),
            opt_integer(record.recipe.cooking_time),
            opt_text(record.recipe.difficulty.as_deref()),
            opt_text(record.recipe.image_url.as_deref()),
            Value::from(ingredients),
            Value::from(i64::from(record.is_favorite)),
            Value::from(i64::from(record.is_synced)),
            Value::from(record.created_at),
        ];

        self.conn
            .execute(
                "INSERT OR REPLACE INTO recipes (id, name, description, instructions, \
                 cooking_time, difficulty, image_url, ingredients, is_favorite, is_synced, \
                 created_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
                params,
            )
            .await?;

        Ok(())
    }

    async fn get(&self, id: RecipeId) -> Result<Option<RecipeRecord>> {
        let mut rows = self
            .conn
            .query(
                &format!("SELECT {RECORD_COLUMNS} FROM recipes WHERE id = ?"),
                vec![Value::from(id.get())],
            )
            .await?;

        match rows.next().await? {
            Some(row) => Ok(Some(Self::parse_record(&row)?)),
            None => Ok(None),
        }
    }

    async fn favorites(&self) -> Result<Vec<RecipeRecord>> {
        self.query_records(
            &format!(
                "SELECT {RECORD_COLUMNS} FROM recipes \
                 WHERE is_favorite = 1 ORDER BY created_at DESC"
            ),
            Vec::new(),
        )
        .await
    }

    async fn unsynced(&self) -> Result<Vec<RecipeRecord>> {
        self.query_records(
            &format!("SELECT {RECORD_COLUMNS} FROM recipes WHERE is_synced = 0"),
            Vec::new(),
        )
        .await
    }

    async fn set_synced(&self, id: RecipeId, synced: bool) -> Result<()> {
        let changed = self
            .conn
            .execute(
                "UPDATE recipes SET is_synced = ? WHERE id = ?",
                vec![Value::from(i64::from(synced)), Value::from(id.get())],
            )
            .await?;

        if changed == 0 {
            tracing::debug!("set_synced({id}, {synced}) matched no row");
        }
        Ok(())
    }

    async fn set_favorite(&self, id: RecipeId, favorite: bool) -> Result<()> {
        let changed = self
            .conn
            .execute(
                "UPDATE recipes SET is_favorite = ? WHERE id = ?",
                vec![Value::from(i64::from(favorite)), Value::from(id.get())],
            )
            .await?;

        if changed == 0 {
            tracing::debug!("set_favorite({id}, {favorite}) matched no row");
        }
        Ok(())
    }
}

fn opt_text(value: Option<&str>) -> Value {
    value.map_or(Value::Null, |text| Value::from(text.to_string()))
}

fn opt_integer(value: Option<i64>) -> Value {
    match value {
        Some(number) => Value::Integer(number),
        None => Value::Null,
    }
}

fn text_or_null(row: &Row, idx: i32) -> Result<Option<String>> {
    match row.get_value(idx)? {
        Value::Null => Ok(None),
        Value::Text(text) => Ok(Some(text)),
        other => Err(Error::Database(format!(
            "expected TEXT or NULL at column {idx}, got {other:?}"
        ))),
    }
}

fn integer_or_null(row: &Row, idx: i32) -> Result<Option<i64>> {
    match row.get_value(idx)? {
        Value::Null => Ok(None),
        Value::Integer(number) => Ok(Some(number)),
        other => Err(Error::Database(format!(
            "expected INTEGER or NULL at column {idx}, got {other:?}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use crate::models::Recipe;

    async fn setup() -> Database {
        Database::open_in_memory().await.unwrap()
    }

    fn sample(id: i64, is_favorite: bool, is_synced: bool) -> RecipeRecord {
        RecipeRecord::new(
            RecipeId::new(id),
            Recipe {
                name: format!("Recipe {id}"),
                description: Some("A test dish".to_string()),
                instructions: "Mix and cook".to_string(),
                cooking_time: Some(25),
                difficulty: Some("easy".to_string()),
                image_url: None,
                ingredients: vec!["eggs".to_string(), "tomatoes".to_string()],
            },
            is_favorite,
            is_synced,
        )
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_upsert_and_get() {
        let db = setup().await;
        let repo = LibSqlRecipeRepository::new(db.connection());

        let record = sample(42, true, false);
        repo.upsert(&record).await.unwrap();

        let fetched = repo.get(RecipeId::new(42)).await.unwrap().unwrap();
        assert_eq!(fetched, record);

        assert!(repo.get(RecipeId::new(7)).await.unwrap().is_none());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_upsert_replaces_by_id() {
        let db = setup().await;
        let repo = LibSqlRecipeRepository::new(db.connection());

        repo.upsert(&sample(1, true, true)).await.unwrap();
        let mut updated = sample(1, false, false);
        updated.recipe.name = "Renamed".to_string();
        repo.upsert(&updated).await.unwrap();

        let fetched = repo.get(RecipeId::new(1)).await.unwrap().unwrap();
        assert_eq!(fetched.recipe.name, "Renamed");
        assert!(!fetched.is_favorite);
        assert!(!fetched.is_synced);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_favorites_filtered_and_newest_first() {
        let db = setup().await;
        let repo = LibSqlRecipeRepository::new(db.connection());

        let mut older = sample(1, true, true);
        older.created_at = 1_000;
        let mut newer = sample(2, true, true);
        newer.created_at = 2_000;
        let mut not_favorite = sample(3, false, true);
        not_favorite.created_at = 3_000;

        repo.upsert(&older).await.unwrap();
        repo.upsert(&newer).await.unwrap();
        repo.upsert(&not_favorite).await.unwrap();

        let favorites = repo.favorites().await.unwrap();
        assert_eq!(favorites.len(), 2);
        assert_eq!(favorites[0].id, RecipeId::new(2));
        assert_eq!(favorites[1].id, RecipeId::new(1));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_unsynced_is_the_outbox() {
        let db = setup().await;
        let repo = LibSqlRecipeRepository::new(db.connection());

        repo.upsert(&sample(1, true, true)).await.unwrap();
        repo.upsert(&sample(2, true, false)).await.unwrap();
        repo.upsert(&sample(3, false, false)).await.unwrap();

        let pending = repo.unsynced().await.unwrap();
        let mut ids: Vec<i64> = pending.iter().map(|r| r.id.get()).collect();
        ids.sort_unstable();
        assert_eq!(ids, vec![2, 3]);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_set_synced_keeps_favorite() {
        let db = setup().await;
        let repo = LibSqlRecipeRepository::new(db.connection());

        repo.upsert(&sample(5, true, false)).await.unwrap();
        repo.set_synced(RecipeId::new(5), true).await.unwrap();

        let fetched = repo.get(RecipeId::new(5)).await.unwrap().unwrap();
        assert!(fetched.is_favorite);
        assert!(fetched.is_synced);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_set_favorite_keeps_synced() {
        let db = setup().await;
        let repo = LibSqlRecipeRepository::new(db.connection());

        repo.upsert(&sample(5, true, true)).await.unwrap();
        repo.set_favorite(RecipeId::new(5), false).await.unwrap();

        let fetched = repo.get(RecipeId::new(5)).await.unwrap().unwrap();
        assert!(!fetched.is_favorite);
        assert!(fetched.is_synced);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_flag_updates_on_missing_row_are_noops() {
        let db = setup().await;
        let repo = LibSqlRecipeRepository::new(db.connection());

        repo.set_synced(RecipeId::new(99), true).await.unwrap();
        repo.set_favorite(RecipeId::new(99), true).await.unwrap();
        assert!(repo.get(RecipeId::new(99)).await.unwrap().is_none());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_nullable_columns_roundtrip() {
        let db = setup().await;
        let repo = LibSqlRecipeRepository::new(db.connection());

        let record = RecipeRecord::new(
            RecipeId::new(-1),
            Recipe::named("Generated dish"),
            true,
            false,
        );
        repo.upsert(&record).await.unwrap();

        let fetched = repo.get(RecipeId::new(-1)).await.unwrap().unwrap();
        assert_eq!(fetched.recipe.description, None);
        assert_eq!(fetched.recipe.cooking_time, None);
        assert!(fetched.recipe.ingredients.is_empty());
        assert!(fetched.id.is_generated());
    }
}
