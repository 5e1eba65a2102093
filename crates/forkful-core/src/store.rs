//! Shared record store service used across clients.
//!
//! Wraps the database behind a cloneable handle and republishes the favorites
//! snapshot on a watch channel after every mutation. Consumers that need push
//! delivery subscribe; the sync engine itself only ever takes point-in-time
//! reads.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::{watch, Mutex};

use crate::db::{Database, LibSqlRecipeRepository, RecipeRepository};
use crate::models::{RecipeId, RecipeRecord};
use crate::Result;

/// Thread-safe record store with a live favorites stream.
#[derive(Clone)]
pub struct RecipeStore {
    db: Arc<Mutex<Database>>,
    favorites_tx: Arc<watch::Sender<Vec<RecipeRecord>>>,
}

impl RecipeStore {
    /// Open a store at the given filesystem path.
    pub async fn open_path(db_path: impl Into<PathBuf>) -> Result<Self> {
        let db_path = db_path.into();
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        Self::from_database(Database::open(&db_path).await?).await
    }

    /// Open an in-memory store (primarily for tests).
    pub async fn open_in_memory() -> Result<Self> {
        Self::from_database(Database::open_in_memory().await?).await
    }

    async fn from_database(db: Database) -> Result<Self> {
        let favorites = {
            let repo = LibSqlRecipeRepository::new(db.connection());
            repo.favorites().await?
        };
        let (favorites_tx, _rx) = watch::channel(favorites);

        Ok(Self {
            db: Arc::new(Mutex::new(db)),
            favorites_tx: Arc::new(favorites_tx),
        })
    }

    /// Insert or replace a record by id.
    pub async fn upsert(&self, record: &RecipeRecord) -> Result<()> {
        {
            let db = self.db.lock().await;
            let repo = LibSqlRecipeRepository::new(db.connection());
            repo.upsert(record).await?;
        }
        self.publish().await
    }

    /// Fetch a record by id.
    pub async fn get(&self, id: RecipeId) -> Result<Option<RecipeRecord>> {
        let db = self.db.lock().await;
        let repo = LibSqlRecipeRepository::new(db.connection());
        repo.get(id).await
    }

    /// List favorite records, newest first.
    pub async fn favorites(&self) -> Result<Vec<RecipeRecord>> {
        let db = self.db.lock().await;
        let repo = LibSqlRecipeRepository::new(db.connection());
        repo.favorites().await
    }

    /// List records with pending, unconfirmed favorite state.
    pub async fn unsynced(&self) -> Result<Vec<RecipeRecord>> {
        let db = self.db.lock().await;
        let repo = LibSqlRecipeRepository::new(db.connection());
        repo.unsynced().await
    }

    /// Update the sync flag for a record, leaving the favorite flag alone.
    pub async fn set_synced(&self, id: RecipeId, synced: bool) -> Result<()> {
        {
            let db = self.db.lock().await;
            let repo = LibSqlRecipeRepository::new(db.connection());
            repo.set_synced(id, synced).await?;
        }
        self.publish().await
    }

    /// Update the favorite flag for a record, leaving the sync flag alone.
    pub async fn set_favorite(&self, id: RecipeId, favorite: bool) -> Result<()> {
        {
            let db = self.db.lock().await;
            let repo = LibSqlRecipeRepository::new(db.connection());
            repo.set_favorite(id, favorite).await?;
        }
        self.publish().await
    }

    /// Subscribe to the live favorites snapshot.
    pub fn subscribe(&self) -> watch::Receiver<Vec<RecipeRecord>> {
        self.favorites_tx.subscribe()
    }

    /// Last published favorites snapshot, without touching the database.
    pub fn favorites_snapshot(&self) -> Vec<RecipeRecord> {
        self.favorites_tx.borrow().clone()
    }

    /// Reactive id -> favorite map derived from the current snapshot.
    pub fn favorite_states(&self) -> HashMap<RecipeId, bool> {
        self.favorites_tx
            .borrow()
            .iter()
            .map(|record| (record.id, true))
            .collect()
    }

    async fn publish(&self) -> Result<()> {
        let favorites = self.favorites().await?;
        self.favorites_tx.send_replace(favorites);
        Ok(())
    }
}
