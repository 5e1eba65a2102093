//! One-way merge of remote favorite truth into the local store.
//!
//! # Algorithm
//!
//! 1. Upsert every remote favorite that has no pending local write.
//! 2. Skip every remote favorite whose local record is dirty - the pending
//!    local intent outranks remote truth. Without this rule a remote list
//!    that still contains a just-removed favorite would resurrect it.
//! 3. Demote local favorites that are synced but absent from the remote
//!    list; the flag flips, the sync state stays confirmed.

use std::collections::HashSet;

use crate::models::{RecipeId, RecipeRecord};
use crate::remote::RecipeDto;
use crate::store::RecipeStore;
use crate::Result;

/// Merges a remote-authoritative favorite list into the record store.
pub struct Reconciler<'a> {
    store: &'a RecipeStore,
}

impl<'a> Reconciler<'a> {
    /// Create a reconciler over the given store.
    pub const fn new(store: &'a RecipeStore) -> Self {
        Self { store }
    }

    /// Merge the remote list and return the resulting favorites snapshot.
    pub async fn merge(&self, remote: Vec<RecipeDto>) -> Result<Vec<RecipeRecord>> {
        let remote_ids: HashSet<RecipeId> =
            remote.iter().map(|dto| RecipeId::new(dto.id)).collect();

        for dto in remote {
            let id = RecipeId::new(dto.id);
            if let Some(local) = self.store.get(id).await? {
                if !local.is_synced {
                    tracing::debug!(
                        "pending local write wins for '{}' ({id})",
                        local.recipe.name
                    );
                    continue;
                }
            }

            self.store.upsert(&dto.into_record(true, true)).await?;
        }

        for local in self.store.favorites().await? {
            if local.is_synced && !remote_ids.contains(&local.id) {
                tracing::debug!(
                    "'{}' ({}) is no longer a remote favorite, demoting",
                    local.recipe.name,
                    local.id
                );
                self.store.set_favorite(local.id, false).await?;
            }
        }

        self.store.favorites().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Recipe;

    fn dto(id: i64) -> RecipeDto {
        RecipeDto {
            id,
            name: format!("Recipe {id}"),
            description: None,
            instructions: "Cook".to_string(),
            cooking_time: None,
            difficulty: None,
            image_url: None,
            created_at: None,
            ingredients: None,
        }
    }

    fn record(id: i64, is_favorite: bool, is_synced: bool) -> RecipeRecord {
        RecipeRecord::new(
            RecipeId::new(id),
            Recipe::named(format!("Recipe {id}")),
            is_favorite,
            is_synced,
        )
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_merge_inserts_new_remote_favorites() {
        let store = RecipeStore::open_in_memory().await.unwrap();

        let merged = Reconciler::new(&store)
            .merge(vec![dto(1), dto(2)])
            .await
            .unwrap();

        assert_eq!(merged.len(), 2);
        for favorite in merged {
            assert!(favorite.is_favorite);
            assert!(favorite.is_synced);
        }
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_merge_overwrites_clean_records() {
        let store = RecipeStore::open_in_memory().await.unwrap();
        // locally demoted and confirmed; remote says it is a favorite again
        store.upsert(&record(1, false, true)).await.unwrap();

        Reconciler::new(&store).merge(vec![dto(1)]).await.unwrap();

        let local = store.get(RecipeId::new(1)).await.unwrap().unwrap();
        assert!(local.is_favorite);
        assert!(local.is_synced);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_merge_keeps_pending_removal() {
        let store = RecipeStore::open_in_memory().await.unwrap();
        // user un-favorited offline; the push has not happened yet
        store.upsert(&record(1, false, false)).await.unwrap();

        let merged = Reconciler::new(&store).merge(vec![dto(1)]).await.unwrap();

        assert!(merged.is_empty());
        let local = store.get(RecipeId::new(1)).await.unwrap().unwrap();
        assert!(!local.is_favorite);
        assert!(!local.is_synced);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_merge_keeps_pending_addition() {
        let store = RecipeStore::open_in_memory().await.unwrap();
        // user favorited offline; remote list does not know about it yet
        store.upsert(&record(9, true, false)).await.unwrap();

        let merged = Reconciler::new(&store).merge(vec![dto(1)]).await.unwrap();

        // still listed locally, still dirty so the next pass pushes it
        assert_eq!(merged.len(), 2);
        let local = store.get(RecipeId::new(9)).await.unwrap().unwrap();
        assert!(local.is_favorite);
        assert!(!local.is_synced);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_merge_demotes_synced_absentees() {
        let store = RecipeStore::open_in_memory().await.unwrap();
        store.upsert(&record(1, true, true)).await.unwrap();
        store.upsert(&record(2, true, true)).await.unwrap();

        let merged = Reconciler::new(&store).merge(vec![dto(2)]).await.unwrap();

        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].id, RecipeId::new(2));

        let demoted = store.get(RecipeId::new(1)).await.unwrap().unwrap();
        assert!(!demoted.is_favorite);
        assert!(demoted.is_synced);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_merge_empty_remote_clears_synced_favorites() {
        let store = RecipeStore::open_in_memory().await.unwrap();
        store.upsert(&record(1, true, true)).await.unwrap();
        store.upsert(&record(2, true, false)).await.unwrap();

        let merged = Reconciler::new(&store).merge(Vec::new()).await.unwrap();

        // the dirty favorite survives, the synced one is demoted
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].id, RecipeId::new(2));
    }
}
