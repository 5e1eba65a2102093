//! Background push of dirty favorite records.

use std::sync::Arc;

use crate::auth::CredentialProvider;
use crate::models::RecipeRecord;
use crate::remote::{AddFavoriteRequest, AddOutcome, FavoriteApi, RemoveOutcome};
use crate::store::RecipeStore;
use crate::Result;

/// Terminal outcome of one sync pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Every dirty record was pushed and confirmed (or confirmed idempotent)
    Success,
    /// At least one record stayed dirty; the pass should run again later
    RetryNeeded,
}

/// Executes one push pass over the current dirty set.
///
/// Records are processed sequentially; a failing record is left dirty and the
/// pass moves on, so one unreachable recipe never blocks its siblings. Only
/// storage failures abort a pass.
pub struct SyncWorker {
    store: RecipeStore,
    api: Arc<dyn FavoriteApi>,
    credentials: Arc<dyn CredentialProvider>,
}

impl SyncWorker {
    /// Wire a worker to its collaborators.
    pub fn new(
        store: RecipeStore,
        api: Arc<dyn FavoriteApi>,
        credentials: Arc<dyn CredentialProvider>,
    ) -> Self {
        Self {
            store,
            api,
            credentials,
        }
    }

    /// Run one pass. Returns `RetryNeeded` when the credential is missing or
    /// any record could not be resolved.
    pub async fn run_pass(&self) -> Result<SyncOutcome> {
        let Some(credential) = self.credentials.credential() else {
            tracing::warn!("favorite sync deferred: no credential available");
            return Ok(SyncOutcome::RetryNeeded);
        };

        let dirty = self.store.unsynced().await?;
        if dirty.is_empty() {
            return Ok(SyncOutcome::Success);
        }

        tracing::info!("favorite sync pass: {} pending record(s)", dirty.len());

        let mut unresolved = 0usize;
        for record in dirty {
            let resolved = if record.is_favorite {
                self.push_add(&record, &credential).await?
            } else {
                self.push_remove(&record, &credential).await?
            };
            if !resolved {
                unresolved += 1;
            }
        }

        if unresolved == 0 {
            Ok(SyncOutcome::Success)
        } else {
            tracing::warn!("favorite sync pass left {unresolved} record(s) pending");
            Ok(SyncOutcome::RetryNeeded)
        }
    }

    async fn push_add(&self, record: &RecipeRecord, credential: &str) -> Result<bool> {
        let payload = AddFavoriteRequest::from_record(record);
        match self.api.add_favorite(record.id, credential, &payload).await {
            Ok(AddOutcome::Added) => {
                self.store.set_synced(record.id, true).await?;
                tracing::debug!("favorite '{}' pushed", record.recipe.name);
                Ok(true)
            }
            Ok(AddOutcome::AlreadyExists) => {
                // the backend already agrees; confirmation, not an error
                self.store.set_synced(record.id, true).await?;
                tracing::debug!("favorite '{}' already on backend", record.recipe.name);
                Ok(true)
            }
            Ok(AddOutcome::Failed(status)) => {
                tracing::warn!(
                    "favorite '{}' push rejected with HTTP {status}, left pending",
                    record.recipe.name
                );
                Ok(false)
            }
            Err(error) => {
                tracing::warn!(
                    "favorite '{}' push failed: {error}, left pending",
                    record.recipe.name
                );
                Ok(false)
            }
        }
    }

    async fn push_remove(&self, record: &RecipeRecord, credential: &str) -> Result<bool> {
        match self.api.remove_favorite(record.id, credential).await {
            Ok(RemoveOutcome::Removed) => {
                self.store.set_synced(record.id, true).await?;
                tracing::debug!("favorite '{}' removal pushed", record.recipe.name);
                Ok(true)
            }
            Ok(RemoveOutcome::NotFound) => {
                // the backend never had it; the desired end state holds
                self.store.set_synced(record.id, true).await?;
                tracing::debug!(
                    "favorite '{}' was already gone on backend",
                    record.recipe.name
                );
                Ok(true)
            }
            Ok(RemoveOutcome::Failed(status)) => {
                tracing::warn!(
                    "favorite '{}' removal rejected with HTTP {status}, left pending",
                    record.recipe.name
                );
                Ok(false)
            }
            Err(error) => {
                tracing::warn!(
                    "favorite '{}' removal failed: {error}, left pending",
                    record.recipe.name
                );
                Ok(false)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{NoCredential, StaticCredential};
    use crate::models::{Recipe, RecipeId};
    use crate::remote::RecipeDto;
    use async_trait::async_trait;

    struct RejectingApi;

    #[async_trait]
    impl FavoriteApi for RejectingApi {
        async fn add_favorite(
            &self,
            _id: RecipeId,
            _credential: &str,
            _payload: &AddFavoriteRequest,
        ) -> Result<AddOutcome> {
            Ok(AddOutcome::Failed(500))
        }

        async fn remove_favorite(
            &self,
            _id: RecipeId,
            _credential: &str,
        ) -> Result<RemoveOutcome> {
            Ok(RemoveOutcome::Failed(500))
        }

        async fn list_favorites(&self, _credential: &str) -> Result<Vec<RecipeDto>> {
            Ok(Vec::new())
        }

        async fn check_favorite(&self, _id: RecipeId, _credential: &str) -> Result<bool> {
            Ok(false)
        }
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_missing_credential_defers_pass() {
        let store = RecipeStore::open_in_memory().await.unwrap();
        store
            .upsert(&RecipeRecord::new(
                RecipeId::new(1),
                Recipe::named("Soup"),
                true,
                false,
            ))
            .await
            .unwrap();

        let worker = SyncWorker::new(store.clone(), Arc::new(RejectingApi), Arc::new(NoCredential));
        assert_eq!(worker.run_pass().await.unwrap(), SyncOutcome::RetryNeeded);

        // record untouched
        let record = store.get(RecipeId::new(1)).await.unwrap().unwrap();
        assert!(!record.is_synced);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_empty_dirty_set_is_success() {
        let store = RecipeStore::open_in_memory().await.unwrap();
        let worker = SyncWorker::new(
            store,
            Arc::new(RejectingApi),
            Arc::new(StaticCredential::new("token")),
        );
        assert_eq!(worker.run_pass().await.unwrap(), SyncOutcome::Success);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_rejected_records_stay_dirty() {
        let store = RecipeStore::open_in_memory().await.unwrap();
        store
            .upsert(&RecipeRecord::new(
                RecipeId::new(1),
                Recipe::named("Soup"),
                true,
                false,
            ))
            .await
            .unwrap();

        let worker = SyncWorker::new(
            store.clone(),
            Arc::new(RejectingApi),
            Arc::new(StaticCredential::new("token")),
        );
        assert_eq!(worker.run_pass().await.unwrap(), SyncOutcome::RetryNeeded);

        let record = store.get(RecipeId::new(1)).await.unwrap().unwrap();
        assert!(!record.is_synced);
        assert!(record.is_favorite);
    }
}
