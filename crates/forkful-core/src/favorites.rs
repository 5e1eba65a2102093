//! High-level favorites facade.
//!
//! Toggles land in the local store immediately and schedule a background
//! push; reads reconcile remote truth into the store when the network allows
//! and degrade to the cached snapshot when it does not. The UI layer only
//! ever talks to this type and to the store's watch channel.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::watch;

use crate::auth::CredentialProvider;
use crate::error::{Error, Result};
use crate::models::{Recipe, RecipeId, RecipeRecord};
use crate::net::ConnectivityProbe;
use crate::remote::FavoriteApi;
use crate::store::RecipeStore;
use crate::sync::{DispatchConfig, Reconciler, SyncDispatcher, SyncOutcome, SyncWorker};

/// Entry point for everything favorites: instant local toggles, reconciling
/// loads, and the reactive favorite map.
pub struct FavoriteHub {
    store: RecipeStore,
    api: Arc<dyn FavoriteApi>,
    credentials: Arc<dyn CredentialProvider>,
    probe: Arc<dyn ConnectivityProbe>,
    dispatcher: SyncDispatcher,
}

impl FavoriteHub {
    /// Wire the hub with the default dispatch policy.
    pub fn new(
        store: RecipeStore,
        api: Arc<dyn FavoriteApi>,
        credentials: Arc<dyn CredentialProvider>,
        probe: Arc<dyn ConnectivityProbe>,
    ) -> Self {
        Self::with_config(store, api, credentials, probe, DispatchConfig::default())
    }

    /// Wire the hub with an explicit dispatch policy.
    pub fn with_config(
        store: RecipeStore,
        api: Arc<dyn FavoriteApi>,
        credentials: Arc<dyn CredentialProvider>,
        probe: Arc<dyn ConnectivityProbe>,
        config: DispatchConfig,
    ) -> Self {
        let worker = SyncWorker::new(store.clone(), Arc::clone(&api), Arc::clone(&credentials));
        let dispatcher = SyncDispatcher::with_config(worker, Arc::clone(&probe), config);

        Self {
            store,
            api,
            credentials,
            probe,
            dispatcher,
        }
    }

    /// The underlying record store.
    pub const fn store(&self) -> &RecipeStore {
        &self.store
    }

    /// The background sync dispatcher.
    pub const fn dispatcher(&self) -> &SyncDispatcher {
        &self.dispatcher
    }

    /// Flip the favorite flag for a recipe. The write lands locally at once
    /// (dirty), a background push is scheduled, and the new state is
    /// returned. Never touches the network itself.
    pub async fn toggle_favorite(&self, id: RecipeId, recipe: &Recipe) -> Result<bool> {
        let current = self.store.get(id).await?;
        let new_state = !current.as_ref().is_some_and(|record| record.is_favorite);
        // keep the original creation stamp so favorites ordering stays stable
        let created_at = current.map_or_else(
            || chrono::Utc::now().timestamp_millis(),
            |record| record.created_at,
        );

        self.store
            .upsert(&RecipeRecord {
                id,
                recipe: recipe.clone(),
                is_favorite: new_state,
                is_synced: false,
                created_at,
            })
            .await?;

        tracing::info!("toggled favorite '{}' ({id}) -> {new_state}", recipe.name);
        self.dispatcher.request_sync().await;

        Ok(new_state)
    }

    /// Load favorites, reconciling remote truth into the store.
    ///
    /// Offline (or signed out): serves the cached snapshot, erroring only
    /// when there is nothing cached. A failed remote fetch degrades the same
    /// way rather than wiping the view.
    pub async fn load_favorites(&self) -> Result<Vec<RecipeRecord>> {
        if !self.probe.is_network_available() {
            tracing::warn!("offline; serving cached favorites");
            return self.cached_or_offline().await;
        }

        let Some(credential) = self.credentials.credential() else {
            tracing::warn!("no credential; serving cached favorites");
            return self.cached_or_offline().await;
        };

        let remote = match self.api.list_favorites(&credential).await {
            Ok(list) => list,
            Err(error) => {
                tracing::warn!("favorite refresh failed: {error}");
                let cached = self.store.favorites().await?;
                if cached.is_empty() {
                    return Err(error);
                }
                return Ok(cached);
            }
        };

        tracing::debug!("reconciling {} remote favorite(s)", remote.len());
        Reconciler::new(&self.store).merge(remote).await
    }

    /// Local-first favorite check; no network involved.
    pub async fn is_favorite(&self, id: RecipeId) -> Result<bool> {
        Ok(self
            .store
            .get(id)
            .await?
            .is_some_and(|record| record.is_favorite))
    }

    /// Current favorites, newest first.
    pub async fn favorites(&self) -> Result<Vec<RecipeRecord>> {
        self.store.favorites().await
    }

    /// Reactive id -> favorite map derived from the live snapshot.
    pub fn favorite_states(&self) -> HashMap<RecipeId, bool> {
        self.store.favorite_states()
    }

    /// Subscribe to the live favorites snapshot.
    pub fn subscribe(&self) -> watch::Receiver<Vec<RecipeRecord>> {
        self.store.subscribe()
    }

    /// Run a sync pass immediately (the background dispatcher still owns
    /// scheduling; this is for explicit "sync now" surfaces).
    pub async fn sync_now(&self) -> Result<SyncOutcome> {
        self.dispatcher.run_now().await
    }

    async fn cached_or_offline(&self) -> Result<Vec<RecipeRecord>> {
        let cached = self.store.favorites().await?;
        if cached.is_empty() {
            Err(Error::Offline)
        } else {
            Ok(cached)
        }
    }
}
