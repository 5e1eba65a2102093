//! Deduplicated scheduling of background sync passes.
//!
//! One named task at a time: a `request_sync` while a task is still queued
//! replaces it instead of stacking a second one, and a task that has started
//! a pass runs to completion. The connectivity gate and the retry/backoff
//! loop live here; the worker itself only knows how to run a single pass.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, Semaphore};
use tokio::task::AbortHandle;

use super::worker::{SyncOutcome, SyncWorker};
use crate::net::ConnectivityProbe;
use crate::Result;

/// Name of the favorite-sync background task.
pub const SYNC_TASK_NAME: &str = "favorite-sync";

/// Retry and gating policy for background passes.
#[derive(Debug, Clone)]
pub struct DispatchConfig {
    /// Delay before the first retry after `RetryNeeded`
    pub initial_backoff: Duration,
    /// Ceiling for the doubling backoff
    pub max_backoff: Duration,
    /// Give up after this many passes (`None` = keep retrying)
    pub max_attempts: Option<u32>,
    /// How often a queued task re-checks the connectivity gate
    pub probe_interval: Duration,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            initial_backoff: Duration::from_secs(2),
            max_backoff: Duration::from_secs(300),
            max_attempts: None,
            probe_interval: Duration::from_millis(500),
        }
    }
}

/// Schedules sync passes with replace-on-resubmit semantics.
pub struct SyncDispatcher {
    worker: Arc<SyncWorker>,
    probe: Arc<dyn ConnectivityProbe>,
    config: DispatchConfig,
    queued: Arc<Mutex<HashMap<&'static str, AbortHandle>>>,
    pass_gate: Arc<Semaphore>,
}

impl SyncDispatcher {
    /// Create a dispatcher with the default policy.
    pub fn new(worker: SyncWorker, probe: Arc<dyn ConnectivityProbe>) -> Self {
        Self::with_config(worker, probe, DispatchConfig::default())
    }

    /// Create a dispatcher with an explicit policy.
    pub fn with_config(
        worker: SyncWorker,
        probe: Arc<dyn ConnectivityProbe>,
        config: DispatchConfig,
    ) -> Self {
        Self {
            worker: Arc::new(worker),
            probe,
            config,
            queued: Arc::new(Mutex::new(HashMap::new())),
            pass_gate: Arc::new(Semaphore::new(1)),
        }
    }

    /// Request a background sync. Returns immediately; completion is observed
    /// through the store's sync flags. Idempotent: a still-queued request
    /// under the same name is replaced, never stacked.
    pub async fn request_sync(&self) {
        let mut queued = self.queued.lock().await;
        if let Some(stale) = queued.remove(SYNC_TASK_NAME) {
            tracing::debug!("replacing queued '{SYNC_TASK_NAME}' task");
            stale.abort();
        }

        let worker = Arc::clone(&self.worker);
        let probe = Arc::clone(&self.probe);
        let config = self.config.clone();
        let task_map = Arc::clone(&self.queued);
        let pass_gate = Arc::clone(&self.pass_gate);

        let handle = tokio::spawn(async move {
            // Gate on connectivity and the single-pass permit. Up to this
            // point the task is still "queued" and may be aborted by a
            // replacing request.
            while !probe.is_network_available() {
                tokio::time::sleep(config.probe_interval).await;
            }
            let Ok(_permit) = pass_gate.acquire_owned().await else {
                return;
            };

            // Now running: deregister so replacement no longer targets us.
            task_map.lock().await.remove(SYNC_TASK_NAME);

            let mut attempt: u32 = 0;
            let mut backoff = config.initial_backoff;
            loop {
                attempt += 1;
                match worker.run_pass().await {
                    Ok(SyncOutcome::Success) => {
                        tracing::debug!("'{SYNC_TASK_NAME}' completed after {attempt} pass(es)");
                        break;
                    }
                    Ok(SyncOutcome::RetryNeeded) => {
                        if config.max_attempts.is_some_and(|max| attempt >= max) {
                            tracing::warn!(
                                "'{SYNC_TASK_NAME}' giving up after {attempt} pass(es); \
                                 records stay pending"
                            );
                            break;
                        }
                        tracing::debug!("'{SYNC_TASK_NAME}' retrying in {backoff:?}");
                        tokio::time::sleep(backoff).await;
                        backoff = (backoff * 2).min(config.max_backoff);
                    }
                    Err(error) => {
                        // storage failure; retrying cannot help
                        tracing::error!("'{SYNC_TASK_NAME}' aborted: {error}");
                        break;
                    }
                }
            }
        });

        queued.insert(SYNC_TASK_NAME, handle.abort_handle());
    }

    /// Run one pass right now, bypassing the queue but still serialized with
    /// any background pass.
    pub async fn run_now(&self) -> Result<SyncOutcome> {
        let Ok(_permit) = self.pass_gate.acquire().await else {
            return Ok(SyncOutcome::RetryNeeded);
        };
        self.worker.run_pass().await
    }

    /// Number of scheduled-but-not-started tasks (0 or 1).
    pub async fn queued_count(&self) -> usize {
        self.queued.lock().await.len()
    }
}
