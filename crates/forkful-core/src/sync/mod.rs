//! Favorite synchronization engine.
//!
//! Three cooperating pieces:
//! - [`Reconciler`] merges the remote favorite list into the local store
//!   without clobbering pending local writes.
//! - [`SyncWorker`] pushes every dirty record to the backend, treating
//!   409-on-add and 404-on-remove as idempotent confirmations.
//! - [`SyncDispatcher`] schedules worker passes: one named background task,
//!   replaced (not stacked) on resubmit, gated on connectivity, retried with
//!   backoff.

mod dispatcher;
mod reconcile;
mod worker;

pub use dispatcher::{DispatchConfig, SyncDispatcher, SYNC_TASK_NAME};
pub use reconcile::Reconciler;
pub use worker::{SyncOutcome, SyncWorker};
