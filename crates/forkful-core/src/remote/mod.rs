//! Remote favorites backend client.

mod dto;
mod http;

pub use dto::{AddFavoriteRequest, RecipeDto};
pub use http::HttpFavoriteApi;

use async_trait::async_trait;

use crate::models::RecipeId;
use crate::Result;

/// Outcome of an add-favorite push.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// The backend stored the favorite
    Added,
    /// The backend already had it (409); the desired end state holds
    AlreadyExists,
    /// Rejected with the given HTTP status
    Failed(u16),
}

/// Outcome of a remove-favorite push.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveOutcome {
    /// The backend removed the favorite
    Removed,
    /// The backend never had it (404); the desired end state holds
    NotFound,
    /// Rejected with the given HTTP status
    Failed(u16),
}

/// Remote favorite authority.
///
/// Transport failures surface as `Err`; HTTP-level rejections surface as
/// `Failed(status)` so callers can distinguish idempotent confirmations
/// (409 on add, 404 on remove) from genuine errors.
#[async_trait]
pub trait FavoriteApi: Send + Sync {
    /// Push a favorite, content payload included (the recipe may not exist
    /// remotely yet, e.g. AI-generated ones)
    async fn add_favorite(
        &self,
        id: RecipeId,
        credential: &str,
        payload: &AddFavoriteRequest,
    ) -> Result<AddOutcome>;

    /// Remove a favorite
    async fn remove_favorite(&self, id: RecipeId, credential: &str) -> Result<RemoveOutcome>;

    /// Fetch the authoritative favorite list
    async fn list_favorites(&self, credential: &str) -> Result<Vec<RecipeDto>>;

    /// Ask whether the backend considers the recipe a favorite
    async fn check_favorite(&self, id: RecipeId, credential: &str) -> Result<bool>;
}
