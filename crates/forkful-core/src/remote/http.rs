//! HTTP client for the favorites backend.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::models::RecipeId;

use super::{AddFavoriteRequest, AddOutcome, FavoriteApi, RecipeDto, RemoveOutcome};

const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Production `FavoriteApi` implementation over HTTP.
#[derive(Clone)]
pub struct HttpFavoriteApi {
    base_url: String,
    client: reqwest::Client,
}

impl HttpFavoriteApi {
    /// Create a client for the given API base URL (e.g. `https://api.example.com/api`)
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let base_url = normalize_base_url(base_url.into())?;
        Ok(Self {
            base_url,
            client: reqwest::Client::builder().timeout(HTTP_TIMEOUT).build()?,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url)
    }
}

#[async_trait]
impl FavoriteApi for HttpFavoriteApi {
    async fn add_favorite(
        &self,
        id: RecipeId,
        credential: &str,
        payload: &AddFavoriteRequest,
    ) -> Result<AddOutcome> {
        let response = self
            .client
            .post(self.url(&format!("favorites/{id}")))
            .bearer_auth(credential)
            .json(payload)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(AddOutcome::Added);
        }
        if status == StatusCode::CONFLICT {
            return Ok(AddOutcome::AlreadyExists);
        }

        let body = response.text().await.unwrap_or_default();
        tracing::warn!("add favorite {id} rejected: {}", parse_api_error(status, &body));
        Ok(AddOutcome::Failed(status.as_u16()))
    }

    async fn remove_favorite(&self, id: RecipeId, credential: &str) -> Result<RemoveOutcome> {
        let response = self
            .client
            .delete(self.url(&format!("favorites/{id}")))
            .bearer_auth(credential)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(RemoveOutcome::Removed);
        }
        if status == StatusCode::NOT_FOUND {
            return Ok(RemoveOutcome::NotFound);
        }

        let body = response.text().await.unwrap_or_default();
        tracing::warn!(
            "remove favorite {id} rejected: {}",
            parse_api_error(status, &body)
        );
        Ok(RemoveOutcome::Failed(status.as_u16()))
    }

    async fn list_favorites(&self, credential: &str) -> Result<Vec<RecipeDto>> {
        let response = self
            .client
            .get(self.url("favorites"))
            .bearer_auth(credential)
            .header("Accept", "application/json")
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Api(parse_api_error(status, &body)));
        }

        Ok(response.json::<Vec<RecipeDto>>().await?)
    }

    async fn check_favorite(&self, id: RecipeId, credential: &str) -> Result<bool> {
        let response = self
            .client
            .get(self.url(&format!("favorites/check/{id}")))
            .bearer_auth(credential)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Api(parse_api_error(status, &body)));
        }

        Ok(response.json::<bool>().await?)
    }
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: Option<String>,
    message: Option<String>,
}

fn parse_api_error(status: StatusCode, body: &str) -> String {
    if let Ok(payload) = serde_json::from_str::<ApiErrorBody>(body) {
        if let Some(message) = payload.message.or(payload.error) {
            return format!("{} ({})", message.trim(), status.as_u16());
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        format!("HTTP {}", status.as_u16())
    } else {
        format!("{} ({})", trimmed, status.as_u16())
    }
}

fn normalize_base_url(raw: String) -> Result<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(Error::InvalidInput(
            "API base URL must not be empty".to_string(),
        ));
    }
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        Ok(trimmed.trim_end_matches('/').to_string())
    } else {
        Err(Error::InvalidInput(
            "API base URL must include http:// or https://".to_string(),
        ))
    }
}
