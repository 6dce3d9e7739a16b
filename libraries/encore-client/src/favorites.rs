//! Favorites endpoints of the account-data API.

use crate::account::RequestContext;
use crate::error::Result;
use crate::http;
use encore_core::{
    Favorite, FavoriteFilter, FavoriteId, FavoritesGroup, FavoritesSummary, MoveFavorite,
    NewFavorite,
};
use reqwest::Method;
use tracing::debug;

/// Favorites client, borrowing the credentials of a `RequestContext`.
pub struct FavoritesClient<'a> {
    ctx: &'a RequestContext,
}

impl<'a> FavoritesClient<'a> {
    pub(crate) fn new(ctx: &'a RequestContext) -> Self {
        Self { ctx }
    }

    /// List favorites, optionally filtered by entity type and category.
    pub async fn list(&self, filter: FavoriteFilter) -> Result<Vec<Favorite>> {
        let mut request = self.ctx.request(Method::GET, "/api/favorites");
        if let Some(entity_type) = filter.entity_type {
            request = request.query(&[("entityType", u8::from(entity_type).to_string())]);
        }
        if let Some(category_id) = filter.category_id {
            request = request.query(&[("categoryId", category_id.to_string())]);
        }

        debug!(?filter, "Fetching favorites");
        let response = request.send().await.map_err(http::send_error)?;
        let favorites: Vec<Favorite> = http::read_json(response, "favorites").await?;

        debug!(count = favorites.len(), "Fetched favorites");
        Ok(favorites)
    }

    /// Get the server-computed summary.
    pub async fn summary(&self) -> Result<FavoritesSummary> {
        let response = self
            .ctx
            .request(Method::GET, "/api/favorites/summary")
            .send()
            .await
            .map_err(http::send_error)?;

        http::read_json(response, "favorites summary").await
    }

    /// Get favorites grouped by category.
    pub async fn grouped(&self) -> Result<Vec<FavoritesGroup>> {
        let response = self
            .ctx
            .request(Method::GET, "/api/favorites/grouped")
            .send()
            .await
            .map_err(http::send_error)?;

        http::read_json(response, "grouped favorites").await
    }

    /// Create a favorite. `None` when the server answers with an empty body.
    pub async fn add(&self, request: &NewFavorite) -> Result<Option<Favorite>> {
        debug!(
            external_id = %request.external_id,
            entity_type = %request.entity_type,
            "Adding favorite"
        );

        let response = self
            .ctx
            .request(Method::POST, "/api/favorites")
            .json(request)
            .send()
            .await
            .map_err(http::send_error)?;

        http::read_json_opt(response, "created favorite").await
    }

    /// Delete a favorite.
    pub async fn remove(&self, id: FavoriteId) -> Result<()> {
        debug!(id = %id, "Removing favorite");

        let response = self
            .ctx
            .request(Method::DELETE, &format!("/api/favorites/{}", id))
            .send()
            .await
            .map_err(http::send_error)?;

        http::expect_success(response).await
    }

    /// Move a favorite to another category.
    pub async fn move_to(&self, id: FavoriteId, request: MoveFavorite) -> Result<()> {
        let response = self
            .ctx
            .request(Method::PUT, &format!("/api/favorites/{}/move", id))
            .json(&request)
            .send()
            .await
            .map_err(http::send_error)?;

        http::expect_success(response).await
    }
}
