//! Category endpoints of the account-data API.

use crate::account::RequestContext;
use crate::error::Result;
use crate::http;
use encore_core::{CategoryId, CategoryUpdate, FavoriteCategory, NewCategory};
use reqwest::Method;
use tracing::debug;

/// Categories client, borrowing the credentials of a `RequestContext`.
pub struct CategoriesClient<'a> {
    ctx: &'a RequestContext,
}

impl<'a> CategoriesClient<'a> {
    pub(crate) fn new(ctx: &'a RequestContext) -> Self {
        Self { ctx }
    }

    pub async fn list(&self) -> Result<Vec<FavoriteCategory>> {
        let response = self
            .ctx
            .request(Method::GET, "/api/categories")
            .send()
            .await
            .map_err(http::send_error)?;

        let categories: Vec<FavoriteCategory> = http::read_json(response, "categories").await?;
        debug!(count = categories.len(), "Fetched categories");
        Ok(categories)
    }

    pub async fn get(&self, id: CategoryId) -> Result<FavoriteCategory> {
        let response = self
            .ctx
            .request(Method::GET, &format!("/api/categories/{}", id))
            .send()
            .await
            .map_err(http::send_error)?;

        http::read_json(response, "category").await
    }

    pub async fn create(&self, request: &NewCategory) -> Result<Option<FavoriteCategory>> {
        debug!(name = %request.name, "Creating category");

        let response = self
            .ctx
            .request(Method::POST, "/api/categories")
            .json(request)
            .send()
            .await
            .map_err(http::send_error)?;

        http::read_json_opt(response, "created category").await
    }

    pub async fn update(&self, id: CategoryId, request: &CategoryUpdate) -> Result<()> {
        let response = self
            .ctx
            .request(Method::PUT, &format!("/api/categories/{}", id))
            .json(request)
            .send()
            .await
            .map_err(http::send_error)?;

        http::expect_success(response).await
    }

    /// Delete a category, optionally keeping its favorites as uncategorized.
    pub async fn delete(&self, id: CategoryId, move_to_uncategorized: bool) -> Result<()> {
        debug!(id = %id, move_to_uncategorized, "Deleting category");

        let response = self
            .ctx
            .request(Method::DELETE, &format!("/api/categories/{}", id))
            .query(&[(
                "moveFavoritesToUncategorized",
                move_to_uncategorized.to_string(),
            )])
            .send()
            .await
            .map_err(http::send_error)?;

        http::expect_success(response).await
    }
}
