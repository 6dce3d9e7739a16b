//! `encore-core` transport traits implemented over HTTP.

use crate::account::AccountClient;
use async_trait::async_trait;
use encore_core::{
    CategoryId, CategoryUpdate, Favorite, FavoriteCategory, FavoriteFilter, FavoriteId,
    FavoritesApi, FavoritesGroup, FavoritesSummary, MoveFavorite, NewCategory, NewFavorite,
    Result, SearchEntryId, SearchHistoryApi, SearchHistoryEntry, SessionApi,
};

#[async_trait]
impl FavoritesApi for AccountClient {
    async fn list_favorites(&self, filter: FavoriteFilter) -> Result<Vec<Favorite>> {
        Ok(self.context().await.favorites().list(filter).await?)
    }

    async fn summary(&self) -> Result<FavoritesSummary> {
        Ok(self.context().await.favorites().summary().await?)
    }

    async fn grouped(&self) -> Result<Vec<FavoritesGroup>> {
        Ok(self.context().await.favorites().grouped().await?)
    }

    async fn add_favorite(&self, request: NewFavorite) -> Result<Option<Favorite>> {
        Ok(self.context().await.favorites().add(&request).await?)
    }

    async fn remove_favorite(&self, id: FavoriteId) -> Result<()> {
        Ok(self.context().await.favorites().remove(id).await?)
    }

    async fn move_favorite(&self, id: FavoriteId, request: MoveFavorite) -> Result<()> {
        Ok(self.context().await.favorites().move_to(id, request).await?)
    }

    async fn list_categories(&self) -> Result<Vec<FavoriteCategory>> {
        Ok(self.context().await.categories().list().await?)
    }

    async fn get_category(&self, id: CategoryId) -> Result<FavoriteCategory> {
        Ok(self.context().await.categories().get(id).await?)
    }

    async fn create_category(&self, request: NewCategory) -> Result<Option<FavoriteCategory>> {
        Ok(self.context().await.categories().create(&request).await?)
    }

    async fn update_category(&self, id: CategoryId, request: CategoryUpdate) -> Result<()> {
        Ok(self.context().await.categories().update(id, &request).await?)
    }

    async fn delete_category(&self, id: CategoryId, move_to_uncategorized: bool) -> Result<()> {
        Ok(self
            .context()
            .await
            .categories()
            .delete(id, move_to_uncategorized)
            .await?)
    }
}

#[async_trait]
impl SearchHistoryApi for AccountClient {
    async fn list_searches(&self) -> Result<Vec<SearchHistoryEntry>> {
        Ok(self.context().await.history().list().await?)
    }

    async fn add_search(&self, query: &str) -> Result<Option<SearchHistoryEntry>> {
        Ok(self.context().await.history().add(query).await?)
    }

    async fn delete_search(&self, id: SearchEntryId) -> Result<()> {
        Ok(self.context().await.history().delete(id).await?)
    }
}

#[async_trait]
impl SessionApi for AccountClient {
    async fn logout(&self, jwt: Option<&str>) -> Result<()> {
        Ok(AccountClient::logout(self, jwt).await?)
    }
}
