/// Transport traits for Encore
///
/// The stores and the session holder talk to the account-data API only
/// through these traits, so they can run against the HTTP client or an
/// in-memory implementation.
use crate::error::Result;
use crate::types::{
    CategoryId, CategoryUpdate, Favorite, FavoriteCategory, FavoriteFilter, FavoriteId,
    FavoritesGroup, FavoritesSummary, MoveFavorite, NewCategory, NewFavorite, SearchEntryId,
    SearchHistoryEntry,
};
use async_trait::async_trait;

/// Favorites and categories endpoints of the account-data API
#[async_trait]
pub trait FavoritesApi: Send + Sync {
    // ========================================================================
    // Favorites
    // ========================================================================

    /// List favorites, optionally filtered server-side
    async fn list_favorites(&self, filter: FavoriteFilter) -> Result<Vec<Favorite>>;

    /// Aggregate counts, recomputed by the server
    async fn summary(&self) -> Result<FavoritesSummary>;

    /// Favorites grouped by category
    async fn grouped(&self) -> Result<Vec<FavoritesGroup>>;

    /// Create a favorite. `None` when the server accepted it but sent no
    /// body back.
    async fn add_favorite(&self, request: NewFavorite) -> Result<Option<Favorite>>;

    /// Delete a favorite by id
    async fn remove_favorite(&self, id: FavoriteId) -> Result<()>;

    /// Move a favorite to another category (or uncategorized)
    async fn move_favorite(&self, id: FavoriteId, request: MoveFavorite) -> Result<()>;

    // ========================================================================
    // Categories
    // ========================================================================

    async fn list_categories(&self) -> Result<Vec<FavoriteCategory>>;

    async fn get_category(&self, id: CategoryId) -> Result<FavoriteCategory>;

    async fn create_category(&self, request: NewCategory) -> Result<Option<FavoriteCategory>>;

    async fn update_category(&self, id: CategoryId, request: CategoryUpdate) -> Result<()>;

    /// Delete a category. When `move_to_uncategorized` is false the server
    /// deletes its favorites too.
    async fn delete_category(&self, id: CategoryId, move_to_uncategorized: bool) -> Result<()>;
}

/// Search history endpoints of the account-data API
#[async_trait]
pub trait SearchHistoryApi: Send + Sync {
    async fn list_searches(&self) -> Result<Vec<SearchHistoryEntry>>;

    async fn add_search(&self, query: &str) -> Result<Option<SearchHistoryEntry>>;

    async fn delete_search(&self, id: SearchEntryId) -> Result<()>;
}

/// Server-side session management
#[async_trait]
pub trait SessionApi: Send + Sync {
    /// Invalidate the session identified by `jwt` on the server
    async fn logout(&self, jwt: Option<&str>) -> Result<()>;
}
