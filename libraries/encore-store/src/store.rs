//! Favorites store: the authoritative in-memory favorites cache.

use crate::lock::MutationLocks;
use crate::status::FavoriteStatus;
use encore_core::{
    CatalogItem, CategoryId, CategoryUpdate, EncoreError, EntityKey, Favorite, FavoriteCategory,
    FavoriteFilter, FavoriteId, FavoritesApi, FavoritesGroup, FavoritesSummary, MoveFavorite,
    NewCategory, NewFavorite, Result,
};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

/// Observable cache of the current user's favorites, categories and summary.
///
/// Cloning is cheap and every clone shares the same cache. The store is the
/// only writer; readers get snapshots or `watch` receivers and never mutate
/// the cache themselves.
///
/// Every successful mutation triggers a full re-fetch of the favorites list
/// and the summary (never an incremental patch), which republishes both to
/// all subscribers. The cache is never updated optimistically and failed
/// calls leave it untouched.
pub struct FavoritesStore<A> {
    inner: Arc<Inner<A>>,
}

struct Inner<A> {
    api: A,
    favorites: watch::Sender<Vec<Favorite>>,
    categories: watch::Sender<Vec<FavoriteCategory>>,
    summary: watch::Sender<Option<FavoritesSummary>>,
    locks: MutationLocks,
}

impl<A> Clone for FavoritesStore<A> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

/// Log a failed operation and hand the error back for propagation.
fn logged(operation: &'static str) -> impl Fn(EncoreError) -> EncoreError {
    move |e| {
        error!(operation, error = %e, "Favorites operation failed");
        e
    }
}

impl<A: FavoritesApi + 'static> FavoritesStore<A> {
    /// Create a store with empty caches. Call `load()` to populate it.
    pub fn new(api: A) -> Self {
        let (favorites, _) = watch::channel(Vec::new());
        let (categories, _) = watch::channel(Vec::new());
        let (summary, _) = watch::channel(None);

        Self {
            inner: Arc::new(Inner {
                api,
                favorites,
                categories,
                summary,
                locks: MutationLocks::default(),
            }),
        }
    }

    /// Access the underlying transport.
    pub fn api(&self) -> &A {
        &self.inner.api
    }

    // ========================================================================
    // Loading
    // ========================================================================

    /// Initial load: favorites first (so `is_favorite` is accurate as early
    /// as possible), then summary and categories.
    pub async fn load(&self) -> Result<()> {
        info!("Loading favorites");
        self.refresh_all().await
    }

    /// Re-fetch everything. All three fetches are attempted; the first
    /// failure is returned.
    pub async fn refresh_all(&self) -> Result<()> {
        let favorites = self.refresh_favorites().await;
        let summary = self.refresh_summary().await;
        let categories = self.refresh_categories().await;

        favorites?;
        summary?;
        categories?;
        Ok(())
    }

    /// Re-fetch the full favorites list and publish it.
    pub async fn refresh_favorites(&self) -> Result<Vec<Favorite>> {
        let favorites = self
            .inner
            .api
            .list_favorites(FavoriteFilter::default())
            .await
            .map_err(logged("refresh_favorites"))?;

        debug!(count = favorites.len(), "Publishing favorites");
        self.inner.favorites.send_replace(favorites.clone());
        Ok(favorites)
    }

    /// Re-fetch the summary and publish it.
    pub async fn refresh_summary(&self) -> Result<FavoritesSummary> {
        let summary = self
            .inner
            .api
            .summary()
            .await
            .map_err(logged("refresh_summary"))?;

        self.inner.summary.send_replace(Some(summary.clone()));
        Ok(summary)
    }

    /// Re-fetch the categories and publish them.
    pub async fn refresh_categories(&self) -> Result<Vec<FavoriteCategory>> {
        let categories = self
            .inner
            .api
            .list_categories()
            .await
            .map_err(logged("refresh_categories"))?;

        self.inner.categories.send_replace(categories.clone());
        Ok(categories)
    }

    // ========================================================================
    // Reads
    // ========================================================================

    /// Current cache snapshot, filtered locally.
    ///
    /// Also schedules a background refresh that republishes the favorites
    /// stream; the returned snapshot does not wait for it. Outside a Tokio
    /// runtime no refresh is scheduled.
    pub fn list(&self, filter: FavoriteFilter) -> Vec<Favorite> {
        let snapshot: Vec<Favorite> = self
            .inner
            .favorites
            .borrow()
            .iter()
            .filter(|f| filter.matches(f))
            .cloned()
            .collect();

        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            let store = self.clone();
            handle.spawn(async move {
                // Failure is already logged by refresh_favorites
                let _ = store.refresh_favorites().await;
            });
        }

        snapshot
    }

    /// Query the server with filters applied server-side.
    ///
    /// Only an unfiltered result is published, so a filtered query never
    /// replaces the full cache.
    pub async fn fetch(&self, filter: FavoriteFilter) -> Result<Vec<Favorite>> {
        if filter.is_empty() {
            return self.refresh_favorites().await;
        }

        self.inner
            .api
            .list_favorites(filter)
            .await
            .map_err(logged("fetch"))
    }

    /// Favorites grouped by category, straight from the server.
    pub async fn grouped(&self) -> Result<Vec<FavoritesGroup>> {
        self.inner.api.grouped().await.map_err(logged("grouped"))
    }

    /// Snapshot of the full favorites cache.
    pub fn favorites(&self) -> Vec<Favorite> {
        self.inner.favorites.borrow().clone()
    }

    /// Snapshot of the categories cache.
    pub fn categories(&self) -> Vec<FavoriteCategory> {
        self.inner.categories.borrow().clone()
    }

    /// Last published summary (`None` until the first fetch succeeds).
    pub fn summary(&self) -> Option<FavoritesSummary> {
        self.inner.summary.borrow().clone()
    }

    /// Cached favorite for an entity, if any.
    pub fn find(&self, key: &EntityKey) -> Option<Favorite> {
        self.inner
            .favorites
            .borrow()
            .iter()
            .find(|f| f.matches(key))
            .cloned()
    }

    pub fn subscribe_favorites(&self) -> watch::Receiver<Vec<Favorite>> {
        self.inner.favorites.subscribe()
    }

    pub fn subscribe_categories(&self) -> watch::Receiver<Vec<FavoriteCategory>> {
        self.inner.categories.subscribe()
    }

    pub fn subscribe_summary(&self) -> watch::Receiver<Option<FavoritesSummary>> {
        self.inner.summary.subscribe()
    }

    /// Derived membership view for one entity.
    pub fn is_favorite(&self, key: EntityKey) -> FavoriteStatus {
        FavoriteStatus::new(key, self.inner.favorites.subscribe())
    }

    /// Whether an add/remove for `key` is currently in flight.
    pub fn is_mutating(&self, key: &EntityKey) -> bool {
        self.inner.locks.is_locked(key)
    }

    // ========================================================================
    // Favorite mutations
    // ========================================================================

    /// Create a favorite, then re-fetch favorites and summary.
    ///
    /// When the server sends no body back the created record is taken from
    /// the refreshed cache. If the refresh failed too, the favorite exists
    /// on the server but `Other` is returned; `add_entity` avoids that.
    pub async fn add(&self, request: NewFavorite) -> Result<Favorite> {
        let key = request.key();
        let _guard = self.inner.locks.acquire(&key)?;
        self.add_locked(request).await?.ok_or_else(|| {
            EncoreError::Other(format!("favorite {} created but missing from the cache", key))
        })
    }

    /// Create the favorite for an entity without needing the record back.
    pub async fn add_entity(&self, request: NewFavorite) -> Result<()> {
        let _guard = self.inner.locks.acquire(&request.key())?;
        self.add_locked(request).await.map(|_| ())
    }

    /// Delete a favorite by id, then re-fetch favorites and summary.
    ///
    /// An id absent from the cache is reported as not found without a
    /// network call, so repeated removes never touch the cache.
    pub async fn remove(&self, id: FavoriteId) -> Result<()> {
        let key = self
            .inner
            .favorites
            .borrow()
            .iter()
            .find(|f| f.id == id)
            .map(Favorite::key)
            .ok_or_else(|| EncoreError::not_found("favorite", id))
            .map_err(logged("remove"))?;

        let _guard = self.inner.locks.acquire(&key)?;
        self.remove_locked(id).await
    }

    /// Delete the favorite recorded for an entity.
    ///
    /// Fails with `FavoriteNotFound` when the cache has no record for it.
    pub async fn remove_entity(&self, key: &EntityKey) -> Result<FavoriteId> {
        let existing = self
            .find(key)
            .ok_or_else(|| EncoreError::FavoriteNotFound(key.clone()))?;

        let _guard = self.inner.locks.acquire(key)?;
        self.remove_locked(existing.id).await?;
        Ok(existing.id)
    }

    /// Add the item if it is not a favorite, remove it otherwise.
    ///
    /// Returns the membership after the call.
    pub async fn toggle(&self, item: &CatalogItem, category_id: Option<CategoryId>) -> Result<bool> {
        let request = NewFavorite::from_catalog_item(item, category_id)?;
        let key = request.key();
        let _guard = self.inner.locks.acquire(&key)?;

        match self.find(&key) {
            Some(existing) => {
                self.remove_locked(existing.id).await?;
                Ok(false)
            }
            None => {
                self.add_locked(request).await?;
                Ok(true)
            }
        }
    }

    /// Move a favorite to another category, then re-fetch favorites.
    pub async fn move_favorite(&self, id: FavoriteId, category_id: Option<CategoryId>) -> Result<()> {
        self.inner
            .api
            .move_favorite(id, MoveFavorite { category_id })
            .await
            .map_err(logged("move_favorite"))?;

        if let Err(e) = self.refresh_favorites().await {
            warn!(error = %e, "Refresh after move failed");
        }
        Ok(())
    }

    async fn add_locked(&self, request: NewFavorite) -> Result<Option<Favorite>> {
        let key = request.key();
        let created = self
            .inner
            .api
            .add_favorite(request)
            .await
            .map_err(logged("add"))?;

        match &created {
            Some(favorite) => info!(id = %favorite.id, key = %key, "Favorite added"),
            None => info!(key = %key, "Favorite added (empty response)"),
        }
        self.resync_after_mutation().await;
        Ok(created.or_else(|| self.find(&key)))
    }

    async fn remove_locked(&self, id: FavoriteId) -> Result<()> {
        self.inner
            .api
            .remove_favorite(id)
            .await
            .map_err(logged("remove"))?;

        info!(id = %id, "Favorite removed");
        self.resync_after_mutation().await;
        Ok(())
    }

    /// Full re-fetch of favorites and summary. The mutation already
    /// succeeded, so refresh failures are only logged.
    async fn resync_after_mutation(&self) {
        let (favorites, summary) = tokio::join!(self.refresh_favorites(), self.refresh_summary());
        if let Err(e) = favorites {
            warn!(error = %e, "Favorites refresh after mutation failed");
        }
        if let Err(e) = summary {
            warn!(error = %e, "Summary refresh after mutation failed");
        }
    }

    // ========================================================================
    // Categories
    // ========================================================================

    pub async fn get_category(&self, id: CategoryId) -> Result<FavoriteCategory> {
        self.inner
            .api
            .get_category(id)
            .await
            .map_err(logged("get_category"))
    }

    /// Create a category, then re-fetch categories.
    ///
    /// Returns `None` when the server sent no body and the refreshed list
    /// has no category of that name.
    pub async fn create_category(&self, request: NewCategory) -> Result<Option<FavoriteCategory>> {
        let name = request.name.clone();
        let created = self
            .inner
            .api
            .create_category(request)
            .await
            .map_err(logged("create_category"))?;

        if let Err(e) = self.refresh_categories().await {
            warn!(error = %e, "Category refresh after create failed");
        }
        Ok(created.or_else(|| {
            // Ids are server-assigned and increasing; the newest match wins
            self.categories()
                .into_iter()
                .filter(|c| c.name == name)
                .max_by_key(|c| c.id)
        }))
    }

    /// Update a category, then re-fetch categories.
    pub async fn update_category(&self, id: CategoryId, request: CategoryUpdate) -> Result<()> {
        self.inner
            .api
            .update_category(id, request)
            .await
            .map_err(logged("update_category"))?;

        if let Err(e) = self.refresh_categories().await {
            warn!(error = %e, "Category refresh after update failed");
        }
        Ok(())
    }

    /// Delete a category, then re-fetch categories, favorites and summary.
    pub async fn delete_category(&self, id: CategoryId, move_to_uncategorized: bool) -> Result<()> {
        self.inner
            .api
            .delete_category(id, move_to_uncategorized)
            .await
            .map_err(logged("delete_category"))?;

        if let Err(e) = self.refresh_categories().await {
            warn!(error = %e, "Category refresh after delete failed");
        }
        self.resync_after_mutation().await;
        Ok(())
    }
}
