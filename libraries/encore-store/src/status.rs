use encore_core::{EntityKey, Favorite};
use tokio::sync::watch;

/// Derived, reactive "is this entity a favorite" view over the store cache.
///
/// Not an independent query: the value is recomputed from the cache every
/// time the store publishes a new favorites list.
#[derive(Debug, Clone)]
pub struct FavoriteStatus {
    key: EntityKey,
    favorites: watch::Receiver<Vec<Favorite>>,
}

impl FavoriteStatus {
    pub(crate) fn new(key: EntityKey, favorites: watch::Receiver<Vec<Favorite>>) -> Self {
        Self { key, favorites }
    }

    pub fn key(&self) -> &EntityKey {
        &self.key
    }

    /// Membership in the latest published cache.
    pub fn current(&self) -> bool {
        self.favorites.borrow().iter().any(|f| f.matches(&self.key))
    }

    /// Wait for the next cache publication and recompute.
    ///
    /// Returns `None` once the store has been dropped.
    pub async fn changed(&mut self) -> Option<bool> {
        self.favorites.changed().await.ok()?;
        let is_favorite = self
            .favorites
            .borrow_and_update()
            .iter()
            .any(|f| f.matches(&self.key));
        Some(is_favorite)
    }
}
