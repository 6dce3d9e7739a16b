//! Encore - Favorites Store
//!
//! The single authoritative in-memory cache of the user's favorites,
//! categories and summary, plus the UI-facing pieces built on it.
//!
//! This crate provides:
//! - `FavoritesStore`: watch-channel backed cache with one writer (the
//!   store) and any number of readers; every mutation is followed by a full
//!   re-fetch of favorites and summary
//! - `FavoriteStatus`: the derived "is this entity a favorite" view
//! - `FavoriteToggle`: the per-entity toggle control state machine
//! - `SearchHistory`: search history cache with a delayed re-fetch after
//!   each change
//!
//! # Concurrency
//!
//! Mutations for the same `(external_id, entity_type)` are serialized by a
//! per-entity lock: a second add/remove/toggle while one is in flight fails
//! with `EncoreError::MutationInFlight` instead of racing it.
//!
//! # Example
//!
//! ```rust,no_run
//! use encore_core::{CatalogItem, FavoritesApi};
//! use encore_store::FavoritesStore;
//!
//! async fn heart<A: FavoritesApi + 'static>(api: A) -> encore_core::Result<()> {
//!     let store = FavoritesStore::new(api);
//!     store.load().await?;
//!
//!     let item = CatalogItem::new("4uLU6hMCjMI75M1A2tKUQC", "Song", "track");
//!     let now_favorite = store.toggle(&item, None).await?;
//!     println!("favorite: {now_favorite}");
//!     Ok(())
//! }
//! ```

mod events;
mod history;
mod lock;
mod status;
mod store;
mod toggle;

// Public exports
pub use events::ToggleEvent;
pub use history::{SearchHistory, DEFAULT_REFETCH_DELAY};
pub use status::FavoriteStatus;
pub use store::FavoritesStore;
pub use toggle::{
    FavoriteToggle, StaleRemovePolicy, ToggleConfig, ToggleOutcome, TogglePhase, ToggleState,
};
