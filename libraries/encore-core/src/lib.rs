//! Encore Core
//!
//! Platform-agnostic types, traits, and error handling shared by every
//! Encore crate.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `Favorite`, `FavoriteCategory`, `FavoritesSummary`,
//!   `CatalogItem`, `AuthenticatedUser`
//! - **Transport Traits**: `FavoritesApi`, `SearchHistoryApi`, `SessionApi`
//! - **Error Handling**: Unified `EncoreError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use encore_core::types::{CatalogItem, EntityType, NewFavorite};
//!
//! let item = CatalogItem::new("4uLU6hMCjMI75M1A2tKUQC", "Never Gonna Give You Up", "track");
//! let request = NewFavorite::from_catalog_item(&item, None).unwrap();
//!
//! assert_eq!(request.entity_type, EntityType::Track);
//! assert_eq!(request.display_name, "Never Gonna Give You Up");
//! ```

#![forbid(unsafe_code)]

pub mod error;
pub mod storage_keys;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use error::{EncoreError, Result};
pub use traits::{FavoritesApi, SearchHistoryApi, SessionApi};

pub use types::{
    // Account data
    CategoryId, CategoryUpdate, EntityKey, EntityType, Favorite, FavoriteCategory,
    FavoriteFilter, FavoriteId, FavoritesGroup, FavoritesSummary, MoveFavorite, NewCategory,
    NewFavorite,
    // Catalog
    is_valid_external_id, CatalogAlbum, CatalogArtist, CatalogImage, CatalogItem, EXTERNAL_ID_LEN,
    // Session
    AuthenticatedUser, SearchEntryId, SearchHistoryEntry,
};
