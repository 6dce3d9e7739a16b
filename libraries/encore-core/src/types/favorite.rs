//! Favorite types

use super::{CatalogItem, CategoryId, EntityKey, EntityType, FavoriteCategory, FavoriteId};
use crate::error::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A user-saved reference to a track, album or artist from the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Favorite {
    pub id: FavoriteId,
    pub entity_type: EntityType,
    #[serde(rename = "spotifyId")]
    pub external_id: String,
    #[serde(rename = "entityName")]
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artist_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub album_name: Option<String>,
    #[serde(rename = "duration", default, skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<FavoriteCategory>,
}

impl Favorite {
    /// Identity of the catalog entity this favorite points to
    pub fn key(&self) -> EntityKey {
        EntityKey::new(self.external_id.clone(), self.entity_type)
    }

    /// Whether this favorite points to the given entity
    pub fn matches(&self, key: &EntityKey) -> bool {
        self.entity_type == key.entity_type && self.external_id == key.external_id
    }
}

/// Request to create a favorite (`AddFavoriteRequest` on the wire)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewFavorite {
    pub entity_type: EntityType,
    #[serde(rename = "spotifyId")]
    pub external_id: String,
    #[serde(rename = "entityName")]
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artist_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub album_name: Option<String>,
    #[serde(rename = "duration", default, skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<CategoryId>,
}

impl NewFavorite {
    /// Minimal request with only the identity and a display name
    pub fn new(key: EntityKey, display_name: impl Into<String>) -> Self {
        Self {
            entity_type: key.entity_type,
            external_id: key.external_id,
            display_name: display_name.into(),
            artist_name: None,
            album_name: None,
            duration_ms: None,
            image_url: None,
            category_id: None,
        }
    }

    /// Build a request from a catalog object, extracting display metadata.
    ///
    /// - artist name: first artist of the item, else first artist of its
    ///   album; never set for artists
    /// - album name: only for tracks
    /// - image: first image of the item, else first image of its album
    pub fn from_catalog_item(item: &CatalogItem, category_id: Option<CategoryId>) -> Result<Self> {
        let entity_type: EntityType = item.kind.parse()?;

        let artist_name = if entity_type == EntityType::Artist {
            None
        } else {
            item.artists
                .first()
                .map(|a| a.name.clone())
                .or_else(|| {
                    item.album
                        .as_ref()
                        .and_then(|album| album.artists.first())
                        .map(|a| a.name.clone())
                })
        };

        let album_name = match entity_type {
            EntityType::Track => item.album.as_ref().map(|album| album.name.clone()),
            _ => None,
        };

        Ok(Self {
            entity_type,
            external_id: item.id.clone(),
            display_name: item.name.clone(),
            artist_name,
            album_name,
            duration_ms: item.duration_ms,
            image_url: item.primary_image_url().map(str::to_string),
            category_id,
        })
    }

    pub fn key(&self) -> EntityKey {
        EntityKey::new(self.external_id.clone(), self.entity_type)
    }
}

/// Server-computed aggregate counts over a user's favorites
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoritesSummary {
    pub total_favorites: u32,
    pub tracks_count: u32,
    pub artists_count: u32,
    pub albums_count: u32,
    pub categories_count: u32,
    #[serde(default)]
    pub categories: Vec<FavoriteCategory>,
}

/// Favorites of one category (or uncategorized when `category` is `None`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoritesGroup {
    #[serde(default)]
    pub category: Option<FavoriteCategory>,
    pub favorites: Vec<Favorite>,
}

/// Optional list filters accepted by the favorites endpoint
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FavoriteFilter {
    pub entity_type: Option<EntityType>,
    pub category_id: Option<CategoryId>,
}

impl FavoriteFilter {
    pub fn entity_type(entity_type: EntityType) -> Self {
        Self {
            entity_type: Some(entity_type),
            category_id: None,
        }
    }

    pub fn category(category_id: CategoryId) -> Self {
        Self {
            entity_type: None,
            category_id: Some(category_id),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entity_type.is_none() && self.category_id.is_none()
    }

    pub fn matches(&self, favorite: &Favorite) -> bool {
        let type_ok = self
            .entity_type
            .map_or(true, |t| favorite.entity_type == t);
        let category_ok = self.category_id.map_or(true, |id| {
            favorite.category.as_ref().is_some_and(|c| c.id == id)
        });
        type_ok && category_ok
    }
}
