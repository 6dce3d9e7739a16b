//! Catalog object types (Spotify Web API shape)

use serde::{Deserialize, Serialize};

/// Image reference attached to catalog objects and user profiles
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogImage {
    pub url: String,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub width: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogArtist {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub images: Vec<CatalogImage>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogAlbum {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub artists: Vec<CatalogArtist>,
    #[serde(default)]
    pub images: Vec<CatalogImage>,
}

/// A track, album, artist (or other) object from the catalog.
///
/// `kind` is the raw catalog `type` field; only `track`, `album` and
/// `artist` can become favorites.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub artists: Vec<CatalogArtist>,
    #[serde(default)]
    pub album: Option<CatalogAlbum>,
    #[serde(default)]
    pub duration_ms: Option<u64>,
    #[serde(default)]
    pub images: Vec<CatalogImage>,
}

impl CatalogItem {
    pub fn new(id: impl Into<String>, name: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind: kind.into(),
            artists: Vec::new(),
            album: None,
            duration_ms: None,
            images: Vec::new(),
        }
    }

    /// First image of the item, falling back to its album's artwork
    pub fn primary_image_url(&self) -> Option<&str> {
        self.images
            .first()
            .or_else(|| self.album.as_ref().and_then(|a| a.images.first()))
            .map(|img| img.url.as_str())
    }

    /// Comma-joined artist names for display
    pub fn artist_names(&self) -> String {
        self.artists
            .iter()
            .map(|a| a.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}
