//! Favorite category types

use super::CategoryId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A user-defined grouping label applied to favorites.
///
/// Lifecycle is owned by the server; favorites reference categories by id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteCategory {
    pub id: CategoryId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "color")]
    pub color_tag: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub favorites_count: u32,
}

/// Data for creating a new category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCategory {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub color: String,
}

/// Replacement values for an existing category
pub type CategoryUpdate = NewCategory;

/// Request body for moving a favorite between categories
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveFavorite {
    /// Target category, `None` for uncategorized
    pub category_id: Option<CategoryId>,
}
