mod catalog;
mod category;
mod entity;
mod favorite;
mod history;
mod ids;
mod user;

pub use catalog::{CatalogAlbum, CatalogArtist, CatalogImage, CatalogItem};
pub use category::{CategoryUpdate, FavoriteCategory, MoveFavorite, NewCategory};
pub use entity::{is_valid_external_id, EntityKey, EntityType, EXTERNAL_ID_LEN};
pub use favorite::{Favorite, FavoriteFilter, FavoritesGroup, FavoritesSummary, NewFavorite};
pub use history::SearchHistoryEntry;
pub use ids::{CategoryId, FavoriteId, SearchEntryId};
pub use user::AuthenticatedUser;
