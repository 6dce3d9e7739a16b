//! Encore HTTP clients
//!
//! Clients for the two REST APIs Encore talks to.
//!
//! # Features
//!
//! - **Account data**: favorites, categories, search history, logout
//!   (bearer-JWT authenticated, `/api/...`)
//! - **Catalog**: new releases, search and track/album/artist lookup on the
//!   Spotify Web API, plus the client-credentials token exchange
//!
//! `AccountClient` implements the `encore-core` transport traits, so it can
//! be handed straight to the favorites store and the session holder.
//!
//! # Example
//!
//! ```ignore
//! use encore_client::{AccountClient, AccountConfig};
//! use encore_core::{FavoriteFilter, FavoritesApi};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AccountConfig::with_token("https://localhost:7244", "jwt...");
//!     let client = AccountClient::new(config)?;
//!
//!     let favorites = client.list_favorites(FavoriteFilter::default()).await?;
//!     println!("{} favorites", favorites.len());
//!     Ok(())
//! }
//! ```

mod account;
mod api;
mod catalog;
mod categories;
mod error;
mod favorites;
mod history;
mod http;
mod types;

pub use account::{AccountClient, RequestContext};
pub use catalog::CatalogClient;
pub use categories::CategoriesClient;
pub use error::{ClientError, Result};
pub use favorites::FavoritesClient;
pub use history::SearchHistoryClient;
pub use types::{
    AccountConfig, CatalogConfig, CatalogPage, CatalogSearchResults, TokenResponse,
    DEFAULT_ACCOUNTS_URL, DEFAULT_CATALOG_URL,
};
