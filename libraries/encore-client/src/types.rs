//! Types for Encore API requests and responses.

use encore_core::CatalogItem;
use serde::{Deserialize, Serialize};

/// Default base URL of the Spotify Web API.
pub const DEFAULT_CATALOG_URL: &str = "https://api.spotify.com/v1";

/// Default base URL of the Spotify accounts service (token endpoint).
pub const DEFAULT_ACCOUNTS_URL: &str = "https://accounts.spotify.com";

/// Configuration for connecting to the account-data API.
#[derive(Debug, Clone)]
pub struct AccountConfig {
    /// Base URL of the server (e.g., "https://localhost:7244")
    pub url: String,
    /// JWT issued at login (sent as a bearer token)
    pub jwt_token: Option<String>,
    /// Email of the signed-in user, sent as the `email` query parameter
    pub user_email: Option<String>,
}

impl AccountConfig {
    /// Create a new config with just the URL.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            jwt_token: None,
            user_email: None,
        }
    }

    /// Create a config with an existing JWT.
    pub fn with_token(url: impl Into<String>, jwt_token: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            jwt_token: Some(jwt_token.into()),
            user_email: None,
        }
    }

    /// Attach the signed-in user's email.
    #[must_use]
    pub fn user_email(mut self, email: impl Into<String>) -> Self {
        self.user_email = Some(email.into());
        self
    }
}

/// Configuration for the catalog (Spotify Web API) client.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    pub api_url: String,
    pub accounts_url: String,
    /// Provider access token (the `access_token` storage key)
    pub access_token: Option<String>,
}

impl CatalogConfig {
    pub fn new(access_token: Option<String>) -> Self {
        Self {
            api_url: DEFAULT_CATALOG_URL.to_string(),
            accounts_url: DEFAULT_ACCOUNTS_URL.to_string(),
            access_token,
        }
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self::new(None)
    }
}

// =============================================================================
// Account API Types
// =============================================================================

/// Request body for recording a search.
#[derive(Debug, Serialize)]
pub(crate) struct AddSearchRequest<'a> {
    pub query: &'a str,
}

// =============================================================================
// Catalog Types
// =============================================================================

/// Response from the provider token endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    /// Token validity in seconds
    pub expires_in: u64,
}

/// One page of catalog objects.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CatalogPage {
    #[serde(default)]
    pub items: Vec<CatalogItem>,
    #[serde(default)]
    pub total: u32,
}

/// Search response, one page per requested type.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CatalogSearchResults {
    #[serde(default)]
    pub tracks: Option<CatalogPage>,
    #[serde(default)]
    pub albums: Option<CatalogPage>,
    #[serde(default)]
    pub artists: Option<CatalogPage>,
    #[serde(default)]
    pub playlists: Option<CatalogPage>,
}

impl CatalogSearchResults {
    /// Every returned object that can be favorited, tracks first.
    pub fn favoritable(&self) -> impl Iterator<Item = &CatalogItem> {
        [&self.tracks, &self.albums, &self.artists]
            .into_iter()
            .flatten()
            .flat_map(|page| page.items.iter())
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct NewReleasesResponse {
    pub albums: CatalogPage,
}
