//! Spotify Web API client for catalog browsing and metadata lookup.

use crate::account::normalize_url;
use crate::error::{ClientError, Result};
use crate::http;
use crate::types::{CatalogConfig, CatalogPage, CatalogSearchResults, NewReleasesResponse, TokenResponse};
use encore_core::{AuthenticatedUser, CatalogItem, EntityKey, EntityType};
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

/// Types requested by `search`.
const SEARCH_TYPES: &str = "album,artist,track,playlist";

/// Catalog client.
///
/// Supplies display metadata (names, artists, artwork) for catalog objects
/// and the signed-in user's profile.
#[derive(Clone)]
pub struct CatalogClient {
    http: Client,
    config: Arc<RwLock<CatalogConfig>>,
}

impl CatalogClient {
    /// Create a new client with the given configuration.
    pub fn new(config: CatalogConfig) -> Result<Self> {
        let normalized = CatalogConfig {
            api_url: normalize_url(&config.api_url)?,
            accounts_url: normalize_url(&config.accounts_url)?,
            access_token: config.access_token,
        };

        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(format!("Encore/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ClientError::Request)?;

        Ok(Self {
            http,
            config: Arc::new(RwLock::new(normalized)),
        })
    }

    /// Replace the provider access token.
    pub async fn set_access_token(&self, access_token: Option<String>) {
        self.config.write().await.access_token = access_token;
    }

    /// Check if the client has an access token.
    pub async fn is_authenticated(&self) -> bool {
        self.config.read().await.access_token.is_some()
    }

    /// Obtain an app token with the client-credentials grant and keep it.
    pub async fn request_token(&self, client_id: &str, client_secret: &str) -> Result<TokenResponse> {
        let url = format!("{}/api/token", self.config.read().await.accounts_url);
        debug!(url = %url, "Requesting client-credentials token");

        let response = self
            .http
            .post(&url)
            .basic_auth(client_id, Some(client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await
            .map_err(http::send_error)?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            warn!(status = %status, error = %error_text, "Token request rejected");
            return Err(ClientError::TokenRequestFailed(error_text));
        }

        let token: TokenResponse = response.json().await.map_err(|e| {
            ClientError::ParseError(format!("Failed to parse token response: {}", e))
        })?;

        self.set_access_token(Some(token.access_token.clone())).await;
        info!(expires_in = token.expires_in, "Catalog token acquired");
        Ok(token)
    }

    /// Albums from the "new releases" browse endpoint.
    pub async fn new_releases(&self) -> Result<Vec<CatalogItem>> {
        let response: NewReleasesResponse = self.get("/browse/new-releases", &[]).await?;
        debug!(count = response.albums.items.len(), "Fetched new releases");
        Ok(response.albums.items)
    }

    /// Search albums, artists, tracks and playlists.
    pub async fn search(&self, query: &str) -> Result<CatalogSearchResults> {
        let results: CatalogSearchResults = self
            .get("/search", &[("q", query), ("type", SEARCH_TYPES)])
            .await?;

        debug!(
            query = %query,
            tracks = results.tracks.as_ref().map_or(0, |p| p.items.len()),
            albums = results.albums.as_ref().map_or(0, |p| p.items.len()),
            artists = results.artists.as_ref().map_or(0, |p| p.items.len()),
            "Search complete"
        );
        Ok(results)
    }

    pub async fn track(&self, id: &str) -> Result<CatalogItem> {
        self.get(&format!("/tracks/{}", id), &[]).await
    }

    pub async fn album(&self, id: &str) -> Result<CatalogItem> {
        self.get(&format!("/albums/{}", id), &[]).await
    }

    pub async fn artist(&self, id: &str) -> Result<CatalogItem> {
        self.get(&format!("/artists/{}", id), &[]).await
    }

    /// Look up display metadata for any favoritable entity.
    pub async fn describe(&self, key: &EntityKey) -> Result<CatalogItem> {
        match key.entity_type {
            EntityType::Track => self.track(&key.external_id).await,
            EntityType::Album => self.album(&key.external_id).await,
            EntityType::Artist => self.artist(&key.external_id).await,
        }
    }

    /// Tracks of an album, as a page.
    pub async fn album_tracks(&self, id: &str) -> Result<CatalogPage> {
        self.get(&format!("/albums/{}/tracks", id), &[]).await
    }

    /// Profile of the user the access token belongs to.
    pub async fn current_user(&self) -> Result<AuthenticatedUser> {
        self.get("/me", &[]).await
    }

    async fn get<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T> {
        let config = self.config.read().await;
        let url = format!("{}{}", config.api_url, path);
        let access_token = config.access_token.clone().ok_or(ClientError::AuthRequired)?;
        drop(config);

        debug!(url = %url, "Catalog request");
        let response = self
            .http
            .get(&url)
            .bearer_auth(access_token)
            .query(query)
            .send()
            .await
            .map_err(http::send_error)?;

        http::read_json(response, path).await
    }
}
