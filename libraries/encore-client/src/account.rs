//! Main account-data API client.

use crate::categories::CategoriesClient;
use crate::error::{ClientError, Result};
use crate::favorites::FavoritesClient;
use crate::history::SearchHistoryClient;
use crate::http;
use crate::types::AccountConfig;
use reqwest::{Client, Method, RequestBuilder};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

/// Client for the account-data API (favorites, categories, search history).
///
/// Credentials live behind a lock so a login or logout elsewhere can update
/// them without rebuilding the client.
///
/// # Example
///
/// ```ignore
/// use encore_client::{AccountClient, AccountConfig};
///
/// let client = AccountClient::new(AccountConfig::new("https://localhost:7244"))?;
/// client.set_credentials(Some("jwt".into()), Some("me@example.com".into())).await;
///
/// let ctx = client.context().await;
/// let summary = ctx.favorites().summary().await?;
/// println!("{} favorites", summary.total_favorites);
/// ```
#[derive(Clone)]
pub struct AccountClient {
    http: Client,
    config: Arc<RwLock<AccountConfig>>,
}

impl AccountClient {
    /// Create a new client with the given configuration.
    pub fn new(config: AccountConfig) -> Result<Self> {
        let url = normalize_url(&config.url)?;

        let normalized_config = AccountConfig {
            url,
            jwt_token: config.jwt_token,
            user_email: config.user_email,
        };

        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(format!("Encore/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ClientError::Request)?;

        Ok(Self {
            http,
            config: Arc::new(RwLock::new(normalized_config)),
        })
    }

    /// Get the server URL.
    pub async fn url(&self) -> String {
        self.config.read().await.url.clone()
    }

    /// Check if the client has a JWT.
    pub async fn is_authenticated(&self) -> bool {
        self.config.read().await.jwt_token.is_some()
    }

    /// Replace the JWT and user email (e.g., after the session changed).
    pub async fn set_credentials(&self, jwt_token: Option<String>, user_email: Option<String>) {
        let mut config = self.config.write().await;
        config.jwt_token = jwt_token;
        config.user_email = user_email;
        debug!(authenticated = config.jwt_token.is_some(), "Account credentials updated");
    }

    /// Forget the JWT and user email.
    pub async fn clear_credentials(&self) {
        self.set_credentials(None, None).await;
    }

    /// Snapshot the current credentials for a batch of requests.
    pub async fn context(&self) -> RequestContext {
        let config = self.config.read().await;
        RequestContext {
            http: self.http.clone(),
            base_url: config.url.clone(),
            jwt_token: config.jwt_token.clone(),
            user_email: config.user_email.clone(),
        }
    }

    /// Invalidate the session on the server.
    ///
    /// Local credentials are left untouched; the session holder owns them.
    pub async fn logout(&self, jwt_token: Option<&str>) -> Result<()> {
        let ctx = self.context().await;
        let url = format!("{}/api/auth/logout", ctx.base_url);
        debug!(url = %url, "Invalidating server session");

        let mut request = self.http.post(&url).json(&serde_json::json!({}));
        if let Some(token) = jwt_token.or(ctx.jwt_token.as_deref()) {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(http::send_error)?;
        match http::expect_success(response).await {
            Ok(()) => {
                info!("Server session invalidated");
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Server logout failed");
                Err(e)
            }
        }
    }
}

/// Credentials and base URL captured for one or more requests.
///
/// Sub-clients borrow the context, so a batch of calls always uses the same
/// token even if the session changes mid-way.
#[derive(Clone)]
pub struct RequestContext {
    http: Client,
    base_url: String,
    jwt_token: Option<String>,
    user_email: Option<String>,
}

impl RequestContext {
    /// Favorites endpoints.
    pub fn favorites(&self) -> FavoritesClient<'_> {
        FavoritesClient::new(self)
    }

    /// Category endpoints.
    pub fn categories(&self) -> CategoriesClient<'_> {
        CategoriesClient::new(self)
    }

    /// Search history endpoints.
    pub fn history(&self) -> SearchHistoryClient<'_> {
        SearchHistoryClient::new(self)
    }

    /// Build a request with bearer auth and the `email` parameter applied.
    pub(crate) fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let mut builder = self.http.request(method, url);
        if let Some(token) = &self.jwt_token {
            builder = builder.bearer_auth(token);
        }
        if let Some(email) = &self.user_email {
            builder = builder.query(&[("email", email.as_str())]);
        }
        builder
    }
}

pub(crate) fn normalize_url(raw: &str) -> Result<String> {
    if raw.is_empty() {
        return Err(ClientError::InvalidUrl("URL cannot be empty".into()));
    }

    let url = raw.trim_end_matches('/').to_string();
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ClientError::InvalidUrl(
            "URL must start with http:// or https://".into(),
        ));
    }

    url::Url::parse(&url).map_err(|e| ClientError::InvalidUrl(e.to_string()))?;
    Ok(url)
}
