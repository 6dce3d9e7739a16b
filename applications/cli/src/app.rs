/// Wiring of clients, session and stores for one CLI invocation
use crate::config::EncoreConfig;
use crate::error::{CliError, Result};
use crate::navigator::ConsoleNavigator;
use encore_client::{AccountClient, AccountConfig, CatalogClient, CatalogConfig};
use encore_session::{AuthState, FileStorage, RouteGuard};
use encore_store::{FavoritesStore, SearchHistory};
use std::sync::Arc;
use tracing::{debug, info};

pub type Session = AuthState<Arc<FileStorage>, AccountClient>;

pub struct App {
    pub config: EncoreConfig,
    pub storage: Arc<FileStorage>,
    pub navigator: Arc<ConsoleNavigator>,
    pub account: AccountClient,
    pub catalog: CatalogClient,
    pub auth: Session,
}

impl App {
    /// Build every component from configuration and the stored session.
    pub async fn connect(config: EncoreConfig) -> Result<Self> {
        let storage = Arc::new(FileStorage::open(&config.session.storage_path));
        let navigator = Arc::new(ConsoleNavigator::new());
        debug!(path = %storage.path().display(), "Using session storage");

        let account = AccountClient::new(AccountConfig::new(&config.account.url))?;
        let auth = AuthState::new(
            Arc::clone(&storage),
            account.clone(),
            Arc::clone(&navigator) as Arc<dyn encore_session::Navigator>,
            config.auth(),
        );

        account
            .set_credentials(auth.jwt_token(), auth.current_user().map(|u| u.email))
            .await;

        let catalog = CatalogClient::new(CatalogConfig {
            api_url: config.catalog.api_url.clone(),
            accounts_url: config.catalog.accounts_url.clone(),
            access_token: auth.access_token(),
        })?;

        Ok(Self {
            config,
            storage,
            navigator,
            account,
            catalog,
            auth,
        })
    }

    pub fn store(&self) -> FavoritesStore<AccountClient> {
        FavoritesStore::new(self.account.clone())
    }

    pub fn history(&self) -> SearchHistory<AccountClient> {
        SearchHistory::with_refetch_delay(self.account.clone(), self.config.refetch_delay())
    }

    pub fn guard(&self) -> RouteGuard<Arc<FileStorage>> {
        RouteGuard::new(Arc::clone(&self.storage))
    }

    /// Fail unless a JWT and user record are stored.
    pub fn require_session(&self) -> Result<()> {
        if self.auth.is_authenticated() {
            Ok(())
        } else {
            Err(CliError::SignedOut(
                "no stored session; sign in through the web app first".to_string(),
            ))
        }
    }

    /// Make sure the catalog client has a token, falling back to the
    /// client-credentials grant when app credentials are configured.
    pub async fn require_catalog(&self) -> Result<()> {
        if self.catalog.is_authenticated().await {
            return Ok(());
        }

        match (&self.config.catalog.client_id, &self.config.catalog.client_secret) {
            (Some(id), Some(secret)) => {
                self.catalog.request_token(id, secret).await?;
                info!("Using app token for catalog requests");
                Ok(())
            }
            _ => Err(CliError::SignedOut(
                "no catalog access token and no client credentials configured".to_string(),
            )),
        }
    }
}
