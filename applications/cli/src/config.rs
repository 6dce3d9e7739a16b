/// CLI configuration
use crate::error::{CliError, Result};
use encore_client::{DEFAULT_ACCOUNTS_URL, DEFAULT_CATALOG_URL};
use encore_session::AuthConfig;
use encore_store::{StaleRemovePolicy, ToggleConfig};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Config file read from the working directory when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "encore.toml";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EncoreConfig {
    #[serde(default = "default_account")]
    pub account: AccountSettings,

    #[serde(default = "default_catalog")]
    pub catalog: CatalogSettings,

    #[serde(default = "default_session")]
    pub session: SessionSettings,

    #[serde(default)]
    pub favorites: FavoritesSettings,

    #[serde(default = "default_history")]
    pub history: HistorySettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AccountSettings {
    /// Base URL of the account-data API
    #[serde(default = "default_account_url")]
    pub url: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CatalogSettings {
    #[serde(default = "default_catalog_url")]
    pub api_url: String,

    #[serde(default = "default_accounts_url")]
    pub accounts_url: String,

    /// App credentials for the client-credentials grant, used when no
    /// user access token is stored
    #[serde(default)]
    pub client_id: Option<String>,

    #[serde(default)]
    pub client_secret: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SessionSettings {
    /// JSON file holding tokens and the signed-in user
    #[serde(default = "default_storage_path")]
    pub storage_path: PathBuf,

    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct FavoritesSettings {
    /// What a toggle does when asked to remove a favorite the cache lacks
    #[serde(default)]
    pub stale_remove_policy: StaleRemovePolicy,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HistorySettings {
    /// Delay before the history is re-fetched after a change
    #[serde(default = "default_refetch_delay_ms")]
    pub refetch_delay_ms: u64,
}

impl EncoreConfig {
    /// Load configuration from file and environment.
    ///
    /// `path` must exist when given; otherwise `encore.toml` is read if
    /// present. `ENCORE_*` variables override the file, with `__` between
    /// section and key (`ENCORE_ACCOUNT__URL`).
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                settings = settings.add_source(config::File::from(path).required(true));
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    settings = settings.add_source(config::File::from(default_path));
                }
            }
        }

        settings = settings.add_source(
            config::Environment::with_prefix("ENCORE")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = settings
            .build()
            .map_err(|e| CliError::Config(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| CliError::Config(e.to_string()))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("account.url", &self.account.url),
            ("catalog.api_url", &self.catalog.api_url),
            ("catalog.accounts_url", &self.catalog.accounts_url),
        ] {
            url::Url::parse(value)
                .map_err(|e| CliError::Config(format!("{} is not a valid URL: {}", name, e)))?;
        }

        if self.catalog.client_id.is_some() != self.catalog.client_secret.is_some() {
            return Err(CliError::Config(
                "catalog.client_id and catalog.client_secret must be set together".to_string(),
            ));
        }

        if self.session.poll_interval_ms == 0 {
            return Err(CliError::Config(
                "session.poll_interval_ms must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }

    pub fn auth(&self) -> AuthConfig {
        AuthConfig {
            poll_interval_ms: self.session.poll_interval_ms,
        }
    }

    pub fn toggle(&self) -> ToggleConfig {
        ToggleConfig {
            stale_remove_policy: self.favorites.stale_remove_policy,
            disabled: false,
        }
    }

    pub fn refetch_delay(&self) -> Duration {
        Duration::from_millis(self.history.refetch_delay_ms)
    }
}

// Default values
fn default_account() -> AccountSettings {
    AccountSettings {
        url: default_account_url(),
    }
}

fn default_account_url() -> String {
    "https://localhost:7244".to_string()
}

fn default_catalog() -> CatalogSettings {
    CatalogSettings {
        api_url: default_catalog_url(),
        accounts_url: default_accounts_url(),
        client_id: None,
        client_secret: None,
    }
}

fn default_catalog_url() -> String {
    DEFAULT_CATALOG_URL.to_string()
}

fn default_accounts_url() -> String {
    DEFAULT_ACCOUNTS_URL.to_string()
}

fn default_session() -> SessionSettings {
    SessionSettings {
        storage_path: default_storage_path(),
        poll_interval_ms: default_poll_interval_ms(),
    }
}

fn default_storage_path() -> PathBuf {
    PathBuf::from("./data/session.json")
}

fn default_poll_interval_ms() -> u64 {
    1000
}

fn default_history() -> HistorySettings {
    HistorySettings {
        refetch_delay_ms: default_refetch_delay_ms(),
    }
}

fn default_refetch_delay_ms() -> u64 {
    300
}

impl Default for EncoreConfig {
    fn default() -> Self {
        Self {
            account: default_account(),
            catalog: default_catalog(),
            session: default_session(),
            favorites: FavoritesSettings::default(),
            history: default_history(),
        }
    }
}
