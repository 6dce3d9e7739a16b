//! Auth state holder.
//!
//! Mirrors the session identity kept in durable storage into an observable
//! "current user" value. Storage is the source of truth: the holder reloads
//! on storage change events and on a fixed reconciliation interval, and only
//! republishes when the identity actually changed.

use crate::route::{Navigator, Route};
use crate::storage::{SessionStorage, StorageEvent};
use encore_core::{storage_keys, AuthenticatedUser, EncoreError, Result, SessionApi};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::sync::{broadcast, watch};
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Default storage reconciliation interval
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Storage reconciliation interval in milliseconds
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

fn default_poll_interval_ms() -> u64 {
    1000
}

impl AuthConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

/// Credentials produced by a successful login handshake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginTokens {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub jwt: String,
    pub is_admin: bool,
}

/// Observable session identity.
///
/// Cloning yields another handle to the same holder.
pub struct AuthState<S, A> {
    inner: Arc<Inner<S, A>>,
}

struct Inner<S, A> {
    storage: S,
    api: A,
    navigator: Arc<dyn Navigator>,
    user: watch::Sender<Option<AuthenticatedUser>>,
    config: AuthConfig,
    reconciler: Mutex<Option<CancellationToken>>,
}

impl<S, A> Clone for AuthState<S, A> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S, A> AuthState<S, A>
where
    S: SessionStorage + 'static,
    A: SessionApi + 'static,
{
    /// Create the holder and publish whatever identity storage holds now.
    pub fn new(storage: S, api: A, navigator: Arc<dyn Navigator>, config: AuthConfig) -> Self {
        let initial = read_user(&storage);
        let (user, _) = watch::channel(initial);

        Self {
            inner: Arc::new(Inner {
                storage,
                api,
                navigator,
                user,
                config,
                reconciler: Mutex::new(None),
            }),
        }
    }

    pub fn storage(&self) -> &S {
        &self.inner.storage
    }

    // ========================================================================
    // Reads
    // ========================================================================

    /// Last published user.
    pub fn current_user(&self) -> Option<AuthenticatedUser> {
        self.inner.user.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<AuthenticatedUser>> {
        self.inner.user.subscribe()
    }

    /// Both a JWT and a user record are stored.
    pub fn is_authenticated(&self) -> bool {
        self.inner.storage.contains(storage_keys::JWT_TOKEN)
            && self.inner.storage.contains(storage_keys::USER)
    }

    /// An access token for the catalog provider is stored.
    pub fn has_access_token(&self) -> bool {
        self.inner.storage.contains(storage_keys::ACCESS_TOKEN)
    }

    pub fn jwt_token(&self) -> Option<String> {
        self.stored(storage_keys::JWT_TOKEN)
    }

    pub fn access_token(&self) -> Option<String> {
        self.stored(storage_keys::ACCESS_TOKEN)
    }

    fn stored(&self, key: &str) -> Option<String> {
        match self.inner.storage.get(key) {
            Ok(value) => value.filter(|v| !v.is_empty()),
            Err(e) => {
                warn!(key, error = %e, "Storage read failed");
                None
            }
        }
    }

    // ========================================================================
    // Reconciliation
    // ========================================================================

    /// Re-read storage and publish if the identity changed.
    ///
    /// A change is a difference in presence or in email. Returns whether a
    /// new value was published.
    pub fn reload(&self) -> bool {
        let stored = read_user(&self.inner.storage);

        self.inner.user.send_if_modified(|current| {
            let changed = match (current.as_ref(), stored.as_ref()) {
                (None, None) => false,
                (Some(a), Some(b)) => !a.same_identity(b),
                _ => true,
            };
            if changed {
                match &stored {
                    Some(user) => info!(email = %user.email, "Session user updated from storage"),
                    None => info!("Session user cleared"),
                }
                *current = stored;
            }
            changed
        })
    }

    /// Start reconciling with storage in the background.
    ///
    /// Reloads on every storage event for an identity key and on every
    /// poll tick. Must be called from within a Tokio runtime; calling it
    /// again while running does nothing.
    pub fn start(&self) {
        let mut reconciler = self
            .inner
            .reconciler
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if reconciler.as_ref().is_some_and(|t| !t.is_cancelled()) {
            return;
        }

        let token = CancellationToken::new();
        *reconciler = Some(token.clone());

        let state = self.clone();
        let events = self.inner.storage.subscribe();
        tokio::spawn(async move {
            state.reconcile(events, token).await;
        });
    }

    /// Stop the reconciliation task started by `start`.
    pub fn stop(&self) {
        let token = self
            .inner
            .reconciler
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(token) = token {
            token.cancel();
        }
    }

    async fn reconcile(
        &self,
        mut events: broadcast::Receiver<StorageEvent>,
        token: CancellationToken,
    ) {
        // interval() panics on a zero period
        let period = self.inner.config.poll_interval().max(Duration::from_millis(1));
        debug!(?period, "Auth reconciliation started");

        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut events_open = true;

        loop {
            tokio::select! {
                () = token.cancelled() => break,
                _ = ticker.tick() => {
                    self.reload();
                }
                event = events.recv(), if events_open => match event {
                    Ok(event) if is_identity_key(&event.key) => {
                        self.reload();
                    }
                    Ok(_) => {}
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        debug!(skipped, "Storage events lagged; reloading");
                        self.reload();
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        events_open = false;
                    }
                },
            }
        }

        debug!("Auth reconciliation stopped");
    }

    // ========================================================================
    // Login / logout
    // ========================================================================

    /// Persist the result of a login handshake and publish the user.
    pub fn store_login(&self, user: &AuthenticatedUser, tokens: &LoginTokens) -> Result<()> {
        let storage = &self.inner.storage;
        storage.set(storage_keys::ACCESS_TOKEN, &tokens.access_token)?;
        if let Some(refresh) = &tokens.refresh_token {
            storage.set(storage_keys::REFRESH_TOKEN, refresh)?;
        }
        storage.set(storage_keys::JWT_TOKEN, &tokens.jwt)?;
        storage.set(storage_keys::IS_ADMIN, if tokens.is_admin { "true" } else { "false" })?;
        storage.set(storage_keys::USER, &serde_json::to_string(user)?)?;

        self.reload();
        Ok(())
    }

    /// Invalidate the session on the server, then clear it locally.
    ///
    /// Local data is cleared, the absent user published and the user sent
    /// to `Landing` whether or not the server call succeeded. A server
    /// failure is still returned.
    pub async fn logout(&self) -> Result<()> {
        let jwt = self.jwt_token();
        let result = self.inner.api.logout(jwt.as_deref()).await;

        if let Err(e) = &result {
            warn!(error = %e, "Server logout failed, clearing local session anyway");
        }
        self.clear_session();
        result
    }

    /// Clear the session without calling the server.
    pub fn logout_local(&self) {
        self.clear_session();
    }

    /// Clear the session if `err` is an authentication failure.
    ///
    /// Returns whether the session was cleared.
    pub fn handle_auth_failure(&self, err: &EncoreError) -> bool {
        if !err.is_auth_failure() {
            return false;
        }
        warn!(error = %err, "Authentication rejected, clearing session");
        self.clear_session();
        true
    }

    fn clear_session(&self) {
        for key in storage_keys::SESSION_KEYS {
            if let Err(e) = self.inner.storage.remove(key) {
                error!(key, error = %e, "Failed to clear session key");
            }
        }

        self.inner.user.send_replace(None);
        info!("Session cleared");
        self.inner.navigator.navigate(Route::Landing);
    }
}

fn is_identity_key(key: &str) -> bool {
    key == storage_keys::USER || key == storage_keys::JWT_TOKEN
}

/// The stored user, if both a user record and a JWT are present.
fn read_user<S: SessionStorage>(storage: &S) -> Option<AuthenticatedUser> {
    let user = match (storage.get(storage_keys::USER), storage.get(storage_keys::JWT_TOKEN)) {
        (Ok(Some(user)), Ok(Some(jwt))) if !user.is_empty() && !jwt.is_empty() => user,
        (Err(e), _) | (_, Err(e)) => {
            warn!(error = %e, "Reading session from storage failed");
            return None;
        }
        _ => return None,
    };

    match serde_json::from_str(&user) {
        Ok(user) => Some(user),
        Err(e) => {
            error!(error = %e, "Stored user record is not valid JSON");
            None
        }
    }
}
