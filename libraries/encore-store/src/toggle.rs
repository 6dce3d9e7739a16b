//! Favorite toggle control.
//!
//! One control per rendered entity (a heart button next to a track, album
//! or artist). It mirrors the store's `is_favorite` view while mounted and
//! turns activations into store calls, guarding against re-entry with a
//! busy flag.
//!
//! ```text
//!            mount                emits
//!   Idle ───────────▶ Checking ─────────▶ Idle
//!     │ activate                            ▲
//!     ▼                         ok          │
//!   Toggling ───────────────────────────────┘
//!     │ err
//!     ▼
//!   Error ── activate ──▶ Toggling
//! ```

use crate::events::ToggleEvent;
use crate::store::FavoritesStore;
use encore_core::{EncoreError, EntityKey, FavoritesApi, NewFavorite};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, warn};

/// What to do when a remove is requested but the cache has no matching
/// favorite (the control showed a stale "favorited" state).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StaleRemovePolicy {
    /// Report the activation as failed and show the error state
    #[default]
    Fail,
    /// Flip the control to "not favorite" anyway and log a warning
    FlipAndWarn,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToggleConfig {
    #[serde(default)]
    pub stale_remove_policy: StaleRemovePolicy,
    /// Ignore activations entirely
    #[serde(default)]
    pub disabled: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TogglePhase {
    Idle,
    /// Mounted, waiting for the first membership value
    Checking,
    /// A store call is in flight
    Toggling,
    /// The last activation failed; cleared by the next activation
    Error,
}

/// Render state of a toggle control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToggleState {
    pub phase: TogglePhase,
    pub is_favorite: bool,
    pub busy: bool,
    pub has_error: bool,
}

impl ToggleState {
    /// Tooltip text for the current state.
    pub fn tooltip(&self) -> &'static str {
        if self.has_error {
            "Error occurred - click to retry"
        } else if self.busy {
            "Processing..."
        } else if self.is_favorite {
            "Remove from favorites"
        } else {
            "Add to favorites"
        }
    }
}

impl Default for ToggleState {
    fn default() -> Self {
        Self {
            phase: TogglePhase::Idle,
            is_favorite: false,
            busy: false,
            has_error: false,
        }
    }
}

/// Result of one activation.
#[derive(Debug)]
pub enum ToggleOutcome {
    /// Busy, disabled, unmounted or no entity id: nothing was sent
    Ignored,
    /// The store call succeeded (or a stale remove was flipped)
    Toggled { is_favorite: bool },
    /// The store call failed; the control is in the error state
    Failed(EncoreError),
}

/// Toggle control bound to one catalog entity.
///
/// Cloning yields another handle to the same control.
pub struct FavoriteToggle<A> {
    store: FavoritesStore<A>,
    request: NewFavorite,
    config: ToggleConfig,
    state: Arc<Mutex<ToggleState>>,
    events: broadcast::Sender<ToggleEvent>,
    mounted: Arc<AtomicBool>,
    shutdown: CancellationToken,
}

impl<A> Clone for FavoriteToggle<A> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            request: self.request.clone(),
            config: self.config,
            state: Arc::clone(&self.state),
            events: self.events.clone(),
            mounted: Arc::clone(&self.mounted),
            shutdown: self.shutdown.clone(),
        }
    }
}

impl<A: FavoritesApi + 'static> FavoriteToggle<A> {
    /// Create an unmounted control.
    ///
    /// `request` carries the entity identity and the display metadata sent
    /// when the entity is added. An empty `external_id` yields an inert
    /// control.
    pub fn new(store: FavoritesStore<A>, request: NewFavorite, config: ToggleConfig) -> Self {
        let (events, _) = broadcast::channel(16);
        Self {
            store,
            request,
            config,
            state: Arc::new(Mutex::new(ToggleState::default())),
            events,
            mounted: Arc::new(AtomicBool::new(false)),
            shutdown: CancellationToken::new(),
        }
    }

    pub fn key(&self) -> EntityKey {
        self.request.key()
    }

    /// Current render state.
    pub fn state(&self) -> ToggleState {
        *self.lock_state()
    }

    pub fn tooltip(&self) -> &'static str {
        self.state().tooltip()
    }

    /// Listen for successful toggles.
    pub fn subscribe(&self) -> broadcast::Receiver<ToggleEvent> {
        self.events.subscribe()
    }

    /// True between `mount` and `unmount`.
    pub fn is_mounted(&self) -> bool {
        self.mounted.load(Ordering::Acquire) && !self.shutdown.is_cancelled()
    }

    /// Start mirroring the store's membership view.
    ///
    /// Must be called from within a Tokio runtime. Does nothing when the
    /// control has no entity id.
    pub fn mount(&self) {
        if self.request.external_id.is_empty() || self.shutdown.is_cancelled() {
            return;
        }
        if self.mounted.swap(true, Ordering::AcqRel) {
            return;
        }

        let mut status = self.store.is_favorite(self.key());
        {
            let mut state = self.lock_state();
            state.phase = TogglePhase::Checking;
        }

        // The latest published value counts as the first emission
        apply_membership(&self.state, &self.shutdown, status.current());

        let state = Arc::clone(&self.state);
        let shutdown = self.shutdown.clone();
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    () = shutdown.cancelled() => break,
                    changed = status.changed() => match changed {
                        Some(is_favorite) => apply_membership(&state, &shutdown, is_favorite),
                        None => break,
                    },
                }
            }
            debug!(key = %status.key(), "Toggle watcher stopped");
        });
    }

    /// Release subscriptions. No state transitions happen afterwards;
    /// an in-flight store call still completes but its result is dropped.
    ///
    /// The watcher task started by `mount` runs until this is called or the
    /// store goes away.
    pub fn unmount(&self) {
        self.shutdown.cancel();
    }

    /// User activation.
    pub async fn activate(&self) -> ToggleOutcome {
        let was_favorite = {
            let mut state = self.lock_state();
            // Membership is only known once mounted
            if !self.is_mounted()
                || state.busy
                || self.config.disabled
                || self.request.external_id.is_empty()
            {
                return ToggleOutcome::Ignored;
            }
            state.busy = true;
            state.has_error = false;
            state.phase = TogglePhase::Toggling;
            state.is_favorite
        };

        let key = self.key();
        let result = if was_favorite {
            self.store.remove_entity(&key).await.map(|_| false)
        } else {
            self.store.add_entity(self.request.clone()).await.map(|()| true)
        };

        match result {
            Ok(is_favorite) => self.finish(is_favorite),
            Err(EncoreError::FavoriteNotFound(_))
                if self.config.stale_remove_policy == StaleRemovePolicy::FlipAndWarn =>
            {
                warn!(key = %key, "No cached favorite to remove; flipping control anyway");
                self.finish(false)
            }
            Err(e) => {
                error!(key = %key, error = %e, "Toggling favorite failed");
                if !self.shutdown.is_cancelled() {
                    let mut state = self.lock_state();
                    state.busy = false;
                    state.has_error = true;
                    state.phase = TogglePhase::Error;
                }
                ToggleOutcome::Failed(e)
            }
        }
    }

    fn finish(&self, is_favorite: bool) -> ToggleOutcome {
        if !self.shutdown.is_cancelled() {
            {
                let mut state = self.lock_state();
                state.is_favorite = is_favorite;
                state.busy = false;
                state.has_error = false;
                state.phase = TogglePhase::Idle;
            }
            // Nobody listening is fine
            let _ = self.events.send(ToggleEvent {
                external_id: self.request.external_id.clone(),
                is_favorite,
            });
        }
        ToggleOutcome::Toggled { is_favorite }
    }
}

impl<A> FavoriteToggle<A> {
    fn lock_state(&self) -> std::sync::MutexGuard<'_, ToggleState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Mirror a membership value published by the store.
fn apply_membership(state: &Mutex<ToggleState>, shutdown: &CancellationToken, is_favorite: bool) {
    if shutdown.is_cancelled() {
        return;
    }
    let mut state = state.lock().unwrap_or_else(PoisonError::into_inner);
    state.is_favorite = is_favorite;
    if state.phase == TogglePhase::Checking {
        state.phase = TogglePhase::Idle;
    }
}
