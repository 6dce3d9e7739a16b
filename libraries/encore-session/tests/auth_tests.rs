//! Auth state holder tests

use async_trait::async_trait;
use encore_core::{storage_keys, AuthenticatedUser, EncoreError, Result, SessionApi};
use encore_session::{
    AuthConfig, AuthState, FileStorage, LoginTokens, MemoryStorage, Navigator, Route,
    SessionStorage,
};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Fake server logout endpoint. Clones share counters.
#[derive(Clone, Default)]
struct FakeSession {
    calls: Arc<AtomicUsize>,
    fail: Arc<AtomicBool>,
    last_jwt: Arc<Mutex<Option<String>>>,
}

#[async_trait]
impl SessionApi for FakeSession {
    async fn logout(&self, jwt: Option<&str>) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_jwt.lock().unwrap() = jwt.map(str::to_string);
        if self.fail.load(Ordering::SeqCst) {
            return Err(EncoreError::network("connection refused"));
        }
        Ok(())
    }
}

#[derive(Default)]
struct RecordingNavigator(Mutex<Vec<Route>>);

impl RecordingNavigator {
    fn visited(&self) -> Vec<Route> {
        self.0.lock().unwrap().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, route: Route) {
        self.0.lock().unwrap().push(route);
    }
}

fn user(email: &str) -> AuthenticatedUser {
    AuthenticatedUser {
        display_name: Some("Listener".into()),
        email: email.into(),
        images: Vec::new(),
        id: "u1".into(),
        country: "SE".into(),
    }
}

fn tokens() -> LoginTokens {
    LoginTokens {
        access_token: "access".into(),
        refresh_token: Some("refresh".into()),
        jwt: "jwt".into(),
        is_admin: false,
    }
}

fn write_user(storage: &impl SessionStorage, user: &AuthenticatedUser) {
    storage
        .set(storage_keys::USER, &serde_json::to_string(user).unwrap())
        .unwrap();
    storage.set(storage_keys::JWT_TOKEN, "jwt").unwrap();
}

type Holder = AuthState<Arc<MemoryStorage>, FakeSession>;

fn holder(
    config: AuthConfig,
) -> (
    Holder,
    Arc<MemoryStorage>,
    FakeSession,
    Arc<RecordingNavigator>,
) {
    let storage = Arc::new(MemoryStorage::new());
    let api = FakeSession::default();
    let navigator = Arc::new(RecordingNavigator::default());
    let state = AuthState::new(
        Arc::clone(&storage),
        api.clone(),
        Arc::clone(&navigator) as Arc<dyn Navigator>,
        config,
    );
    (state, storage, api, navigator)
}

#[test]
fn construction_publishes_stored_user() {
    let storage = Arc::new(MemoryStorage::new());
    write_user(&storage, &user("a@example.com"));

    let state = AuthState::new(
        Arc::clone(&storage),
        FakeSession::default(),
        Arc::new(RecordingNavigator::default()),
        AuthConfig::default(),
    );

    assert_eq!(state.current_user().unwrap().email, "a@example.com");
    assert!(state.is_authenticated());
    assert!(!state.has_access_token());
}

#[test]
fn reload_publishes_only_on_identity_change() {
    let (state, storage, _, _) = holder(AuthConfig::default());
    let mut rx = state.subscribe();
    assert!(state.current_user().is_none());

    // Nothing stored, nothing changes
    assert!(!state.reload());

    write_user(&*storage, &user("a@example.com"));
    assert!(state.reload());
    assert!(rx.has_changed().unwrap());
    drop(rx.borrow_and_update());

    // Same email, different display name: not a change
    let mut renamed = user("a@example.com");
    renamed.display_name = Some("Renamed".into());
    write_user(&*storage, &renamed);
    assert!(!state.reload());
    assert!(!rx.has_changed().unwrap());

    write_user(&*storage, &user("b@example.com"));
    assert!(state.reload());
    assert_eq!(state.current_user().unwrap().email, "b@example.com");

    storage.remove(storage_keys::JWT_TOKEN).unwrap();
    assert!(state.reload());
    assert!(state.current_user().is_none());
}

#[test]
fn store_login_persists_and_publishes() {
    let (state, storage, _, _) = holder(AuthConfig::default());

    state.store_login(&user("a@example.com"), &tokens()).unwrap();

    assert_eq!(state.current_user().unwrap().email, "a@example.com");
    assert!(state.has_access_token());
    assert_eq!(state.jwt_token().as_deref(), Some("jwt"));
    assert_eq!(
        storage.get(storage_keys::IS_ADMIN).unwrap().as_deref(),
        Some("false")
    );
}

#[tokio::test]
async fn logout_clears_session_and_goes_to_landing() {
    let (state, storage, api, navigator) = holder(AuthConfig::default());
    state.store_login(&user("a@example.com"), &tokens()).unwrap();
    storage.set(storage_keys::DARK_MODE, "true").unwrap();

    state.logout().await.unwrap();

    assert_eq!(api.calls.load(Ordering::SeqCst), 1);
    assert_eq!(api.last_jwt.lock().unwrap().as_deref(), Some("jwt"));
    assert!(state.current_user().is_none());
    for key in storage_keys::SESSION_KEYS {
        assert!(storage.get(key).unwrap().is_none(), "{} not cleared", key);
    }
    // Preferences survive logout
    assert_eq!(
        storage.get(storage_keys::DARK_MODE).unwrap().as_deref(),
        Some("true")
    );
    assert_eq!(navigator.visited(), vec![Route::Landing]);
}

#[tokio::test]
async fn logout_clears_locally_even_when_server_fails() {
    let (state, _, api, navigator) = holder(AuthConfig::default());
    state.store_login(&user("a@example.com"), &tokens()).unwrap();
    api.fail.store(true, Ordering::SeqCst);

    let err = state.logout().await.unwrap_err();

    assert!(matches!(err, EncoreError::Network(_)));
    assert!(state.current_user().is_none());
    assert!(!state.is_authenticated());
    assert!(!state.has_access_token());
    assert_eq!(navigator.visited(), vec![Route::Landing]);
}

#[test]
fn auth_failures_clear_the_session() {
    let (state, _, api, navigator) = holder(AuthConfig::default());
    state.store_login(&user("a@example.com"), &tokens()).unwrap();

    assert!(!state.handle_auth_failure(&EncoreError::network("timeout")));
    assert!(state.is_authenticated());

    let unauthorized = EncoreError::Server {
        status: 401,
        message: "expired".into(),
    };
    assert!(state.handle_auth_failure(&unauthorized));
    assert!(!state.is_authenticated());
    assert!(state.current_user().is_none());
    assert_eq!(navigator.visited(), vec![Route::Landing]);
    // Local only
    assert_eq!(api.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn storage_events_trigger_reload() {
    // Long poll interval so only the event can explain the update
    let (state, storage, _, _) = holder(AuthConfig {
        poll_interval_ms: 60_000,
    });
    let mut rx = state.subscribe();
    state.start();
    // Let the first (immediate) poll tick run
    tokio::task::yield_now().await;

    write_user(&*storage, &user("a@example.com"));

    tokio::time::timeout(Duration::from_secs(2), rx.changed())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(state.current_user().unwrap().email, "a@example.com");
    state.stop();
}

#[tokio::test(start_paused = true)]
async fn polling_picks_up_writes_from_another_process() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");
    let ours = Arc::new(FileStorage::open(&path));
    let theirs = FileStorage::open(&path);

    let state = AuthState::new(
        Arc::clone(&ours),
        FakeSession::default(),
        Arc::new(RecordingNavigator::default()),
        AuthConfig::default(),
    );
    let mut rx = state.subscribe();
    state.start();
    tokio::task::yield_now().await;

    // Another handle's writes produce no events for us
    write_user(&theirs, &user("a@example.com"));
    assert!(state.current_user().is_none());

    tokio::time::timeout(Duration::from_secs(5), rx.changed())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(state.current_user().unwrap().email, "a@example.com");

    state.stop();
}

#[tokio::test(start_paused = true)]
async fn stopped_holder_no_longer_reconciles() {
    let (state, storage, _, _) = holder(AuthConfig::default());
    state.start();
    tokio::task::yield_now().await;
    state.stop();
    tokio::task::yield_now().await;

    write_user(&*storage, &user("a@example.com"));
    tokio::time::sleep(Duration::from_secs(3)).await;

    assert!(state.current_user().is_none());
    // An explicit reload still works
    assert!(state.reload());
}
