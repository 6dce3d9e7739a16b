//! Encore - Session
//!
//! Everything tied to the signed-in user's session on this device:
//! - `SessionStorage`: durable key/value storage (`MemoryStorage`,
//!   `FileStorage`) with change notifications
//! - `AuthState`: observable current user, reconciled with storage
//! - `Route` and `RouteGuard`: the navigation surface and its coarse
//!   token-presence guards
//!
//! # Example
//!
//! ```rust
//! use encore_session::{GuardDecision, MemoryStorage, Route, RouteGuard, SessionStorage};
//!
//! let storage = MemoryStorage::new();
//! let guard = RouteGuard::new(&storage);
//! assert_eq!(guard.check(&Route::Home), GuardDecision::Redirect(Route::Landing));
//!
//! storage.set("access_token", "token").unwrap();
//! assert_eq!(guard.check(&Route::Home), GuardDecision::Admit);
//! ```

mod auth;
mod guard;
mod route;
mod storage;

pub use auth::{AuthConfig, AuthState, LoginTokens, DEFAULT_POLL_INTERVAL};
pub use guard::{GuardDecision, RouteGuard};
pub use route::{Navigator, Route};
pub use storage::{FileStorage, MemoryStorage, SessionStorage, StorageEvent};
