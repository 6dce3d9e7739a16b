//! Route guards.
//!
//! A coarse, synchronous presence check on the stored access token. Token
//! expiry and signature are not validated.

use crate::route::{Navigator, Route};
use crate::storage::SessionStorage;
use encore_core::storage_keys;
use tracing::debug;

/// Outcome of a guard check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Admit,
    Redirect(Route),
}

pub struct RouteGuard<S> {
    storage: S,
}

impl<S: SessionStorage> RouteGuard<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Authenticated routes need an access token, otherwise the user is sent
    /// to `Landing`. `Landing` needs its absence, otherwise the user is sent
    /// `Home`.
    pub fn check(&self, route: &Route) -> GuardDecision {
        let has_token = self.storage.contains(storage_keys::ACCESS_TOKEN);

        match (route.requires_auth(), has_token) {
            (true, false) => GuardDecision::Redirect(Route::Landing),
            (false, true) => GuardDecision::Redirect(Route::Home),
            _ => GuardDecision::Admit,
        }
    }

    /// Check `route` and navigate to it or to the redirect target.
    ///
    /// Returns the route actually navigated to.
    pub fn enforce(&self, route: Route, navigator: &dyn Navigator) -> Route {
        let target = match self.check(&route) {
            GuardDecision::Admit => route,
            GuardDecision::Redirect(to) => {
                debug!(from = %route, to = %to, "Route guard redirect");
                to
            }
        };
        navigator.navigate(target.clone());
        target
    }
}
