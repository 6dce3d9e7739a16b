use encore_session::{Navigator, Route};
use std::sync::Mutex;
use tracing::info;

/// Navigator for a terminal front end: records where the session asked to
/// go so the command can report it.
#[derive(Debug, Default)]
pub struct ConsoleNavigator {
    last: Mutex<Option<Route>>,
}

impl ConsoleNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Most recent navigation target, if any.
    pub fn last(&self) -> Option<Route> {
        self.last
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }
}

impl Navigator for ConsoleNavigator {
    fn navigate(&self, route: Route) {
        info!(route = %route, "Navigating");
        *self
            .last
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner) = Some(route);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remembers_last_route() {
        let navigator = ConsoleNavigator::new();
        assert!(navigator.last().is_none());
        navigator.navigate(Route::Home);
        navigator.navigate(Route::Landing);
        assert_eq!(navigator.last(), Some(Route::Landing));
    }
}
