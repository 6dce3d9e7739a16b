//! Navigation surface.

use encore_core::EntityType;
use std::fmt;

/// Application routes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Unauthenticated entry point
    Landing,
    Home,
    Search(String),
    Player { entity_type: EntityType, id: String },
}

impl Route {
    /// Resolve a path. Empty and unmatched paths resolve to `Landing`.
    pub fn parse(path: &str) -> Self {
        let segments: Vec<&str> = path
            .split('?')
            .next()
            .unwrap_or_default()
            .split('/')
            .filter(|s| !s.is_empty())
            .collect();

        match segments.as_slice() {
            ["home"] => Self::Home,
            ["search", query] => Self::Search((*query).to_string()),
            ["player", kind, id] => match kind.parse::<EntityType>() {
                Ok(entity_type) => Self::Player {
                    entity_type,
                    id: (*id).to_string(),
                },
                Err(_) => Self::Landing,
            },
            _ => Self::Landing,
        }
    }

    pub fn path(&self) -> String {
        match self {
            Self::Landing => "/landing".to_string(),
            Self::Home => "/home".to_string(),
            Self::Search(query) => format!("/search/{}", query),
            Self::Player { entity_type, id } => format!("/player/{}/{}", entity_type, id),
        }
    }

    /// Whether the route is only reachable with a stored access token.
    pub fn requires_auth(&self) -> bool {
        !matches!(self, Self::Landing)
    }

    /// Whether the search bar is shown on this route.
    pub fn shows_search_bar(&self) -> bool {
        self.requires_auth()
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Something that can move the user to another route.
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: Route);
}
