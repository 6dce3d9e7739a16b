//! Toggle Events
//!
//! Emitted by a `FavoriteToggle` after each successful activation so other
//! parts of the UI can react without polling the store.

use serde::{Deserialize, Serialize};

/// A favorite was added or removed through a toggle control
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToggleEvent {
    /// Catalog id of the toggled entity
    pub external_id: String,
    /// Membership after the toggle
    pub is_favorite: bool,
}
