/// Core error types for Encore
use crate::types::EntityKey;
use thiserror::Error;

/// Result type alias using `EncoreError`
pub type Result<T> = std::result::Result<T, EncoreError>;

/// Core error type for Encore
#[derive(Error, Debug)]
pub enum EncoreError {
    /// Network or transport failure (connection refused, timeout, bad body)
    #[error("Network error: {0}")]
    Network(String),

    /// Authentication failed or token rejected (401 class)
    #[error("Authentication failed: {0}")]
    AuthFailed(String),

    /// Entity not found on the server or in the local cache
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// A favorite to remove is absent from the local cache
    #[error("No favorite recorded for {0}")]
    FavoriteNotFound(EntityKey),

    /// Another add/remove for the same entity has not completed yet
    #[error("A favorite change for {0} is already in flight")]
    MutationInFlight(EntityKey),

    /// Server returned a non-success status
    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Catalog type string that maps to no entity type
    #[error("Unknown catalog type: {0}")]
    UnknownEntityType(String),

    /// Durable client storage failure
    #[error("Storage error: {0}")]
    Storage(String),

    /// I/O errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    /// Other errors
    #[error("{0}")]
    Other(String),
}

impl EncoreError {
    /// Create a network error
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    /// Create a storage error
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// Create a not found error
    pub fn not_found(entity: impl Into<String>, id: impl ToString) -> Self {
        Self::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Whether this error must force the session to be cleared.
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, Self::AuthFailed(_)) || matches!(self, Self::Server { status: 401, .. })
    }

    /// Whether this error reports a missing entity, remote or local.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::NotFound { .. } | Self::FavoriteNotFound(_) | Self::Server { status: 404, .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::EntityType;

    #[test]
    fn unauthorized_server_status_counts_as_auth_failure() {
        let err = EncoreError::Server {
            status: 401,
            message: "expired".into(),
        };
        assert!(err.is_auth_failure());
        assert!(EncoreError::AuthFailed("bad token".into()).is_auth_failure());
        assert!(!EncoreError::network("refused").is_auth_failure());
    }

    #[test]
    fn stale_cache_miss_counts_as_not_found() {
        let err = EncoreError::FavoriteNotFound(EntityKey::new("abc", EntityType::Track));
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "No favorite recorded for track:abc");
    }
}
