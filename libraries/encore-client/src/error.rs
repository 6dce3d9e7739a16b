//! Error types for the Encore HTTP clients.

use encore_core::EncoreError;
use thiserror::Error;

/// Errors that can occur when talking to the account-data or catalog APIs.
#[derive(Error, Debug)]
pub enum ClientError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Server returned an error response
    #[error("Server error ({status}): {message}")]
    ServerError { status: u16, message: String },

    /// Server rejected or did not receive a bearer token
    #[error("Authentication required")]
    AuthRequired,

    /// Token exchange against the provider failed
    #[error("Token request failed: {0}")]
    TokenRequestFailed(String),

    /// Resource does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid base URL
    #[error("Invalid server URL: {0}")]
    InvalidUrl(String),

    /// Failed to parse server response
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Server is offline or unreachable
    #[error("Server unreachable: {0}")]
    ServerUnreachable(String),

    /// Rate limited by server
    #[error("Rate limited, retry after {retry_after_secs} seconds")]
    RateLimited { retry_after_secs: u64 },
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;

impl From<ClientError> for EncoreError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Request(e) => EncoreError::Network(e.to_string()),
            ClientError::ServerUnreachable(msg) | ClientError::ParseError(msg) => {
                EncoreError::Network(msg)
            }
            ClientError::AuthRequired => {
                EncoreError::AuthFailed("authentication required".to_string())
            }
            ClientError::TokenRequestFailed(msg) => EncoreError::AuthFailed(msg),
            ClientError::NotFound(resource) => EncoreError::not_found("resource", resource),
            ClientError::ServerError { status, message } => {
                EncoreError::Server { status, message }
            }
            ClientError::InvalidUrl(msg) => EncoreError::InvalidInput(msg),
            ClientError::RateLimited { retry_after_secs } => EncoreError::Server {
                status: 429,
                message: format!("rate limited, retry after {retry_after_secs}s"),
            },
        }
    }
}
