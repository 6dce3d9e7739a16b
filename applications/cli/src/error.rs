/// CLI error types
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Not signed in: {0}")]
    SignedOut(String),

    #[error(transparent)]
    Encore(#[from] encore_core::EncoreError),

    #[error(transparent)]
    Client(#[from] encore_client::ClientError),
}

impl CliError {
    /// The underlying domain error, converting client errors on the way.
    pub fn into_encore(self) -> std::result::Result<encore_core::EncoreError, Self> {
        match self {
            Self::Encore(e) => Ok(e),
            Self::Client(e) => Ok(e.into()),
            other => Err(other),
        }
    }
}
