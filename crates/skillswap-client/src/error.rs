use thiserror::Error;

use skillswap_store::StoreError;

/// Expected, recoverable failures surfaced to the caller of a command.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Not logged in")]
    NotAuthenticated,

    #[error("A user with this email already exists")]
    DuplicateEmail,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("A conversation needs two different participants")]
    InvalidParticipant,

    #[error("Sender is not a participant of this conversation")]
    InvalidSender,

    #[error("Message content is empty")]
    EmptyContent,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ClientError>;
