use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum CredentialError {
    #[error("Malformed credential hash")]
    MalformedHash,

    #[error("Invalid salt length: expected {expected} bytes, got {actual}")]
    InvalidSaltLength { expected: usize, actual: usize },

    #[error("Hex decode error: {0}")]
    Hex(#[from] hex::FromHexError),
}
