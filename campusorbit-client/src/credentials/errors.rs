use thiserror::Error;

/// Errors from durable credential storage
///
/// Only `save` and `clear` can fail; `load` degrades to "no credential"
/// when the store is unavailable.
#[derive(Debug, Error, Clone)]
pub enum CredentialError {
    /// Failure writing or deleting the credential document
    #[error("Storage error: {0}")]
    Storage(String),

    /// Failure encoding the credential document
    #[error("Serde error: {0}")]
    Serde(String),
}
