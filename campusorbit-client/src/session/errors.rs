use thiserror::Error;

use crate::credentials::CredentialError;
use crate::transport::TransportError;

/// Errors from session lifecycle operations
#[derive(Debug, Error, Clone)]
pub enum SessionError {
    /// Login rejected; the message is the backend's own wording, suitable
    /// for inline display on the login surface
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Error from credential storage
    #[error("Credential error: {0}")]
    Credential(#[from] CredentialError),

    /// Error from the transport layer
    #[error("Transport error: {0}")]
    Transport(TransportError),
}

impl From<TransportError> for SessionError {
    fn from(err: TransportError) -> Self {
        Self::Transport(err)
    }
}
