use thiserror::Error;

use crate::transport::TransportError;

/// Errors from attendance reconciliation
#[derive(Debug, Error, Clone)]
pub enum AttendanceError {
    /// Commit blocked locally because entries are still unmarked; no
    /// request was sent
    #[error("{0} roster entries are still unmarked")]
    Incomplete(usize),

    /// The backend refused the bulk write; the message is its own wording
    #[error("Rejected by server: {0}")]
    Rejected(String),

    /// Error from the transport layer; the draft is preserved
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),
}
