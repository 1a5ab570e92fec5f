use thiserror::Error;

/// Errors surfaced by the transport layer
#[derive(Debug, Error, Clone)]
pub enum TransportError {
    /// Non-success response; the body is preserved verbatim
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// Connection-level failure; the request may never have reached the backend
    #[error("Network error: {0}")]
    Network(String),

    /// The refresh token was rejected and the session is over
    #[error("Session expired: {0}")]
    SessionExpired(String),

    /// Response body did not match the expected shape
    #[error("Decode error: {0}")]
    Decode(String),

    /// The configured base URL could not be parsed
    #[error("Invalid base URL: {0}")]
    BaseUrl(String),
}

impl TransportError {
    /// User-facing message from a JSON error body
    ///
    /// The backend reports failures under `error`, `message` or `detail`
    /// depending on the view; fall back to the raw body, then to the
    /// error's own rendering.
    pub fn server_message(&self) -> String {
        match self {
            Self::Http { body, .. } => {
                if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
                    for key in ["error", "message", "detail"] {
                        if let Some(message) = value.get(key).and_then(|v| v.as_str()) {
                            return message.to_string();
                        }
                    }
                }
                body.clone()
            }
            other => other.to_string(),
        }
    }

    /// Whether this is an HTTP response with the given status code
    pub fn is_status(&self, code: u16) -> bool {
        matches!(self, Self::Http { status, .. } if *status == code)
    }
}
