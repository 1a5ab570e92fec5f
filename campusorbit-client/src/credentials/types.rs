use serde::{Deserialize, Serialize};

/// The token pair issued at login
///
/// Both tokens are opaque to the client: they are stored verbatim and
/// replayed to the backend without inspection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    /// Short-lived bearer token attached to authenticated requests
    pub access_token: String,
    /// Long-lived token exchanged for a new access token on expiry
    pub refresh_token: String,
}

impl Credential {
    /// Create a credential from the two token strings
    pub fn new(access_token: impl Into<String>, refresh_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: refresh_token.into(),
        }
    }
}
