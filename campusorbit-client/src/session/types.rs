use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::RwLock;

use crate::transport::SessionEndNotifier;

/// Account roles as issued by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    PlatformAdmin,
    SchoolAdmin,
    AccountAdmin,
    Teacher,
    Student,
    /// Role string this client does not know; resolves no capabilities
    /// and homes to the login surface
    #[serde(other)]
    Unknown,
}

/// Whether the tenant is a full school or a tuition centre
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    School,
    Tuition,
}

/// The authenticated account as reported by `/api/auth/me/`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserIdentity {
    pub id: i64,
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub role: Role,
    /// Owner of the tenant; meaningful for tuition-centre teachers
    #[serde(default)]
    pub is_owner: bool,
    #[serde(default)]
    pub account_type: Option<AccountType>,
    #[serde(default)]
    pub school_name: Option<String>,
    /// Per-tenant feature switches keyed by feature name
    #[serde(default)]
    pub feature_toggles: HashMap<String, bool>,
}

impl UserIdentity {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    /// Feature-toggle lookup; absent keys read as enabled, matching the
    /// backend's defaults for core features
    pub fn feature_enabled(&self, feature: &str) -> bool {
        self.feature_toggles.get(feature).copied().unwrap_or(true)
    }
}

/// Lifecycle of the client session
#[derive(Debug, Clone, Default, PartialEq)]
pub enum SessionState {
    /// Startup identity check still in flight; no route decision may be
    /// made in this state
    #[default]
    Bootstrapping,
    Authenticated(UserIdentity),
    Anonymous,
}

impl SessionState {
    pub fn identity(&self) -> Option<&UserIdentity> {
        match self {
            Self::Authenticated(identity) => Some(identity),
            _ => None,
        }
    }

    pub fn is_bootstrapping(&self) -> bool {
        matches!(self, Self::Bootstrapping)
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }
}

/// Shared holder of the current session state
///
/// Snapshot-readable from anywhere. The transport layer ends the session
/// through the `SessionEndNotifier` impl, so it never has to know about
/// the manager.
#[derive(Default)]
pub struct SessionCell {
    state: RwLock<SessionState>,
}

impl SessionCell {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> SessionState {
        self.state.read().expect("session state poisoned").clone()
    }

    pub fn identity(&self) -> Option<UserIdentity> {
        self.snapshot().identity().cloned()
    }

    pub(crate) fn set(&self, state: SessionState) {
        *self.state.write().expect("session state poisoned") = state;
    }
}

impl SessionEndNotifier for SessionCell {
    fn session_ended(&self) {
        tracing::info!("Session ended by transport; forcing anonymous state");
        self.set(SessionState::Anonymous);
    }
}

// Wire shapes (backend contract)

#[derive(Debug, Serialize)]
pub(crate) struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LoginResponse {
    pub access: String,
    pub refresh: String,
    pub user: UserIdentity,
}
