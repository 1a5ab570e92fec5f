//! campusorbit-client - Session, access and attendance core for CampusOrbit front ends
//!
//! This crate provides the client-resident core of the CampusOrbit
//! school/tuition platform: credential persistence, an authenticated
//! transport with transparent token refresh, the session lifecycle,
//! pure route-access decisions, and attendance draft reconciliation.

mod access;
mod attendance;
mod config;
mod credentials;
mod session;
#[cfg(test)]
mod test_utils;
mod transport;

// Re-export the access gate
pub use access::{
    Capability, Route, RouteDecision, RouteRequirement, capabilities_of, decide, home_route_for,
    is_admitted,
};

// Re-export attendance reconciliation
pub use attendance::{
    AttendanceError, Completeness, DayScope, LoadOutcome, MarkedSummary, RosterEntry, SectionScope,
    StaffAttendanceSheet, StaffStatus, StudentAttendanceSheet, StudentStatus,
};

// Re-export configuration statics
pub use config::{API_BASE_URL, CREDENTIALS_FILE};

// Re-export credential storage
pub use credentials::{
    Credential, CredentialError, CredentialStore, FileCredentialStore, MemoryCredentialStore,
};

// Re-export the session lifecycle
pub use session::{
    AccountType, Role, SessionCell, SessionError, SessionManager, SessionState, UserIdentity,
};

// Re-export the transport layer
pub use transport::{
    ApiRequest, ApiResponse, HttpBackend, ReqwestBackend, SessionEndNotifier, TransportClient,
    TransportError,
};
