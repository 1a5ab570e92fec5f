//! Session lifecycle: bootstrap, login, logout, and the current identity

mod errors;
mod manager;
mod types;

pub use errors::SessionError;
pub use manager::SessionManager;
pub use types::{AccountType, Role, SessionCell, SessionState, UserIdentity};
