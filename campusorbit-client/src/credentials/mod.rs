//! Durable persistence for the login token pair

mod errors;
mod store;
mod types;

pub use errors::CredentialError;
pub use store::{CredentialStore, FileCredentialStore, MemoryCredentialStore};
pub use types::Credential;
