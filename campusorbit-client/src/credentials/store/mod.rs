mod file;
mod memory;

pub use file::FileCredentialStore;
pub use memory::MemoryCredentialStore;

use async_trait::async_trait;

use crate::credentials::errors::CredentialError;
use crate::credentials::types::Credential;

/// Durable persistence for the token pair across process restarts
///
/// `load` is infallible by contract: an unavailable or corrupt store reads
/// as "no credential" and the session degrades to anonymous. Only the
/// session manager and the transport layer write through this trait.
#[async_trait]
pub trait CredentialStore: Send + Sync + 'static {
    /// Persist both tokens, replacing any previous pair.
    async fn save(&self, credential: &Credential) -> Result<(), CredentialError>;

    /// Read the stored pair, or `None` when absent or unreadable.
    async fn load(&self) -> Option<Credential>;

    /// Remove both tokens.
    async fn clear(&self) -> Result<(), CredentialError>;
}
