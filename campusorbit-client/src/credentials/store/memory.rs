use async_trait::async_trait;
use std::sync::Mutex;

use crate::credentials::errors::CredentialError;
use crate::credentials::types::Credential;

use super::CredentialStore;

/// Process-local credential store for tests and ephemeral sessions
#[derive(Default)]
pub struct MemoryCredentialStore {
    slot: Mutex<Option<Credential>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store that already holds a pair, for exercising bootstrap paths
    pub fn with_credential(credential: Credential) -> Self {
        Self {
            slot: Mutex::new(Some(credential)),
        }
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn save(&self, credential: &Credential) -> Result<(), CredentialError> {
        *self.slot.lock().expect("credential slot poisoned") = Some(credential.clone());
        Ok(())
    }

    async fn load(&self) -> Option<Credential> {
        self.slot.lock().expect("credential slot poisoned").clone()
    }

    async fn clear(&self) -> Result<(), CredentialError> {
        *self.slot.lock().expect("credential slot poisoned") = None;
        Ok(())
    }
}
