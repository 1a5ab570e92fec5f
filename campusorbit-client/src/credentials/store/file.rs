use async_trait::async_trait;
use serde_json::{Value, json};
use std::io::ErrorKind;
use std::path::PathBuf;
use tokio::fs;

use crate::config::CREDENTIALS_FILE;
use crate::credentials::errors::CredentialError;
use crate::credentials::types::Credential;

use super::CredentialStore;

const ACCESS_TOKEN_KEY: &str = "accessToken";
const REFRESH_TOKEN_KEY: &str = "refreshToken";

/// Credential store backed by a small JSON document on disk
///
/// The document holds the two token keys and nothing else. A missing,
/// unreadable or corrupt document reads as "no credential" so a broken
/// store never takes the client down with it.
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the path named by `CAMPUSORBIT_CREDENTIALS_FILE`
    pub fn from_env() -> Self {
        Self::new(CREDENTIALS_FILE.as_str())
    }
}

#[async_trait]
impl CredentialStore for FileCredentialStore {
    async fn save(&self, credential: &Credential) -> Result<(), CredentialError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .await
                    .map_err(|e| CredentialError::Storage(e.to_string()))?;
            }
        }

        let document = json!({
            ACCESS_TOKEN_KEY: credential.access_token,
            REFRESH_TOKEN_KEY: credential.refresh_token,
        });
        let raw = serde_json::to_string_pretty(&document)
            .map_err(|e| CredentialError::Serde(e.to_string()))?;

        fs::write(&self.path, raw)
            .await
            .map_err(|e| CredentialError::Storage(e.to_string()))
    }

    async fn load(&self) -> Option<Credential> {
        let raw = match fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return None,
            Err(e) => {
                tracing::warn!("Credential document unreadable, degrading to anonymous: {e}");
                return None;
            }
        };

        let document: Value = match serde_json::from_str(&raw) {
            Ok(document) => document,
            Err(e) => {
                tracing::warn!("Credential document corrupt, degrading to anonymous: {e}");
                return None;
            }
        };

        let access = document.get(ACCESS_TOKEN_KEY)?.as_str()?;
        let refresh = document.get(REFRESH_TOKEN_KEY)?.as_str()?;
        Some(Credential::new(access, refresh))
    }

    async fn clear(&self) -> Result<(), CredentialError> {
        match fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(CredentialError::Storage(e.to_string())),
        }
    }
}
