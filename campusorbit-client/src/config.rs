//! Central configuration for the campusorbit-client crate

use std::sync::LazyLock;

/// Origin of the CampusOrbit backend
///
/// All request paths are joined against this URL.
/// Default: "http://localhost:8000"
pub static API_BASE_URL: LazyLock<String> = LazyLock::new(|| {
    std::env::var("CAMPUSORBIT_API_BASE_URL")
        .unwrap_or_else(|_| "http://localhost:8000".to_string())
});

/// Path of the on-disk credential document
///
/// Used by `FileCredentialStore::from_env`.
/// Default: ".campusorbit/credentials.json"
pub static CREDENTIALS_FILE: LazyLock<String> = LazyLock::new(|| {
    std::env::var("CAMPUSORBIT_CREDENTIALS_FILE")
        .unwrap_or_else(|_| ".campusorbit/credentials.json".to_string())
});
