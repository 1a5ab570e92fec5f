use async_trait::async_trait;
use std::time::Duration;
use url::Url;

use crate::config::API_BASE_URL;

use super::errors::TransportError;
use super::types::{ApiRequest, ApiResponse};

/// Seam between the transport policy layer and an HTTP implementation
///
/// An implementation returns every response the backend produced, whatever
/// the status; only connection-level failures are errors. Tests script this
/// trait instead of standing up a server.
#[async_trait]
pub trait HttpBackend: Send + Sync + 'static {
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse, TransportError>;
}

/// reqwest-backed implementation used in production
pub struct ReqwestBackend {
    client: reqwest::Client,
    base_url: Url,
}

impl ReqwestBackend {
    /// Backend against the configured base URL
    pub fn from_env() -> Result<Self, TransportError> {
        Self::new(API_BASE_URL.as_str())
    }

    /// Creates a configured HTTP client with the following settings:
    ///
    /// - `timeout`: set to 30 seconds so a stalled backend cannot hang a
    ///   screen indefinitely. Interactive API calls should complete well
    ///   within this.
    ///
    /// - connection pool: reqwest defaults, adequate for one interactive
    ///   client process.
    pub fn new(base_url: &str) -> Result<Self, TransportError> {
        let base_url = Url::parse(base_url).map_err(|e| TransportError::BaseUrl(e.to_string()))?;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| TransportError::Network(e.to_string()))?;
        Ok(Self { client, base_url })
    }
}

#[async_trait]
impl HttpBackend for ReqwestBackend {
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        let url = self
            .base_url
            .join(&request.path)
            .map_err(|e| TransportError::BaseUrl(e.to_string()))?;

        let mut builder = self.client.request(request.method, url);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(bearer) = &request.bearer {
            builder = builder.bearer_auth(bearer);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        tracing::debug!("Response status: {status}");
        Ok(ApiResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_invalid_base_url() {
        // Given a base URL that cannot be parsed
        let result = ReqwestBackend::new("not a url");

        // Then construction fails with a BaseUrl error
        assert!(matches!(result, Err(TransportError::BaseUrl(_))));
    }

    #[test]
    fn test_new_accepts_origin() {
        let result = ReqwestBackend::new("http://localhost:8000");
        assert!(result.is_ok());
    }

    #[test]
    fn test_path_joins_against_base() {
        // Given a backend with a plain origin
        let backend = ReqwestBackend::new("http://localhost:8000").expect("valid base URL");

        // When joining a request path
        let url = backend
            .base_url
            .join("/api/attendance/students/by_section/")
            .expect("join should succeed");

        // Then the absolute URL targets the backend origin
        assert_eq!(
            url.as_str(),
            "http://localhost:8000/api/attendance/students/by_section/"
        );
    }
}
