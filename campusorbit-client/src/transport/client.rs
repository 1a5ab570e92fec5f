use http::{Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::Mutex;

use crate::credentials::{Credential, CredentialStore};

use super::backend::HttpBackend;
use super::errors::TransportError;
use super::types::{ApiRequest, ApiResponse, SessionEndNotifier};

const REFRESH_PATH: &str = "/api/auth/refresh/";

#[derive(Debug, serde::Deserialize)]
struct RefreshResponse {
    access: String,
}

/// Authenticated HTTP client with transparent access-token renewal
///
/// Every request carries the stored access token. A 401 on an
/// authenticated request triggers one token refresh and one replay of the
/// original request; concurrent 401s share a single refresh call. When the
/// refresh itself is rejected, stored credentials are cleared and the
/// session-end notifier fires — the caller sees the refresh failure, never
/// the original 401.
pub struct TransportClient {
    backend: Arc<dyn HttpBackend>,
    credentials: Arc<dyn CredentialStore>,
    notifier: Arc<dyn SessionEndNotifier>,
    /// Held only while a refresh endpoint call is in flight
    refresh_gate: Mutex<()>,
    /// Bumped every time a refresh settles, success or failure
    refresh_serial: AtomicU64,
}

impl TransportClient {
    pub fn new(
        backend: Arc<dyn HttpBackend>,
        credentials: Arc<dyn CredentialStore>,
        notifier: Arc<dyn SessionEndNotifier>,
    ) -> Self {
        Self {
            backend,
            credentials,
            notifier,
            refresh_gate: Mutex::new(()),
            refresh_serial: AtomicU64::new(0),
        }
    }

    /// GET `path` and decode the JSON response
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, TransportError> {
        let response = self.request(Method::GET, path, query, None).await?;
        serde_json::from_str(&response.body).map_err(|e| TransportError::Decode(e.to_string()))
    }

    /// POST `body` to `path` and decode the JSON response
    pub async fn post_json<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, TransportError> {
        let payload = serde_json::to_value(body).map_err(|e| TransportError::Decode(e.to_string()))?;
        let response = self.request(Method::POST, path, &[], Some(payload)).await?;
        serde_json::from_str(&response.body).map_err(|e| TransportError::Decode(e.to_string()))
    }

    /// Issue one request with bearer attachment and the 401 retry policy
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<Value>,
    ) -> Result<ApiResponse, TransportError> {
        let serial = self.refresh_serial.load(Ordering::Acquire);
        let bearer = self.credentials.load().await.map(|c| c.access_token);
        let had_credential = bearer.is_some();

        let response = self
            .backend
            .execute(Self::build(method.clone(), path, query, body.clone(), bearer))
            .await?;

        if response.status != StatusCode::UNAUTHORIZED || !had_credential {
            // An anonymous 401 (e.g. a rejected login) carries its own
            // message; there is nothing to refresh.
            return Self::classify(response);
        }

        let access = self.refreshed_access_token(serial).await?;
        tracing::debug!("Replaying {method} {path} after token refresh");
        let response = self
            .backend
            .execute(Self::build(method, path, query, body, Some(access)))
            .await?;
        Self::classify(response)
    }

    fn build(
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<Value>,
        bearer: Option<String>,
    ) -> ApiRequest {
        ApiRequest {
            method,
            path: path.to_string(),
            query: query
                .iter()
                .map(|(key, value)| (key.to_string(), value.clone()))
                .collect(),
            body,
            bearer,
        }
    }

    fn classify(response: ApiResponse) -> Result<ApiResponse, TransportError> {
        if response.status.is_success() {
            Ok(response)
        } else {
            Err(TransportError::Http {
                status: response.status.as_u16(),
                body: response.body,
            })
        }
    }

    /// Obtain a fresh access token, deduplicating concurrent refreshes
    ///
    /// `observed` is the refresh serial the caller read before sending its
    /// request. If the serial moved while the caller waited for the gate,
    /// another caller already settled a refresh for this expiry and its
    /// outcome is adopted: the stored token when it succeeded,
    /// session-expired when the store was cleared.
    async fn refreshed_access_token(&self, observed: u64) -> Result<String, TransportError> {
        let _gate = self.refresh_gate.lock().await;

        if self.refresh_serial.load(Ordering::Acquire) != observed {
            return match self.credentials.load().await {
                Some(credential) => Ok(credential.access_token),
                None => Err(TransportError::SessionExpired(
                    "session ended while awaiting refresh".to_string(),
                )),
            };
        }

        let Some(current) = self.credentials.load().await else {
            self.refresh_serial.fetch_add(1, Ordering::Release);
            self.notifier.session_ended();
            return Err(TransportError::SessionExpired(
                "no refresh token stored".to_string(),
            ));
        };

        let outcome = self.exchange_refresh_token(&current.refresh_token).await;
        self.refresh_serial.fetch_add(1, Ordering::Release);

        match outcome {
            Ok(access) => {
                // The backend rotates only the access token; the refresh
                // token stays valid until logout.
                let renewed = Credential::new(access.clone(), current.refresh_token);
                if let Err(e) = self.credentials.save(&renewed).await {
                    tracing::warn!("Failed to persist refreshed access token: {e}");
                }
                Ok(access)
            }
            Err(e) => {
                tracing::info!("Token refresh rejected, ending session: {e}");
                if let Err(clear_err) = self.credentials.clear().await {
                    tracing::warn!("Failed to clear credentials: {clear_err}");
                }
                self.notifier.session_ended();
                Err(TransportError::SessionExpired(e.server_message()))
            }
        }
    }

    /// Raw call to the refresh endpoint; no bearer, no retry
    async fn exchange_refresh_token(&self, refresh_token: &str) -> Result<String, TransportError> {
        let mut request = ApiRequest::new(Method::POST, REFRESH_PATH);
        request.body = Some(serde_json::json!({ "refresh": refresh_token }));

        let response = self.backend.execute(request).await?;
        let response = Self::classify(response)?;
        let parsed: RefreshResponse = serde_json::from_str(&response.body)
            .map_err(|e| TransportError::Decode(e.to_string()))?;
        Ok(parsed.access)
    }
}
