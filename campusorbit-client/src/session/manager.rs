use serde_json::json;
use std::sync::Arc;

use crate::credentials::{Credential, CredentialStore};
use crate::transport::{TransportClient, TransportError};

use super::errors::SessionError;
use super::types::{LoginRequest, LoginResponse, SessionCell, SessionState, UserIdentity};

const LOGIN_PATH: &str = "/api/auth/login/";
const LOGOUT_PATH: &str = "/api/auth/logout/";
const CURRENT_USER_PATH: &str = "/api/auth/me/";

/// Owns the session lifecycle: bootstrap at process start, login, logout
///
/// State lives in the shared `SessionCell`, which the transport layer can
/// also flip to anonymous when a refresh is rejected mid-session.
pub struct SessionManager {
    transport: Arc<TransportClient>,
    credentials: Arc<dyn CredentialStore>,
    cell: Arc<SessionCell>,
}

impl SessionManager {
    pub fn new(
        transport: Arc<TransportClient>,
        credentials: Arc<dyn CredentialStore>,
        cell: Arc<SessionCell>,
    ) -> Self {
        Self {
            transport,
            credentials,
            cell,
        }
    }

    /// Resolve the stored credential into an identity, once at startup
    ///
    /// Every failure path lands in `Anonymous`; callers never handle an
    /// error here. Until this settles the cell reads `Bootstrapping` and
    /// the access gate keeps every route decision pending.
    pub async fn bootstrap(&self) {
        if self.credentials.load().await.is_none() {
            self.cell.set(SessionState::Anonymous);
            return;
        }

        match self
            .transport
            .get_json::<UserIdentity>(CURRENT_USER_PATH, &[])
            .await
        {
            Ok(identity) => {
                tracing::debug!("Bootstrapped session for {}", identity.email);
                self.cell.set(SessionState::Authenticated(identity));
            }
            Err(e) => {
                tracing::info!("Session bootstrap failed, starting anonymous: {e}");
                if let Err(clear_err) = self.credentials.clear().await {
                    tracing::warn!("Failed to clear credentials: {clear_err}");
                }
                self.cell.set(SessionState::Anonymous);
            }
        }
    }

    /// Exchange email and password for a session
    ///
    /// On success both tokens are persisted and the cell flips to
    /// `Authenticated`. On rejection nothing is stored and the state is
    /// left untouched; the error carries the backend's own message.
    pub async fn login(&self, email: &str, password: &str) -> Result<UserIdentity, SessionError> {
        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let response: LoginResponse = self
            .transport
            .post_json(LOGIN_PATH, &request)
            .await
            .map_err(Self::login_error)?;

        self.credentials
            .save(&Credential::new(response.access, response.refresh))
            .await?;
        self.cell
            .set(SessionState::Authenticated(response.user.clone()));
        tracing::debug!("Logged in as {}", response.user.email);
        Ok(response.user)
    }

    fn login_error(err: TransportError) -> SessionError {
        match &err {
            TransportError::Http { status, .. } if (400u16..500u16).contains(status) => {
                SessionError::Authentication(err.server_message())
            }
            _ => SessionError::Transport(err),
        }
    }

    /// End the session; the remote revocation is best-effort only
    ///
    /// Logging out always succeeds locally: the stored tokens are cleared
    /// and the state flips to `Anonymous` whatever the backend said.
    pub async fn logout(&self) {
        if let Some(credential) = self.credentials.load().await {
            let body = json!({ "refresh": credential.refresh_token });
            if let Err(e) = self
                .transport
                .post_json::<serde_json::Value, _>(LOGOUT_PATH, &body)
                .await
            {
                tracing::debug!("Ignoring logout error: {e}");
            }
        }

        if let Err(e) = self.credentials.clear().await {
            tracing::warn!("Failed to clear credentials at logout: {e}");
        }
        self.cell.set(SessionState::Anonymous);
    }

    pub fn state(&self) -> SessionState {
        self.cell.snapshot()
    }

    pub fn current_user(&self) -> Option<UserIdentity> {
        self.cell.identity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::MemoryCredentialStore;
    use crate::session::Role;
    use crate::test_utils::{ScriptedBackend, json_response};
    use http::StatusCode;
    use serde_json::json;

    fn manager_with(
        backend: Arc<ScriptedBackend>,
        store: Arc<MemoryCredentialStore>,
    ) -> (SessionManager, Arc<SessionCell>) {
        let cell = Arc::new(SessionCell::new());
        let transport = Arc::new(TransportClient::new(backend, store.clone(), cell.clone()));
        (SessionManager::new(transport, store, cell.clone()), cell)
    }

    fn me_payload() -> serde_json::Value {
        json!({
            "id": 9,
            "email": "admin@greenfield.example",
            "first_name": "Ravi",
            "last_name": "Iyer",
            "role": "school_admin",
            "is_owner": false,
            "school_name": "Greenfield Public School",
            "account_type": "school",
            "feature_toggles": {"attendance": true}
        })
    }

    #[tokio::test]
    async fn test_bootstrap_without_credential_goes_anonymous_offline() {
        // Given an empty credential store
        let store = Arc::new(MemoryCredentialStore::new());
        let backend = Arc::new(ScriptedBackend::new(|_| {
            panic!("no request should be issued")
        }));
        let (manager, cell) = manager_with(backend.clone(), store);

        // When bootstrapping
        manager.bootstrap().await;

        // Then the state is anonymous and the network was never touched
        assert_eq!(cell.snapshot(), SessionState::Anonymous);
        assert!(backend.calls().is_empty());
    }

    #[tokio::test]
    async fn test_bootstrap_resolves_identity() {
        // Given a stored credential and a backend that knows the user
        let store = Arc::new(MemoryCredentialStore::with_credential(Credential::new(
            "tok", "ref",
        )));
        let backend = Arc::new(ScriptedBackend::new(|_| {
            json_response(StatusCode::OK, me_payload())
        }));
        let (manager, cell) = manager_with(backend, store);

        // When bootstrapping
        manager.bootstrap().await;

        // Then the session is authenticated with the resolved identity
        let identity = cell.identity().expect("identity should be set");
        assert_eq!(identity.role, Role::SchoolAdmin);
        assert_eq!(identity.email, "admin@greenfield.example");
    }

    #[tokio::test]
    async fn test_bootstrap_failure_is_absorbed() {
        // Given a stored credential the backend no longer accepts and a
        // refresh that is also rejected
        let store = Arc::new(MemoryCredentialStore::with_credential(Credential::new(
            "stale", "dead",
        )));
        let backend = Arc::new(ScriptedBackend::new(|request| {
            if request.path == "/api/auth/refresh/" {
                return json_response(
                    StatusCode::UNAUTHORIZED,
                    json!({"detail": "Token is blacklisted"}),
                );
            }
            json_response(StatusCode::UNAUTHORIZED, json!({"detail": "expired"}))
        }));
        let (manager, cell) = manager_with(backend, store.clone());

        // When bootstrapping
        manager.bootstrap().await;

        // Then no error escaped, the state is anonymous, the store is empty
        assert_eq!(cell.snapshot(), SessionState::Anonymous);
        assert!(store.load().await.is_none());

        // And every protected route is denied until a fresh login
        use crate::access::{RouteDecision, RouteRequirement, decide};
        assert_eq!(
            decide(&cell.snapshot(), &RouteRequirement::teacher()),
            RouteDecision::ToLogin
        );
        assert_eq!(
            decide(&cell.snapshot(), &RouteRequirement::school()),
            RouteDecision::ToLogin
        );
    }

    #[tokio::test]
    async fn test_bootstrap_server_error_clears_and_goes_anonymous() {
        // Given a backend failing with a 500
        let store = Arc::new(MemoryCredentialStore::with_credential(Credential::new(
            "tok", "ref",
        )));
        let backend = Arc::new(ScriptedBackend::new(|_| {
            json_response(StatusCode::INTERNAL_SERVER_ERROR, json!({"error": "boom"}))
        }));
        let (manager, cell) = manager_with(backend, store.clone());

        manager.bootstrap().await;

        assert_eq!(cell.snapshot(), SessionState::Anonymous);
        assert!(store.load().await.is_none());
    }

    #[tokio::test]
    async fn test_login_stores_tokens_and_authenticates() {
        // Given a backend accepting the credentials
        let store = Arc::new(MemoryCredentialStore::new());
        let backend = Arc::new(ScriptedBackend::new(|request| {
            assert_eq!(request.path, LOGIN_PATH);
            json_response(
                StatusCode::OK,
                json!({
                    "access": "new-access",
                    "refresh": "new-refresh",
                    "user": me_payload(),
                }),
            )
        }));
        let (manager, cell) = manager_with(backend, store.clone());

        // When logging in
        let identity = manager
            .login("admin@greenfield.example", "secret")
            .await
            .expect("login should succeed");

        // Then both tokens are persisted and the state is authenticated
        assert_eq!(identity.role, Role::SchoolAdmin);
        let stored = store.load().await.expect("credential should be stored");
        assert_eq!(stored.access_token, "new-access");
        assert_eq!(stored.refresh_token, "new-refresh");
        assert!(cell.snapshot().is_authenticated());
    }

    #[tokio::test]
    async fn test_login_rejection_surfaces_server_message() {
        // Given a backend rejecting the credentials
        let store = Arc::new(MemoryCredentialStore::new());
        let backend = Arc::new(ScriptedBackend::new(|_| {
            json_response(
                StatusCode::UNAUTHORIZED,
                json!({"detail": "No active account found with the given credentials"}),
            )
        }));
        let (manager, cell) = manager_with(backend, store.clone());
        cell.set(SessionState::Anonymous);

        // When logging in with a bad password
        let err = manager
            .login("admin@greenfield.example", "wrong")
            .await
            .expect_err("login should fail");

        // Then the backend's message is surfaced and nothing was stored
        match err {
            SessionError::Authentication(message) => {
                assert_eq!(message, "No active account found with the given credentials");
            }
            other => panic!("expected Authentication error, got {other:?}"),
        }
        assert!(store.load().await.is_none());
        assert_eq!(cell.snapshot(), SessionState::Anonymous);
    }

    #[tokio::test]
    async fn test_login_network_failure_is_not_authentication() {
        // Given an unreachable backend
        let store = Arc::new(MemoryCredentialStore::new());
        let backend = Arc::new(ScriptedBackend::new(|_| {
            Err(TransportError::Network("connection refused".to_string()))
        }));
        let (manager, _) = manager_with(backend, store);

        let err = manager
            .login("a@b.c", "pw")
            .await
            .expect_err("login should fail");

        assert!(matches!(err, SessionError::Transport(_)));
    }

    #[tokio::test]
    async fn test_logout_revokes_clears_and_goes_anonymous() {
        // Given an authenticated session
        let store = Arc::new(MemoryCredentialStore::with_credential(Credential::new(
            "tok", "ref-9",
        )));
        let backend = Arc::new(ScriptedBackend::new(|request| {
            assert_eq!(request.path, LOGOUT_PATH);
            assert_eq!(
                request.body.as_ref().and_then(|b| b.get("refresh")),
                Some(&json!("ref-9"))
            );
            json_response(StatusCode::OK, json!({"message": "ok"}))
        }));
        let (manager, cell) = manager_with(backend.clone(), store.clone());

        // When logging out
        manager.logout().await;

        // Then the refresh token went to the revocation endpoint and local
        // state is gone
        assert_eq!(backend.calls_to(LOGOUT_PATH), 1);
        assert!(store.load().await.is_none());
        assert_eq!(cell.snapshot(), SessionState::Anonymous);
    }

    #[tokio::test]
    async fn test_logout_succeeds_locally_when_backend_fails() {
        // Given a backend that errors on revocation
        let store = Arc::new(MemoryCredentialStore::with_credential(Credential::new(
            "tok", "ref",
        )));
        let backend = Arc::new(ScriptedBackend::new(|_| {
            Err(TransportError::Network("unreachable".to_string()))
        }));
        let (manager, cell) = manager_with(backend, store.clone());

        // When logging out
        manager.logout().await;

        // Then local state is cleared anyway
        assert!(store.load().await.is_none());
        assert_eq!(cell.snapshot(), SessionState::Anonymous);
    }

    #[tokio::test]
    async fn test_logout_without_credential_skips_revocation() {
        // Given nothing stored
        let store = Arc::new(MemoryCredentialStore::new());
        let backend = Arc::new(ScriptedBackend::new(|_| {
            panic!("no request should be issued")
        }));
        let (manager, cell) = manager_with(backend.clone(), store);

        manager.logout().await;

        assert!(backend.calls().is_empty());
        assert_eq!(cell.snapshot(), SessionState::Anonymous);
    }
}
