//! Shared test doubles for exercising the transport seam without a server
//!
//! Tests script the `HttpBackend` trait instead of standing up a live
//! backend, so every transport, session and attendance path can be driven
//! deterministically.

use async_trait::async_trait;
use http::StatusCode;
use std::sync::{Mutex, Once};
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::session::{Role, UserIdentity};
use crate::transport::{ApiRequest, ApiResponse, HttpBackend, SessionEndNotifier, TransportError};

/// Load test environment variables once for the whole test binary
///
/// Prefers `.env_test`, falling back to `.env`; both are optional.
pub(crate) fn init_test_environment() {
    static ENV_INIT: Once = Once::new();
    ENV_INIT.call_once(|| {
        if dotenvy::from_filename(".env_test").is_err() {
            dotenvy::dotenv().ok();
        }
    });
}

type Responder = dyn Fn(&ApiRequest) -> Result<ApiResponse, TransportError> + Send + Sync;

/// Backend that answers from a closure and records every request
pub(crate) struct ScriptedBackend {
    responder: Box<Responder>,
    calls: Mutex<Vec<ApiRequest>>,
}

impl ScriptedBackend {
    pub(crate) fn new(
        responder: impl Fn(&ApiRequest) -> Result<ApiResponse, TransportError>
        + Send
        + Sync
        + 'static,
    ) -> Self {
        Self {
            responder: Box::new(responder),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Every request seen so far, in arrival order
    pub(crate) fn calls(&self) -> Vec<ApiRequest> {
        self.calls.lock().expect("call log poisoned").clone()
    }

    /// Number of requests that targeted `path`
    pub(crate) fn calls_to(&self, path: &str) -> usize {
        self.calls().iter().filter(|r| r.path == path).count()
    }
}

#[async_trait]
impl HttpBackend for ScriptedBackend {
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        self.calls
            .lock()
            .expect("call log poisoned")
            .push(request.clone());
        (self.responder)(&request)
    }
}

/// Notifier that counts how often the session was ended
#[derive(Default)]
pub(crate) struct RecordingNotifier {
    fired: AtomicUsize,
}

impl RecordingNotifier {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn count(&self) -> usize {
        self.fired.load(Ordering::SeqCst)
    }
}

impl SessionEndNotifier for RecordingNotifier {
    fn session_ended(&self) {
        self.fired.fetch_add(1, Ordering::SeqCst);
    }
}

/// JSON response shorthand for responder closures
pub(crate) fn json_response(
    status: StatusCode,
    body: serde_json::Value,
) -> Result<ApiResponse, TransportError> {
    Ok(ApiResponse::new(status, body.to_string()))
}

/// Identity fixture with the given role; owner flags off
pub(crate) fn identity_with_role(role: Role) -> UserIdentity {
    UserIdentity {
        id: 42,
        email: "user@greenfield.example".to_string(),
        first_name: "Asha".to_string(),
        last_name: "Verma".to_string(),
        role,
        is_owner: false,
        account_type: None,
        school_name: Some("Greenfield Public School".to_string()),
        feature_toggles: Default::default(),
    }
}
