use http::{Method, StatusCode};
use serde_json::Value;

/// One backend request, independent of the HTTP implementation
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    /// Path relative to the configured base URL, e.g. "/api/auth/me/"
    pub path: String,
    pub query: Vec<(String, String)>,
    /// JSON body for POST-style requests
    pub body: Option<Value>,
    /// Access token attached as `Authorization: Bearer <token>`
    pub bearer: Option<String>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
            bearer: None,
        }
    }
}

/// Raw response from the backend: any status, body verbatim
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub body: String,
}

impl ApiResponse {
    pub fn new(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Callback fired when the session cannot continue (refresh rejected)
///
/// The transport layer never reaches into navigation or UI state; the
/// consumer decides what "forced to the login surface" means.
pub trait SessionEndNotifier: Send + Sync + 'static {
    fn session_ended(&self);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_request_new_defaults() {
        // Given a bare request
        let request = ApiRequest::new(Method::GET, "/api/auth/me/");

        // Then query, body and bearer start empty
        assert_eq!(request.method, Method::GET);
        assert_eq!(request.path, "/api/auth/me/");
        assert!(request.query.is_empty());
        assert!(request.body.is_none());
        assert!(request.bearer.is_none());
    }
}
