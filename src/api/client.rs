//! Client for the remote management API
//!
//! Every call returns an [`ApiResponse`]; transport failures and unparseable bodies
//! are folded into it instead of being raised, so callers decide what is fatal.

use super::transport::{HttpMethod, HttpRequest, Transport, TransportErrorKind};
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use tracing::{debug, warn};

/// Outcome of one API call
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    /// True only for 200 and 201
    pub ok: bool,
    /// HTTP status code, or 0 when no response was received
    pub status_code: u16,
    /// Parsed JSON body; `Null` when empty or malformed
    pub body: Value,
    /// Raw body text, or the transport error description
    pub raw: String,
    /// Set when the request never produced a response
    pub transport_error: Option<TransportErrorKind>,
}

impl ApiResponse {
    /// Whether the API reported a conflict on a natural key
    pub fn is_conflict(&self) -> bool {
        self.status_code == 409
    }

    fn transport_failure(kind: TransportErrorKind, description: String) -> Self {
        Self {
            ok: false,
            status_code: 0,
            body: Value::Null,
            raw: description,
            transport_error: Some(kind),
        }
    }
}

/// Success statuses; 200 and 201 are treated the same
pub fn is_success_status(status: u16) -> bool {
    status == 200 || status == 201
}

/// Parse a response body, treating empty or malformed text as `Null`
pub fn parse_body(raw: &str) -> Value {
    if raw.trim().is_empty() {
        return Value::Null;
    }
    match serde_json::from_str(raw) {
        Ok(value) => value,
        Err(e) => {
            warn!(error = %e, "Response body is not valid JSON; treating as empty payload");
            Value::Null
        }
    }
}

/// Client bound to one base URL
pub struct ApiClient {
    base_url: String,
    transport: Box<dyn Transport>,
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("transport", &self.transport)
            .finish()
    }
}

impl ApiClient {
    /// Create a client for `base_url` using the given transport
    pub fn new(base_url: impl Into<String>, transport: Box<dyn Transport>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url, transport }
    }

    /// POST a JSON payload to `path`
    pub fn create<P: Serialize + ?Sized>(&self, path: &str, payload: &P) -> ApiResponse {
        let body = match serde_json::to_string(payload) {
            Ok(body) => body,
            Err(e) => {
                return ApiResponse::transport_failure(
                    TransportErrorKind::Network,
                    format!("failed to serialize request payload: {}", e),
                )
            }
        };
        self.execute(self.request(HttpMethod::Post, path, &[], Some(body)))
    }

    /// GET `path` with optional query parameters
    pub fn get(&self, path: &str, query: &[(&str, &str)]) -> ApiResponse {
        self.execute(self.request(HttpMethod::Get, path, query, None))
    }

    fn request(
        &self,
        method: HttpMethod,
        path: &str,
        query: &[(&str, &str)],
        body: Option<String>,
    ) -> HttpRequest {
        let path = if path.starts_with('/') { path.to_string() } else { format!("/{}", path) };
        HttpRequest {
            method,
            url: format!("{}{}", self.base_url, path),
            path,
            query: query.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect(),
            body,
        }
    }

    fn execute(&self, request: HttpRequest) -> ApiResponse {
        debug!(
            method = %request.method,
            url = %request.url,
            body = request.body.as_deref().unwrap_or(""),
            "Sending request"
        );

        match self.transport.execute(&request) {
            Ok(raw) => {
                debug!(status = raw.status, body = %raw.body, "Received response");
                ApiResponse {
                    ok: is_success_status(raw.status),
                    status_code: raw.status,
                    body: parse_body(&raw.body),
                    raw: raw.body,
                    transport_error: None,
                }
            }
            Err(e) => {
                warn!(
                    method = %request.method,
                    url = %request.url,
                    kind = %e.kind,
                    "Request failed before a response was received: {}",
                    e.message
                );
                ApiResponse::transport_failure(e.kind, e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::ScriptedTransport;
    use serde_json::json;

    fn client(transport: &ScriptedTransport) -> ApiClient {
        ApiClient::new("http://api.test/api/", Box::new(transport.clone()))
    }

    #[test]
    fn test_success_statuses() {
        assert!(is_success_status(200));
        assert!(is_success_status(201));
        assert!(!is_success_status(204));
        assert!(!is_success_status(409));
        assert!(!is_success_status(500));
    }

    #[test]
    fn test_parse_body() {
        assert_eq!(parse_body(""), Value::Null);
        assert_eq!(parse_body("   "), Value::Null);
        assert_eq!(parse_body("{not json"), Value::Null);
        assert_eq!(parse_body("{\"id\": 4}"), json!({"id": 4}));
    }

    #[test]
    fn test_create_posts_json_to_base_url() {
        let transport = ScriptedTransport::new();
        transport.reply(HttpMethod::Post, "/propietarios", 201, r#"{"id": 1}"#);

        let response = client(&transport).create("/propietarios", &json!({"nombre": "Carlos"}));

        assert!(response.ok);
        assert_eq!(response.status_code, 201);
        assert_eq!(response.body, json!({"id": 1}));

        let requests = transport.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].url, "http://api.test/api/propietarios");
        assert_eq!(requests[0].body.as_deref(), Some(r#"{"nombre":"Carlos"}"#));
    }

    #[test]
    fn test_get_passes_query() {
        let transport = ScriptedTransport::new();
        transport.reply(HttpMethod::Get, "/usuarios/email", 200, r#"{"id": 9}"#);

        let response = client(&transport).get("usuarios/email", &[("email", "a@b.c")]);

        assert!(response.ok);
        let requests = transport.requests();
        assert_eq!(requests[0].path, "/usuarios/email");
        assert_eq!(requests[0].query, vec![("email".to_string(), "a@b.c".to_string())]);
    }

    #[test]
    fn test_transport_failure_is_folded_into_response() {
        let transport = ScriptedTransport::new();
        transport.fail(HttpMethod::Post, "/tokens", TransportErrorKind::ConnectionRefused);

        let response = client(&transport).create("/tokens", &json!({}));

        assert!(!response.ok);
        assert_eq!(response.status_code, 0);
        assert_eq!(response.transport_error, Some(TransportErrorKind::ConnectionRefused));
        assert!(!response.raw.is_empty());
    }

    #[test]
    fn test_malformed_success_body_is_null() {
        let transport = ScriptedTransport::new();
        transport.reply(HttpMethod::Get, "/tokens", 200, "<html>oops</html>");

        let response = client(&transport).get("/tokens", &[]);

        assert!(response.ok);
        assert_eq!(response.body, Value::Null);
        assert_eq!(response.raw, "<html>oops</html>");
    }
}
