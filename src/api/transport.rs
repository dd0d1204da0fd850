//! HTTP transport seam
//!
//! [`ApiClient`](super::ApiClient) talks to the network only through the
//! [`Transport`] trait. [`UreqTransport`] is the blocking HTTP implementation used by
//! the binary; tests substitute [`ScriptedTransport`](super::testing::ScriptedTransport).

use serde::Serialize;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// HTTP methods used against the management API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum HttpMethod {
    /// Read
    Get,
    /// Create
    Post,
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HttpMethod::Get => write!(f, "GET"),
            HttpMethod::Post => write!(f, "POST"),
        }
    }
}

/// A fully-resolved request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    /// Request method
    pub method: HttpMethod,
    /// Path relative to the base URL
    pub path: String,
    /// Absolute URL without query string
    pub url: String,
    /// Query parameters
    pub query: Vec<(String, String)>,
    /// JSON body, for POST requests
    pub body: Option<String>,
}

/// Status and body of a completed exchange, whatever the status code
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    /// HTTP status code
    pub status: u16,
    /// Response body as text
    pub body: String,
}

/// Classification of transport failures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportErrorKind {
    /// Request or connect timeout
    Timeout,
    /// Nothing listening on the target address
    ConnectionRefused,
    /// Connection dropped mid-exchange
    ConnectionReset,
    /// Host name did not resolve
    Dns,
    /// TLS handshake or certificate failure
    Tls,
    /// Anything else
    Network,
}

impl fmt::Display for TransportErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TransportErrorKind::Timeout => "timeout",
            TransportErrorKind::ConnectionRefused => "connection_refused",
            TransportErrorKind::ConnectionReset => "connection_reset",
            TransportErrorKind::Dns => "dns",
            TransportErrorKind::Tls => "tls",
            TransportErrorKind::Network => "network",
        };
        write!(f, "{}", name)
    }
}

/// The request never produced an HTTP response
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct TransportError {
    /// Failure class
    pub kind: TransportErrorKind,
    /// Human-readable description
    pub message: String,
}

impl TransportError {
    /// Create a transport error
    pub fn new(kind: TransportErrorKind, message: impl Into<String>) -> Self {
        Self { kind, message: message.into() }
    }

    /// Classify a ureq error into kind and message
    pub fn from_ureq(error: &ureq::Error) -> Self {
        let message = error.to_string();

        // Walk the error chain for an underlying IO error
        let mut source: Option<&dyn std::error::Error> = Some(error);
        while let Some(err) = source {
            if let Some(io) = err.downcast_ref::<std::io::Error>() {
                match io.kind() {
                    std::io::ErrorKind::TimedOut => {
                        return Self::new(TransportErrorKind::Timeout, message)
                    }
                    std::io::ErrorKind::ConnectionRefused => {
                        return Self::new(TransportErrorKind::ConnectionRefused, message)
                    }
                    std::io::ErrorKind::ConnectionReset => {
                        return Self::new(TransportErrorKind::ConnectionReset, message)
                    }
                    _ => break,
                }
            }
            source = err.source();
        }

        Self::new(classify_message(&message), message)
    }
}

/// String heuristics for errors that carry no IO kind
fn classify_message(message: &str) -> TransportErrorKind {
    let lower = message.to_lowercase();
    if lower.contains("timeout") || lower.contains("timed out") {
        TransportErrorKind::Timeout
    } else if lower.contains("connection refused") {
        TransportErrorKind::ConnectionRefused
    } else if lower.contains("dns") || lower.contains("resolve") || lower.contains("name resolution")
    {
        TransportErrorKind::Dns
    } else if lower.contains("tls") || lower.contains("ssl") || lower.contains("certificate") {
        TransportErrorKind::Tls
    } else {
        TransportErrorKind::Network
    }
}

/// Executes requests against the remote API
pub trait Transport: fmt::Debug {
    /// Perform one request. Non-2xx statuses are responses, not errors.
    fn execute(&self, request: &HttpRequest) -> Result<RawResponse, TransportError>;
}

/// Blocking HTTP transport built on `ureq`
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl fmt::Debug for UreqTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UreqTransport").finish_non_exhaustive()
    }
}

impl UreqTransport {
    /// Create a transport with an optional global timeout
    pub fn new(timeout: Option<Duration>) -> Self {
        let config = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(timeout)
            .build();
        Self { agent: ureq::Agent::new_with_config(config) }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new(None)
    }
}

impl Transport for UreqTransport {
    fn execute(&self, request: &HttpRequest) -> Result<RawResponse, TransportError> {
        let result = match request.method {
            HttpMethod::Get => {
                let mut req = self.agent.get(&request.url);
                for (key, value) in &request.query {
                    req = req.query(key, value);
                }
                req.call()
            }
            HttpMethod::Post => {
                let mut req =
                    self.agent.post(&request.url).header("Content-Type", "application/json");
                for (key, value) in &request.query {
                    req = req.query(key, value);
                }
                req.send(request.body.as_deref().unwrap_or(""))
            }
        };

        let mut response = result.map_err(|e| TransportError::from_ureq(&e))?;
        let status = response.status().as_u16();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| TransportError::from_ureq(&e))?;

        Ok(RawResponse { status, body })
    }
}
