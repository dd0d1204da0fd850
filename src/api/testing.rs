//! In-memory stand-in for the remote API
//!
//! Replies are scripted per `(method, path)`. When several replies are queued for the
//! same route they are consumed in order and the last one repeats. Unscripted routes
//! answer with a connection-refused transport error. Every request is recorded.

use super::transport::{
    HttpMethod, HttpRequest, RawResponse, Transport, TransportError, TransportErrorKind,
};
use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

#[derive(Debug, Clone)]
enum Reply {
    Response(RawResponse),
    Failure(TransportErrorKind),
}

#[derive(Debug, Default)]
struct ScriptState {
    routes: HashMap<(HttpMethod, String), VecDeque<Reply>>,
    requests: Vec<HttpRequest>,
}

/// Scripted transport; clones share the same script and request log
#[derive(Debug, Clone, Default)]
pub struct ScriptedTransport {
    state: Rc<RefCell<ScriptState>>,
}

impl ScriptedTransport {
    /// Create an empty script
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an HTTP reply for a route
    pub fn reply(&self, method: HttpMethod, path: &str, status: u16, body: &str) -> &Self {
        self.push(method, path, Reply::Response(RawResponse { status, body: body.to_string() }))
    }

    /// Queue a transport failure for a route
    pub fn fail(&self, method: HttpMethod, path: &str, kind: TransportErrorKind) -> &Self {
        self.push(method, path, Reply::Failure(kind))
    }

    /// All requests received so far, in order
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.state.borrow().requests.clone()
    }

    /// Requests received for one route
    pub fn requests_to(&self, method: HttpMethod, path: &str) -> Vec<HttpRequest> {
        self.state
            .borrow()
            .requests
            .iter()
            .filter(|r| r.method == method && r.path == path)
            .cloned()
            .collect()
    }

    /// Number of requests received
    pub fn request_count(&self) -> usize {
        self.state.borrow().requests.len()
    }

    fn push(&self, method: HttpMethod, path: &str, reply: Reply) -> &Self {
        self.state
            .borrow_mut()
            .routes
            .entry((method, path.to_string()))
            .or_default()
            .push_back(reply);
        self
    }
}

impl Transport for ScriptedTransport {
    fn execute(&self, request: &HttpRequest) -> Result<RawResponse, TransportError> {
        let mut state = self.state.borrow_mut();
        state.requests.push(request.clone());

        let key = (request.method, request.path.clone());
        let reply = match state.routes.get_mut(&key) {
            Some(queue) if queue.len() > 1 => queue.pop_front(),
            Some(queue) => queue.front().cloned(),
            None => None,
        };

        match reply {
            Some(Reply::Response(response)) => Ok(response),
            Some(Reply::Failure(kind)) => Err(TransportError::new(
                kind,
                format!("scripted failure for {} {}", request.method, request.path),
            )),
            None => Err(TransportError::new(
                TransportErrorKind::ConnectionRefused,
                format!("no scripted reply for {} {}", request.method, request.path),
            )),
        }
    }
}
