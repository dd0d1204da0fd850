//! Lock and token inventory queries
//!
//! Read-side helpers plus the standalone lock and token creates. Unlike scenario
//! provisioning, failures here are reported as they are and nothing is simulated.

use crate::api::{endpoints, ApiClient, ApiResponse, IdRef, LockPayload};
use crate::entities::{AccessToken, Lock};
use crate::provisioning::{ProvisionError, ProvisionResult, TokenRequest};
use crate::types::{EntityKind, RemoteId};
use chrono::NaiveDateTime;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

/// Label used for locks without a property
pub const NO_PROPERTY: &str = "no property assigned";

/// Lock as listed by the API, with its property name when assigned
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LockListing {
    /// The lock
    #[serde(flatten)]
    pub lock: Lock,
    /// Name of the property the lock belongs to
    pub property_name: Option<String>,
}

impl LockListing {
    /// Read a listing from a lock body
    pub fn from_body(body: &Value) -> Option<Self> {
        let lock = Lock::from_body(body)?;
        let property_name = body
            .get("propiedad")
            .and_then(|p| p.get("nombre"))
            .and_then(Value::as_str)
            .map(str::to_string);
        Some(Self { lock, property_name })
    }

    /// One summary line
    pub fn line(&self) -> String {
        format!(
            "ID: {} | Model: {} | State: {} | Property: {}",
            self.lock.id,
            self.lock.model,
            self.lock.state_label(),
            self.property_name.as_deref().unwrap_or(NO_PROPERTY)
        )
    }
}

/// Queries and standalone creates against the lock and token endpoints
#[derive(Debug, Clone, Copy)]
pub struct Inventory<'a> {
    client: &'a ApiClient,
}

impl<'a> Inventory<'a> {
    /// Create an inventory over `client`
    pub fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// All locks (`GET /cerraduras`)
    pub fn list_locks(&self) -> ProvisionResult<Vec<LockListing>> {
        let response = self.client.get(endpoints::LOCKS, &[]);
        let items = Self::array(EntityKind::Lock, &response)?;
        let locks: Vec<LockListing> = items.iter().filter_map(LockListing::from_body).collect();
        debug!(count = locks.len(), "Listed locks");
        Ok(locks)
    }

    /// One lock by id (`GET /cerraduras/{id}`)
    pub fn get_lock(&self, id: RemoteId) -> ProvisionResult<LockListing> {
        let response = self.client.get(&endpoints::lock_by_id(id), &[]);
        if !response.ok {
            return Err(ProvisionError::from_response(EntityKind::Lock, &response));
        }
        LockListing::from_body(&response.body)
            .ok_or_else(|| ProvisionError::from_response(EntityKind::Lock, &response))
    }

    /// All tokens (`GET /tokens`)
    pub fn list_tokens(&self) -> ProvisionResult<Vec<AccessToken>> {
        let response = self.client.get(endpoints::TOKENS, &[]);
        let items = Self::array(EntityKind::AccessToken, &response)?;
        let tokens: Vec<AccessToken> = items.iter().filter_map(AccessToken::from_body).collect();
        debug!(count = tokens.len(), "Listed tokens");
        Ok(tokens)
    }

    /// First token whose code matches exactly
    pub fn find_token_by_code(&self, code: &str) -> ProvisionResult<Option<AccessToken>> {
        Ok(self.list_tokens()?.into_iter().find(|t| t.code == code))
    }

    /// Create a lock and read it back
    pub fn create_lock(
        &self,
        model: &str,
        locked: bool,
        property_id: Option<RemoteId>,
    ) -> ProvisionResult<LockListing> {
        let payload = LockPayload {
            model: model.to_string(),
            locked,
            property: property_id.map(IdRef::from),
        };
        let response = self.client.create(endpoints::LOCK_CREATE, &payload);
        let id = RemoteId::from_body(&response.body)
            .filter(|_| response.ok)
            .ok_or_else(|| ProvisionError::from_response(EntityKind::Lock, &response))?;
        info!(%id, model, "Lock created");
        self.get_lock(id)
    }

    /// Create a token and find it again by code
    pub fn create_token(&self, request: &TokenRequest) -> ProvisionResult<Option<AccessToken>> {
        let response = self.client.create(endpoints::TOKENS, &request.payload());
        if !response.ok {
            return Err(ProvisionError::from_response(EntityKind::AccessToken, &response));
        }
        info!(code = %request.code, lock = %request.lock_id, "Token created");
        self.find_token_by_code(&request.code)
    }

    fn array(entity: EntityKind, response: &ApiResponse) -> ProvisionResult<Vec<Value>> {
        if !response.ok {
            return Err(ProvisionError::from_response(entity, response));
        }
        match &response.body {
            Value::Array(items) => Ok(items.clone()),
            _ => Err(ProvisionError::from_response(entity, response)),
        }
    }
}

/// One line per lock
pub fn render_locks(locks: &[LockListing]) -> String {
    if locks.is_empty() {
        return "No locks found.\n".to_string();
    }
    locks.iter().map(|lock| format!("{}\n", lock.line())).collect()
}

/// Token summary line with its validity at `now`
pub fn token_line(token: &AccessToken, now: NaiveDateTime) -> String {
    format!(
        "ID: {} | Code: {} | State: {} | Lock: {} | Uses: {} | Expires: {}",
        token.id,
        token.code,
        token.state(now),
        token.lock_id,
        token.usage_label(),
        token.expires_at.as_deref().unwrap_or("never")
    )
}

/// One line per token
pub fn render_tokens(tokens: &[AccessToken], now: NaiveDateTime) -> String {
    if tokens.is_empty() {
        return "No tokens found.\n".to_string();
    }
    tokens.iter().map(|token| format!("{}\n", token_line(token, now))).collect()
}
