//! Per-entity creation logic
//!
//! Owners and guests go through [`upsert`]. Properties and locks are single creates
//! whose failure is terminal. Grants and tokens fall back to a simulated record on any
//! failure, so they always produce something usable for the rest of the run.

use super::error::{log_error, ProvisionError, ProvisionResult};
use super::resolver::Registration;
use super::upsert::{upsert, UpsertPlan};
use crate::api::{
    endpoints, ApiClient, GrantPayload, IdRef, LockPayload, PropertyPayload, SchedulePayload,
    TokenPayload,
};
use crate::entities::{
    AccessGrant, AccessToken, Lock, Property, Provisioned, ResolvedUser, UserAccount, WindowText,
};
use crate::types::{
    EntityId, EntityKind, LockSpec, PropertySpec, RemoteId, SimulatedId, UserRole, UserSpec,
};
use rand::Rng;
use tracing::{info, warn};

/// Random six-digit token code
pub fn generate_token_code<R: Rng + ?Sized>(rng: &mut R) -> String {
    format!("{:06}", rng.gen_range(0..1_000_000u32))
}

/// Token to create for a lock
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenRequest {
    /// Display code
    pub code: String,
    /// Maximum uses, 0 for unlimited
    pub max_uses: u32,
    /// Uses already consumed
    pub current_uses: u32,
    /// Expiry instant
    pub expires_at: Option<String>,
    /// Lock the token opens
    pub lock_id: RemoteId,
}

impl TokenRequest {
    /// Request body for this token
    pub fn payload(&self) -> TokenPayload {
        TokenPayload {
            code: self.code.clone(),
            max_uses: self.max_uses,
            current_uses: self.current_uses,
            expires_at: self.expires_at.clone(),
            lock: self.lock_id.into(),
        }
    }

    fn into_token(self, id: impl Into<EntityId>) -> AccessToken {
        AccessToken {
            id: id.into(),
            code: self.code,
            max_uses: self.max_uses,
            current_uses: self.current_uses,
            lock_id: self.lock_id,
            expires_at: self.expires_at,
        }
    }
}

/// Creates individual entities through an [`ApiClient`]
#[derive(Debug, Clone, Copy)]
pub struct EntityProvisioner<'a> {
    client: &'a ApiClient,
}

impl<'a> EntityProvisioner<'a> {
    /// Create a provisioner over `client`
    pub fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Create or find an owner or guest account
    pub fn provision_user(&self, role: UserRole, spec: &UserSpec) -> ProvisionResult<ResolvedUser> {
        let payload = spec.to_payload();
        let (create_path, registration) = match role {
            UserRole::Owner => (
                endpoints::OWNERS,
                Some(Registration { path: endpoints::OWNER_REGISTRATION, payload: &payload }),
            ),
            UserRole::Guest => (endpoints::GUEST_REGISTRATION, None),
        };
        let plan = UpsertPlan {
            entity: role.entity_kind(),
            create_path,
            natural_key: &spec.email,
            payload: &payload,
            registration,
        };

        let identity = upsert(self.client, &plan).inspect_err(log_error)?;
        Ok(ResolvedUser {
            account: UserAccount::from_payload(identity.id, role, &payload),
            resolution: identity.resolution,
        })
    }

    /// Create a property owned by `owner_id`
    pub fn provision_property(
        &self,
        spec: &PropertySpec,
        owner_id: RemoteId,
    ) -> ProvisionResult<Property> {
        let payload = PropertyPayload {
            address: spec.address.clone(),
            name: spec.name.clone(),
            owner: owner_id.into(),
        };
        let id = self.create_single(EntityKind::Property, endpoints::PROPERTIES, &payload)?;
        info!(%id, name = %spec.name, owner = %owner_id, "Property created");
        Ok(Property { id, name: spec.name.clone(), address: spec.address.clone(), owner_id })
    }

    /// Create a lock, installed in `property_id` when given
    pub fn provision_lock(
        &self,
        spec: &LockSpec,
        property_id: Option<RemoteId>,
    ) -> ProvisionResult<Lock> {
        let payload = LockPayload {
            model: spec.model.clone(),
            locked: spec.locked,
            property: property_id.map(IdRef::from),
        };
        let id = self.create_single(EntityKind::Lock, endpoints::LOCK_CREATE, &payload)?;
        info!(%id, model = %spec.model, "Lock created");
        Ok(Lock { id, model: spec.model.clone(), locked: spec.locked, property_id })
    }

    /// Create an access grant, simulating it if the endpoint fails
    pub fn provision_grant(
        &self,
        guest_id: RemoteId,
        lock_id: RemoteId,
        window: WindowText,
    ) -> Provisioned<AccessGrant> {
        let payload = GrantPayload {
            guest: guest_id.into(),
            lock: lock_id.into(),
            schedule: SchedulePayload { start: window.start.clone(), end: window.end.clone() },
        };
        let response = self.client.create(endpoints::ACCESSES, &payload);
        let grant = |id: EntityId| AccessGrant { id, guest_id, lock_id, window: window.clone() };

        match RemoteId::from_body(&response.body).filter(|_| response.ok) {
            Some(id) => {
                info!(%id, guest = %guest_id, lock = %lock_id, "Access grant created");
                Provisioned::Persisted(grant(id.into()))
            }
            None => {
                let id = SimulatedId::new();
                warn!(
                    status = response.status_code,
                    %id,
                    "Access grant endpoint failed; using a simulated grant"
                );
                Provisioned::Simulated(grant(id.into()))
            }
        }
    }

    /// Create an access token, simulating it if the endpoint fails
    pub fn provision_token(&self, request: TokenRequest) -> Provisioned<AccessToken> {
        let response = self.client.create(endpoints::TOKENS, &request.payload());

        match RemoteId::from_body(&response.body).filter(|_| response.ok) {
            Some(id) => {
                info!(%id, code = %request.code, lock = %request.lock_id, "Token created");
                Provisioned::Persisted(request.into_token(id))
            }
            None => {
                let id = SimulatedId::new();
                warn!(
                    status = response.status_code,
                    %id,
                    code = %request.code,
                    "Token endpoint failed; using a simulated token"
                );
                Provisioned::Simulated(request.into_token(id))
            }
        }
    }

    fn create_single<P: serde::Serialize>(
        &self,
        entity: EntityKind,
        path: &str,
        payload: &P,
    ) -> ProvisionResult<RemoteId> {
        let response = self.client.create(path, payload);
        let result = if response.ok {
            RemoteId::from_body(&response.body)
                .ok_or_else(|| ProvisionError::from_response(entity, &response))
        } else {
            Err(ProvisionError::from_response(entity, &response))
        };
        result.inspect_err(log_error)
    }
}
