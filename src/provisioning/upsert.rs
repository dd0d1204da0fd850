//! Idempotent create for entities with a natural key
//!
//! ```text
//! ATTEMPT_CREATE --200/201--> created (id from body)
//! ATTEMPT_CREATE --409------> RESOLVE --found--> existing / registered
//!                                     --none---> Conflict
//! ATTEMPT_CREATE --other----> failure, no retry
//! ```

use super::error::{ProvisionError, ProvisionResult};
use super::resolver::{IdentityResolver, Registration, ResolvedIdentity};
use crate::api::{ApiClient, UserPayload};
use crate::types::{EntityKind, RemoteId, Resolution};
use tracing::{info, warn};

/// Everything needed to create-or-find one account
#[derive(Debug, Clone, Copy)]
pub struct UpsertPlan<'a> {
    /// Entity kind, for logs and errors
    pub entity: EntityKind,
    /// Create endpoint
    pub create_path: &'a str,
    /// Natural key used to find the account after a conflict
    pub natural_key: &'a str,
    /// Create body
    pub payload: &'a UserPayload,
    /// Optional secondary registration path
    pub registration: Option<Registration<'a>>,
}

/// Run the upsert state machine for `plan`
pub fn upsert(client: &ApiClient, plan: &UpsertPlan<'_>) -> ProvisionResult<ResolvedIdentity> {
    let response = client.create(plan.create_path, plan.payload);

    if response.ok {
        let id = RemoteId::from_body(&response.body)
            .ok_or_else(|| ProvisionError::from_response(plan.entity, &response))?;
        info!(entity = %plan.entity, key = plan.natural_key, %id, "Created");
        return Ok(ResolvedIdentity { id, resolution: Resolution::Created });
    }

    if response.is_conflict() {
        warn!(entity = %plan.entity, key = plan.natural_key, "Already exists, resolving existing id");
        return IdentityResolver::new(client)
            .resolve(plan.natural_key, plan.registration)
            .ok_or_else(|| ProvisionError::conflict(plan.entity, plan.natural_key));
    }

    Err(ProvisionError::from_response(plan.entity, &response))
}
