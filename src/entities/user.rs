//! Owner and guest accounts

use crate::api::UserPayload;
use crate::types::{RemoteId, Resolution, UserRole};
use serde::Serialize;

/// Owner or guest account as known after provisioning
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserAccount {
    /// Remote id
    pub id: RemoteId,
    /// Owner or guest
    pub role: UserRole,
    /// Display name
    pub name: String,
    /// Unique email
    pub email: String,
    /// Phone number
    pub phone: String,
    /// Plaintext password used to log in
    pub credential: String,
}

impl UserAccount {
    /// Build the account from the payload that was sent and the id that came back
    pub fn from_payload(id: RemoteId, role: UserRole, payload: &UserPayload) -> Self {
        Self {
            id,
            role,
            name: payload.name.clone(),
            email: payload.email.clone(),
            phone: payload.phone.clone(),
            credential: payload.credential.clone(),
        }
    }
}

/// A user account together with how its identity was obtained
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedUser {
    /// The account
    pub account: UserAccount,
    /// Created, found after a conflict, or registered through the secondary path
    pub resolution: Resolution,
}
