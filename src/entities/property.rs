//! Properties and locks

use crate::types::RemoteId;
use serde::Serialize;
use serde_json::Value;

/// Address-bound asset owned by an owner
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Property {
    /// Remote id
    pub id: RemoteId,
    /// Display name
    pub name: String,
    /// Street address
    pub address: String,
    /// Owning user
    pub owner_id: RemoteId,
}

/// Controllable door lock
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Lock {
    /// Remote id
    pub id: RemoteId,
    /// Hardware model
    pub model: String,
    /// Whether the lock is engaged
    pub locked: bool,
    /// Property the lock belongs to; `None` when unassigned
    pub property_id: Option<RemoteId>,
}

impl Lock {
    /// Read a lock from an API body (`id`, `modelo`, `bloqueada`, `propiedad`)
    pub fn from_body(body: &Value) -> Option<Self> {
        let id = RemoteId::from_body(body)?;
        Some(Self {
            id,
            model: body.get("modelo").and_then(Value::as_str).unwrap_or_default().to_string(),
            locked: body.get("bloqueada").and_then(Value::as_bool).unwrap_or(false),
            property_id: body.get("propiedad").and_then(RemoteId::from_body),
        })
    }

    /// "Locked" or "Unlocked"
    pub fn state_label(&self) -> &'static str {
        if self.locked {
            "Locked"
        } else {
            "Unlocked"
        }
    }
}
