//! Identifier types for provisioned records
//!
//! Records that were written to the remote API carry the numeric id the API
//! assigned. Records fabricated locally when a write fails carry a UUID-based
//! id from a separate space so the two can never be confused.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;
use uuid::Uuid;

/// Identifier assigned by the remote management API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RemoteId(pub i64);

impl RemoteId {
    /// Extract the `id` field from a response body.
    ///
    /// The API returns numeric ids, but a string holding a number is accepted too.
    pub fn from_body(body: &Value) -> Option<Self> {
        match body.get("id")? {
            Value::Number(n) => n.as_i64().map(RemoteId),
            Value::String(s) => s.parse().ok(),
            _ => None,
        }
    }
}

impl fmt::Display for RemoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RemoteId {
    type Err = ParseIntError;

    /// Parse a decimal id, ignoring surrounding whitespace
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(RemoteId)
    }
}

impl From<i64> for RemoteId {
    fn from(value: i64) -> Self {
        RemoteId(value)
    }
}

/// Identifier for a record that only exists in the local run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SimulatedId(pub Uuid);

impl SimulatedId {
    /// Create a new random simulated ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SimulatedId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SimulatedId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SIM_{}", self.0.simple())
    }
}

impl Serialize for SimulatedId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format!("SIM_{}", self.0.simple()))
    }
}

impl<'de> Deserialize<'de> for SimulatedId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let uuid_str = s
            .strip_prefix("SIM_")
            .ok_or_else(|| serde::de::Error::custom(format!("missing SIM_ prefix: {}", s)))?;
        let uuid = Uuid::parse_str(uuid_str).map_err(serde::de::Error::custom)?;
        Ok(SimulatedId(uuid))
    }
}

/// Identifier of a record that may or may not exist remotely
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntityId {
    /// Assigned by the remote API
    Remote(RemoteId),
    /// Fabricated locally after a failed write
    Simulated(SimulatedId),
}

impl EntityId {
    /// Whether this id belongs to the simulated id space
    pub fn is_simulated(&self) -> bool {
        matches!(self, EntityId::Simulated(_))
    }

    /// The remote id, if the record was persisted
    pub fn remote(&self) -> Option<RemoteId> {
        match self {
            EntityId::Remote(id) => Some(*id),
            EntityId::Simulated(_) => None,
        }
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityId::Remote(id) => write!(f, "{}", id),
            EntityId::Simulated(id) => write!(f, "{}", id),
        }
    }
}

impl From<RemoteId> for EntityId {
    fn from(id: RemoteId) -> Self {
        EntityId::Remote(id)
    }
}

impl From<SimulatedId> for EntityId {
    fn from(id: SimulatedId) -> Self {
        EntityId::Simulated(id)
    }
}
