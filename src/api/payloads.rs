//! JSON request bodies, using the field names the management API expects

use crate::types::RemoteId;
use serde::{Deserialize, Serialize};

/// Reference to another record by id, e.g. `{"id": 3}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdRef {
    /// Referenced record id
    pub id: RemoteId,
}

impl From<RemoteId> for IdRef {
    fn from(id: RemoteId) -> Self {
        Self { id }
    }
}

/// Owner or guest registration
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserPayload {
    /// Display name
    #[serde(rename = "nombre")]
    pub name: String,
    /// Unique email
    pub email: String,
    /// Phone number
    #[serde(rename = "telefono")]
    pub phone: String,
    /// Plaintext password
    #[serde(rename = "contrasena")]
    pub credential: String,
}

/// Property creation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PropertyPayload {
    /// Street address
    #[serde(rename = "direccion")]
    pub address: String,
    /// Display name
    #[serde(rename = "nombre")]
    pub name: String,
    /// Owning user
    #[serde(rename = "propietario")]
    pub owner: IdRef,
}

/// Lock creation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LockPayload {
    /// Hardware model
    #[serde(rename = "modelo")]
    pub model: String,
    /// Initial locked state
    #[serde(rename = "bloqueada")]
    pub locked: bool,
    /// Property the lock is installed in, if any
    #[serde(rename = "propiedad", skip_serializing_if = "Option::is_none")]
    pub property: Option<IdRef>,
}

/// Token creation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenPayload {
    /// Display code
    #[serde(rename = "codigo")]
    pub code: String,
    /// Maximum uses, 0 for unlimited
    #[serde(rename = "usosMaximos")]
    pub max_uses: u32,
    /// Uses consumed so far
    #[serde(rename = "usosActuales")]
    pub current_uses: u32,
    /// Expiry instant
    #[serde(rename = "fechaExpiracion", skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<String>,
    /// Lock the token opens
    #[serde(rename = "cerradura")]
    pub lock: IdRef,
}

/// Time window of an access grant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulePayload {
    /// Window start
    #[serde(rename = "inicio")]
    pub start: String,
    /// Window end
    #[serde(rename = "fin")]
    pub end: String,
}

/// Access grant creation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GrantPayload {
    /// Guest receiving access
    #[serde(rename = "huesped")]
    pub guest: IdRef,
    /// Lock being granted
    #[serde(rename = "cerradura")]
    pub lock: IdRef,
    /// Validity window
    #[serde(rename = "horario")]
    pub schedule: SchedulePayload,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_user_payload_field_names() {
        let payload = UserPayload {
            name: "Carlos Ruiz".to_string(),
            email: "carlos@email.com".to_string(),
            phone: "600111222".to_string(),
            credential: "abc123".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            json!({
                "nombre": "Carlos Ruiz",
                "email": "carlos@email.com",
                "telefono": "600111222",
                "contrasena": "abc123"
            })
        );
    }

    #[test]
    fn test_unassigned_lock_omits_property() {
        let payload =
            LockPayload { model: "Smart Lock Pro".to_string(), locked: true, property: None };
        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            json!({"modelo": "Smart Lock Pro", "bloqueada": true})
        );
    }

    #[test]
    fn test_grant_payload_shape() {
        let payload = GrantPayload {
            guest: RemoteId(2).into(),
            lock: RemoteId(5).into(),
            schedule: SchedulePayload {
                start: "2025-03-26T00:00:00".to_string(),
                end: "2025-04-25T00:00:00".to_string(),
            },
        };
        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            json!({
                "huesped": {"id": 2},
                "cerradura": {"id": 5},
                "horario": {"inicio": "2025-03-26T00:00:00", "fin": "2025-04-25T00:00:00"}
            })
        );
    }

    #[test]
    fn test_token_payload_without_expiry() {
        let payload = TokenPayload {
            code: "TOKEN123456".to_string(),
            max_uses: 5,
            current_uses: 0,
            expires_at: None,
            lock: RemoteId(1).into(),
        };
        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            json!({
                "codigo": "TOKEN123456",
                "usosMaximos": 5,
                "usosActuales": 0,
                "cerradura": {"id": 1}
            })
        );
    }
}
