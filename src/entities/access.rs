//! Access grants and access tokens

use crate::schedule::{classify, parse_instant, token_state, Bound};
use crate::types::{AccessStatus, EntityId, RemoteId, TokenState};
use chrono::NaiveDateTime;
use serde::Serialize;
use serde_json::Value;

/// Window bounds as text, exactly as sent to or returned by the API
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WindowText {
    /// Window start
    pub start: String,
    /// Window end
    pub end: String,
}

/// Time-bounded permission for a guest to operate a lock
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccessGrant {
    /// Remote or simulated id
    pub id: EntityId,
    /// Guest receiving access
    pub guest_id: RemoteId,
    /// Lock being granted
    pub lock_id: RemoteId,
    /// Validity window
    pub window: WindowText,
}

impl AccessGrant {
    /// Status at `now`; `Unknown` when the window text does not parse
    pub fn status(&self, now: NaiveDateTime) -> AccessStatus {
        classify(&self.window.start, &self.window.end, now)
    }
}

/// Use-limited code for a lock
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccessToken {
    /// Remote or simulated id
    pub id: EntityId,
    /// Display code; not guaranteed unique remotely
    pub code: String,
    /// Maximum uses, 0 for unlimited
    pub max_uses: u32,
    /// Uses consumed so far
    pub current_uses: u32,
    /// Lock the token opens
    pub lock_id: RemoteId,
    /// Expiry instant as text
    pub expires_at: Option<String>,
}

impl AccessToken {
    /// Read a token from an API body (`codigo`, `usosMaximos`, `usosActuales`, ...)
    pub fn from_body(body: &Value) -> Option<Self> {
        let id = RemoteId::from_body(body)?;
        Some(Self {
            id: id.into(),
            code: body.get("codigo").and_then(Value::as_str).unwrap_or_default().to_string(),
            max_uses: read_count(body, "usosMaximos"),
            current_uses: read_count(body, "usosActuales"),
            lock_id: body.get("cerradura").and_then(RemoteId::from_body).unwrap_or(RemoteId(0)),
            expires_at: body.get("fechaExpiracion").and_then(Value::as_str).map(str::to_string),
        })
    }

    /// Validity at `now`; an unparseable expiry is treated as no expiry
    pub fn state(&self, now: NaiveDateTime) -> TokenState {
        let expiry = self.expires_at.as_deref().and_then(|e| parse_instant(e, Bound::End));
        token_state(self.max_uses, self.current_uses, expiry, now)
    }

    /// Uses as `current/max`, with ∞ for unlimited tokens
    pub fn usage_label(&self) -> String {
        if self.max_uses == 0 {
            format!("{}/∞", self.current_uses)
        } else {
            format!("{}/{}", self.current_uses, self.max_uses)
        }
    }
}

fn read_count(body: &Value, field: &str) -> u32 {
    body.get(field)
        .and_then(Value::as_u64)
        .map(|n| u32::try_from(n).unwrap_or(u32::MAX))
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::{Clock, FixedClock};
    use serde_json::json;

    #[test]
    fn test_grant_status_unknown_for_bad_window() {
        let now = FixedClock::on_date(2025, 3, 31).unwrap().now();
        let mut grant = AccessGrant {
            id: RemoteId(1).into(),
            guest_id: RemoteId(2),
            lock_id: RemoteId(3),
            window: WindowText { start: "2025-03-26".into(), end: "2025-04-10".into() },
        };
        assert_eq!(grant.status(now), AccessStatus::Active);
        grant.window.end = "whenever".into();
        assert_eq!(grant.status(now), AccessStatus::Unknown);
    }

    #[test]
    fn test_token_from_body() {
        let token = AccessToken::from_body(&json!({
            "id": 8,
            "codigo": "123456",
            "usosMaximos": 5,
            "usosActuales": 2,
            "fechaExpiracion": "2025-12-31T23:59:59",
            "cerradura": {"id": 1}
        }))
        .unwrap();
        assert_eq!(token.id, EntityId::Remote(RemoteId(8)));
        assert_eq!(token.code, "123456");
        assert_eq!(token.usage_label(), "2/5");
        assert_eq!(token.lock_id, RemoteId(1));

        let now = FixedClock::on_date(2026, 1, 1).unwrap().now();
        assert_eq!(token.state(now), TokenState::Expired);
    }

    #[test]
    fn test_unlimited_token_usage_label() {
        let token = AccessToken::from_body(&json!({"id": 1, "codigo": "x", "usosMaximos": 0, "usosActuales": 3})).unwrap();
        assert_eq!(token.usage_label(), "3/∞");
        assert_eq!(token.expires_at, None);
    }
}
