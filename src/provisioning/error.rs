//! Error types for provisioning steps
//!
//! Every failed step is described by a [`ProvisionError`]. None of them stops a run by
//! itself; the orchestrator records the error and skips the step's dependents.

use crate::api::{ApiResponse, TransportErrorKind};
use crate::types::EntityKind;
use serde::Serialize;
use thiserror::Error;

/// Result type for a single provisioning step
pub type ProvisionResult<T> = Result<T, ProvisionError>;

/// Errors that can end a provisioning step
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProvisionError {
    /// No HTTP response was received
    #[error("{entity}: transport failure ({kind}): {message}")]
    Transport {
        /// Entity being provisioned
        entity: EntityKind,
        /// Failure class
        kind: TransportErrorKind,
        /// Transport error description
        message: String,
    },

    /// The natural key already exists and its owner could not be found
    #[error("{entity}: '{key}' already exists and could not be resolved")]
    Conflict {
        /// Entity being provisioned
        entity: EntityKind,
        /// Natural key that conflicted
        key: String,
    },

    /// The API rejected the request
    #[error("{entity}: rejected with status {status}: {body}")]
    Validation {
        /// Entity being provisioned
        entity: EntityKind,
        /// HTTP status code
        status: u16,
        /// Raw response body
        body: String,
    },

    /// The API accepted the request but returned no usable id
    #[error("{entity}: status {status} without a usable id: {body}")]
    Parse {
        /// Entity being provisioned
        entity: EntityKind,
        /// HTTP status code
        status: u16,
        /// Raw response body
        body: String,
    },
}

impl ProvisionError {
    /// Classify a failed response
    pub fn from_response(entity: EntityKind, response: &ApiResponse) -> Self {
        if let Some(kind) = response.transport_error {
            return Self::Transport { entity, kind, message: response.raw.clone() };
        }
        if response.ok {
            return Self::Parse {
                entity,
                status: response.status_code,
                body: response.raw.clone(),
            };
        }
        Self::Validation { entity, status: response.status_code, body: response.raw.clone() }
    }

    /// Create a conflict error
    pub fn conflict(entity: EntityKind, key: impl Into<String>) -> Self {
        Self::Conflict { entity, key: key.into() }
    }

    /// Entity the failed step was provisioning
    pub fn entity(&self) -> EntityKind {
        match self {
            ProvisionError::Transport { entity, .. }
            | ProvisionError::Conflict { entity, .. }
            | ProvisionError::Validation { entity, .. }
            | ProvisionError::Parse { entity, .. } => *entity,
        }
    }

    /// HTTP status behind the failure; 0 for transport failures
    pub fn status_code(&self) -> u16 {
        match self {
            ProvisionError::Transport { .. } => 0,
            ProvisionError::Conflict { .. } => 409,
            ProvisionError::Validation { status, .. } | ProvisionError::Parse { status, .. } => {
                *status
            }
        }
    }

    /// Get the error category
    pub fn category(&self) -> &'static str {
        match self {
            ProvisionError::Transport { .. } => "Transport",
            ProvisionError::Conflict { .. } => "Conflict",
            ProvisionError::Validation { .. } => "Validation",
            ProvisionError::Parse { .. } => "Parse",
        }
    }

    /// Raw response body or transport description
    pub fn detail(&self) -> &str {
        match self {
            ProvisionError::Transport { message, .. } => message,
            ProvisionError::Conflict { key, .. } => key,
            ProvisionError::Validation { body, .. } | ProvisionError::Parse { body, .. } => body,
        }
    }

    /// Whether the same request could succeed if sent again later.
    ///
    /// Nothing is retried automatically; this only informs the report.
    pub fn is_recoverable(&self) -> bool {
        match self {
            ProvisionError::Transport { .. } => true,
            ProvisionError::Validation { status, .. } => *status >= 500,
            ProvisionError::Conflict { .. } | ProvisionError::Parse { .. } => false,
        }
    }
}

/// Serializable view of a [`ProvisionError`] for reports
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorReport {
    /// Error category
    pub category: &'static str,
    /// HTTP status, 0 without a response
    pub status_code: u16,
    /// Full error message
    pub message: String,
    /// Raw body or transport description
    pub detail: String,
    /// Whether rerunning the scenario may get past this step
    pub recoverable: bool,
}

impl From<&ProvisionError> for ErrorReport {
    fn from(error: &ProvisionError) -> Self {
        Self {
            category: error.category(),
            status_code: error.status_code(),
            message: error.to_string(),
            detail: error.detail().to_string(),
            recoverable: error.is_recoverable(),
        }
    }
}

/// Log a step failure with its category
pub fn log_error(error: &ProvisionError) {
    crate::provision_event!(
        warn,
        "Provisioning step failed",
        entity = tracing::field::display(error.entity()),
        category = error.category(),
        status = error.status_code(),
        recoverable = error.is_recoverable(),
        error = tracing::field::display(error),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn response(ok: bool, status_code: u16, raw: &str) -> ApiResponse {
        ApiResponse {
            ok,
            status_code,
            body: Value::Null,
            raw: raw.to_string(),
            transport_error: None,
        }
    }

    #[test]
    fn test_from_response_classification() {
        let validation = ProvisionError::from_response(EntityKind::Property, &response(false, 400, "bad"));
        assert_eq!(validation.category(), "Validation");
        assert_eq!(validation.status_code(), 400);
        assert_eq!(validation.detail(), "bad");

        let parse = ProvisionError::from_response(EntityKind::Lock, &response(true, 201, "{}"));
        assert_eq!(parse.category(), "Parse");
        assert_eq!(parse.status_code(), 201);

        let mut refused = response(false, 0, "connection refused");
        refused.transport_error = Some(TransportErrorKind::ConnectionRefused);
        let transport = ProvisionError::from_response(EntityKind::Owner, &refused);
        assert_eq!(transport.category(), "Transport");
        assert_eq!(transport.status_code(), 0);
        assert!(transport.is_recoverable());
    }

    #[test]
    fn test_conflict_error() {
        let error = ProvisionError::conflict(EntityKind::Guest, "ana@email.com");
        assert_eq!(error.status_code(), 409);
        assert_eq!(error.entity(), EntityKind::Guest);
        assert!(!error.is_recoverable());
        assert!(error.to_string().contains("ana@email.com"));
    }

    #[test]
    fn test_error_report() {
        let error = ProvisionError::Validation {
            entity: EntityKind::Lock,
            status: 500,
            body: "boom".to_string(),
        };
        let report = ErrorReport::from(&error);
        assert_eq!(report.category, "Validation");
        assert_eq!(report.status_code, 500);
        assert_eq!(report.detail, "boom");
        assert!(report.recoverable);

        let conflict = ErrorReport::from(&ProvisionError::conflict(EntityKind::Guest, "ana@email.com"));
        assert!(!conflict.recoverable);
    }
}
