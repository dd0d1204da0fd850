//! Enumeration types for the access scenario provisioner
//!
//! This module contains the enumerations shared across the crate: entity kinds,
//! user roles, derived access and token states, and report output formats.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kinds of records the provisioner creates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// User that holds properties
    Owner,
    /// User granted time-bounded lock access
    Guest,
    /// Address-bound asset containing locks
    Property,
    /// Controllable door lock
    Lock,
    /// Time-bounded permission for a guest on a lock
    AccessGrant,
    /// Use-limited code for a lock
    AccessToken,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Owner => write!(f, "Owner"),
            EntityKind::Guest => write!(f, "Guest"),
            EntityKind::Property => write!(f, "Property"),
            EntityKind::Lock => write!(f, "Lock"),
            EntityKind::AccessGrant => write!(f, "Access Grant"),
            EntityKind::AccessToken => write!(f, "Access Token"),
        }
    }
}

/// Role of a user account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Holds properties
    Owner,
    /// Receives access grants
    Guest,
}

impl UserRole {
    /// Entity kind reported for this role
    pub fn entity_kind(&self) -> EntityKind {
        match self {
            UserRole::Owner => EntityKind::Owner,
            UserRole::Guest => EntityKind::Guest,
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserRole::Owner => write!(f, "Owner"),
            UserRole::Guest => write!(f, "Guest"),
        }
    }
}

/// How a user identity was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resolution {
    /// The create call succeeded
    Created,
    /// The create call conflicted and the existing record was found by email
    Existing,
    /// The create call conflicted and the secondary registration path succeeded
    Registered,
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resolution::Created => write!(f, "created"),
            Resolution::Existing => write!(f, "already existed"),
            Resolution::Registered => write!(f, "registered"),
        }
    }
}

/// Temporal status of an access window relative to a reference instant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccessStatus {
    /// The window has not started yet
    Future,
    /// The reference instant lies inside the window, boundaries included
    Active,
    /// The window has ended
    Expired,
    /// The window could not be parsed
    Unknown,
}

impl fmt::Display for AccessStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccessStatus::Future => write!(f, "FUTURE"),
            AccessStatus::Active => write!(f, "ACTIVE"),
            AccessStatus::Expired => write!(f, "EXPIRED"),
            AccessStatus::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

/// Validity of an access token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenState {
    /// Token can still be used
    Valid,
    /// All uses have been consumed
    Exhausted,
    /// Expiry date has passed
    Expired,
}

impl fmt::Display for TokenState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenState::Valid => write!(f, "Valid"),
            TokenState::Exhausted => write!(f, "Exhausted"),
            TokenState::Expired => write!(f, "Expired"),
        }
    }
}

/// Output formats for the scenario report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable text
    Text,
    /// Pretty-printed JSON
    Json,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown output format: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_kind_display() {
        assert_eq!(format!("{}", EntityKind::Owner), "Owner");
        assert_eq!(format!("{}", EntityKind::AccessGrant), "Access Grant");
        assert_eq!(format!("{}", EntityKind::AccessToken), "Access Token");
    }

    #[test]
    fn test_user_role_entity_kind() {
        assert_eq!(UserRole::Owner.entity_kind(), EntityKind::Owner);
        assert_eq!(UserRole::Guest.entity_kind(), EntityKind::Guest);
    }

    #[test]
    fn test_access_status_serialization() {
        assert_eq!(serde_json::to_string(&AccessStatus::Active).unwrap(), "\"ACTIVE\"");
        assert_eq!(serde_json::to_string(&AccessStatus::Unknown).unwrap(), "\"UNKNOWN\"");
        assert_eq!(AccessStatus::Future.to_string(), "FUTURE");
    }

    #[test]
    fn test_output_format_from_str() {
        assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("text".parse::<OutputFormat>().unwrap(), OutputFormat::Text);
        assert!("csv".parse::<OutputFormat>().is_err());
    }
}
