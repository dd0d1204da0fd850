//! Core types, identifiers and configuration for the provisioner
//!
//! This module contains fundamental types, identifiers, and configuration structures
//! used throughout a provisioning run.
//!
//! # Overview
//!
//! - **Identifiers**: remote integer ids and locally simulated ids
//! - **Enums**: entity kinds, user roles, access status and token state
//! - **Configuration**: CLI arguments, configuration file and scenario definition
//!
//! # Usage Example
//!
//! ```rust
//! use access_scenario_provisioner::types::*;
//!
//! let remote: EntityId = RemoteId(7).into();
//! let simulated: EntityId = SimulatedId::new().into();
//! assert!(!remote.is_simulated());
//! assert!(simulated.to_string().starts_with("SIM_"));
//!
//! let config = AppConfig::default();
//! assert!(config.validate().is_ok());
//! ```

pub mod config;
pub mod enums;
pub mod identifiers;

// Re-export all public types for convenience
pub use config::*;
pub use enums::*;
pub use identifiers::*;
