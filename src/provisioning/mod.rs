//! Scenario provisioning against the management API
//!
//! This module contains the provisioning core:
//!
//! - **Error**: [`ProvisionError`] taxonomy for failed steps
//! - **Logging**: tracing subscriber configuration
//! - **Resolver**: finds existing accounts after a create conflict
//! - **Upsert**: create-or-find state machine for owners and guests
//! - **Provisioner**: per-entity creation, with simulated fallbacks for grants and tokens
//! - **Orchestrator**: dependency ordering and abort propagation for a whole scenario
//!
//! # Usage Example
//!
//! ```rust
//! use access_scenario_provisioner::api::{testing::ScriptedTransport, ApiClient};
//! use access_scenario_provisioner::provisioning::ScenarioOrchestrator;
//! use access_scenario_provisioner::schedule::FixedClock;
//! use access_scenario_provisioner::types::ScenarioConfig;
//!
//! // Nothing is scripted, so every request fails with a transport error.
//! let client = ApiClient::new("http://localhost:8080/api", Box::new(ScriptedTransport::new()));
//! let clock = FixedClock::on_date(2025, 3, 31).unwrap();
//!
//! let run = ScenarioOrchestrator::new(&client, &clock)
//!     .run(&ScenarioConfig::default())
//!     .unwrap();
//! assert_eq!(run.failure_count(), 2);
//! assert!(run.locks[0].step.outcome.is_aborted());
//! ```

pub mod error;
pub mod logging;
pub mod orchestrator;
pub mod provisioner;
pub mod resolver;
pub mod upsert;

pub use error::*;
pub use logging::*;
pub use orchestrator::*;
pub use provisioner::*;
pub use resolver::*;
pub use upsert::*;
