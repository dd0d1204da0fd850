//! Access Scenario Provisioner
//!
//! Seeds a smart-lock management API with a consistent, interlinked set of demo
//! records: an owner, guests, properties, locks, access grants and access tokens.
//!
//! # Overview
//!
//! Records are created in dependency order against the remote API. Creating an account
//! whose email already exists is not an error: the existing id is looked up and used.
//! Grants and tokens fall back to locally simulated records when their endpoints fail,
//! and grant windows are classified as future, active or expired against the clock.
//!
//! ## Key Features
//!
//! - **Idempotent accounts**: create, then resolve by email after a 409
//! - **Abort propagation**: a failed predecessor skips its dependents without requests
//! - **Simulated fallbacks**: grants and tokens always yield a usable record
//! - **Temporal status**: inclusive window classification and token validity
//! - **Reports**: text and JSON summaries, plus lock and token inventory queries
//!
//! ## Quick Start
//!
//! ```rust
//! use access_scenario_provisioner::*;
//!
//! let transport = ScriptedTransport::new();
//! transport.reply(HttpMethod::Post, "/propietarios", 201, r#"{"id": 1}"#);
//! transport.reply(HttpMethod::Post, "/usuarios/huesped", 201, r#"{"id": 2}"#);
//!
//! let client = ApiClient::new("http://localhost:8080/api", Box::new(transport));
//! let clock = FixedClock::on_date(2025, 3, 31).unwrap();
//!
//! let mut scenario = ScenarioConfig::default();
//! scenario.properties.clear();
//! scenario.accesses.clear();
//! scenario.tokens.clear();
//!
//! let run = ScenarioOrchestrator::new(&client, &clock).run(&scenario)?;
//! let summary = ScenarioSummary::build(&run, clock.now());
//! assert_eq!(summary.counts.persisted, 2);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Module Organization
//!
//! - [`types`]: Identifiers, enums and configuration
//! - [`api`]: HTTP client, transport seam and request payloads
//! - [`entities`]: Records produced by a run
//! - [`schedule`]: Clock and temporal status calculation
//! - [`provisioning`]: Resolver, upsert, per-entity provisioner and orchestrator
//! - [`report`]: Summary, rendering and inventory queries
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐    ┌──────────────┐    ┌──────────────┐
//! │ Orchestrator │───►│ Provisioner  │───►│  ApiClient   │
//! │              │    │ Upsert       │    │  Transport   │
//! │              │    │ Resolver     │    │              │
//! └──────────────┘    └──────────────┘    └──────────────┘
//!        │
//!        ▼
//! ┌──────────────┐    ┌──────────────┐
//! │   Summary    │───►│   Schedule   │
//! │   Render     │    │   Status     │
//! └──────────────┘    └──────────────┘
//! ```
#![warn(missing_docs, missing_debug_implementations, unreachable_pub)]

// Module declarations
pub mod api;
pub mod entities;
pub mod provisioning;
pub mod report;
pub mod schedule;
pub mod types;

// Core types and configuration
pub use types::{
    AccessStatus, AppConfig, CliArgs, Command, ConfigError, ConfigValidationError, EntityId,
    EntityKind, OutputFormat, RemoteId, Resolution, ScenarioConfig, SimulatedId, TokenState,
    UserRole,
};

// API access
pub use api::{testing::ScriptedTransport, ApiClient, ApiResponse, HttpMethod, Transport, UreqTransport};

// Records
pub use entities::{AccessGrant, AccessToken, Lock, Property, Provisioned, UserAccount};

// Time handling
pub use schedule::{classify, token_state, AccessWindow, Clock, FixedClock, SystemClock};

// Provisioning
pub use provisioning::{
    EntityProvisioner, IdentityResolver, LoggingConfig, Outcome, ProvisionError,
    ScenarioOrchestrator, ScenarioRun,
};

// Reporting
pub use report::{render, Inventory, ScenarioSummary};
