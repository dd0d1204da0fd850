//! Reporting on provisioned records
//!
//! - **summary**: [`ScenarioSummary`] built from a scenario run
//! - **render**: text and JSON output for the summary
//! - **inventory**: lock and token listings, plus standalone creates

pub mod inventory;
pub mod render;
pub mod summary;

pub use inventory::*;
pub use render::*;
pub use summary::*;
