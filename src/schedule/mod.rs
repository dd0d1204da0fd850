//! Time handling for access grants and tokens
//!
//! - **Clock**: source of the reference instant ([`SystemClock`], [`FixedClock`])
//! - **AccessWindow**: closed `[start, end]` window with FUTURE / ACTIVE / EXPIRED status
//! - **token_state**: Valid / Exhausted / Expired classification for tokens
//!
//! # Usage Example
//!
//! ```rust
//! use access_scenario_provisioner::schedule::*;
//! use access_scenario_provisioner::types::AccessStatus;
//!
//! let clock = FixedClock::on_date(2025, 3, 31).unwrap();
//! let window = AccessWindow::parse("2025-03-26", "2025-04-10").unwrap();
//! assert_eq!(window.status(clock.now()), AccessStatus::Active);
//! ```

pub mod clock;
pub mod status;

pub use clock::*;
pub use status::*;
