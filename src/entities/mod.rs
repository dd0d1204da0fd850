//! Domain records created by a provisioning run
//!
//! Owners, guests, properties and locks are always remote records. Access grants and
//! tokens are wrapped in [`Provisioned`] because they may be simulated locally.

pub mod access;
pub mod property;
pub mod provisioned;
pub mod user;

pub use access::*;
pub use property::*;
pub use provisioned::*;
pub use user::*;
