//! Remote management API access
//!
//! - **ApiClient**: create/read calls returning [`ApiResponse`], never raising
//! - **Transport**: seam between the client and the network ([`UreqTransport`])
//! - **payloads**: JSON request bodies using the API's field names
//! - **endpoints**: request paths
//! - **testing**: scripted in-memory transport for tests

pub mod client;
pub mod endpoints;
pub mod payloads;
pub mod testing;
pub mod transport;

pub use client::*;
pub use payloads::*;
pub use transport::*;
