//! Tagged result for records that may have been simulated

use serde::Serialize;

/// A record that was either written remotely or fabricated locally.
///
/// Grants and tokens fall back to a simulated record when their endpoints fail, so
/// consumers must handle both cases explicitly.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "origin", content = "record", rename_all = "snake_case")]
pub enum Provisioned<T> {
    /// Returned by the remote API
    Persisted(T),
    /// Held only in this run's memory
    Simulated(T),
}

impl<T> Provisioned<T> {
    /// Whether the record never reached the remote store
    pub fn is_simulated(&self) -> bool {
        matches!(self, Provisioned::Simulated(_))
    }

    /// Borrow the record
    pub fn record(&self) -> &T {
        match self {
            Provisioned::Persisted(record) | Provisioned::Simulated(record) => record,
        }
    }

    /// Take the record
    pub fn into_record(self) -> T {
        match self {
            Provisioned::Persisted(record) | Provisioned::Simulated(record) => record,
        }
    }
}
