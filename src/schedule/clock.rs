//! Wall-clock access
//!
//! The orchestrator and the summary builder never read the system time directly;
//! they take a [`Clock`] so runs can be pinned to a fixed instant.

use chrono::{Local, NaiveDate, NaiveDateTime};
use std::fmt;

/// Source of the reference instant used for status calculations
pub trait Clock: fmt::Debug {
    /// Current local wall-clock time
    fn now(&self) -> NaiveDateTime;

    /// Midnight of the current day
    fn today(&self) -> NaiveDateTime {
        self.now().date().and_hms_opt(0, 0, 0).unwrap_or_else(|| self.now())
    }
}

/// Clock backed by the system's local time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Clock frozen at a given instant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub NaiveDateTime);

impl FixedClock {
    /// Clock frozen at midnight of the given date
    pub fn on_date(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(FixedClock)
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}
