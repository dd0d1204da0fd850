//! Temporal status of access windows and token validity
//!
//! Access windows travel over the wire as text (`horario.inicio` / `horario.fin`)
//! and are compared against a reference instant in local wall-clock time.

use crate::types::{AccessStatus, TokenState};
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Wire format used when sending instants to the remote API
pub const WIRE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M",
];

/// Errors raised when building an access window
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WindowError {
    /// A bound could not be parsed
    #[error("Unparseable window {bound}: '{value}'")]
    Unparseable {
        /// Which bound failed ("start" or "end")
        bound: &'static str,
        /// The offending text
        value: String,
    },

    /// The window ends before it starts
    #[error("Window start {start} is after end {end}")]
    Inverted {
        /// Window start
        start: NaiveDateTime,
        /// Window end
        end: NaiveDateTime,
    },

    /// The window end falls outside the representable calendar
    #[error("Window of {days} days is out of range")]
    OutOfRange {
        /// Requested duration
        days: i64,
    },
}

/// Which side of a window a date-only value describes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    /// A date-only value means the first instant of that day
    Start,
    /// A date-only value means the last instant of that day
    End,
}

/// Parse an instant in any of the accepted formats.
///
/// Accepts `YYYY-MM-DD`, local date-times with or without seconds and fractions,
/// and RFC 3339 timestamps (converted to local time).
pub fn parse_instant(text: &str, bound: Bound) -> Option<NaiveDateTime> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, format) {
            return Some(dt);
        }
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Local).naive_local());
    }

    let date = NaiveDate::parse_from_str(text, "%Y-%m-%d").ok()?;
    match bound {
        Bound::Start => date.and_hms_opt(0, 0, 0),
        Bound::End => date.and_hms_nano_opt(23, 59, 59, 999_999_999),
    }
}

/// Format an instant the way the remote API expects it
pub fn format_instant(instant: NaiveDateTime) -> String {
    instant.format(WIRE_FORMAT).to_string()
}

/// A closed time window `[start, end]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessWindow {
    /// First instant of the window
    pub start: NaiveDateTime,
    /// Last instant of the window
    pub end: NaiveDateTime,
}

impl AccessWindow {
    /// Create a window, rejecting `start > end`
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Result<Self, WindowError> {
        if start > end {
            return Err(WindowError::Inverted { start, end });
        }
        Ok(Self { start, end })
    }

    /// Parse a window from its textual bounds
    pub fn parse(start: &str, end: &str) -> Result<Self, WindowError> {
        let start_dt = parse_instant(start, Bound::Start).ok_or_else(|| WindowError::Unparseable {
            bound: "start",
            value: start.to_string(),
        })?;
        let end_dt = parse_instant(end, Bound::End).ok_or_else(|| WindowError::Unparseable {
            bound: "end",
            value: end.to_string(),
        })?;
        Self::new(start_dt, end_dt)
    }

    /// Window starting at `start` and lasting `days` days
    pub fn starting_at(start: NaiveDateTime, days: i64) -> Result<Self, WindowError> {
        let end = chrono::Duration::try_days(days)
            .and_then(|duration| start.checked_add_signed(duration))
            .ok_or(WindowError::OutOfRange { days })?;
        Self::new(start, end)
    }

    /// Classify the window against `now`; both boundaries count as active
    pub fn status(&self, now: NaiveDateTime) -> AccessStatus {
        if now < self.start {
            AccessStatus::Future
        } else if now > self.end {
            AccessStatus::Expired
        } else {
            AccessStatus::Active
        }
    }
}

/// Classify a textual window, reporting `Unknown` instead of failing.
pub fn classify(start: &str, end: &str, now: NaiveDateTime) -> AccessStatus {
    match AccessWindow::parse(start, end) {
        Ok(window) => window.status(now),
        Err(_) => AccessStatus::Unknown,
    }
}

/// Validity of a token at `now`.
///
/// A `max_uses` of zero means unlimited uses. Exhaustion takes precedence over expiry.
pub fn token_state(
    max_uses: u32,
    current_uses: u32,
    expires_at: Option<NaiveDateTime>,
    now: NaiveDateTime,
) -> TokenState {
    if max_uses > 0 && current_uses >= max_uses {
        return TokenState::Exhausted;
    }
    match expires_at {
        Some(expiry) if now > expiry => TokenState::Expired,
        _ => TokenState::Valid,
    }
}
