//! Tests for access window classification and token validity
//!
//! These tests pin the evaluation instant with a fixed clock and check the
//! inclusive window boundaries and the token state precedence rules.

use access_scenario_provisioner::entities::{AccessToken, WindowText};
use access_scenario_provisioner::schedule::{classify, token_state, AccessWindow, Clock, FixedClock};
use access_scenario_provisioner::types::{
    AccessSpec, AccessStatus, EntityId, RemoteId, ScenarioConfig, TokenState, WindowSpec,
};
use chrono::{NaiveDate, NaiveDateTime};

fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(h, min, s).unwrap()
}

/// Reference instant used throughout: 2025-03-31 at midnight
fn reference() -> NaiveDateTime {
    FixedClock::on_date(2025, 3, 31).unwrap().now()
}

/// Test the three classic window positions relative to the reference date
#[test]
fn test_window_classification_against_reference_date() {
    let now = reference();

    assert_eq!(classify("2025-03-26", "2025-04-10", now), AccessStatus::Active);
    assert_eq!(classify("2025-04-05", "2025-04-20", now), AccessStatus::Future);
    assert_eq!(classify("2025-03-01", "2025-03-30", now), AccessStatus::Expired);
}

/// Test that both window boundaries count as active
#[test]
fn test_window_boundaries_are_inclusive() {
    let window = AccessWindow::new(at(2025, 3, 26, 10, 0, 0), at(2025, 4, 10, 18, 0, 0)).unwrap();

    assert_eq!(window.status(at(2025, 3, 26, 10, 0, 0)), AccessStatus::Active);
    assert_eq!(window.status(at(2025, 4, 10, 18, 0, 0)), AccessStatus::Active);
    assert_eq!(window.status(at(2025, 3, 26, 9, 59, 59)), AccessStatus::Future);
    assert_eq!(window.status(at(2025, 4, 10, 18, 0, 1)), AccessStatus::Expired);
}

/// Test that a date-only end covers the whole last day
#[test]
fn test_date_only_end_is_active_all_day() {
    assert_eq!(
        classify("2025-03-01", "2025-03-31", at(2025, 3, 31, 23, 30, 0)),
        AccessStatus::Active
    );
    assert_eq!(
        classify("2025-03-01", "2025-03-31", at(2025, 4, 1, 0, 0, 0)),
        AccessStatus::Expired
    );
}

/// Test that unparseable or inverted windows are reported as unknown
#[test]
fn test_bad_windows_are_unknown() {
    let now = reference();

    assert_eq!(classify("soon", "2025-04-10", now), AccessStatus::Unknown);
    assert_eq!(classify("2025-03-26", "", now), AccessStatus::Unknown);
    assert_eq!(classify("2025-04-10", "2025-03-26", now), AccessStatus::Unknown);
}

/// Test the default window: today at midnight, lasting thirty days
#[test]
fn test_default_window_resolution() {
    let clock = FixedClock(at(2025, 3, 31, 15, 45, 0));
    let window = WindowSpec::default().resolve(&clock).unwrap();

    assert_eq!(window.start, at(2025, 3, 31, 0, 0, 0));
    assert_eq!(window.end, at(2025, 4, 30, 0, 0, 0));
    assert_eq!(window.status(clock.now()), AccessStatus::Active);

    let text = WindowSpec::default().resolve_text(&clock).unwrap();
    assert_eq!(text, WindowText {
        start: "2025-03-31T00:00:00".to_string(),
        end: "2025-04-30T00:00:00".to_string(),
    });
}

/// Test explicit windows defined in a scenario
#[test]
fn test_explicit_window_in_scenario() {
    let clock = FixedClock::on_date(2025, 3, 31).unwrap();
    let mut scenario = ScenarioConfig::default();
    scenario.accesses = vec![AccessSpec {
        guest_email: "ana@email.com".to_string(),
        lock_key: "front-door".to_string(),
        window: WindowSpec {
            start: Some("2025-04-05".to_string()),
            end: None,
            duration_days: 15,
        },
    }];
    scenario.validate().unwrap();

    let window = scenario.accesses[0].window.resolve(&clock).unwrap();
    assert_eq!(window.end, at(2025, 4, 20, 0, 0, 0));
    assert_eq!(window.status(clock.now()), AccessStatus::Future);
}

/// Test token state precedence: exhaustion wins over expiry
#[test]
fn test_token_state_precedence() {
    let now = reference();
    let past = Some(at(2025, 1, 1, 0, 0, 0));
    let future = Some(at(2025, 12, 31, 23, 59, 59));

    assert_eq!(token_state(5, 0, future, now), TokenState::Valid);
    assert_eq!(token_state(5, 5, future, now), TokenState::Exhausted);
    assert_eq!(token_state(5, 7, past, now), TokenState::Exhausted);
    assert_eq!(token_state(5, 1, past, now), TokenState::Expired);
    assert_eq!(token_state(5, 1, None, now), TokenState::Valid);
}

/// Test that a max of zero means unlimited uses
#[test]
fn test_unlimited_tokens_never_exhaust() {
    let now = reference();
    assert_eq!(token_state(0, 10_000, None, now), TokenState::Valid);

    let token = AccessToken {
        id: EntityId::Remote(RemoteId(9)),
        code: "123456".to_string(),
        max_uses: 0,
        current_uses: 3,
        lock_id: RemoteId(1),
        expires_at: Some("2025-03-30T23:59:59".to_string()),
    };
    assert_eq!(token.state(now), TokenState::Expired);
    assert_eq!(token.usage_label(), "3/∞");
}
