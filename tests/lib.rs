// Integration tests test your crate's public API. They only have access to items
// in your crate that are marked pub. See the Cargo Targets page of the Cargo Book
// for more information.
//
//   https://doc.rust-lang.org/cargo/reference/cargo-targets.html#integration-tests
//

use access_scenario_provisioner::*;

mod temporal_status_tests;

// Reporting and configuration
mod cli_argument_parsing_tests;

#[test]
fn test_core_id_types() {
    let remote: EntityId = RemoteId(42).into();
    let simulated: EntityId = SimulatedId::new().into();

    assert!(!remote.is_simulated());
    assert!(simulated.is_simulated());
    assert_eq!(remote.remote(), Some(RemoteId(42)));
    assert_eq!(simulated.remote(), None);

    // Simulated ids are unique and never look like remote ids
    assert_ne!(SimulatedId::new(), SimulatedId::new());
    assert!(simulated.to_string().starts_with("SIM_"));
    assert_eq!(remote.to_string(), "42");
}

#[test]
fn test_id_json_output() {
    let remote: EntityId = RemoteId(7).into();
    assert_eq!(serde_json::to_string(&remote).unwrap(), "7");

    let simulated: EntityId = SimulatedId::new().into();
    let json = serde_json::to_string(&simulated).unwrap();
    assert!(json.starts_with("\"SIM_"));
}

#[test]
fn test_enum_display() {
    assert_eq!(AccessStatus::Active.to_string(), "ACTIVE");
    assert_eq!(TokenState::Exhausted.to_string(), "Exhausted");
    assert_eq!(EntityKind::AccessToken.to_string(), "Access Token");
    assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
    assert!("xml".parse::<OutputFormat>().is_err());
}
