//! Tests for CLI argument parsing functionality
//!
//! These tests verify that command line arguments are parsed into the expected
//! subcommands and that they override the loaded configuration.

use access_scenario_provisioner::types::config::{CliArgs, Command};
use access_scenario_provisioner::types::{AppConfig, ConfigError, OutputFormat};
use clap::Parser;

/// Test that no subcommand means provisioning with defaults
#[test]
fn test_default_invocation() {
    let args = CliArgs::try_parse_from(["test"]).unwrap();
    assert_eq!(args.command, None);
    assert!(!args.verbose);
    assert!(!args.debug);
    assert!(!args.dry_run);
    assert!(!args.print_config);

    let config = AppConfig::from_cli_args(&args).unwrap();
    assert_eq!(config, AppConfig::default());
}

/// Test parsing of the explicit provision subcommand with global flags
#[test]
fn test_provision_with_global_flags() {
    let args = CliArgs::try_parse_from([
        "test",
        "--base-url",
        "https://staging.example.com/api",
        "--timeout-secs",
        "15",
        "--output-format",
        "json",
        "-v",
        "provision",
    ])
    .unwrap();
    assert_eq!(args.command, Some(Command::Provision));
    assert!(args.verbose);

    let config = AppConfig::from_cli_args(&args).unwrap();
    assert_eq!(config.base_url, "https://staging.example.com/api");
    assert_eq!(config.timeout_secs, Some(15));
    assert_eq!(config.output_format, OutputFormat::Json);
    assert!(config.prompt);
}

/// Test that global flags are also accepted after the subcommand
#[test]
fn test_global_flags_after_subcommand() {
    let args = CliArgs::try_parse_from(["test", "locks", "--no-prompt", "--debug"]).unwrap();
    assert_eq!(args.command, Some(Command::Locks { id: None }));
    assert!(args.debug);

    let config = AppConfig::from_cli_args(&args).unwrap();
    assert!(!config.prompt);
}

/// Test parsing of the create-lock subcommand
#[test]
fn test_create_lock_arguments() {
    let args = CliArgs::try_parse_from(["test", "create-lock"]).unwrap();
    assert_eq!(
        args.command,
        Some(Command::CreateLock {
            model: "Smart Lock Pro".to_string(),
            unlocked: false,
            property_id: None,
        })
    );

    let args = CliArgs::try_parse_from([
        "test",
        "create-lock",
        "--model",
        "Smart Lock X1000",
        "--unlocked",
        "--property-id",
        "3",
    ])
    .unwrap();
    assert_eq!(
        args.command,
        Some(Command::CreateLock {
            model: "Smart Lock X1000".to_string(),
            unlocked: true,
            property_id: Some(3),
        })
    );
}

/// Test parsing of the create-token subcommand
#[test]
fn test_create_token_arguments() {
    let args = CliArgs::try_parse_from(["test", "create-token", "--lock-id", "4"]).unwrap();
    assert_eq!(
        args.command,
        Some(Command::CreateToken { lock_id: 4, code: None, max_uses: 5, expires_at: None })
    );

    let args = CliArgs::try_parse_from([
        "test",
        "create-token",
        "--lock-id",
        "4",
        "--code",
        "123456",
        "--max-uses",
        "0",
        "--expires-at",
        "2025-12-31T23:59:59",
    ])
    .unwrap();
    assert_eq!(
        args.command,
        Some(Command::CreateToken {
            lock_id: 4,
            code: Some("123456".to_string()),
            max_uses: 0,
            expires_at: Some("2025-12-31T23:59:59".to_string()),
        })
    );

    // The lock id is required and must be numeric
    assert!(CliArgs::try_parse_from(["test", "create-token"]).is_err());
    assert!(CliArgs::try_parse_from(["test", "create-token", "--lock-id", "front"]).is_err());
}

/// Test parsing of the query subcommands
#[test]
fn test_query_arguments() {
    let args = CliArgs::try_parse_from(["test", "locks", "--id", "7"]).unwrap();
    assert_eq!(args.command, Some(Command::Locks { id: Some(7) }));

    // Lock ids must be numeric so they cannot reshape the request path
    assert!(CliArgs::try_parse_from(["test", "locks", "--id", "1/../tokens"]).is_err());
    assert!(CliArgs::try_parse_from(["test", "locks", "--id", "1?x=y"]).is_err());

    let args = CliArgs::try_parse_from(["test", "tokens", "--code", "TOKEN123456"]).unwrap();
    assert_eq!(args.command, Some(Command::Tokens { code: Some("TOKEN123456".to_string()) }));
}

/// Test the dry-run and print-config flags
#[test]
fn test_special_flags() {
    let args = CliArgs::try_parse_from(["test", "--dry-run"]).unwrap();
    assert!(args.dry_run);

    let args = CliArgs::try_parse_from(["test", "--print-config"]).unwrap();
    assert!(args.print_config);

    let json = AppConfig::default().print_json().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["base_url"], "http://localhost:8080/api");
    assert_eq!(value["scenario"]["owner"]["email"], "carlos@email.com");
}

/// Test rejection of unknown output formats and subcommands
#[test]
fn test_invalid_arguments() {
    let args = CliArgs::try_parse_from(["test", "--output-format", "xml"]).unwrap();
    let error = AppConfig::from_cli_args(&args).unwrap_err();
    assert!(matches!(error, ConfigError::UnsupportedOutputFormat(ref format) if format == "xml"));

    assert!(CliArgs::try_parse_from(["test", "explode"]).is_err());
    assert!(CliArgs::try_parse_from(["test", "--timeout-secs", "soon"]).is_err());
}

/// Test that an invalid base URL passes parsing but fails validation
#[test]
fn test_invalid_base_url_fails_validation() {
    let args = CliArgs::try_parse_from(["test", "--base-url", "localhost:8080"]).unwrap();
    let config = AppConfig::from_cli_args(&args).unwrap();
    assert!(config.validate().is_err());
}
