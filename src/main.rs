// Access Scenario Provisioner - Main Entry Point
//
// You can run it via Cargo:
//
// ```console
// $ cargo build --release
// $ ./target/release/access-scenario-provisioner
// ```
//
// Or against another API with a scenario file:
//
// ```console
// $ ./target/release/access-scenario-provisioner --base-url http://staging:8080/api --config scenario.json --verbose
// ```

use access_scenario_provisioner::api::{ApiClient, UreqTransport};
use access_scenario_provisioner::provisioning::{
    generate_token_code, LoggingConfig, ScenarioOrchestrator, TokenRequest,
};
use access_scenario_provisioner::report::{
    render, render_locks, render_tokens, token_line, Inventory, ScenarioSummary,
};
use access_scenario_provisioner::schedule::{parse_instant, Bound, Clock, SystemClock};
use access_scenario_provisioner::types::config::{CliArgs, Command};
use access_scenario_provisioner::types::{AppConfig, RemoteId};
use anyhow::Context;
use clap::Parser;
use std::io::{self, BufRead, Write};
use std::process;
use std::time::Duration;
use tracing::{error, info};

fn main() {
    // Parse CLI arguments first to check for special flags
    let args = CliArgs::parse();

    // Handle special CLI flags that don't require full initialization
    if args.print_config {
        match AppConfig::default().print_json() {
            Ok(json) => {
                println!("{}", json);
                return;
            }
            Err(e) => {
                eprintln!("Failed to serialize default configuration: {}", e);
                process::exit(1);
            }
        }
    }

    // Initialize logging based on CLI flags; the guard flushes file output on exit
    let _logging = match LoggingConfig::init_for_cli(args.verbose, args.debug) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {}", e);
            process::exit(1);
        }
    };

    info!("Starting Access Scenario Provisioner");

    // Load configuration from CLI arguments and optional config file
    let config = match AppConfig::from_cli_args(&args) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            eprintln!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    // Validate configuration
    if let Err(e) = config.validate() {
        error!("Configuration validation failed: {}", e);
        eprintln!("Configuration validation failed: {}", e);
        process::exit(1);
    }

    info!("Configuration loaded and validated successfully");

    let command = args.command.clone().unwrap_or(Command::Provision);
    if let Err(e) = validate_command(&command) {
        eprintln!("Invalid arguments: {}", e);
        process::exit(1);
    }

    // Handle dry run mode
    if args.dry_run {
        eprintln!("Configuration validation successful!");
        eprintln!("Dry run mode - no requests will be sent.");
        print_configuration_summary(&config);
        return;
    }

    let transport = UreqTransport::new(config.timeout_secs.map(Duration::from_secs));
    let client = ApiClient::new(config.base_url.clone(), Box::new(transport));

    let result = match &command {
        Command::Provision => run_provision(&config, &client),
        Command::CreateLock { model, unlocked, property_id } => {
            run_create_lock(&client, model, !unlocked, property_id.map(RemoteId))
        }
        Command::CreateToken { lock_id, code, max_uses, expires_at } => {
            let request = TokenRequest {
                code: code.clone().unwrap_or_else(|| generate_token_code(&mut rand::thread_rng())),
                max_uses: *max_uses,
                current_uses: 0,
                expires_at: expires_at.clone(),
                lock_id: RemoteId(*lock_id),
            };
            run_create_token(&client, &request)
        }
        Command::Locks { id } => run_locks(&config, &client, id.map(RemoteId)),
        Command::Tokens { code } => run_tokens(&config, &client, code.as_deref()),
    };

    if let Err(e) = result {
        error!("Run failed: {:#}", e);
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }

    info!("Access Scenario Provisioner finished");
}

/// Reject subcommand arguments that cannot be sent as-is
fn validate_command(command: &Command) -> Result<(), String> {
    if let Command::CreateToken { expires_at: Some(expiry), code, .. } = command {
        if parse_instant(expiry, Bound::End).is_none() {
            return Err(format!("unparseable --expires-at value '{}'", expiry));
        }
        if code.as_deref().is_some_and(|c| c.trim().is_empty()) {
            return Err("--code must not be empty".to_string());
        }
    }
    Ok(())
}

/// Provision the configured scenario and print its summary to stdout
fn run_provision(config: &AppConfig, client: &ApiClient) -> anyhow::Result<()> {
    print_startup_banner(config);

    let clock = SystemClock;
    let run = ScenarioOrchestrator::new(client, &clock)
        .run(&config.scenario)
        .context("scenario validation failed")?;

    let summary = ScenarioSummary::build(&run, clock.now());
    let report = render(&summary, config.output_format).context("failed to render summary")?;
    println!("{}", report);

    if !summary.is_complete() {
        eprintln!(
            "Scenario only partially provisioned: {} failed, {} skipped.",
            summary.counts.failed, summary.counts.aborted
        );
    }
    Ok(())
}

/// Create one lock and show it as read back from the API
fn run_create_lock(
    client: &ApiClient,
    model: &str,
    locked: bool,
    property_id: Option<RemoteId>,
) -> anyhow::Result<()> {
    eprintln!("Creating lock '{}'...", model);
    match Inventory::new(client).create_lock(model, locked, property_id) {
        Ok(lock) => {
            println!("Lock created and verified:");
            println!("{}", lock.line());
        }
        Err(e) => eprintln!("Failed to create lock: {}", e),
    }
    Ok(())
}

/// Create one token and look it up again by code
fn run_create_token(client: &ApiClient, request: &TokenRequest) -> anyhow::Result<()> {
    eprintln!("Creating token '{}' for lock {}...", request.code, request.lock_id);
    match Inventory::new(client).create_token(request) {
        Ok(Some(token)) => {
            println!("Token created and verified:");
            println!("{}", token_line(&token, SystemClock.now()));
        }
        Ok(None) => eprintln!("Token created, but code '{}' was not found in the token list.", request.code),
        Err(e) => eprintln!("Failed to create token: {}", e),
    }
    Ok(())
}

/// List locks, then optionally show one
fn run_locks(config: &AppConfig, client: &ApiClient, id: Option<RemoteId>) -> anyhow::Result<()> {
    let inventory = Inventory::new(client);
    let id = match id {
        Some(id) => id,
        None => {
            match inventory.list_locks() {
                Ok(locks) => print!("{}", render_locks(&locks)),
                Err(e) => {
                    eprintln!("Failed to list locks: {}", e);
                    return Ok(());
                }
            }
            if !(config.prompt && prompt_yes_no("Show a specific lock?")?) {
                return Ok(());
            }
            let text = prompt_line("Lock ID:")?;
            if text.is_empty() {
                return Ok(());
            }
            match text.parse::<RemoteId>() {
                Ok(id) => id,
                Err(_) => {
                    eprintln!("Invalid lock id: '{}'", text);
                    return Ok(());
                }
            }
        }
    };

    match inventory.get_lock(id) {
        Ok(lock) => println!("{}", lock.line()),
        Err(e) => eprintln!("Failed to get lock {}: {}", id, e),
    }
    Ok(())
}

/// List tokens, then optionally show one by code
fn run_tokens(config: &AppConfig, client: &ApiClient, code: Option<&str>) -> anyhow::Result<()> {
    let inventory = Inventory::new(client);
    let now = SystemClock.now();
    let code = match code {
        Some(code) => Some(code.to_string()),
        None => {
            match inventory.list_tokens() {
                Ok(tokens) => print!("{}", render_tokens(&tokens, now)),
                Err(e) => {
                    eprintln!("Failed to list tokens: {}", e);
                    return Ok(());
                }
            }
            if config.prompt && prompt_yes_no("Show a specific token?")? {
                Some(prompt_line("Token code:")?)
            } else {
                None
            }
        }
    };

    if let Some(code) = code.filter(|code| !code.is_empty()) {
        match inventory.find_token_by_code(&code) {
            Ok(Some(token)) => println!("{}", token_line(&token, now)),
            Ok(None) => eprintln!("No token with code '{}'.", code),
            Err(e) => eprintln!("Failed to look up token '{}': {}", code, e),
        }
    }
    Ok(())
}

fn prompt_line(question: &str) -> anyhow::Result<String> {
    eprint!("{} ", question);
    io::stderr().flush().context("failed to flush prompt")?;
    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer).context("failed to read answer")?;
    Ok(answer.trim().to_string())
}

fn prompt_yes_no(question: &str) -> anyhow::Result<bool> {
    let answer = prompt_line(&format!("{} (y/n)", question))?;
    Ok(matches!(answer.to_lowercase().as_str(), "y" | "yes" | "s" | "si" | "sí"))
}

/// Print startup banner and configuration summary
fn print_startup_banner(config: &AppConfig) {
    eprintln!("Access Scenario Provisioner");
    eprintln!("===========================");
    eprintln!("Seeds the management API with an owner, guests, properties, locks and access");
    eprintln!();

    print_configuration_summary(config);
}

/// Print configuration summary
fn print_configuration_summary(config: &AppConfig) {
    let scenario = &config.scenario;
    eprintln!("Configuration:");
    eprintln!("  Base URL: {}", config.base_url);
    match config.timeout_secs {
        Some(secs) => eprintln!("  Timeout: {}s", secs),
        None => eprintln!("  Timeout: none"),
    }
    eprintln!("  Output Format: {}", config.output_format);
    eprintln!("\nScenario:");
    match &scenario.owner {
        Some(owner) => eprintln!("  Owner: {} <{}>", owner.name, owner.email),
        None => eprintln!("  Owner: none"),
    }
    eprintln!("  Guests: {}", scenario.guests.len());
    eprintln!("  Properties: {}", scenario.properties.len());
    eprintln!("  Locks: {}", scenario.lock_count());
    eprintln!("  Access Grants: {}", scenario.accesses.len());
    eprintln!("  Tokens: {}", scenario.tokens.len());
    eprintln!();
}
