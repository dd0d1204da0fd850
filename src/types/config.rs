//! Configuration structures for the access scenario provisioner
//!
//! This module contains the command line arguments, the optional JSON configuration
//! file, and the scenario definition that drives a provisioning run. Configuration is
//! layered: defaults, then the configuration file, then command line arguments.

use super::OutputFormat;
use crate::api::endpoints::DEFAULT_BASE_URL;
use crate::api::UserPayload;
use crate::schedule::{format_instant, parse_instant, AccessWindow, Bound, Clock, SystemClock, WindowError};
use crate::entities::WindowText;
use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Scenario defaults taken from the demo data set
pub mod defaults {
    /// Default access window length in days
    pub const WINDOW_DAYS: i64 = 30;

    /// Default maximum token uses
    pub const TOKEN_MAX_USES: u32 = 5;

    /// Fixed token code used by the demo scenario
    pub const TOKEN_CODE: &str = "TOKEN123456";

    /// Model used by `create-lock` when none is given
    pub const LOCK_MODEL: &str = "Smart Lock Pro";
}

/// Command line arguments structure
#[derive(Debug, Clone, Parser)]
#[command(
    name = "access-scenario-provisioner",
    version,
    about = "Access Scenario Provisioner - Seeds a smart-lock management API with demo data",
    long_about = "Creates an owner, guests, properties, locks, access grants and access tokens against a smart-lock management API, in dependency order, and prints a summary of what exists afterwards.

EXAMPLES:
    # Provision the built-in demo scenario
    access-scenario-provisioner

    # Provision a scenario from a configuration file
    access-scenario-provisioner --config scenario.json

    # Generate a configuration template
    access-scenario-provisioner --print-config > scenario.json

    # List locks, then inspect one
    access-scenario-provisioner locks --id 3

    # Create a token for lock 1 and verify it
    access-scenario-provisioner create-token --lock-id 1 --code 123456

CONFIGURATION:
    Configuration can be provided via:
    1. Command line arguments (highest priority)
    2. Configuration file (--config flag)
    3. Default values (lowest priority)

    Supported configuration file formats: JSON (.json)"
)]
pub struct CliArgs {
    /// Configuration file path (JSON format)
    #[arg(short, long, global = true, help = "Configuration file path (JSON format)")]
    pub config: Option<String>,

    /// Base URL of the management API
    #[arg(
        long,
        global = true,
        help = "Base URL of the management API",
        long_help = "Base URL every request path is appended to. Default: http://localhost:8080/api"
    )]
    pub base_url: Option<String>,

    /// Global request timeout in seconds
    #[arg(long, global = true, help = "Request timeout in seconds (default: none)")]
    pub timeout_secs: Option<u64>,

    /// Report output format
    #[arg(long, global = true, help = "Report output format (text or json)")]
    pub output_format: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    /// Enable debug logging
    #[arg(short, long, global = true, help = "Enable debug logging")]
    pub debug: bool,

    /// Validate configuration without contacting the API
    #[arg(long, help = "Validate configuration without contacting the API")]
    pub dry_run: bool,

    /// Print the default configuration and exit
    #[arg(long, help = "Print default configuration in JSON format and exit")]
    pub print_config: bool,

    /// Never ask interactive follow-up questions
    #[arg(long, global = true, help = "Do not prompt for follow-up queries")]
    pub no_prompt: bool,

    /// Operation to run; provisions the scenario when omitted
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Operations offered by the binary
#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Provision the configured scenario
    Provision,

    /// Create a single lock and read it back
    CreateLock {
        /// Lock model
        #[arg(long, default_value = defaults::LOCK_MODEL)]
        model: String,
        /// Create the lock unlocked
        #[arg(long)]
        unlocked: bool,
        /// Property to install the lock in; unassigned when omitted
        #[arg(long)]
        property_id: Option<i64>,
    },

    /// Create a single token and look it up by code
    CreateToken {
        /// Lock the token opens
        #[arg(long)]
        lock_id: i64,
        /// Token code; a random six-digit code when omitted
        #[arg(long)]
        code: Option<String>,
        /// Maximum uses, 0 for unlimited
        #[arg(long, default_value_t = defaults::TOKEN_MAX_USES)]
        max_uses: u32,
        /// Expiry instant, e.g. 2025-12-31T23:59:59
        #[arg(long)]
        expires_at: Option<String>,
    },

    /// List locks, or show one by id
    Locks {
        /// Lock id to show
        #[arg(long)]
        id: Option<i64>,
    },

    /// List tokens, or show one by code
    Tokens {
        /// Token code to show
        #[arg(long)]
        code: Option<String>,
    },
}

/// Owner or guest definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSpec {
    /// Display name
    pub name: String,
    /// Unique email, used to find the account again after a conflict
    pub email: String,
    /// Phone number
    pub phone: String,
    /// Plaintext password
    pub credential: String,
}

impl UserSpec {
    /// Create a user definition
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
        credential: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            phone: phone.into(),
            credential: credential.into(),
        }
    }

    /// Registration body for this user
    pub fn to_payload(&self) -> UserPayload {
        UserPayload {
            name: self.name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            credential: self.credential.clone(),
        }
    }
}

fn default_locked() -> bool {
    true
}

/// Lock definition, nested in its property
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockSpec {
    /// Scenario-local key that accesses and tokens refer to
    pub key: String,
    /// Hardware model
    pub model: String,
    /// Initial locked state
    #[serde(default = "default_locked")]
    pub locked: bool,
}

/// Property definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertySpec {
    /// Display name
    pub name: String,
    /// Street address
    pub address: String,
    /// Locks installed in the property
    #[serde(default)]
    pub locks: Vec<LockSpec>,
}

fn default_window_days() -> i64 {
    defaults::WINDOW_DAYS
}

/// Access window definition.
///
/// A missing start means today at midnight; a missing end means `duration_days`
/// after the start.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowSpec {
    /// Explicit start
    #[serde(default)]
    pub start: Option<String>,
    /// Explicit end
    #[serde(default)]
    pub end: Option<String>,
    /// Length used when no end is given
    #[serde(default = "default_window_days")]
    pub duration_days: i64,
}

impl Default for WindowSpec {
    fn default() -> Self {
        Self { start: None, end: None, duration_days: defaults::WINDOW_DAYS }
    }
}

impl WindowSpec {
    /// Resolve the window against the clock
    pub fn resolve(&self, clock: &dyn Clock) -> Result<AccessWindow, WindowError> {
        let start = match &self.start {
            Some(text) => parse_instant(text, Bound::Start)
                .ok_or_else(|| WindowError::Unparseable { bound: "start", value: text.clone() })?,
            None => clock.today(),
        };
        match &self.end {
            Some(text) => {
                let end = parse_instant(text, Bound::End)
                    .ok_or_else(|| WindowError::Unparseable { bound: "end", value: text.clone() })?;
                AccessWindow::new(start, end)
            }
            None => AccessWindow::starting_at(start, self.duration_days),
        }
    }

    /// Resolve the window and render it in wire format
    pub fn resolve_text(&self, clock: &dyn Clock) -> Result<WindowText, WindowError> {
        let window = self.resolve(clock)?;
        Ok(WindowText { start: format_instant(window.start), end: format_instant(window.end) })
    }
}

/// Access grant definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessSpec {
    /// Email of the guest receiving access
    pub guest_email: String,
    /// Key of the lock being granted
    pub lock_key: String,
    /// Validity window
    #[serde(default)]
    pub window: WindowSpec,
}

fn default_max_uses() -> u32 {
    defaults::TOKEN_MAX_USES
}

/// Access token definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenSpec {
    /// Key of the lock the token opens
    pub lock_key: String,
    /// Display code; random six digits when omitted
    #[serde(default)]
    pub code: Option<String>,
    /// Maximum uses, 0 for unlimited
    #[serde(default = "default_max_uses")]
    pub max_uses: u32,
    /// Uses already consumed
    #[serde(default)]
    pub current_uses: u32,
    /// Expiry instant; omitted from the request when absent
    #[serde(default)]
    pub expires_at: Option<String>,
}

/// Complete scenario definition.
///
/// Fields missing from a configuration file are empty, so a file can describe an
/// owner with properties only, or a guest only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioConfig {
    /// Property owner; required when properties are defined
    #[serde(default)]
    pub owner: Option<UserSpec>,
    /// Guests
    #[serde(default)]
    pub guests: Vec<UserSpec>,
    /// Properties with their locks
    #[serde(default)]
    pub properties: Vec<PropertySpec>,
    /// Access grants
    #[serde(default)]
    pub accesses: Vec<AccessSpec>,
    /// Access tokens
    #[serde(default)]
    pub tokens: Vec<TokenSpec>,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            owner: Some(UserSpec::new("Carlos Ruiz", "carlos@email.com", "600111222", "abc123")),
            guests: vec![UserSpec::new("Ana García", "ana@email.com", "600333444", "password123")],
            properties: vec![PropertySpec {
                name: "Casa de Madrid".to_string(),
                address: "Calle del Sol 12, Madrid".to_string(),
                locks: vec![LockSpec {
                    key: "front-door".to_string(),
                    model: "Smart Lock X1000".to_string(),
                    locked: true,
                }],
            }],
            accesses: vec![AccessSpec {
                guest_email: "ana@email.com".to_string(),
                lock_key: "front-door".to_string(),
                window: WindowSpec::default(),
            }],
            tokens: vec![TokenSpec {
                lock_key: "front-door".to_string(),
                code: Some(defaults::TOKEN_CODE.to_string()),
                max_uses: defaults::TOKEN_MAX_USES,
                current_uses: 0,
                expires_at: None,
            }],
        }
    }
}

impl ScenarioConfig {
    /// Scenario with no records at all
    pub fn empty() -> Self {
        Self {
            owner: None,
            guests: Vec::new(),
            properties: Vec::new(),
            accesses: Vec::new(),
            tokens: Vec::new(),
        }
    }

    /// Total number of locks across all properties
    pub fn lock_count(&self) -> usize {
        self.properties.iter().map(|p| p.locks.len()).sum()
    }

    /// Validate references and windows
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.owner.is_none() && !self.properties.is_empty() {
            return Err(ConfigValidationError::MissingOwner);
        }

        let mut emails = HashSet::new();
        for user in self.owner.iter().chain(self.guests.iter()) {
            if user.email.trim().is_empty() {
                return Err(ConfigValidationError::EmptyField {
                    field: format!("email of user '{}'", user.name),
                });
            }
            if !emails.insert(user.email.as_str()) {
                return Err(ConfigValidationError::DuplicateEmail(user.email.clone()));
            }
        }

        let mut lock_keys = HashSet::new();
        for lock in self.properties.iter().flat_map(|p| p.locks.iter()) {
            if !lock_keys.insert(lock.key.as_str()) {
                return Err(ConfigValidationError::DuplicateLockKey(lock.key.clone()));
            }
        }

        let guest_emails: HashSet<&str> = self.guests.iter().map(|g| g.email.as_str()).collect();
        for access in &self.accesses {
            if !guest_emails.contains(access.guest_email.as_str()) {
                return Err(ConfigValidationError::UnknownGuest(access.guest_email.clone()));
            }
            if !lock_keys.contains(access.lock_key.as_str()) {
                return Err(ConfigValidationError::UnknownLock(access.lock_key.clone()));
            }
            Self::validate_window(&access.window)?;
        }

        for token in &self.tokens {
            if !lock_keys.contains(token.lock_key.as_str()) {
                return Err(ConfigValidationError::UnknownLock(token.lock_key.clone()));
            }
            if token.code.as_deref().is_some_and(|c| c.trim().is_empty()) {
                return Err(ConfigValidationError::EmptyField {
                    field: format!("code of token for lock '{}'", token.lock_key),
                });
            }
            if let Some(expiry) = &token.expires_at {
                if parse_instant(expiry, Bound::End).is_none() {
                    return Err(ConfigValidationError::InvalidWindow(WindowError::Unparseable {
                        bound: "end",
                        value: expiry.clone(),
                    }));
                }
            }
        }

        Ok(())
    }

    fn validate_window(window: &WindowSpec) -> Result<(), ConfigValidationError> {
        if window.duration_days < 0 {
            return Err(ConfigValidationError::NegativeDuration(window.duration_days));
        }
        let start = match &window.start {
            Some(text) => Some(parse_instant(text, Bound::Start).ok_or_else(|| {
                WindowError::Unparseable { bound: "start", value: text.clone() }
            })?),
            None => None,
        };
        let end = match &window.end {
            Some(text) => Some(parse_instant(text, Bound::End).ok_or_else(|| {
                WindowError::Unparseable { bound: "end", value: text.clone() }
            })?),
            None => None,
        };
        match (start, end) {
            (Some(start), Some(end)) => {
                AccessWindow::new(start, end)?;
            }
            // Relative windows are checked from today
            (start, None) => {
                AccessWindow::starting_at(start.unwrap_or_else(|| SystemClock.today()), window.duration_days)?;
            }
            (None, Some(_)) => {}
        }
        Ok(())
    }
}

/// Configuration file structure (allows partial configuration)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ConfigFile {
    /// Base URL of the management API
    pub base_url: Option<String>,

    /// Global request timeout in seconds
    pub timeout_secs: Option<u64>,

    /// Report output format
    pub output_format: Option<String>,

    /// Scenario to provision
    pub scenario: Option<ScenarioConfig>,
}

/// Effective configuration for a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Base URL of the management API
    pub base_url: String,

    /// Global request timeout in seconds; none by default
    pub timeout_secs: Option<u64>,

    /// Report output format
    pub output_format: OutputFormat,

    /// Whether interactive prompts are allowed
    pub prompt: bool,

    /// Scenario to provision
    pub scenario: ScenarioConfig,
}

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Configuration file not found
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    /// Configuration file read error
    #[error("Failed to read configuration file: {0}")]
    ReadError(#[from] std::io::Error),

    /// JSON parsing error
    #[error("Failed to parse JSON configuration: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Unsupported configuration file format
    #[error("Unsupported configuration file format: {0} (supported: .json)")]
    UnsupportedFormat(String),

    /// Unknown report output format
    #[error("Unsupported output format: {0} (supported: text, json)")]
    UnsupportedOutputFormat(String),
}

/// Validation errors for the effective configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    /// Base URL is not an http(s) URL
    #[error("Base URL must start with http:// or https://, got '{0}'")]
    InvalidBaseUrl(String),

    /// Properties were defined without an owner
    #[error("Scenario defines properties but no owner")]
    MissingOwner,

    /// A required text field is empty
    #[error("Empty value for {field}")]
    EmptyField {
        /// Description of the empty field
        field: String,
    },

    /// Two users share an email
    #[error("Email '{0}' is used by more than one user")]
    DuplicateEmail(String),

    /// Two locks share a key
    #[error("Lock key '{0}' is defined more than once")]
    DuplicateLockKey(String),

    /// An access refers to a guest that is not defined
    #[error("Access refers to unknown guest '{0}'")]
    UnknownGuest(String),

    /// An access or token refers to a lock that is not defined
    #[error("Reference to unknown lock key '{0}'")]
    UnknownLock(String),

    /// Window length is negative
    #[error("Window duration must not be negative, got {0} days")]
    NegativeDuration(i64),

    /// Window bounds are unparseable or inverted
    #[error("Invalid access window: {0}")]
    InvalidWindow(#[from] WindowError),
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: None,
            output_format: OutputFormat::Text,
            prompt: true,
            scenario: ScenarioConfig::default(),
        }
    }
}

impl AppConfig {
    /// Create configuration from parsed CLI arguments
    pub fn from_cli_args(args: &CliArgs) -> Result<Self, ConfigError> {
        // Start with default configuration
        let mut config = Self::default();

        // Load from config file if specified
        if let Some(config_path) = &args.config {
            config = Self::from_file(config_path)?;
        }

        // Override with command line arguments (CLI takes precedence)
        Self::apply_cli_overrides(&mut config, args)?;

        Ok(config)
    }

    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()));
        }

        let content = fs::read_to_string(path)?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => {
                let config_file: ConfigFile = serde_json::from_str(&content)?;
                Self::from_config_file(config_file)
            }
            Some(ext) => Err(ConfigError::UnsupportedFormat(ext.to_string())),
            None => Err(ConfigError::UnsupportedFormat("no extension".to_string())),
        }
    }

    /// Create configuration from a config file, merging with defaults
    fn from_config_file(config_file: ConfigFile) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let output_format = match config_file.output_format {
            Some(format) => format.parse().map_err(|_| ConfigError::UnsupportedOutputFormat(format))?,
            None => defaults.output_format,
        };

        Ok(Self {
            base_url: config_file.base_url.unwrap_or(defaults.base_url),
            timeout_secs: config_file.timeout_secs.or(defaults.timeout_secs),
            output_format,
            prompt: defaults.prompt,
            scenario: config_file.scenario.unwrap_or(defaults.scenario),
        })
    }

    /// Apply CLI argument overrides to configuration
    fn apply_cli_overrides(config: &mut Self, args: &CliArgs) -> Result<(), ConfigError> {
        if let Some(value) = &args.base_url {
            config.base_url = value.clone();
        }
        if let Some(value) = args.timeout_secs {
            config.timeout_secs = Some(value);
        }
        if let Some(value) = &args.output_format {
            config.output_format = value
                .parse()
                .map_err(|_| ConfigError::UnsupportedOutputFormat(value.clone()))?;
        }
        if args.no_prompt {
            config.prompt = false;
        }
        Ok(())
    }

    /// Print configuration as a JSON configuration file
    pub fn print_json(&self) -> Result<String, ConfigError> {
        let file = ConfigFile {
            base_url: Some(self.base_url.clone()),
            timeout_secs: self.timeout_secs,
            output_format: Some(self.output_format.to_string()),
            scenario: Some(self.scenario.clone()),
        };
        Ok(serde_json::to_string_pretty(&file)?)
    }

    /// Validate the configuration parameters
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        let base_url = self.base_url.trim();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ConfigValidationError::InvalidBaseUrl(self.base_url.clone()));
        }
        self.scenario.validate()
    }
}
