//! Logging and tracing configuration
//!
//! Logs always go to stderr so that the scenario report on stdout stays clean. A daily
//! rolling JSON log file can be added on top.

use std::io;
use tracing::{info, Level};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::{non_blocking, rolling};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Layer, Registry,
};

type InitResult = Result<LoggingGuard, Box<dyn std::error::Error + Send + Sync>>;

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Log level for the crate
    pub level: Level,
    /// Whether to format console output as JSON
    pub json_format: bool,
    /// Log file directory; file logging is off when `None`
    pub log_directory: Option<String>,
    /// Log file prefix
    pub log_file_prefix: String,
    /// Whether to log span open/close events
    pub enable_span_events: bool,
    /// Whether to use ANSI colors on the console
    pub enable_ansi: bool,
    /// Custom environment filter, overriding `RUST_LOG`
    pub env_filter: Option<String>,
}

/// Keeps the non-blocking file writer flushing until dropped
#[derive(Debug, Default)]
pub struct LoggingGuard {
    _file: Option<WorkerGuard>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Level::WARN,
            json_format: false,
            log_directory: None,
            log_file_prefix: "access-scenario-provisioner".to_string(),
            enable_span_events: false,
            enable_ansi: true,
            env_filter: None,
        }
    }
}

impl LoggingConfig {
    /// Create a new logging configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the log level
    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Enable JSON console output
    pub fn with_json_format(mut self) -> Self {
        self.json_format = true;
        self
    }

    /// Also write JSON logs to a daily rolling file in `directory`
    pub fn with_file_logging(mut self, directory: impl Into<String>) -> Self {
        self.log_directory = Some(directory.into());
        self
    }

    /// Set log file prefix
    pub fn with_file_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.log_file_prefix = prefix.into();
        self
    }

    /// Enable span events
    pub fn with_span_events(mut self) -> Self {
        self.enable_span_events = true;
        self
    }

    /// Disable ANSI colors
    pub fn without_ansi(mut self) -> Self {
        self.enable_ansi = false;
        self
    }

    /// Set custom environment filter
    pub fn with_env_filter(mut self, filter: impl Into<String>) -> Self {
        self.env_filter = Some(filter.into());
        self
    }

    /// Filter directive used when neither a custom filter nor `RUST_LOG` is set
    pub fn default_directive(&self) -> String {
        format!("{}={}", env!("CARGO_PKG_NAME").replace('-', "_"), self.level)
    }

    fn span_events(&self) -> FmtSpan {
        if self.enable_span_events {
            FmtSpan::NEW | FmtSpan::CLOSE
        } else {
            FmtSpan::NONE
        }
    }

    /// Initialize the global tracing subscriber.
    ///
    /// The returned guard must be held for as long as file logging should flush.
    pub fn init(self) -> InitResult {
        let env_filter = match &self.env_filter {
            Some(filter) => EnvFilter::try_new(filter)?,
            None => EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(self.default_directive())),
        };

        let console = if self.json_format {
            fmt::layer()
                .json()
                .with_writer(io::stderr)
                .with_span_events(self.span_events())
                .boxed()
        } else {
            fmt::layer()
                .with_writer(io::stderr)
                .with_ansi(self.enable_ansi)
                .with_target(false)
                .with_span_events(self.span_events())
                .boxed()
        };

        let mut guard = LoggingGuard::default();
        let file = match &self.log_directory {
            Some(directory) => {
                let appender = rolling::daily(directory, &self.log_file_prefix);
                let (writer, file_guard) = non_blocking(appender);
                guard._file = Some(file_guard);
                Some(
                    fmt::layer()
                        .json()
                        .with_writer(writer)
                        .with_span_events(self.span_events())
                        .boxed(),
                )
            }
            None => None,
        };

        Registry::default().with(env_filter).with(console).with(file).try_init()?;

        info!(level = %self.level, json = self.json_format, "Logging initialized");
        Ok(guard)
    }

    /// Initialize logging for the given CLI verbosity flags
    pub fn init_for_cli(verbose: bool, debug: bool) -> InitResult {
        let level = if debug {
            Level::DEBUG
        } else if verbose {
            Level::INFO
        } else {
            Level::WARN
        };
        let config = Self::new().with_level(level);
        if debug {
            config.with_span_events().init()
        } else {
            config.init()
        }
    }

    /// Initialize logging for testing (minimal output)
    pub fn init_test() -> InitResult {
        Self::new().with_level(Level::WARN).without_ansi().init()
    }
}

/// Structured log event tagged with the provisioning component
#[macro_export]
macro_rules! provision_event {
    ($level:ident, $message:expr, $($key:ident = $value:expr),* $(,)?) => {
        tracing::$level!(
            message = $message,
            component = "provisioning",
            $($key = $value,)*
        );
    };
    ($level:ident, $message:expr) => {
        tracing::$level!(
            message = $message,
            component = "provisioning",
        );
    };
}
