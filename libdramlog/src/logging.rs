//! Logging setup shared by the Dramlog binaries
//!
//! Everything is written to stderr; stdout belongs to command output so
//! reports can be piped into `jq` or a spreadsheet.
//!
//! # Examples
//!
//! ```no_run
//! use libdramlog::logging::{LogFormat, LoggingConfig};
//!
//! LoggingConfig::new(LogFormat::Json, "debug".to_string(), false).init();
//! ```
//!
//! Or, honouring `DRAMLOG_LOG_FORMAT` / `DRAMLOG_LOG_LEVEL`:
//!
//! ```no_run
//! libdramlog::logging::init_default();
//! ```

use std::str::FromStr;

use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Plain lines without target, for terminals and pipes
    Text,
    /// One JSON object per line
    Json,
    /// Multi-line colored output with file and line numbers
    Pretty,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            "pretty" => Ok(LogFormat::Pretty),
            _ => Err(format!(
                "Invalid log format: '{}'. Valid options: text, json, pretty",
                s
            )),
        }
    }
}

impl std::fmt::Display for LogFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            LogFormat::Text => "text",
            LogFormat::Json => "json",
            LogFormat::Pretty => "pretty",
        };
        write!(f, "{}", name)
    }
}

pub struct LoggingConfig {
    pub format: LogFormat,
    pub level: String,
    pub verbose: bool,
}

impl LoggingConfig {
    /// * `format` - output format
    /// * `level` - minimum level (error, warn, info, debug, trace) or a full filter directive
    /// * `verbose` - forces debug level regardless of `level` and `RUST_LOG`
    pub fn new(format: LogFormat, level: String, verbose: bool) -> Self {
        Self {
            format,
            level,
            verbose,
        }
    }

    fn filter(&self) -> EnvFilter {
        if self.verbose {
            return EnvFilter::new("debug");
        }
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.level))
    }

    /// Install the global subscriber
    ///
    /// A second call is a no-op; the first subscriber stays installed.
    pub fn init(&self) {
        let filter = self.filter();

        let installed = match self.format {
            LogFormat::Json => tracing_subscriber::fmt()
                .json()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .flatten_event(true)
                .with_target(true)
                .try_init(),
            LogFormat::Pretty => tracing_subscriber::fmt()
                .pretty()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .with_line_number(true)
                .with_file(true)
                .try_init(),
            LogFormat::Text => tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .with_target(false)
                .try_init(),
        };

        if installed.is_err() {
            tracing::debug!("Logging subscriber already installed");
        }
    }
}

/// Initialize logging from `DRAMLOG_LOG_FORMAT` and `DRAMLOG_LOG_LEVEL`
///
/// Falls back to text format at info level.
///
/// ```bash
/// export DRAMLOG_LOG_FORMAT=json
/// export DRAMLOG_LOG_LEVEL=debug
/// dram-report --status completed
/// ```
pub fn init_default() {
    from_env("info", false).init();
}

fn from_env(default_level: &str, verbose: bool) -> LoggingConfig {
    let format = std::env::var("DRAMLOG_LOG_FORMAT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(LogFormat::Text);

    let level = std::env::var("DRAMLOG_LOG_LEVEL").unwrap_or_else(|_| default_level.to_string());

    LoggingConfig::new(format, level, verbose)
}

/// Initialize logging for a command-line tool
///
/// Errors only unless `verbose` is set. `DRAMLOG_LOG_FORMAT` and
/// `DRAMLOG_LOG_LEVEL` are honoured as in [`init_default`]; `verbose` still
/// wins over any configured level.
pub fn init_for_cli(verbose: bool) {
    from_env("error", verbose).init();
}
