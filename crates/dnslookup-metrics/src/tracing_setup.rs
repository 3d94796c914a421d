//! Tracing and logging setup.

use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use thiserror::Error;
use tracing::Level;
use tracing_subscriber::{
    filter::ParseError,
    fmt,
    layer::SubscriberExt,
    reload,
    util::{SubscriberInitExt, TryInitError},
    EnvFilter, Registry,
};

/// Crates raised to `trace` while verbose tracing is on.
const VERBOSE_TARGETS: [&str; 3] = ["dnslookup_resolver", "dnslookup_proto", "dnslookup_cache"];

/// Logging setup error.
#[derive(Error, Debug)]
pub enum LogError {
    #[error("Invalid filter directive: {0}")]
    Filter(#[from] ParseError),

    #[error("Failed to reload filter: {0}")]
    Reload(#[from] reload::Error),

    #[error("Failed to install subscriber: {0}")]
    Init(#[from] TryInitError),

    #[error("Unknown log format '{0}'")]
    UnknownFormat(String),
}

/// Logging configuration.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Log level.
    pub level: Level,

    /// Log format ("text" or "json").
    pub format: LogFormat,
}

/// Log format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable text format.
    Text,

    /// JSON format.
    Json,
}

impl FromStr for LogFormat {
    type Err = LogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(LogError::UnknownFormat(s.to_string())),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: Level::WARN,
            format: LogFormat::Text,
        }
    }
}

/// Runtime switch for verbose resolution tracing.
pub struct TraceToggle {
    handle: reload::Handle<EnvFilter, Registry>,
    base: String,
    verbose: AtomicBool,
}

impl TraceToggle {
    /// Turns verbose tracing on or off.
    pub fn set_verbose(&self, verbose: bool) -> Result<(), LogError> {
        let filter = EnvFilter::try_new(filter_directives(&self.base, verbose))?;
        self.handle.reload(filter)?;
        self.verbose.store(verbose, Ordering::Relaxed);
        Ok(())
    }

    /// Returns true while verbose tracing is on.
    pub fn is_verbose(&self) -> bool {
        self.verbose.load(Ordering::Relaxed)
    }
}

/// Builds the filter string, appending trace directives when verbose.
fn filter_directives(base: &str, verbose: bool) -> String {
    if !verbose {
        return base.to_string();
    }

    let mut directives = base.to_string();
    for target in VERBOSE_TARGETS {
        directives.push_str(&format!(",{target}=trace"));
    }
    directives
}

/// Initializes the tracing subscriber, writing to stderr.
///
/// `RUST_LOG`, when set, replaces the configured level as the base filter.
pub fn init_tracing(config: &LogConfig) -> Result<TraceToggle, LogError> {
    let base = std::env::var(EnvFilter::DEFAULT_ENV)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| config.level.to_string().to_ascii_lowercase());

    let (filter, handle) = reload::Layer::new(EnvFilter::try_new(&base)?);

    match config.format {
        LogFormat::Text => {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .with_writer(std::io::stderr)
                        .with_target(true),
                )
                .try_init()?;
        }
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .json()
                        .with_writer(std::io::stderr)
                        .with_target(true),
                )
                .try_init()?;
        }
    }

    Ok(TraceToggle {
        handle,
        base,
        verbose: AtomicBool::new(false),
    })
}
