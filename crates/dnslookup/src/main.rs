//! dnslookup
//!
//! Interactive DNS lookup client that resolves names iteratively, starting
//! from a root server given on the command line.

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use dnslookup_cache::DnsCache;
use dnslookup_config::{Config, ResolverSettings};
use dnslookup_metrics::{init_tracing, LogConfig, LogFormat, TraceToggle};
use dnslookup_resolver::{RecursiveResolver, ResolverConfig, UdpTransport};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{debug, Level};

mod shell;

/// Iterative DNS lookup client
#[derive(Parser, Debug)]
#[command(name = "dnslookup")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short = 'l', long, value_name = "LEVEL")]
    log_level: Option<String>,

    /// Log format (text, json)
    #[arg(long, value_name = "FMT")]
    log_format: Option<String>,

    /// Root DNS server to start every lookup at
    #[arg(value_name = "ROOT_SERVER")]
    root_server: String,
}

/// Parse log level from string
fn parse_log_level(level: &str) -> Level {
    match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "error" => Level::ERROR,
        _ => Level::WARN,
    }
}

/// Loads and validates the configuration file, if one was given.
fn load_config(path: Option<&Path>) -> Result<Config> {
    let config = match path {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("failed to load configuration from {}", path.display()))?,
        None => Config::default(),
    };

    config.validate().context("invalid configuration")?;
    Ok(config)
}

/// Initialize logging/tracing subsystem
fn init_logging(config: &Config, cli: &Cli) -> Result<TraceToggle> {
    let level = parse_log_level(cli.log_level.as_deref().unwrap_or(&config.logging.level));

    let format: LogFormat = cli
        .log_format
        .as_deref()
        .unwrap_or(&config.logging.format)
        .parse()?;

    init_tracing(&LogConfig { level, format }).context("failed to initialize logging")
}

fn resolver_config(settings: &ResolverSettings) -> ResolverConfig {
    ResolverConfig {
        port: settings.port,
        timeout: settings.timeout(),
        retries: settings.retries,
        max_indirection: settings.max_indirection,
        max_referral_depth: settings.max_referral_depth,
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = load_config(cli.config.as_deref())?;
    let toggle = init_logging(&config, &cli)?;

    let root = shell::parse_server(&cli.root_server)
        .await
        .map_err(|e| anyhow!("Invalid root server ({e})."))?;
    println!("Root DNS server is: {root}");

    let settings = resolver_config(&config.resolver);
    debug!(?settings, "Resolver configured");

    let transport = UdpTransport::bind(&settings)
        .await
        .context("failed to bind UDP socket")?;
    let resolver = RecursiveResolver::new(settings, Arc::new(DnsCache::new()), transport, root);

    shell::run(&resolver, &toggle)
        .await
        .context("failed to read commands")
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_cli_parse() {
        let cli = Cli::try_parse_from(["dnslookup", "-l", "debug", "--log-format", "json", "198.41.0.4"])
            .unwrap();

        assert_eq!(cli.root_server, "198.41.0.4");
        assert_eq!(cli.log_level.as_deref(), Some("debug"));
        assert_eq!(cli.log_format.as_deref(), Some("json"));
        assert!(cli.config.is_none());

        assert!(Cli::try_parse_from(["dnslookup"]).is_err());
    }

    #[test]
    fn test_resolver_config_from_settings() {
        let config = Config::from_yaml("resolver: { port: 5353, timeout_ms: 750, max_indirection: 4 }")
            .unwrap();
        let settings = resolver_config(&config.resolver);

        assert_eq!(settings.port, 5353);
        assert_eq!(settings.timeout, std::time::Duration::from_millis(750));
        assert_eq!(settings.retries, 1);
        assert_eq!(settings.max_indirection, 4);
        assert_eq!(settings.max_referral_depth, 30);
    }

    #[test]
    fn test_parse_log_level() {
        assert_eq!(parse_log_level("DEBUG"), Level::DEBUG);
        assert_eq!(parse_log_level("nonsense"), Level::WARN);
    }
}
