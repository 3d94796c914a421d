//! Interactive command loop.

use dnslookup_metrics::TraceToggle;
use dnslookup_proto::{Node, RecordType, ResourceRecord};
use dnslookup_resolver::{RecursiveResolver, Resolution, Transport};
use std::io::{Error as IoError, ErrorKind, IsTerminal, Write};
use std::net::IpAddr;
use std::sync::atomic::Ordering;
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info};

const PROMPT: &str = "DNSLOOKUP> ";

/// Types accepted by `lookup`.
const LOOKUP_TYPES: [RecordType; 5] = [
    RecordType::A,
    RecordType::AAAA,
    RecordType::NS,
    RecordType::MX,
    RecordType::CNAME,
];

/// A parsed shell command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Blank line or comment.
    Empty,
    /// Resolve a node and print the result.
    Lookup(Node),
    /// Turn verbose tracing on or off.
    Trace(bool),
    /// Replace the root server.
    Server(String),
    /// Print every live cache entry.
    Dump,
    /// Leave the shell.
    Quit,
}

/// Command line that could not be parsed.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum CommandError {
    #[error("Invalid call. Format:\n\tlookup hostName [type]")]
    LookupUsage,

    #[error("Invalid query type. Must be one of:\n\tA, AAAA, NS, MX, CNAME")]
    QueryType,

    #[error("Invalid call. Format:\n\ttrace on|off")]
    TraceUsage,

    #[error("Invalid call. Format:\n\tserver IP")]
    ServerUsage,

    #[error(
        "Invalid command. Valid commands are:\n\tlookup fqdn [type]\n\ttrace on|off\n\tserver IP\n\tdump\n\tquit"
    )]
    Unknown,
}

impl Command {
    /// Parses one input line. Anything after `#` is ignored.
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        let line = line.split('#').next().unwrap_or_default();
        let args: Vec<&str> = line.split_whitespace().collect();

        let Some((name, args)) = args.split_first() else {
            return Ok(Self::Empty);
        };

        match name.to_ascii_lowercase().as_str() {
            "quit" | "exit" => Ok(Self::Quit),
            "dump" => Ok(Self::Dump),
            "server" => match args {
                [address] => Ok(Self::Server((*address).to_string())),
                _ => Err(CommandError::ServerUsage),
            },
            "trace" => match args {
                [state] if state.eq_ignore_ascii_case("on") => Ok(Self::Trace(true)),
                [state] if state.eq_ignore_ascii_case("off") => Ok(Self::Trace(false)),
                _ => Err(CommandError::TraceUsage),
            },
            "lookup" | "l" => match args {
                [host] => Ok(Self::Lookup(Node::new(host, RecordType::A))),
                [host, rtype] => {
                    let rtype = rtype
                        .parse::<RecordType>()
                        .ok()
                        .filter(|t| LOOKUP_TYPES.contains(t))
                        .ok_or(CommandError::QueryType)?;
                    Ok(Self::Lookup(Node::new(host, rtype)))
                }
                _ => Err(CommandError::LookupUsage),
            },
            _ => Err(CommandError::Unknown),
        }
    }
}

/// Formats the lines printed for a node's records.
///
/// An empty set prints a single placeholder line.
pub fn render_results(node: &Node, records: &[ResourceRecord]) -> Vec<String> {
    if records.is_empty() {
        return vec![result_line(node, -1, "0.0.0.0")];
    }

    records
        .iter()
        .map(|record| result_line(node, record.ttl(), &record.value().to_string()))
        .collect()
}

fn result_line(node: &Node, ttl: i32, value: &str) -> String {
    format!(
        "{:<30} {:<5} {:<8} {}",
        node.host_name(),
        node.record_type(),
        ttl,
        value
    )
}

/// Resolves a server argument: an IPv4 literal or a host name.
///
/// The transport only speaks IPv4, so IPv6 literals are refused.
pub async fn parse_server(input: &str) -> std::io::Result<IpAddr> {
    if let Ok(addr) = input.parse::<IpAddr>() {
        if addr.is_ipv6() {
            return Err(IoError::new(
                ErrorKind::InvalidInput,
                format!("IPv6 servers are not supported: {addr}"),
            ));
        }
        return Ok(addr);
    }

    tokio::net::lookup_host((input, dnslookup_proto::DNS_PORT))
        .await?
        .map(|addr| addr.ip())
        .find(IpAddr::is_ipv4)
        .ok_or_else(|| IoError::new(ErrorKind::NotFound, format!("no IPv4 address for {input}")))
}

/// Runs the command loop until `quit` or end of input.
///
/// The prompt is only shown when stdin is a terminal.
pub async fn run<T: Transport>(
    resolver: &RecursiveResolver<T>,
    toggle: &TraceToggle,
) -> std::io::Result<()> {
    let interactive = std::io::stdin().is_terminal();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        if interactive {
            print!("{PROMPT}");
            std::io::stdout().flush()?;
        }

        let Some(line) = lines.next_line().await? else {
            break;
        };

        match Command::parse(&line) {
            Ok(Command::Quit) => break,
            Ok(command) => execute(resolver, toggle, command).await,
            Err(e) => eprintln!("{e}"),
        }
    }

    log_session_stats(resolver);
    println!("Goodbye!");
    Ok(())
}

fn log_session_stats<T: Transport>(resolver: &RecursiveResolver<T>) {
    let metrics = resolver.metrics();
    let cache = resolver.cache().stats();
    info!(
        lookups = metrics.lookups.load(Ordering::Relaxed),
        cache_answered = metrics.cache_hits.load(Ordering::Relaxed),
        server_queries = metrics.server_queries.load(Ordering::Relaxed),
        failed_exchanges = metrics.failed_exchanges.load(Ordering::Relaxed),
        malformed = metrics.malformed_responses.load(Ordering::Relaxed),
        cache_hit_rate = format!("{:.2}", cache.hit_rate()),
        "Session finished"
    );
}

async fn execute<T: Transport>(
    resolver: &RecursiveResolver<T>,
    toggle: &TraceToggle,
    command: Command,
) {
    match command {
        Command::Empty | Command::Quit => {}
        Command::Lookup(node) => {
            let resolution = resolver.resolve(&node).await;
            debug!(%node, outcome = %resolution, "Lookup finished");

            if resolution == Resolution::IndirectionExceeded {
                eprintln!("Maximum number of indirection levels reached.");
            }
            for line in render_results(&node, resolution.records()) {
                println!("{line}");
            }
        }
        Command::Trace(verbose) => {
            if let Err(e) = toggle.set_verbose(verbose) {
                eprintln!("{e}");
            }
            println!(
                "Verbose tracing is now: {}",
                if toggle.is_verbose() { "ON" } else { "OFF" }
            );
        }
        Command::Server(input) => match parse_server(&input).await {
            Ok(root) => {
                resolver.set_root_server(root);
                println!("Root DNS server is now: {root}");
            }
            Err(e) => println!("Invalid root server ({e})."),
        },
        Command::Dump => {
            resolver.cache().for_each_node(|node, records| {
                for line in render_results(node, records) {
                    println!("{line}");
                }
            });
        }
    }
}
