//! # dnslookup Resolver
//!
//! Iterative DNS resolution starting from a caller-supplied root server.
//!
//! ## Features
//!
//! - Raw UDP transport with a per-attempt timeout, one retransmission and
//!   transaction ID filtering
//! - Delegation walk from the root, resolving nameserver addresses from the
//!   root when a referral carries no glue
//! - CNAME chasing with a bounded indirection level
//! - A per-walk referral budget so delegation loops always terminate

use dnslookup_proto::ResourceRecord;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

pub mod recursive;
pub mod transport;

pub use recursive::{RecursiveResolver, ResolverMetrics};
pub use transport::{Transport, UdpTransport};

/// Resolver error.
#[derive(Error, Debug)]
pub enum ResolverError {
    #[error("Timeout")]
    Timeout,

    #[error("Network error: {0}")]
    Network(#[from] std::io::Error),

    #[error("Protocol error: {0}")]
    Protocol(#[from] dnslookup_proto::Error),

    #[error("Maximum number of indirection levels reached")]
    IndirectionExceeded,

    #[error("Maximum referral depth exceeded")]
    ReferralDepthExceeded,
}

/// Result type for resolver operations.
pub type Result<T> = std::result::Result<T, ResolverError>;

/// Resolver configuration.
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// Destination port for every server.
    pub port: u16,

    /// How long to wait for each attempt.
    pub timeout: Duration,

    /// Retransmissions after the first attempt times out.
    pub retries: u32,

    /// Maximum CNAME indirection level.
    pub max_indirection: usize,

    /// Maximum number of servers queried by one walk from the root.
    pub max_referral_depth: usize,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            port: dnslookup_proto::DNS_PORT,
            timeout: Duration::from_secs(5),
            retries: 1,
            max_indirection: 10,
            max_referral_depth: 30,
        }
    }
}

/// Outcome of a top-level lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The node resolved to these records.
    Records(Vec<ResourceRecord>),

    /// Delegation ended without an answer.
    NoAnswer,

    /// The CNAME chain was longer than the indirection bound.
    IndirectionExceeded,

    /// No answer, and at least one server sent an undecodable response.
    Malformed,
}

impl Resolution {
    /// Returns the resolved records; empty for every failure.
    pub fn records(&self) -> &[ResourceRecord] {
        match self {
            Self::Records(records) => records,
            _ => &[],
        }
    }

    /// Consumes the outcome, returning its records.
    pub fn into_records(self) -> Vec<ResourceRecord> {
        match self {
            Self::Records(records) => records,
            _ => Vec::new(),
        }
    }

    /// Returns true if records were found.
    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Records(_))
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Records(records) => write!(f, "{} record(s)", records.len()),
            Self::NoAnswer => f.write_str("no answer"),
            Self::IndirectionExceeded => f.write_str("indirection limit reached"),
            Self::Malformed => f.write_str("malformed response"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    #[test]
    fn test_default_config() {
        let config = ResolverConfig::default();
        assert_eq!(config.port, 53);
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.retries, 1);
        assert_eq!(config.max_indirection, 10);
    }

    #[test]
    fn test_failures_have_no_records() {
        let record = ResourceRecord::a("example.com", 60, Ipv4Addr::LOCALHOST);
        let resolved = Resolution::Records(vec![record.clone()]);

        assert!(resolved.is_resolved());
        assert_eq!(resolved.records(), [record]);

        for failure in [
            Resolution::NoAnswer,
            Resolution::IndirectionExceeded,
            Resolution::Malformed,
        ] {
            assert!(!failure.is_resolved());
            assert!(failure.records().is_empty());
        }
    }
}
