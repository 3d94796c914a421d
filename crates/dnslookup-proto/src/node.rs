//! Resolution keys.

use crate::rtype::RecordType;
use std::fmt;

/// A (host name, record type) pair: the key of a lookup and of the cache.
///
/// Host names are ASCII-lowercased and stored without a trailing dot, so
/// `WWW.Example.COM.` and `www.example.com` name the same node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Node {
    host_name: String,
    record_type: RecordType,
}

impl Node {
    /// Creates a node, normalising the host name.
    pub fn new(host_name: impl AsRef<str>, record_type: RecordType) -> Self {
        let host_name = host_name.as_ref();
        let host_name = host_name.strip_suffix('.').unwrap_or(host_name);
        Self {
            host_name: host_name.to_ascii_lowercase(),
            record_type,
        }
    }

    /// Returns the host name.
    #[inline]
    pub fn host_name(&self) -> &str {
        &self.host_name
    }

    /// Returns the record type.
    #[inline]
    pub fn record_type(&self) -> RecordType {
        self.record_type
    }

    /// Returns the node for the same host with a different type.
    pub fn with_type(&self, record_type: RecordType) -> Self {
        Self {
            host_name: self.host_name.clone(),
            record_type,
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.host_name, self.record_type)
    }
}
