//! Cache entry implementation.

use dnslookup_proto::ResourceRecord;
use std::time::{Duration, Instant};

/// A cached record with its expiry.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// The cached record.
    record: ResourceRecord,

    /// When this entry stops being served.
    expires_at: Instant,
}

impl CacheEntry {
    /// Creates an entry inserted at `now`.
    ///
    /// A negative TTL is treated as zero, so such a record is never served.
    pub fn new(record: ResourceRecord, now: Instant) -> Self {
        let ttl = Duration::from_secs(u64::try_from(record.ttl()).unwrap_or(0));
        Self {
            record,
            expires_at: now + ttl,
        }
    }

    /// Returns the cached record.
    pub fn record(&self) -> &ResourceRecord {
        &self.record
    }

    /// Returns true once `now` has reached the expiry.
    pub fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    #[test]
    fn test_expiry() {
        let now = Instant::now();
        let entry = CacheEntry::new(ResourceRecord::a("example.com", 60, Ipv4Addr::LOCALHOST), now);

        assert!(!entry.is_expired(now + Duration::from_secs(59)));
        assert!(entry.is_expired(now + Duration::from_secs(60)));
    }

    #[test]
    fn test_negative_ttl_expires_immediately() {
        let now = Instant::now();
        let entry = CacheEntry::new(ResourceRecord::a("example.com", -1, Ipv4Addr::LOCALHOST), now);

        assert!(entry.is_expired(now));
    }
}
