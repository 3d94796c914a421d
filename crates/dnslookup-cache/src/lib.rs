//! # dnslookup Record Cache
//!
//! In-memory map from [`Node`] to the records known for it, with TTL-based
//! expiry.
//!
//! Expired records are filtered out lazily when read; nothing is evicted in
//! the background and there is no explicit delete. Inserting a record whose
//! node and value are already cached replaces the old entry, refreshing its
//! TTL.

#![warn(missing_docs)]

use dnslookup_proto::{Node, ResourceRecord};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use tracing::trace;

pub mod entry;

pub use entry::CacheEntry;

/// DNS record cache.
#[derive(Debug, Default)]
pub struct DnsCache {
    entries: RwLock<HashMap<Node, Vec<CacheEntry>>>,
    stats: CacheStats,
}

impl DnsCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a record, stamped with the current time.
    pub fn insert(&self, record: ResourceRecord) {
        self.insert_at(record, Instant::now());
    }

    /// Inserts a record as if it arrived at `now`.
    pub fn insert_at(&self, record: ResourceRecord, now: Instant) {
        trace!(record = %record, "caching record");

        let mut entries = self.entries.write();
        let slot = entries.entry(record.node().clone()).or_default();
        slot.retain(|existing| !existing.record().same_data(&record));
        slot.push(CacheEntry::new(record, now));
    }

    /// Returns the live records for a node.
    pub fn get(&self, node: &Node) -> Vec<ResourceRecord> {
        self.get_at(node, Instant::now())
    }

    /// Returns the records for a node that are still live at `now`.
    pub fn get_at(&self, node: &Node, now: Instant) -> Vec<ResourceRecord> {
        let records: Vec<ResourceRecord> = self
            .entries
            .read()
            .get(node)
            .map(|slot| live_records(slot, now))
            .unwrap_or_default();

        if records.is_empty() {
            self.stats.record_miss();
        } else {
            self.stats.record_hit();
        }

        records
    }

    /// Visits every node that has live records, sorted by host name then type.
    ///
    /// The visitor runs on a snapshot, so it may call back into the cache.
    pub fn for_each_node<F>(&self, mut visitor: F)
    where
        F: FnMut(&Node, &[ResourceRecord]),
    {
        let now = Instant::now();
        let mut snapshot: Vec<(Node, Vec<ResourceRecord>)> = self
            .entries
            .read()
            .iter()
            .map(|(node, slot)| (node.clone(), live_records(slot, now)))
            .filter(|(_, records)| !records.is_empty())
            .collect();

        snapshot.sort_by(|a, b| a.0.cmp(&b.0));

        for (node, records) in &snapshot {
            visitor(node, records);
        }
    }

    /// Returns the number of stored entries, expired ones included.
    pub fn len(&self) -> usize {
        self.entries.read().values().map(Vec::len).sum()
    }

    /// Returns true if nothing has been stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Removes everything.
    pub fn clear(&self) {
        self.entries.write().clear();
    }

    /// Returns cache statistics.
    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }
}

fn live_records(slot: &[CacheEntry], now: Instant) -> Vec<ResourceRecord> {
    slot.iter()
        .filter(|entry| !entry.is_expired(now))
        .map(|entry| entry.record().clone())
        .collect()
}

/// Cache statistics.
#[derive(Debug, Default)]
pub struct CacheStats {
    hits: AtomicU64,
    misses: AtomicU64,
}

impl CacheStats {
    fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    /// Reads that returned at least one record.
    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    /// Reads that returned nothing.
    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }

    /// Fraction of reads that were hits.
    pub fn hit_rate(&self) -> f64 {
        let hits = self.hits();
        let total = hits + self.misses();
        if total == 0 {
            0.0
        } else {
            hits as f64 / total as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dnslookup_proto::RecordType;
    use std::net::Ipv4Addr;
    use std::time::Duration;

    fn a_record(host: &str, ttl: i32, last: u8) -> ResourceRecord {
        ResourceRecord::a(host, ttl, Ipv4Addr::new(192, 0, 2, last))
    }

    #[test]
    fn test_ttl_expiry() {
        let cache = DnsCache::new();
        let node = Node::new("example.com", RecordType::A);
        let t0 = Instant::now();

        cache.insert_at(a_record("example.com", 30, 1), t0);

        assert_eq!(cache.get_at(&node, t0 + Duration::from_secs(29)).len(), 1);
        assert!(cache.get_at(&node, t0 + Duration::from_secs(31)).is_empty());
        assert_eq!(cache.stats().hits(), 1);
        assert_eq!(cache.stats().misses(), 1);
        assert_eq!(cache.stats().hit_rate(), 0.5);
    }

    #[test]
    fn test_multiple_records_per_node() {
        let cache = DnsCache::new();
        let t0 = Instant::now();

        cache.insert_at(a_record("example.com", 60, 1), t0);
        cache.insert_at(a_record("example.com", 60, 2), t0);

        let node = Node::new("example.com", RecordType::A);
        assert_eq!(cache.get_at(&node, t0).len(), 2);
        assert!(cache
            .get_at(&node.with_type(RecordType::AAAA), t0)
            .is_empty());
    }

    #[test]
    fn test_duplicate_refreshes_ttl() {
        let cache = DnsCache::new();
        let node = Node::new("example.com", RecordType::A);
        let t0 = Instant::now();

        cache.insert_at(a_record("example.com", 10, 1), t0);
        cache.insert_at(a_record("example.com", 100, 1), t0 + Duration::from_secs(5));

        assert_eq!(cache.len(), 1);
        let records = cache.get_at(&node, t0 + Duration::from_secs(50));
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].ttl(), 100);
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let cache = DnsCache::new();
        cache.insert(a_record("WWW.Example.COM.", 60, 1));

        let node = Node::new("www.example.com", RecordType::A);
        assert_eq!(cache.get(&node).len(), 1);
    }

    #[test]
    fn test_for_each_node_sorted_and_live_only() {
        let cache = DnsCache::new();
        cache.insert(a_record("b.example", 60, 1));
        cache.insert(ResourceRecord::ns("a.example", 60, "ns.a.example"));
        cache.insert(a_record("a.example", 60, 2));
        cache.insert(a_record("stale.example", 0, 3));

        let mut seen = Vec::new();
        cache.for_each_node(|node, records| {
            assert!(!records.is_empty());
            seen.push(node.to_string());
        });

        assert_eq!(seen, ["a.example A", "a.example NS", "b.example A"]);
    }

    #[test]
    fn test_clear() {
        let cache = DnsCache::new();
        cache.insert(a_record("example.com", 60, 1));
        assert!(!cache.is_empty());

        cache.clear();
        assert!(cache.is_empty());
    }
}
