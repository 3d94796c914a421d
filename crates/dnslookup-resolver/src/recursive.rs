//! Iterative resolution.
//!
//! A lookup first consults the cache, then chases any cached CNAME, and
//! only then asks the root server. Every record a server returns is cached.
//! From each response exactly one next step is taken, in this order:
//!
//! 1. stop if the response answers the node or carries a CNAME;
//! 2. follow the first A record that has an address;
//! 3. resolve the first NS record's address from the root and follow it.
//!
//! CNAME chasing is bounded by the indirection level. Each walk down from
//! the root has its own referral budget, and nameserver lookups nest at most
//! [`MAX_NAMESERVER_DEPTH`] deep, so delegation loops always terminate.

use crate::transport::Transport;
use crate::{Resolution, ResolverConfig, ResolverError, Result};
use dnslookup_cache::DnsCache;
use dnslookup_proto::{Node, RecordType, ResourceRecord, Response};
use futures::future::{BoxFuture, FutureExt};
use parking_lot::RwLock;
use std::net::IpAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, trace, warn};

// ============================================================================
// Metrics
// ============================================================================

/// Resolver counters.
#[derive(Debug, Default)]
pub struct ResolverMetrics {
    /// Top-level lookups started.
    pub lookups: AtomicU64,
    /// Lookups answered from the cache without contacting a server.
    pub cache_hits: AtomicU64,
    /// Queries sent to servers.
    pub server_queries: AtomicU64,
    /// Exchanges that produced no reply (timeouts, socket errors).
    pub failed_exchanges: AtomicU64,
    /// Replies that could not be decoded.
    pub malformed_responses: AtomicU64,
}

impl ResolverMetrics {
    fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }
}

// ============================================================================
// Resolution State
// ============================================================================

/// How deeply nameserver address lookups may nest inside one lookup.
pub const MAX_NAMESERVER_DEPTH: usize = 8;

/// State shared by every hop of one top-level lookup.
#[derive(Debug, Default)]
struct ResolutionState {
    /// Nameserver address lookups currently in progress.
    nameserver_depth: usize,
    /// Whether any server sent an undecodable reply.
    malformed_seen: bool,
}

/// Servers one walk from the root may still contact.
#[derive(Debug)]
struct Walk {
    remaining: usize,
}

impl Walk {
    fn new(budget: usize) -> Self {
        Self { remaining: budget }
    }

    fn spend_referral(&mut self) -> Result<()> {
        if self.remaining == 0 {
            return Err(ResolverError::ReferralDepthExceeded);
        }
        self.remaining -= 1;
        Ok(())
    }
}

// ============================================================================
// Recursive Resolver
// ============================================================================

/// Iterative resolver rooted at a single configurable server.
pub struct RecursiveResolver<T> {
    config: ResolverConfig,
    cache: Arc<DnsCache>,
    transport: T,
    root: RwLock<IpAddr>,
    metrics: ResolverMetrics,
}

impl<T: Transport> RecursiveResolver<T> {
    /// Creates a resolver.
    pub fn new(config: ResolverConfig, cache: Arc<DnsCache>, transport: T, root: IpAddr) -> Self {
        Self {
            config,
            cache,
            transport,
            root: RwLock::new(root),
            metrics: ResolverMetrics::default(),
        }
    }

    /// Returns the cache.
    pub fn cache(&self) -> &Arc<DnsCache> {
        &self.cache
    }

    /// Returns the transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Returns the configuration.
    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Returns the counters.
    pub fn metrics(&self) -> &ResolverMetrics {
        &self.metrics
    }

    /// Returns the current root server.
    pub fn root_server(&self) -> IpAddr {
        *self.root.read()
    }

    /// Replaces the root server for subsequent lookups.
    pub fn set_root_server(&self, root: IpAddr) {
        debug!(%root, "Root server changed");
        *self.root.write() = root;
    }

    /// Resolves a node.
    pub async fn resolve(&self, node: &Node) -> Resolution {
        ResolverMetrics::bump(&self.metrics.lookups);
        let mut state = ResolutionState::default();

        let outcome = self.get_results(node, 0, &mut state).await;
        match outcome {
            Ok(records) if !records.is_empty() => Resolution::Records(records),
            Ok(_) if state.malformed_seen => Resolution::Malformed,
            Ok(_) => Resolution::NoAnswer,
            Err(ResolverError::IndirectionExceeded) => Resolution::IndirectionExceeded,
            Err(e) => {
                warn!(%node, error = %e, "Lookup abandoned");
                if state.malformed_seen {
                    Resolution::Malformed
                } else {
                    Resolution::NoAnswer
                }
            }
        }
    }

    /// Answers a node from the cache, or walks from the root and retries the
    /// cache.
    ///
    /// This uses `BoxFuture` because CNAME chasing and nameserver address
    /// lookups recurse back into it.
    fn get_results<'a>(
        &'a self,
        node: &'a Node,
        level: usize,
        state: &'a mut ResolutionState,
    ) -> BoxFuture<'a, Result<Vec<ResourceRecord>>> {
        async move {
            if level > self.config.max_indirection {
                warn!(%node, level, "Maximum number of indirection levels reached");
                return Err(ResolverError::IndirectionExceeded);
            }

            let cached = self.check_cache(node, level, state).await?;
            if !cached.is_empty() {
                if level == 0 && state.nameserver_depth == 0 {
                    ResolverMetrics::bump(&self.metrics.cache_hits);
                }
                return Ok(cached);
            }

            let root = self.root_server();
            let mut walk = Walk::new(self.config.max_referral_depth);
            let direct = self.retrieve_from_server(node, root, &mut walk, state).await?;

            let cached = self.check_cache(node, level, state).await?;
            if cached.is_empty() && !direct.is_empty() {
                trace!(%node, count = direct.len(), "Answer not cacheable, using response");
                return Ok(direct);
            }
            Ok(cached)
        }
        .boxed()
    }

    /// Returns cached records for the node, chasing cached CNAMEs.
    ///
    /// Records found through an alias are cached again under `node`.
    async fn check_cache(
        &self,
        node: &Node,
        level: usize,
        state: &mut ResolutionState,
    ) -> Result<Vec<ResourceRecord>> {
        let cached = self.cache.get(node);
        if !cached.is_empty() {
            trace!(%node, count = cached.len(), "Cache hit");
            return Ok(cached);
        }

        let aliases = self.cache.get(&node.with_type(RecordType::CNAME));
        if aliases.is_empty() {
            return Ok(Vec::new());
        }

        let mut level = level;
        for alias in &aliases {
            let Some(target) = alias.text_value() else {
                continue;
            };

            level += 1;
            let target = Node::new(target, node.record_type());
            debug!(from = %node, to = %target, level, "Following CNAME");

            for record in self.get_results(&target, level, state).await? {
                self.cache.insert(record.with_node(node.clone()));
            }
        }

        Ok(self.cache.get(node))
    }

    /// Queries one server, caches what it returns, and follows the referral.
    ///
    /// Returns the records of the final response that answer `node` itself.
    /// A server that does not answer, answers with an error code, or sends
    /// garbage contributes nothing; only budget exhaustion is an error.
    fn retrieve_from_server<'a>(
        &'a self,
        node: &'a Node,
        server: IpAddr,
        walk: &'a mut Walk,
        state: &'a mut ResolutionState,
    ) -> BoxFuture<'a, Result<Vec<ResourceRecord>>> {
        async move {
            walk.spend_referral()?;
            ResolverMetrics::bump(&self.metrics.server_queries);

            let reply = match self.transport.query(server, node).await {
                Ok(reply) => reply,
                Err(e) => {
                    ResolverMetrics::bump(&self.metrics.failed_exchanges);
                    debug!(%server, %node, error = %e, "No reply from server");
                    return Ok(Vec::new());
                }
            };

            let response = match Response::parse(&reply) {
                Ok(response) => response,
                Err(e) => {
                    if e.is_malformed() {
                        ResolverMetrics::bump(&self.metrics.malformed_responses);
                        state.malformed_seen = true;
                    }
                    debug!(%server, %node, error = %e, "Undecodable response");
                    return Ok(Vec::new());
                }
            };

            debug!(
                id = response.id(),
                %server,
                %node,
                rcode = %response.rcode(),
                authoritative = response.is_authoritative(),
                answers = response.answers().len(),
                authority = response.authority().len(),
                additional = response.additional().len(),
                "Received response"
            );

            if !response.is_usable() {
                return Ok(Vec::new());
            }

            let records = response.into_records();
            for record in &records {
                trace!(%record, "Response record");
                self.cache.insert(record.clone());
            }

            self.query_next_level(node, records, walk, state).await
        }
        .boxed()
    }

    /// Picks the single next server from a response's records, if any.
    async fn query_next_level(
        &self,
        node: &Node,
        records: Vec<ResourceRecord>,
        walk: &mut Walk,
        state: &mut ResolutionState,
    ) -> Result<Vec<ResourceRecord>> {
        let answered = records
            .iter()
            .any(|r| r.node() == node || r.record_type() == RecordType::CNAME);
        if answered {
            return Ok(records.into_iter().filter(|r| r.node() == node).collect());
        }

        let glue = records
            .iter()
            .filter(|r| r.record_type() == RecordType::A)
            .find_map(ResourceRecord::address);
        if let Some(server) = glue {
            trace!(%node, %server, "Following referral with address");
            return self.retrieve_from_server(node, server, walk, state).await;
        }

        let Some(nameserver) = records
            .iter()
            .filter(|r| r.record_type() == RecordType::NS)
            .find_map(ResourceRecord::text_value)
        else {
            return Ok(Vec::new());
        };

        let ns_node = Node::new(nameserver, RecordType::A);
        if state.nameserver_depth >= MAX_NAMESERVER_DEPTH {
            warn!(
                %node,
                nameserver = %ns_node.host_name(),
                "Nameserver lookups nested too deeply"
            );
            return Ok(Vec::new());
        }
        debug!(%node, nameserver = %ns_node.host_name(), "Resolving nameserver address");

        state.nameserver_depth += 1;
        let addresses = self.get_results(&ns_node, 0, state).await;
        state.nameserver_depth -= 1;

        let addresses = match addresses {
            Ok(addresses) => addresses,
            Err(ResolverError::IndirectionExceeded | ResolverError::ReferralDepthExceeded) => {
                Vec::new()
            }
            Err(e) => return Err(e),
        };

        match addresses.iter().find_map(ResourceRecord::address) {
            Some(server) => self.retrieve_from_server(node, server, walk, state).await,
            None => {
                debug!(nameserver = %ns_node.host_name(), "Nameserver address not found");
                Ok(Vec::new())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bytes::Bytes;
    use dnslookup_proto::{ResponseBuilder, ResponseCode};
    use parking_lot::Mutex;
    use std::collections::HashMap;
    use std::net::Ipv4Addr;

    const ROOT: IpAddr = IpAddr::V4(Ipv4Addr::new(198, 41, 0, 4));

    fn ip(last: u8) -> IpAddr {
        IpAddr::V4(Ipv4Addr::new(10, 0, 0, last))
    }

    fn a_node(host: &str) -> Node {
        Node::new(host, RecordType::A)
    }

    /// Replies from a fixed table; unknown exchanges time out.
    #[derive(Default)]
    struct ScriptedTransport {
        replies: HashMap<(IpAddr, Node), Bytes>,
        sent: Mutex<Vec<(IpAddr, Node)>>,
    }

    impl ScriptedTransport {
        fn reply(mut self, server: IpAddr, node: Node, response: ResponseBuilder) -> Self {
            let bytes = response.question(node.clone()).build().unwrap();
            self.replies.insert((server, node), bytes);
            self
        }

        fn raw(mut self, server: IpAddr, node: Node, bytes: &[u8]) -> Self {
            self.replies.insert((server, node), Bytes::copy_from_slice(bytes));
            self
        }

        fn sent(&self) -> Vec<(IpAddr, Node)> {
            self.sent.lock().clone()
        }
    }

    #[async_trait]
    impl Transport for ScriptedTransport {
        async fn query(&self, server: IpAddr, node: &Node) -> Result<Bytes> {
            self.sent.lock().push((server, node.clone()));
            self.replies
                .get(&(server, node.clone()))
                .cloned()
                .ok_or(ResolverError::Timeout)
        }
    }

    fn resolver(transport: ScriptedTransport) -> RecursiveResolver<ScriptedTransport> {
        RecursiveResolver::new(
            ResolverConfig::default(),
            Arc::new(DnsCache::new()),
            transport,
            ROOT,
        )
    }

    fn response() -> ResponseBuilder {
        ResponseBuilder::new(0)
    }

    #[tokio::test]
    async fn test_direct_answer_sends_one_query() {
        let www = a_node("www.example.com");
        let record = ResourceRecord::a("www.example.com", 300, Ipv4Addr::new(93, 184, 216, 34));
        let transport =
            ScriptedTransport::default().reply(ROOT, www.clone(), response().answer(record.clone()));
        let resolver = resolver(transport);

        let result = resolver.resolve(&www).await;

        assert_eq!(result, Resolution::Records(vec![record]));
        assert_eq!(resolver.transport().sent(), [(ROOT, www)]);
    }

    #[tokio::test]
    async fn test_second_lookup_served_from_cache() {
        let www = a_node("www.example.com");
        let transport = ScriptedTransport::default().reply(
            ROOT,
            www.clone(),
            response().answer(ResourceRecord::a("www.example.com", 300, Ipv4Addr::LOCALHOST)),
        );
        let resolver = resolver(transport);

        assert!(resolver.resolve(&www).await.is_resolved());
        assert!(resolver.resolve(&www).await.is_resolved());

        assert_eq!(resolver.transport().sent().len(), 1);
        assert_eq!(resolver.metrics().cache_hits.load(Ordering::Relaxed), 1);
    }

    #[tokio::test]
    async fn test_nameserver_without_glue_resolved_from_root() {
        let www = a_node("www.example.com");
        let ns1 = a_node("ns1.example.com");
        let transport = ScriptedTransport::default()
            .reply(
                ROOT,
                www.clone(),
                response().authority(ResourceRecord::ns("example.com", 3600, "ns1.example.com")),
            )
            .reply(
                ROOT,
                ns1.clone(),
                response().answer(ResourceRecord::a("ns1.example.com", 3600, Ipv4Addr::new(10, 0, 0, 53))),
            )
            .reply(
                ip(53),
                www.clone(),
                response()
                    .authoritative()
                    .answer(ResourceRecord::a("www.example.com", 60, Ipv4Addr::new(10, 0, 0, 80))),
            );
        let resolver = resolver(transport);

        let result = resolver.resolve(&www).await;

        assert_eq!(result.records().len(), 1);
        assert_eq!(result.records()[0].address(), Some(ip(80)));
        assert_eq!(
            resolver.transport().sent(),
            [(ROOT, www.clone()), (ROOT, ns1.clone()), (ip(53), www.clone())]
        );

        let cache = resolver.cache();
        assert_eq!(cache.get(&ns1).len(), 1);
        assert_eq!(cache.get(&www).len(), 1);
        assert_eq!(cache.get(&Node::new("example.com", RecordType::NS)).len(), 1);
    }

    #[tokio::test]
    async fn test_glue_address_followed_directly() {
        let www = a_node("www.example.com");
        let transport = ScriptedTransport::default()
            .reply(
                ROOT,
                www.clone(),
                response()
                    .authority(ResourceRecord::ns("com", 172800, "a.gtld-servers.net"))
                    .additional(ResourceRecord::a("a.gtld-servers.net", 172800, Ipv4Addr::new(10, 0, 0, 30))),
            )
            .reply(
                ip(30),
                www.clone(),
                response()
                    .authority(ResourceRecord::ns("example.com", 3600, "ns.example.com"))
                    .additional(ResourceRecord::a("ns.example.com", 3600, Ipv4Addr::new(10, 0, 0, 31))),
            )
            .reply(
                ip(31),
                www.clone(),
                response().answer(ResourceRecord::a("www.example.com", 60, Ipv4Addr::new(10, 0, 0, 99))),
            );
        let resolver = resolver(transport);

        let result = resolver.resolve(&www).await;

        assert_eq!(result.records()[0].address(), Some(ip(99)));
        let servers: Vec<_> = resolver.transport().sent().into_iter().map(|(s, _)| s).collect();
        assert_eq!(servers, [ROOT, ip(30), ip(31)]);
    }

    fn cname_chain(length: usize) -> ScriptedTransport {
        let mut transport = ScriptedTransport::default();
        for i in 0..length {
            transport = transport.reply(
                ROOT,
                a_node(&format!("c{i}.example")),
                response().answer(ResourceRecord::cname(
                    &format!("c{i}.example"),
                    60,
                    &format!("c{}.example", i + 1),
                )),
            );
        }
        transport.reply(
            ROOT,
            a_node(&format!("c{length}.example")),
            response().answer(ResourceRecord::a(
                &format!("c{length}.example"),
                60,
                Ipv4Addr::new(10, 0, 0, 7),
            )),
        )
    }

    #[tokio::test]
    async fn test_cname_chain_within_bound() {
        let resolver = resolver(cname_chain(9));

        let result = resolver.resolve(&a_node("c0.example")).await;

        assert_eq!(result.records().len(), 1);
        assert_eq!(result.records()[0].host_name(), "c0.example");
        assert_eq!(result.records()[0].address(), Some(ip(7)));
    }

    #[tokio::test]
    async fn test_cname_chain_beyond_bound() {
        let resolver = resolver(cname_chain(11));

        let result = resolver.resolve(&a_node("c0.example")).await;

        assert_eq!(result, Resolution::IndirectionExceeded);
        assert!(result.records().is_empty());
    }

    /// Each `c{i}.example` is delegated root -> tld -> sld -> auth, and the
    /// authoritative server aliases it to the next name, up to `length`.
    fn delegated_cname_chain(length: usize) -> ScriptedTransport {
        let (tld, sld, auth) = (10, 11, 12);
        let referral = |zone: &str, ns: &str, last: u8| {
            response()
                .authority(ResourceRecord::ns(zone, 3600, ns))
                .additional(ResourceRecord::a(ns, 3600, Ipv4Addr::new(10, 0, 0, last)))
        };

        let mut transport = ScriptedTransport::default();
        for i in 0..=length {
            let host = format!("c{i}.example");
            let node = a_node(&host);
            let answer = if i < length {
                ResourceRecord::cname(&host, 60, &format!("c{}.example", i + 1))
            } else {
                ResourceRecord::a(&host, 60, Ipv4Addr::new(10, 0, 0, 7))
            };
            transport = transport
                .reply(ROOT, node.clone(), referral("example", "a.nic.example", tld))
                .reply(ip(tld), node.clone(), referral(&host, "ns.sld.example", sld))
                .reply(ip(sld), node.clone(), referral(&host, "ns.auth.example", auth))
                .reply(ip(auth), node, response().authoritative().answer(answer));
        }
        transport
    }

    #[tokio::test]
    async fn test_cname_chain_with_deep_delegation_per_name() {
        let resolver = resolver(delegated_cname_chain(9));

        let result = resolver.resolve(&a_node("c0.example")).await;

        assert_eq!(result.records().len(), 1);
        assert_eq!(result.records()[0].address(), Some(ip(7)));
        assert_eq!(resolver.transport().sent().len(), 40);
    }

    #[tokio::test]
    async fn test_walk_budget_is_per_name() {
        let config = ResolverConfig {
            max_referral_depth: 4,
            ..ResolverConfig::default()
        };
        let resolver =
            RecursiveResolver::new(config, Arc::new(DnsCache::new()), delegated_cname_chain(3), ROOT);

        let result = resolver.resolve(&a_node("c0.example")).await;

        assert_eq!(result.records()[0].address(), Some(ip(7)));
    }

    #[tokio::test]
    async fn test_glue_preferred_over_nameserver_lookup() {
        let www = a_node("www.example.com");
        let transport = ScriptedTransport::default()
            .reply(
                ROOT,
                www.clone(),
                response()
                    .authority(ResourceRecord::ns("example.com", 3600, "ns1.example.com"))
                    .additional(ResourceRecord::a("ns2.example.com", 3600, Ipv4Addr::new(10, 0, 0, 41))),
            )
            .reply(
                ip(41),
                www.clone(),
                response().answer(ResourceRecord::a("www.example.com", 60, Ipv4Addr::new(10, 0, 0, 80))),
            );
        let resolver = resolver(transport);

        let result = resolver.resolve(&www).await;

        assert_eq!(result.records()[0].address(), Some(ip(80)));
        assert_eq!(resolver.transport().sent(), [(ROOT, www.clone()), (ip(41), www)]);
    }

    #[tokio::test]
    async fn test_unresolvable_nameserver_is_no_answer() {
        let www = a_node("www.example.com");
        let ns = a_node("ns.example.com");
        let transport = ScriptedTransport::default().reply(
            ROOT,
            www.clone(),
            response().authority(ResourceRecord::ns("example.com", 3600, "ns.example.com")),
        );
        let resolver = resolver(transport);

        assert_eq!(resolver.resolve(&www).await, Resolution::NoAnswer);
        assert_eq!(resolver.transport().sent(), [(ROOT, www), (ROOT, ns)]);
    }

    #[tokio::test]
    async fn test_nameserver_alias_loop_counts_as_no_address() {
        let www = a_node("www.example.com");
        let transport = cname_chain(11).reply(
            ROOT,
            www.clone(),
            response().authority(ResourceRecord::ns("example.com", 3600, "c0.example")),
        );
        let resolver = resolver(transport);

        let result = resolver.resolve(&www).await;

        assert_eq!(result, Resolution::NoAnswer);
        assert!(resolver
            .transport()
            .sent()
            .iter()
            .all(|(server, _)| *server == ROOT));
    }

    #[tokio::test]
    async fn test_nameserver_cycle_terminates() {
        let www = a_node("www.example.com");
        let ns_a = a_node("ns.a.example");
        let ns_b = a_node("ns.b.example");
        let transport = ScriptedTransport::default()
            .reply(
                ROOT,
                www.clone(),
                response().authority(ResourceRecord::ns("example.com", 60, "ns.a.example")),
            )
            .reply(
                ROOT,
                ns_a,
                response().authority(ResourceRecord::ns("a.example", 60, "ns.b.example")),
            )
            .reply(
                ROOT,
                ns_b,
                response().authority(ResourceRecord::ns("b.example", 60, "ns.a.example")),
            );
        let resolver = resolver(transport);

        assert_eq!(resolver.resolve(&www).await, Resolution::NoAnswer);
        assert_eq!(resolver.transport().sent().len(), MAX_NAMESERVER_DEPTH + 1);
    }

    #[tokio::test]
    async fn test_zero_ttl_answer_is_returned() {
        let www = a_node("www.example.com");
        let record = ResourceRecord::a("www.example.com", 0, Ipv4Addr::new(10, 0, 0, 5));
        let transport =
            ScriptedTransport::default().reply(ROOT, www.clone(), response().answer(record.clone()));
        let resolver = resolver(transport);

        assert_eq!(resolver.resolve(&www).await, Resolution::Records(vec![record]));
        assert!(resolver.cache().get(&www).is_empty());
    }

    #[tokio::test]
    async fn test_malformed_reply() {
        let www = a_node("www.example.com");
        let transport = ScriptedTransport::default().raw(ROOT, www.clone(), &[0xDE, 0xAD, 0xBE]);
        let resolver = resolver(transport);

        assert_eq!(resolver.resolve(&www).await, Resolution::Malformed);
        assert_eq!(resolver.metrics().malformed_responses.load(Ordering::Relaxed), 1);
    }

    #[tokio::test]
    async fn test_error_rcode_is_no_answer() {
        let www = a_node("www.example.com");
        let transport = ScriptedTransport::default().reply(
            ROOT,
            www.clone(),
            response()
                .rcode(ResponseCode::ServFail)
                .answer(ResourceRecord::a("www.example.com", 60, Ipv4Addr::LOCALHOST)),
        );
        let resolver = resolver(transport);

        assert_eq!(resolver.resolve(&www).await, Resolution::NoAnswer);
        assert!(resolver.cache().is_empty());
    }

    #[tokio::test]
    async fn test_silent_server_is_no_answer() {
        let www = a_node("www.example.com");
        let resolver = resolver(ScriptedTransport::default());

        assert_eq!(resolver.resolve(&www).await, Resolution::NoAnswer);
        assert_eq!(resolver.metrics().failed_exchanges.load(Ordering::Relaxed), 1);
    }

    #[tokio::test]
    async fn test_referral_loop_terminates() {
        let www = a_node("www.example.com");
        let referral = || {
            response()
                .authority(ResourceRecord::ns("example.com", 60, "ns.example.com"))
                .additional(ResourceRecord::a("ns.example.com", 60, Ipv4Addr::new(10, 0, 0, 1)))
        };
        let transport = ScriptedTransport::default()
            .reply(ROOT, www.clone(), referral())
            .reply(ip(1), www.clone(), referral());

        let config = ResolverConfig {
            max_referral_depth: 5,
            ..ResolverConfig::default()
        };
        let resolver = RecursiveResolver::new(config, Arc::new(DnsCache::new()), transport, ROOT);

        assert_eq!(resolver.resolve(&www).await, Resolution::NoAnswer);
        assert_eq!(resolver.transport().sent().len(), 5);
    }

    #[tokio::test]
    async fn test_set_root_server() {
        let www = a_node("www.example.com");
        let transport = ScriptedTransport::default().reply(
            ip(2),
            www.clone(),
            response().answer(ResourceRecord::a("www.example.com", 60, Ipv4Addr::LOCALHOST)),
        );
        let resolver = resolver(transport);

        resolver.set_root_server(ip(2));

        assert_eq!(resolver.root_server(), ip(2));
        assert!(resolver.resolve(&www).await.is_resolved());
    }
}
