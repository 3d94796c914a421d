//! Query transport.
//!
//! [`UdpTransport`] sends one datagram per attempt from a single socket
//! that lives as long as the transport. Replies are matched to the
//! outstanding query by transaction ID only; anything else that arrives
//! during the wait is dropped and the wait continues.

use crate::{ResolverConfig, ResolverError, Result};
use async_trait::async_trait;
use bytes::Bytes;
use dnslookup_proto::{peek_id, Node, Query};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;
use tokio::net::UdpSocket;
use tokio::time::{timeout_at, Instant};
use tracing::{debug, trace};

/// Receive buffer size.
///
/// Larger than the classic 512-byte limit so oversized replies still reach
/// the decoder intact.
const RECV_BUFFER_SIZE: usize = 4096;

/// Sends a query to a server and returns the raw reply.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Queries `server` for `node`, returning the undecoded reply.
    async fn query(&self, server: IpAddr, node: &Node) -> Result<Bytes>;
}

/// UDP transport with timeout, retransmission and ID filtering.
#[derive(Debug)]
pub struct UdpTransport {
    socket: UdpSocket,
    port: u16,
    timeout: Duration,
    retries: u32,
}

impl UdpTransport {
    /// Binds an ephemeral IPv4 socket.
    pub async fn bind(config: &ResolverConfig) -> Result<Self> {
        let local = SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 0);
        let socket = UdpSocket::bind(local).await?;
        debug!(local = ?socket.local_addr().ok(), "Bound transport socket");

        Ok(Self {
            socket,
            port: config.port,
            timeout: config.timeout,
            retries: config.retries,
        })
    }

    /// Returns the local address of the socket.
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.socket.local_addr()?)
    }

    /// Waits up to `window` for a reply carrying `id`.
    ///
    /// Returns `None` when the window elapses.
    async fn await_reply(&self, id: u16, window: Duration) -> Result<Option<Bytes>> {
        let deadline = Instant::now() + window;
        let mut buf = vec![0u8; RECV_BUFFER_SIZE];

        loop {
            let (len, from) = match timeout_at(deadline, self.socket.recv_from(&mut buf)).await {
                Ok(received) => received?,
                Err(_) => return Ok(None),
            };

            let reply = &buf[..len];
            match peek_id(reply) {
                Some(reply_id) if reply_id == id => {
                    return Ok(Some(Bytes::copy_from_slice(reply)));
                }
                other => {
                    debug!(
                        %from,
                        expected = id,
                        received = ?other,
                        "Discarding reply with mismatched ID"
                    );
                }
            }
        }
    }
}

#[async_trait]
impl Transport for UdpTransport {
    async fn query(&self, server: IpAddr, node: &Node) -> Result<Bytes> {
        let query = Query::new(node.clone())?;
        let target = SocketAddr::new(server, self.port);

        for attempt in 0..=self.retries {
            debug!(id = query.id(), %node, server = %target, attempt, "Sending query");
            self.socket.send_to(query.as_bytes(), target).await?;

            if let Some(reply) = self.await_reply(query.id(), self.timeout).await? {
                trace!(id = query.id(), len = reply.len(), "Received reply");
                return Ok(reply);
            }

            debug!(id = query.id(), server = %target, attempt, "Query timed out");
        }

        Err(ResolverError::Timeout)
    }
}
