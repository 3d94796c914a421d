//! DNS resource records.
//!
//! A record is reduced to what the resolver needs: the node it belongs to,
//! its TTL, and a value that is either a network address (A/AAAA) or text
//! (a domain name for NS/CNAME/MX/SOA, best-effort text otherwise).

use crate::error::Result;
use crate::name::{write_name, NameParser};
use crate::node::Node;
use crate::rtype::RecordType;
use crate::wire::{WireReader, WireWriter};
use crate::CLASS_IN;
use std::fmt;
use std::fmt::Write as _;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

/// The data of a resource record.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RecordValue {
    /// A resolved network address (A/AAAA).
    Address(IpAddr),
    /// A domain name or other textual rendering of the RDATA.
    Text(String),
}

impl fmt::Display for RecordValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Address(addr) => write!(f, "{addr}"),
            Self::Text(text) => f.write_str(text),
        }
    }
}

/// A DNS resource record.
///
/// # Wire Format
///
/// ```text
///                                 1  1  1  1  1  1
///   0  1  2  3  4  5  6  7  8  9  0  1  2  3  4  5
/// +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// /                      NAME                     /
/// +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// |                      TYPE                     |
/// +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// |                     CLASS                     |
/// +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// |                      TTL                      |
/// |                                               |
/// +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// |                   RDLENGTH                    |
/// +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// /                     RDATA                     /
/// +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceRecord {
    /// The (name, type) this record belongs to.
    node: Node,
    /// Time to live in seconds, signed as on the wire.
    ttl: i32,
    /// The record data.
    value: RecordValue,
}

impl ResourceRecord {
    /// Creates a new resource record.
    pub fn new(node: Node, ttl: i32, value: RecordValue) -> Self {
        Self { node, ttl, value }
    }

    /// Creates an A record.
    pub fn a(host: &str, ttl: i32, addr: Ipv4Addr) -> Self {
        Self::new(
            Node::new(host, RecordType::A),
            ttl,
            RecordValue::Address(IpAddr::V4(addr)),
        )
    }

    /// Creates an AAAA record.
    pub fn aaaa(host: &str, ttl: i32, addr: Ipv6Addr) -> Self {
        Self::new(
            Node::new(host, RecordType::AAAA),
            ttl,
            RecordValue::Address(IpAddr::V6(addr)),
        )
    }

    /// Creates an NS record.
    pub fn ns(host: &str, ttl: i32, nameserver: &str) -> Self {
        Self::text(Node::new(host, RecordType::NS), ttl, nameserver)
    }

    /// Creates a CNAME record.
    pub fn cname(host: &str, ttl: i32, target: &str) -> Self {
        Self::text(Node::new(host, RecordType::CNAME), ttl, target)
    }

    /// Creates a record with a text value.
    pub fn text(node: Node, ttl: i32, text: impl Into<String>) -> Self {
        Self::new(node, ttl, RecordValue::Text(text.into()))
    }

    /// Returns the node.
    #[inline]
    pub fn node(&self) -> &Node {
        &self.node
    }

    /// Returns the owner host name.
    #[inline]
    pub fn host_name(&self) -> &str {
        self.node.host_name()
    }

    /// Returns the record type.
    #[inline]
    pub fn record_type(&self) -> RecordType {
        self.node.record_type()
    }

    /// Returns the TTL in seconds.
    #[inline]
    pub fn ttl(&self) -> i32 {
        self.ttl
    }

    /// Returns the record value.
    #[inline]
    pub fn value(&self) -> &RecordValue {
        &self.value
    }

    /// Returns the address for A/AAAA records that carry one.
    pub fn address(&self) -> Option<IpAddr> {
        match self.value {
            RecordValue::Address(addr) => Some(addr),
            RecordValue::Text(_) => None,
        }
    }

    /// Returns the text value (domain name) if this record has one.
    pub fn text_value(&self) -> Option<&str> {
        match &self.value {
            RecordValue::Address(_) => None,
            RecordValue::Text(text) => Some(text),
        }
    }

    /// Returns a copy of this record filed under another node.
    pub fn with_node(&self, node: Node) -> Self {
        Self {
            node,
            ttl: self.ttl,
            value: self.value.clone(),
        }
    }

    /// Returns true if both records carry the same node and value.
    pub fn same_data(&self, other: &Self) -> bool {
        self.node == other.node && self.value == other.value
    }

    /// Writes the record in wire format (uncompressed owner name).
    pub fn write_to(&self, writer: &mut WireWriter) -> Result<()> {
        write_name(writer, self.host_name())?;
        writer.write_u16(self.record_type().to_u16());
        writer.write_u16(CLASS_IN);
        writer.write_i32(self.ttl);

        let length_at = writer.len();
        writer.write_u16(0);
        let rdata_start = writer.len();

        match (&self.value, self.record_type()) {
            (RecordValue::Address(IpAddr::V4(addr)), _) => writer.write_bytes(&addr.octets()),
            (RecordValue::Address(IpAddr::V6(addr)), _) => writer.write_bytes(&addr.octets()),
            (RecordValue::Text(exchange), RecordType::MX) => {
                writer.write_u16(0);
                write_name(writer, exchange)?;
            }
            (RecordValue::Text(mname), RecordType::SOA) => {
                write_name(writer, mname)?;
                // RNAME, then SERIAL REFRESH RETRY EXPIRE MINIMUM
                writer.write_u8(0);
                for _ in 0..5 {
                    writer.write_u32(0);
                }
            }
            (RecordValue::Text(text), _) => write_name(writer, text)?,
        }

        let rdlength = (writer.len() - rdata_start) as u16;
        writer.write_at(length_at, &rdlength.to_be_bytes());
        Ok(())
    }
}

impl fmt::Display for ResourceRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<30} {:<10} {:<5} {}",
            self.host_name(),
            self.ttl,
            self.record_type(),
            self.value
        )
    }
}

/// Iterator-style parser for a run of resource records.
#[derive(Debug)]
pub struct RecordParser<'a> {
    data: &'a [u8],
    offset: usize,
    remaining: u16,
}

impl<'a> RecordParser<'a> {
    /// Creates a parser for `count` records starting at `offset`.
    pub fn new(data: &'a [u8], offset: usize, count: u16) -> Self {
        Self {
            data,
            offset,
            remaining: count,
        }
    }

    /// Returns the offset right after the last parsed record.
    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Parses the next record, or returns `None` once `count` are consumed.
    pub fn next_record(&mut self) -> Result<Option<ResourceRecord>> {
        if self.remaining == 0 {
            return Ok(None);
        }

        let names = NameParser::new(self.data);
        let (host, consumed) = names.parse_name(self.offset)?;

        let mut reader = WireReader::at(self.data, self.offset + consumed);
        let rtype = RecordType::from_u16(reader.read_u16()?);
        let _class = reader.read_u16()?;
        let ttl = reader.read_i32()?;
        let rdlength = usize::from(reader.read_u16()?);
        let rdata_start = reader.position();
        let rdata = reader.read_bytes(rdlength)?;

        let value = decode_rdata(names, rtype, rdata_start, rdata)?;

        self.offset = rdata_start + rdlength;
        self.remaining -= 1;

        Ok(Some(ResourceRecord::new(Node::new(host, rtype), ttl, value)))
    }
}

/// Decodes RDATA by type. Address data of the wrong size degrades to text.
fn decode_rdata(
    names: NameParser<'_>,
    rtype: RecordType,
    start: usize,
    rdata: &[u8],
) -> Result<RecordValue> {
    let value = match rtype {
        RecordType::A => match <[u8; 4]>::try_from(rdata) {
            Ok(octets) => RecordValue::Address(IpAddr::V4(Ipv4Addr::from(octets))),
            Err(_) => RecordValue::Text(dotted_decimal(rdata)),
        },
        RecordType::AAAA => match <[u8; 16]>::try_from(rdata) {
            Ok(octets) => RecordValue::Address(IpAddr::V6(Ipv6Addr::from(octets))),
            Err(_) => RecordValue::Text(hex_groups(rdata)),
        },
        // Preference plus at least the root label.
        RecordType::MX if rdata.len() < 3 => RecordValue::Text(hex_string(rdata)),
        RecordType::MX => RecordValue::Text(names.parse(start + 2)?),
        RecordType::NS | RecordType::CNAME | RecordType::SOA => {
            RecordValue::Text(names.parse(start)?)
        }
        RecordType::Other(_) => match names.parse(start) {
            Ok(name) => RecordValue::Text(name),
            Err(_) => RecordValue::Text(hex_string(rdata)),
        },
    };
    Ok(value)
}

fn dotted_decimal(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(u8::to_string)
        .collect::<Vec<_>>()
        .join(".")
}

fn hex_groups(bytes: &[u8]) -> String {
    bytes
        .chunks(2)
        .map(|pair| {
            let hi = u16::from(pair[0]) << 8;
            let lo = pair.get(1).copied().map_or(0, u16::from);
            format!("{:x}", hi | lo)
        })
        .collect::<Vec<_>>()
        .join(":")
}

fn hex_string(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        let _ = write!(out, "{byte:02x}");
    }
    out
}
