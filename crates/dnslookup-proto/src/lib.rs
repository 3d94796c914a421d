//! # dnslookup DNS Protocol Library
//!
//! Wire format encoding of outgoing queries and decoding of incoming
//! responses for the dnslookup iterative resolver.
//!
//! The codec is deliberately small: it understands the record types the
//! resolver acts on (A, AAAA, NS, CNAME, SOA, MX) and renders everything
//! else as an opaque text value.
//!
//! ## Example
//!
//! ```rust,ignore
//! use dnslookup_proto::{Node, Query, RecordType, Response};
//!
//! let query = Query::new(Node::new("www.example.com", RecordType::A))?;
//! socket.send_to(query.as_bytes(), server).await?;
//!
//! let response = Response::parse(&reply)?;
//! for record in response.records() {
//!     println!("{record}");
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod header;
pub mod message;
pub mod name;
pub mod node;
pub mod rcode;
pub mod record;
pub mod rtype;
pub mod wire;

// Re-exports for convenience
pub use error::{Error, Result};
pub use header::{Header, HeaderFlags};
pub use message::{peek_id, Query, Response, ResponseBuilder};
pub use node::Node;
pub use rcode::ResponseCode;
pub use record::{RecordValue, ResourceRecord};
pub use rtype::RecordType;

/// Maximum length of a DNS label (63 bytes per RFC 1035)
pub const MAX_LABEL_LENGTH: usize = 63;

/// Maximum length of a domain name (255 bytes per RFC 1035)
pub const MAX_NAME_LENGTH: usize = 255;

/// Maximum size of a UDP DNS message without EDNS0 (512 bytes per RFC 1035)
pub const MAX_UDP_MESSAGE_SIZE: usize = 512;

/// DNS port (53)
pub const DNS_PORT: u16 = 53;

/// The Internet class code used for every question and record.
pub const CLASS_IN: u16 = 1;
