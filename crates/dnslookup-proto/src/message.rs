//! DNS messages.
//!
//! Outgoing traffic is always a single-question [`Query`]; incoming traffic
//! is decoded into a [`Response`]. [`ResponseBuilder`] produces response
//! bytes for test servers.

use crate::error::Result;
use crate::header::{Header, HeaderFlags, HEADER_SIZE};
use crate::name::{write_name, NameParser};
use crate::node::Node;
use crate::rcode::ResponseCode;
use crate::record::{RecordParser, ResourceRecord};
use crate::rtype::RecordType;
use crate::wire::{WireReader, WireWriter};
use crate::{CLASS_IN, MAX_UDP_MESSAGE_SIZE};
use bytes::Bytes;
use std::fmt;

/// Reads the transaction ID of a message without decoding it.
#[inline]
pub fn peek_id(data: &[u8]) -> Option<u16> {
    match data {
        [hi, lo, ..] => Some(u16::from_be_bytes([*hi, *lo])),
        _ => None,
    }
}

/// An encoded single-question query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    id: u16,
    node: Node,
    wire: Bytes,
}

impl Query {
    /// Encodes a query for `node` with a random transaction ID.
    ///
    /// The ID's top bit is always clear.
    pub fn new(node: Node) -> Result<Self> {
        Self::with_id(rand::random::<u16>() & 0x7FFF, node)
    }

    /// Encodes a query with a fixed transaction ID.
    pub fn with_id(id: u16, node: Node) -> Result<Self> {
        let mut writer = WireWriter::new(HEADER_SIZE + node.host_name().len() + 6);
        writer.write_bytes(&Header::query(id).to_wire());
        write_name(&mut writer, node.host_name())?;
        writer.write_u16(node.record_type().to_u16());
        writer.write_u16(CLASS_IN);

        Ok(Self {
            id,
            node,
            wire: writer.freeze(),
        })
    }

    /// Returns the transaction ID.
    #[inline]
    pub fn id(&self) -> u16 {
        self.id
    }

    /// Returns the queried node.
    #[inline]
    pub fn node(&self) -> &Node {
        &self.node
    }

    /// Returns the encoded message.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.wire
    }
}

/// A decoded response.
///
/// When the header carries an error RCODE (1 through 5) the record sections
/// are not decoded and every section is empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    header: Header,
    question: Option<Node>,
    answers: Vec<ResourceRecord>,
    authority: Vec<ResourceRecord>,
    additional: Vec<ResourceRecord>,
}

impl Response {
    /// Decodes a response from wire format.
    pub fn parse(data: &[u8]) -> Result<Self> {
        let header = Header::parse(data)?;
        let names = NameParser::new(data);

        let mut offset = HEADER_SIZE;
        let mut question = None;
        for _ in 0..header.qd_count {
            let (host, consumed) = names.parse_name(offset)?;
            let mut reader = WireReader::at(data, offset + consumed);
            let rtype = RecordType::from_u16(reader.read_u16()?);
            let _class = reader.read_u16()?;
            offset = reader.position();

            if question.is_none() {
                question = Some(Node::new(host, rtype));
            }
        }

        let mut response = Self {
            header,
            question,
            answers: Vec::new(),
            authority: Vec::new(),
            additional: Vec::new(),
        };

        if !response.is_usable() {
            return Ok(response);
        }

        let counts = [
            response.header.an_count,
            response.header.ns_count,
            response.header.ar_count,
        ];
        let mut sections: [Vec<ResourceRecord>; 3] = Default::default();

        for (section, count) in sections.iter_mut().zip(counts) {
            let mut parser = RecordParser::new(data, offset, count);
            while let Some(record) = parser.next_record()? {
                section.push(record);
            }
            offset = parser.offset();
        }

        let [answers, authority, additional] = sections;
        response.answers = answers;
        response.authority = authority;
        response.additional = additional;
        Ok(response)
    }

    /// Returns the transaction ID.
    #[inline]
    pub fn id(&self) -> u16 {
        self.header.id
    }

    /// Returns the header.
    #[inline]
    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Returns the response code.
    #[inline]
    pub fn rcode(&self) -> ResponseCode {
        self.header.rcode
    }

    /// Returns false when the response code reports an error.
    #[inline]
    pub fn is_usable(&self) -> bool {
        !self.header.rcode.is_error()
    }

    /// Returns true if the AA bit is set.
    #[inline]
    pub fn is_authoritative(&self) -> bool {
        self.header.is_authoritative()
    }

    /// Returns the first question, if any.
    #[inline]
    pub fn question(&self) -> Option<&Node> {
        self.question.as_ref()
    }

    /// Returns the answer section.
    #[inline]
    pub fn answers(&self) -> &[ResourceRecord] {
        &self.answers
    }

    /// Returns the authority section.
    #[inline]
    pub fn authority(&self) -> &[ResourceRecord] {
        &self.authority
    }

    /// Returns the additional section.
    #[inline]
    pub fn additional(&self) -> &[ResourceRecord] {
        &self.additional
    }

    /// Iterates all records in wire order: answers, authority, additional.
    pub fn records(&self) -> impl Iterator<Item = &ResourceRecord> {
        self.answers
            .iter()
            .chain(self.authority.iter())
            .chain(self.additional.iter())
    }

    /// Consumes the response, returning all records in wire order.
    pub fn into_records(self) -> Vec<ResourceRecord> {
        let mut records = self.answers;
        records.extend(self.authority);
        records.extend(self.additional);
        records
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, ";; {}", self.header)?;

        if let Some(question) = &self.question {
            writeln!(f, ";; QUESTION: {question}")?;
        }

        for (title, records) in [
            ("ANSWER", &self.answers),
            ("AUTHORITY", &self.authority),
            ("ADDITIONAL", &self.additional),
        ] {
            if records.is_empty() {
                continue;
            }
            writeln!(f, ";; {title} SECTION:")?;
            for record in records {
                writeln!(f, "{record}")?;
            }
        }

        Ok(())
    }
}

/// Assembles response messages.
#[derive(Debug, Clone)]
pub struct ResponseBuilder {
    header: Header,
    question: Option<Node>,
    answers: Vec<ResourceRecord>,
    authority: Vec<ResourceRecord>,
    additional: Vec<ResourceRecord>,
}

impl ResponseBuilder {
    /// Starts a response with the given transaction ID.
    pub fn new(id: u16) -> Self {
        let mut header = Header::new(id);
        header.flags = HeaderFlags::QR;
        Self {
            header,
            question: None,
            answers: Vec::new(),
            authority: Vec::new(),
            additional: Vec::new(),
        }
    }

    /// Sets the AA bit.
    pub fn authoritative(mut self) -> Self {
        self.header.flags.insert(HeaderFlags::AA);
        self
    }

    /// Sets the response code.
    pub fn rcode(mut self, rcode: ResponseCode) -> Self {
        self.header.rcode = rcode;
        self
    }

    /// Sets the question.
    pub fn question(mut self, node: Node) -> Self {
        self.question = Some(node);
        self
    }

    /// Appends an answer record.
    pub fn answer(mut self, record: ResourceRecord) -> Self {
        self.answers.push(record);
        self
    }

    /// Appends an authority record.
    pub fn authority(mut self, record: ResourceRecord) -> Self {
        self.authority.push(record);
        self
    }

    /// Appends an additional record.
    pub fn additional(mut self, record: ResourceRecord) -> Self {
        self.additional.push(record);
        self
    }

    /// Encodes the response.
    pub fn build(self) -> Result<Bytes> {
        let mut header = self.header;
        header.qd_count = u16::from(self.question.is_some());
        header.an_count = self.answers.len() as u16;
        header.ns_count = self.authority.len() as u16;
        header.ar_count = self.additional.len() as u16;

        let mut writer = WireWriter::new(MAX_UDP_MESSAGE_SIZE);
        writer.write_bytes(&header.to_wire());

        if let Some(question) = &self.question {
            write_name(&mut writer, question.host_name())?;
            writer.write_u16(question.record_type().to_u16());
            writer.write_u16(CLASS_IN);
        }

        for record in self
            .answers
            .iter()
            .chain(&self.authority)
            .chain(&self.additional)
        {
            record.write_to(&mut writer)?;
        }

        Ok(writer.freeze())
    }
}
