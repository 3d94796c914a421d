//! Domain name encoding and decoding.
//!
//! Names are handled as dotted strings without the trailing root dot; the
//! root name is the empty string. Decoding supports message compression
//! (RFC 1035 Section 4.1.4) with a bounded number of pointer jumps.

use crate::error::{Error, Result};
use crate::wire::WireWriter;
use crate::{MAX_LABEL_LENGTH, MAX_NAME_LENGTH};

/// Maximum number of compression pointer jumps followed for one name.
pub const MAX_COMPRESSION_JUMPS: usize = 16;

/// Parser for reading domain names from DNS wire format.
///
/// It keeps the complete message buffer so compression pointers, which
/// are absolute offsets into the message, can be resolved.
#[derive(Debug, Clone, Copy)]
pub struct NameParser<'a> {
    /// The complete message buffer.
    message: &'a [u8],
}

impl<'a> NameParser<'a> {
    /// Creates a new name parser over the given message buffer.
    #[inline]
    pub const fn new(message: &'a [u8]) -> Self {
        Self { message }
    }

    /// Parses a domain name starting at the given offset.
    ///
    /// Returns the name and the number of bytes consumed at `offset`. When
    /// the name ends in a compression pointer, the consumed count stops
    /// right after the 2-byte pointer; the pointed-to bytes are not counted.
    pub fn parse_name(&self, offset: usize) -> Result<(String, usize)> {
        let mut name = String::new();
        let mut wire_len = 0;
        let mut pos = offset;
        let mut jumps = 0;
        let mut consumed = None;

        loop {
            let len_byte = *self
                .message
                .get(pos)
                .ok_or(Error::unexpected_eof(pos))?;

            match len_byte {
                0 => {
                    if consumed.is_none() {
                        consumed = Some(pos + 1 - offset);
                    }
                    break;
                }
                0xC0..=0xFF => {
                    let low = *self
                        .message
                        .get(pos + 1)
                        .ok_or(Error::unexpected_eof(pos + 1))?;
                    let target = usize::from(u16::from_be_bytes([len_byte & 0x3F, low]));

                    // Only strictly backwards pointers can refer to an
                    // earlier, already complete name.
                    if target >= pos {
                        return Err(Error::InvalidCompressionPointer {
                            offset: pos,
                            target,
                        });
                    }

                    jumps += 1;
                    if jumps > MAX_COMPRESSION_JUMPS {
                        return Err(Error::TooManyCompressionJumps {
                            max_jumps: MAX_COMPRESSION_JUMPS,
                        });
                    }

                    if consumed.is_none() {
                        consumed = Some(pos + 2 - offset);
                    }
                    pos = target;
                }
                0x40..=0xBF => {
                    return Err(Error::InvalidLabelType {
                        offset: pos,
                        value: len_byte,
                    });
                }
                _ => {
                    let len = usize::from(len_byte);
                    let start = pos + 1;
                    let label = self
                        .message
                        .get(start..start + len)
                        .ok_or(Error::unexpected_eof(start + len))?;

                    wire_len += 1 + len;
                    if wire_len + 1 > MAX_NAME_LENGTH {
                        return Err(Error::name_too_long(wire_len + 1));
                    }

                    if !name.is_empty() {
                        name.push('.');
                    }
                    name.extend(label.iter().map(|&b| char::from(b)));
                    pos = start + len;
                }
            }
        }

        Ok((name, consumed.unwrap_or(0)))
    }

    /// Parses a name and returns only the name.
    #[inline]
    pub fn parse(&self, offset: usize) -> Result<String> {
        self.parse_name(offset).map(|(name, _)| name)
    }
}

/// Splits a dotted name into labels, validating label and name lengths.
///
/// A single trailing dot is accepted; `""` and `"."` are the root name.
pub fn labels(name: &str) -> Result<Vec<&str>> {
    let trimmed = name.strip_suffix('.').unwrap_or(name);
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }

    let labels: Vec<&str> = trimmed.split('.').collect();
    let mut wire_len = 1;
    for (position, label) in labels.iter().enumerate() {
        if label.is_empty() {
            return Err(Error::EmptyLabel { position });
        }
        if label.len() > MAX_LABEL_LENGTH {
            return Err(Error::label_too_long(label.len()));
        }
        wire_len += 1 + label.len();
    }

    if wire_len > MAX_NAME_LENGTH {
        return Err(Error::name_too_long(wire_len));
    }

    Ok(labels)
}

/// Writes a name as uncompressed length-prefixed labels plus the root octet.
pub fn write_name(writer: &mut WireWriter, name: &str) -> Result<()> {
    for label in labels(name)? {
        writer.write_u8(label.len() as u8);
        writer.write_bytes(label.as_bytes());
    }
    writer.write_u8(0);
    Ok(())
}
