//! DNS record types.
//!
//! Only the types the resolver acts on get their own variant; every other
//! code is carried through as [`RecordType::Other`].

use crate::error::Error;
use num_enum::FromPrimitive;
use std::fmt;
use std::str::FromStr;

/// DNS record type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, FromPrimitive)]
#[repr(u16)]
pub enum RecordType {
    /// IPv4 address - RFC 1035
    A = 1,

    /// Authoritative name server - RFC 1035
    NS = 2,

    /// Canonical name (alias) - RFC 1035
    CNAME = 5,

    /// Start of authority - RFC 1035
    SOA = 6,

    /// Mail exchange - RFC 1035
    MX = 15,

    /// IPv6 address - RFC 3596
    AAAA = 28,

    /// Any other type, keeping its numeric code.
    #[num_enum(catch_all)]
    Other(u16),
}

impl RecordType {
    /// Returns the numeric type code.
    #[inline]
    pub const fn to_u16(self) -> u16 {
        match self {
            Self::A => 1,
            Self::NS => 2,
            Self::CNAME => 5,
            Self::SOA => 6,
            Self::MX => 15,
            Self::AAAA => 28,
            Self::Other(code) => code,
        }
    }

    /// Maps a numeric type code, falling back to [`RecordType::Other`].
    #[inline]
    pub fn from_u16(code: u16) -> Self {
        Self::from_primitive(code)
    }

    /// Returns the mnemonic for known types.
    pub const fn mnemonic(self) -> Option<&'static str> {
        match self {
            Self::A => Some("A"),
            Self::NS => Some("NS"),
            Self::CNAME => Some("CNAME"),
            Self::SOA => Some("SOA"),
            Self::MX => Some("MX"),
            Self::AAAA => Some("AAAA"),
            Self::Other(_) => None,
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.mnemonic() {
            Some(name) => f.pad(name),
            None => f.pad(&format!("TYPE{}", self.to_u16())),
        }
    }
}

impl FromStr for RecordType {
    type Err = Error;

    /// Parses a mnemonic (case-insensitive) or the generic `TYPE<n>` form.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.to_ascii_uppercase();
        let rtype = match upper.as_str() {
            "A" => Self::A,
            "NS" => Self::NS,
            "CNAME" => Self::CNAME,
            "SOA" => Self::SOA,
            "MX" => Self::MX,
            "AAAA" => Self::AAAA,
            other => other
                .strip_prefix("TYPE")
                .and_then(|code| code.parse::<u16>().ok())
                .map(Self::from_u16)
                .ok_or_else(|| Error::UnknownRecordType { name: s.to_string() })?,
        };
        Ok(rtype)
    }
}

impl From<RecordType> for u16 {
    fn from(rtype: RecordType) -> Self {
        rtype.to_u16()
    }
}
