//! DNS response codes (RCODEs).
//!
//! Defined in RFC 1035 Section 4.1.1. Only the 4-bit header field is
//! interpreted; there is no EDNS extended RCODE support.

use num_enum::FromPrimitive;
use std::fmt;

/// DNS response code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, FromPrimitive)]
#[repr(u8)]
pub enum ResponseCode {
    /// No error condition - RFC 1035
    NoError = 0,

    /// Format error - RFC 1035
    ///
    /// The name server was unable to interpret the query.
    FormErr = 1,

    /// Server failure - RFC 1035
    ServFail = 2,

    /// Name error - RFC 1035
    ///
    /// The domain name referenced in the query does not exist.
    NXDomain = 3,

    /// Not implemented - RFC 1035
    NotImp = 4,

    /// Query refused - RFC 1035
    Refused = 5,

    /// Any other (reserved or update-related) code.
    #[num_enum(catch_all)]
    Other(u8),
}

impl ResponseCode {
    /// Maps the low four bits of the header flags word.
    #[inline]
    pub fn from_header(value: u8) -> Self {
        Self::from_primitive(value & 0x0F)
    }

    /// Returns the 4-bit header value.
    #[inline]
    pub const fn header_rcode(self) -> u8 {
        match self {
            Self::NoError => 0,
            Self::FormErr => 1,
            Self::ServFail => 2,
            Self::NXDomain => 3,
            Self::NotImp => 4,
            Self::Refused => 5,
            Self::Other(code) => code & 0x0F,
        }
    }

    /// Returns true for the RFC 1035 error codes (1 through 5).
    ///
    /// A response carrying one of these has no usable answer.
    #[inline]
    pub const fn is_error(self) -> bool {
        matches!(
            self,
            Self::FormErr | Self::ServFail | Self::NXDomain | Self::NotImp | Self::Refused
        )
    }
}

impl fmt::Display for ResponseCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoError => f.write_str("NOERROR"),
            Self::FormErr => f.write_str("FORMERR"),
            Self::ServFail => f.write_str("SERVFAIL"),
            Self::NXDomain => f.write_str("NXDOMAIN"),
            Self::NotImp => f.write_str("NOTIMP"),
            Self::Refused => f.write_str("REFUSED"),
            Self::Other(code) => write!(f, "RCODE{code}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert!(!ResponseCode::NoError.is_error());
        for code in 1..=5 {
            assert!(ResponseCode::from_header(code).is_error(), "rcode {code}");
        }
        assert!(!ResponseCode::from_header(6).is_error());
        assert_eq!(ResponseCode::from_header(9), ResponseCode::Other(9));
    }

    #[test]
    fn test_header_roundtrip() {
        assert_eq!(ResponseCode::from_header(3), ResponseCode::NXDomain);
        assert_eq!(ResponseCode::NXDomain.header_rcode(), 3);
        assert_eq!(ResponseCode::Refused.to_string(), "REFUSED");
    }
}
