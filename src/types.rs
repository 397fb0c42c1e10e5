//! Closed-but-extensible 16-bit enums: `RecordType`/`RecordClass` fall back to
//! an `Unknown` variant instead of the teacher's panic-on-unrecognized-value
//! `QType`/`QClass`, per the "tagged variant over registered payloads"
//! redesign. `OpCode`/`ResponseCode` are small header-field enums.
use std::fmt;
use std::io::Cursor;
use std::str::FromStr;

use crate::error::{DNSError, DNSResult};
use crate::wire::ToFromNetworkOrder;

macro_rules! tagged_u16_enum {
    ($name:ident { $($variant:ident = $value:expr),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant,)+
            Unknown(u16),
        }

        impl $name {
            pub fn value(&self) -> u16 {
                match self {
                    $($name::$variant => $value,)+
                    $name::Unknown(v) => *v,
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                $name::Unknown(0)
            }
        }

        impl From<u16> for $name {
            fn from(value: u16) -> Self {
                match value {
                    $($value => $name::$variant,)+
                    other => $name::Unknown(other),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                match self {
                    $($name::$variant => write!(f, stringify!($variant)),)+
                    $name::Unknown(v) => write!(f, "TYPE{}", v),
                }
            }
        }

        impl<'a> ToFromNetworkOrder<'a> for $name {
            fn to_network_bytes(&self, buffer: &mut Vec<u8>) -> std::io::Result<usize> {
                self.value().to_network_bytes(buffer)
            }

            fn from_network_bytes(&mut self, buffer: &mut Cursor<&'a [u8]>) -> DNSResult<()> {
                let mut value = 0u16;
                value.from_network_bytes(buffer)?;
                *self = $name::from(value);
                Ok(())
            }
        }

        /// CLI/zone-file-token parsing: mnemonic names case-insensitively,
        /// falling back to the RFC3597 `TYPEnnn`/`CLASSnnn` generic form for
        /// anything this crate doesn't enumerate a variant for.
        impl FromStr for $name {
            type Err = DNSError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let upper = s.to_ascii_uppercase();
                $(if upper == stringify!($variant) {
                    return Ok($name::$variant);
                })+
                for prefix in ["TYPE", "CLASS"] {
                    if let Some(digits) = upper.strip_prefix(prefix) {
                        if let Ok(value) = digits.parse::<u16>() {
                            return Ok($name::Unknown(value));
                        }
                    }
                }
                Err(DNSError::new(&format!("unrecognized {}: {s}", stringify!($name))))
            }
        }
    };
}

tagged_u16_enum!(RecordType {
    A = 1,
    NS = 2,
    CNAME = 5,
    SOA = 6,
    PTR = 12,
    HINFO = 13,
    MX = 15,
    TXT = 16,
    AAAA = 28,
    SRV = 33,
    NAPTR = 35,
    OPT = 41,
    DS = 43,
    SSHFP = 44,
    RRSIG = 46,
    NSEC = 47,
    DNSKEY = 48,
    NSEC3 = 50,
    NSEC3PARAM = 51,
    TLSA = 52,
    HIP = 55,
    SIG = 24,
    TKEY = 249,
    TSIG = 250,
    IXFR = 251,
    AXFR = 252,
    ANY = 255,
    CAA = 257,
});

tagged_u16_enum!(RecordClass {
    IN = 1,
    CH = 3,
    HS = 4,
    NONE = 254,
    ANY = 255,
});

/// a trailing opaque RDATA blob for record types this crate does not
/// natively model; kept distinct from `RecordType::Unknown` since a known
/// type can still carry RDATA we choose not to interpret in some contexts.
impl RecordType {
    pub fn is_meta(&self) -> bool {
        matches!(self, RecordType::OPT | RecordType::TSIG | RecordType::TKEY)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OpCode {
    #[default]
    Query,
    IQuery,
    Status,
    Notify,
    Update,
    Unassigned(u8),
}

impl From<u8> for OpCode {
    fn from(value: u8) -> Self {
        match value {
            0 => OpCode::Query,
            1 => OpCode::IQuery,
            2 => OpCode::Status,
            4 => OpCode::Notify,
            5 => OpCode::Update,
            other => OpCode::Unassigned(other),
        }
    }
}

impl OpCode {
    pub fn value(&self) -> u8 {
        match self {
            OpCode::Query => 0,
            OpCode::IQuery => 1,
            OpCode::Status => 2,
            OpCode::Notify => 4,
            OpCode::Update => 5,
            OpCode::Unassigned(v) => *v,
        }
    }
}

/// the full response-code set from spec.md §6. `BadVers` and `BadSig` share
/// wire value 16; disambiguation happens in `message.rs` based on whether the
/// parsed message carries an OPT record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResponseCode {
    #[default]
    NoError,
    FormatError,
    ServFail,
    NxDomain,
    NotImp,
    Refused,
    YXDomain,
    YXRRSet,
    NXRRSet,
    NotAuth,
    NotZone,
    BadVers,
    BadSig,
    BadKey,
    BadTime,
    BadMode,
    BadAlg,
    BadTrunc,
    BadCookie,
    Unassigned(u16),
}

impl ResponseCode {
    pub fn value(&self) -> u16 {
        match self {
            ResponseCode::NoError => 0,
            ResponseCode::FormatError => 1,
            ResponseCode::ServFail => 2,
            ResponseCode::NxDomain => 3,
            ResponseCode::NotImp => 4,
            ResponseCode::Refused => 5,
            ResponseCode::YXDomain => 6,
            ResponseCode::YXRRSet => 7,
            ResponseCode::NXRRSet => 8,
            ResponseCode::NotAuth => 9,
            ResponseCode::NotZone => 10,
            ResponseCode::BadVers | ResponseCode::BadSig => 16,
            ResponseCode::BadKey => 17,
            ResponseCode::BadTime => 18,
            ResponseCode::BadMode => 19,
            ResponseCode::BadAlg => 21,
            ResponseCode::BadTrunc => 22,
            ResponseCode::BadCookie => 23,
            ResponseCode::Unassigned(v) => *v,
        }
    }

    /// `has_opt` disambiguates the BadVers/BadSig collision on wire value 16
    pub fn from_value(value: u16, has_opt: bool) -> Self {
        match value {
            0 => ResponseCode::NoError,
            1 => ResponseCode::FormatError,
            2 => ResponseCode::ServFail,
            3 => ResponseCode::NxDomain,
            4 => ResponseCode::NotImp,
            5 => ResponseCode::Refused,
            6 => ResponseCode::YXDomain,
            7 => ResponseCode::YXRRSet,
            8 => ResponseCode::NXRRSet,
            9 => ResponseCode::NotAuth,
            10 => ResponseCode::NotZone,
            16 if has_opt => ResponseCode::BadVers,
            16 => ResponseCode::BadSig,
            17 => ResponseCode::BadKey,
            18 => ResponseCode::BadTime,
            19 => ResponseCode::BadMode,
            21 => ResponseCode::BadAlg,
            22 => ResponseCode::BadTrunc,
            23 => ResponseCode::BadCookie,
            other => ResponseCode::Unassigned(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_type_roundtrip() {
        let mut buf = Vec::new();
        RecordType::AAAA.to_network_bytes(&mut buf).unwrap();
        let mut cur = Cursor::new(buf.as_slice());
        let mut t = RecordType::default();
        t.from_network_bytes(&mut cur).unwrap();
        assert_eq!(t, RecordType::AAAA);
    }

    #[test]
    fn unknown_type_preserved() {
        let t = RecordType::from(65280);
        assert_eq!(t, RecordType::Unknown(65280));
        assert_eq!(t.value(), 65280);
    }

    #[test]
    fn record_type_from_str_is_case_insensitive() {
        assert_eq!(RecordType::from_str("a").unwrap(), RecordType::A);
        assert_eq!(RecordType::from_str("AAAA").unwrap(), RecordType::AAAA);
        assert_eq!(RecordType::from_str("TYPE65280").unwrap(), RecordType::Unknown(65280));
        assert!(RecordType::from_str("bogus").is_err());
    }

    #[test]
    fn record_class_from_str() {
        assert_eq!(RecordClass::from_str("in").unwrap(), RecordClass::IN);
        assert_eq!(RecordClass::from_str("CLASS254").unwrap(), RecordClass::NONE);
    }

    #[test]
    fn badvers_badsig_disambiguation() {
        assert_eq!(ResponseCode::from_value(16, true), ResponseCode::BadVers);
        assert_eq!(ResponseCode::from_value(16, false), ResponseCode::BadSig);
    }
}
