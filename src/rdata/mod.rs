//! The record registry: one payload type per RR family, gathered into the
//! `RecordData` tagged variant the REDESIGN FLAGS section asks for in place
//! of a class hierarchy. `ResourceRecord` (in `crate::rr`) carries the shared
//! envelope (name, type, class, ttl); each `RecordData` variant owns only its
//! own RDATA shape.
use std::io::Cursor;

use crate::error::{DNSError, DNSResult, MalformedKind};
use crate::name::Name;
use crate::types::RecordType;
use crate::wire::text::to_hex;
use crate::wire::ToFromNetworkOrder;

pub mod address;
pub mod dnssec;
pub mod mx;
pub mod name_based;
pub mod opt;
pub mod soa;
pub mod srv;
pub mod txt;

pub use address::{Aaaa, A};
pub use dnssec::bitmap::TypeBitmap;
pub use dnssec::dnskey::Dnskey;
pub use dnssec::ds::Ds;
pub use dnssec::hip::Hip;
pub use dnssec::nsec::Nsec;
pub use dnssec::nsec3::{Nsec3, Nsec3Param};
pub use dnssec::rrsig::Rrsig;
pub use dnssec::tsig::{Tkey, Tsig};
pub use mx::Mx;
pub use name_based::{Cname, Ns, Ptr};
pub use opt::{EdnsOption, Opt, OPT_CODE_DAU, OPT_CODE_DHU, OPT_CODE_N3U, OPT_CODE_NSID, OPT_CODE_COOKIE};
pub use soa::Soa;
pub use srv::Srv;
pub use txt::{Hinfo, Txt};

/// unknown/unenumerated types round-trip as opaque bytes, per spec.md §4.2
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Unknown(pub Vec<u8>);

impl Unknown {
    /// RFC3597 generic RDATA presentation: `\# <rdlength> <hex>`
    pub fn to_text(&self) -> String {
        format!("\\# {} {}", self.0.len(), to_hex(&self.0))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordData {
    A(A),
    Aaaa(Aaaa),
    Ns(Ns),
    Cname(Cname),
    Soa(Soa),
    Ptr(Ptr),
    Hinfo(Hinfo),
    Mx(Mx),
    Txt(Txt),
    Srv(Srv),
    Opt(Opt),
    Ds(Ds),
    Dnskey(Dnskey),
    Rrsig(Rrsig),
    /// legacy SIG (RFC2535): identical wire shape to RRSIG
    Sig(Rrsig),
    Nsec(Nsec),
    Nsec3(Nsec3),
    Nsec3Param(Nsec3Param),
    Tsig(Tsig),
    Tkey(Tkey),
    Hip(Hip),
    Unknown(Unknown),
}

impl RecordData {
    pub fn record_type(&self) -> RecordType {
        match self {
            RecordData::A(_) => RecordType::A,
            RecordData::Aaaa(_) => RecordType::AAAA,
            RecordData::Ns(_) => RecordType::NS,
            RecordData::Cname(_) => RecordType::CNAME,
            RecordData::Soa(_) => RecordType::SOA,
            RecordData::Ptr(_) => RecordType::PTR,
            RecordData::Hinfo(_) => RecordType::HINFO,
            RecordData::Mx(_) => RecordType::MX,
            RecordData::Txt(_) => RecordType::TXT,
            RecordData::Srv(_) => RecordType::SRV,
            RecordData::Opt(_) => RecordType::OPT,
            RecordData::Ds(_) => RecordType::DS,
            RecordData::Dnskey(_) => RecordType::DNSKEY,
            RecordData::Rrsig(_) => RecordType::RRSIG,
            RecordData::Sig(_) => RecordType::SIG,
            RecordData::Nsec(_) => RecordType::NSEC,
            RecordData::Nsec3(_) => RecordType::NSEC3,
            RecordData::Nsec3Param(_) => RecordType::NSEC3PARAM,
            RecordData::Tsig(_) => RecordType::TSIG,
            RecordData::Tkey(_) => RecordType::TKEY,
            RecordData::Hip(_) => RecordType::HIP,
            RecordData::Unknown(_) => RecordType::Unknown(0),
        }
    }

    pub fn to_network_bytes(&self, buffer: &mut Vec<u8>) -> std::io::Result<usize> {
        match self {
            RecordData::A(v) => v.to_network_bytes(buffer),
            RecordData::Aaaa(v) => v.to_network_bytes(buffer),
            RecordData::Ns(v) => v.0.to_network_bytes(buffer),
            RecordData::Cname(v) => v.0.to_network_bytes(buffer),
            RecordData::Soa(v) => v.to_network_bytes(buffer),
            RecordData::Ptr(v) => v.0.to_network_bytes(buffer),
            RecordData::Hinfo(v) => v.to_network_bytes(buffer),
            RecordData::Mx(v) => v.to_network_bytes(buffer),
            RecordData::Txt(v) => v.to_network_bytes(buffer),
            RecordData::Srv(v) => v.to_network_bytes(buffer),
            RecordData::Opt(v) => v.to_network_bytes(buffer),
            RecordData::Ds(v) => v.to_network_bytes(buffer),
            RecordData::Dnskey(v) => v.to_network_bytes(buffer),
            RecordData::Rrsig(v) | RecordData::Sig(v) => v.to_network_bytes(buffer),
            RecordData::Nsec(v) => v.to_network_bytes(buffer),
            RecordData::Nsec3(v) => v.to_network_bytes(buffer),
            RecordData::Nsec3Param(v) => v.to_network_bytes(buffer),
            RecordData::Tsig(v) => v.to_network_bytes(buffer),
            RecordData::Tkey(v) => v.to_network_bytes(buffer),
            RecordData::Hip(v) => v.to_network_bytes(buffer),
            RecordData::Unknown(v) => {
                buffer.extend_from_slice(&v.0);
                Ok(v.0.len())
            }
        }
    }

    /// parse RDATA of declared `rdlength` at the current cursor position,
    /// given the already-decoded record type
    pub fn from_network_bytes(
        rtype: RecordType,
        rdlength: u16,
        buffer: &mut Cursor<&[u8]>,
    ) -> DNSResult<RecordData> {
        let rdlength = rdlength as usize;
        let end = buffer.position() as usize + rdlength;
        if end > buffer.get_ref().len() {
            return Err(DNSError::Malformed(MalformedKind::Record("rdlength exceeds buffer")));
        }

        let data = match rtype {
            RecordType::A => RecordData::A(A::from_cursor(buffer)?),
            RecordType::AAAA => RecordData::Aaaa(Aaaa::from_cursor(buffer)?),
            RecordType::NS => RecordData::Ns(Ns::from_cursor(buffer)?),
            RecordType::CNAME => RecordData::Cname(Cname::from_cursor(buffer)?),
            RecordType::SOA => RecordData::Soa(Soa::from_cursor(buffer)?),
            RecordType::PTR => RecordData::Ptr(Ptr::from_cursor(buffer)?),
            RecordType::HINFO => RecordData::Hinfo(Hinfo::from_cursor(buffer)?),
            RecordType::MX => RecordData::Mx(Mx::from_cursor(buffer)?),
            RecordType::TXT => RecordData::Txt(Txt::from_cursor(buffer, end)?),
            RecordType::SRV => RecordData::Srv(Srv::from_cursor(buffer)?),
            RecordType::OPT => RecordData::Opt(Opt::from_cursor(buffer, end)?),
            RecordType::DS => RecordData::Ds(Ds::from_cursor(buffer, end)?),
            RecordType::DNSKEY => RecordData::Dnskey(Dnskey::from_cursor(buffer, end)?),
            RecordType::RRSIG => RecordData::Rrsig(Rrsig::from_cursor(buffer, end)?),
            RecordType::SIG => RecordData::Sig(Rrsig::from_cursor(buffer, end)?),
            RecordType::NSEC => RecordData::Nsec(Nsec::from_cursor(buffer, end)?),
            RecordType::NSEC3 => RecordData::Nsec3(Nsec3::from_cursor(buffer, end)?),
            RecordType::NSEC3PARAM => RecordData::Nsec3Param(Nsec3Param::from_cursor(buffer, end)?),
            RecordType::TSIG => RecordData::Tsig(Tsig::from_cursor(buffer, end)?),
            RecordType::TKEY => RecordData::Tkey(Tkey::from_cursor(buffer, end)?),
            RecordType::HIP => RecordData::Hip(Hip::from_cursor(buffer, end)?),
            _ => {
                let pos = buffer.position() as usize;
                let raw = buffer.get_ref()[pos..end].to_vec();
                buffer.set_position(end as u64);
                RecordData::Unknown(Unknown(raw))
            }
        };

        if buffer.position() as usize != end {
            return Err(DNSError::Malformed(MalformedKind::Record(
                "decoded RDATA length did not match rdlength",
            )));
        }
        Ok(data)
    }

    /// zone-file ("presentation") rendering, per spec.md §4.2's four-operation
    /// record registry. Every variant renders; see `parse_text` for which
    /// types round-trip back from text.
    pub fn to_text(&self) -> String {
        match self {
            RecordData::A(v) => v.to_text(),
            RecordData::Aaaa(v) => v.to_text(),
            RecordData::Ns(v) => v.to_text(),
            RecordData::Cname(v) => v.to_text(),
            RecordData::Soa(v) => v.to_text(),
            RecordData::Ptr(v) => v.to_text(),
            RecordData::Hinfo(v) => v.to_text(),
            RecordData::Mx(v) => v.to_text(),
            RecordData::Txt(v) => v.to_text(),
            RecordData::Srv(v) => v.to_text(),
            RecordData::Opt(v) => v.to_text(),
            RecordData::Ds(v) => v.to_text(),
            RecordData::Dnskey(v) => v.to_text(),
            RecordData::Rrsig(v) | RecordData::Sig(v) => v.to_text(),
            RecordData::Nsec(v) => v.to_text(),
            RecordData::Nsec3(v) => v.to_text(),
            RecordData::Nsec3Param(v) => v.to_text(),
            RecordData::Tsig(_) | RecordData::Tkey(_) => String::from("; transaction record, not rendered"),
            RecordData::Hip(v) => v.to_text(),
            RecordData::Unknown(v) => v.to_text(),
        }
    }

    /// parse a zone-file token list into the matching `RecordData` variant.
    /// Covers the record types an operator is expected to author by hand
    /// (address, delegation, mail, service, and key-authentication records);
    /// signature/denial/transaction records are produced by the resolver and
    /// signer rather than typed in, so they are rendered but not parsed here.
    pub fn parse_text(rtype: RecordType, tokens: &[&str], origin: &Name) -> DNSResult<RecordData> {
        match rtype {
            RecordType::A => Ok(RecordData::A(address::A::parse_text(
                tokens.first().ok_or_else(|| DNSError::new("A requires 1 field"))?,
            )?)),
            RecordType::AAAA => Ok(RecordData::Aaaa(address::Aaaa::parse_text(
                tokens.first().ok_or_else(|| DNSError::new("AAAA requires 1 field"))?,
            )?)),
            RecordType::NS => Ok(RecordData::Ns(name_based::Ns::parse_text(
                tokens.first().ok_or_else(|| DNSError::new("NS requires 1 field"))?,
                origin,
            )?)),
            RecordType::CNAME => Ok(RecordData::Cname(name_based::Cname::parse_text(
                tokens.first().ok_or_else(|| DNSError::new("CNAME requires 1 field"))?,
                origin,
            )?)),
            RecordType::PTR => Ok(RecordData::Ptr(name_based::Ptr::parse_text(
                tokens.first().ok_or_else(|| DNSError::new("PTR requires 1 field"))?,
                origin,
            )?)),
            RecordType::SOA => Ok(RecordData::Soa(soa::Soa::parse_text(tokens, origin)?)),
            RecordType::MX => Ok(RecordData::Mx(mx::Mx::parse_text(tokens, origin)?)),
            RecordType::TXT => Ok(RecordData::Txt(txt::Txt::parse_text(tokens))),
            RecordType::SRV => Ok(RecordData::Srv(srv::Srv::parse_text(tokens, origin)?)),
            RecordType::DS => Ok(RecordData::Ds(dnssec::ds::Ds::parse_text(tokens)?)),
            RecordType::DNSKEY => Ok(RecordData::Dnskey(dnssec::dnskey::Dnskey::parse_text(tokens)?)),
            other => Err(DNSError::new(&format!("no text parser for record type {other}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn round_trips_a_through_text() {
        let origin = Name::root();
        let parsed = RecordData::parse_text(RecordType::A, &["192.0.2.1"], &origin).unwrap();
        assert_eq!(parsed.to_text(), "192.0.2.1");
    }

    #[test]
    fn round_trips_mx_through_text_with_origin() {
        let origin = Name::from_str("example.com.").unwrap();
        let parsed = RecordData::parse_text(RecordType::MX, &["10", "mail"], &origin).unwrap();
        assert_eq!(parsed.to_text(), "10 mail.example.com.");
    }

    #[test]
    fn unknown_renders_rfc3597_generic_form() {
        let data = RecordData::Unknown(Unknown(vec![0xDE, 0xAD]));
        assert_eq!(data.to_text(), "\\# 2 DEAD");
    }

    #[test]
    fn parse_text_rejects_unsupported_type() {
        let origin = Name::root();
        assert!(RecordData::parse_text(RecordType::RRSIG, &[], &origin).is_err());
    }
}
