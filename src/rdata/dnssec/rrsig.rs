//! RRSIG (and its RFC2535 predecessor SIG, identical wire shape): a
//! signature covering one RRset (RFC4034 §3).
use std::io::Cursor;

use crate::error::DNSResult;
use crate::name::Name;
use crate::rdata::dnssec::serial_le;
use crate::types::RecordType;
use crate::wire::text::to_base64;
use crate::wire::ToFromNetworkOrder;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rrsig {
    pub type_covered: RecordType,
    pub algorithm: u8,
    pub labels: u8,
    pub original_ttl: u32,
    pub expiration: u32,
    pub inception: u32,
    pub key_tag: u16,
    pub signer_name: Name,
    pub signature: Vec<u8>,
}

impl Rrsig {
    pub fn to_network_bytes(&self, buffer: &mut Vec<u8>) -> std::io::Result<usize> {
        let start = buffer.len();
        self.type_covered.to_network_bytes(buffer)?;
        self.algorithm.to_network_bytes(buffer)?;
        self.labels.to_network_bytes(buffer)?;
        self.original_ttl.to_network_bytes(buffer)?;
        self.expiration.to_network_bytes(buffer)?;
        self.inception.to_network_bytes(buffer)?;
        self.key_tag.to_network_bytes(buffer)?;
        // signer name is never compressed within a signature's own encoding,
        // but RRSIG records stored in a message may still use the shared
        // dictionary; canonical (signing-input) use goes through `to_network_bytes`
        // on the owning record instead.
        self.signer_name.to_network_bytes(buffer)?;
        buffer.extend_from_slice(&self.signature);
        Ok(buffer.len() - start)
    }

    pub(crate) fn from_cursor(buffer: &mut Cursor<&[u8]>, end: usize) -> DNSResult<Self> {
        let mut type_covered = RecordType::default();
        type_covered.from_network_bytes(buffer)?;
        let mut algorithm = 0u8;
        algorithm.from_network_bytes(buffer)?;
        let mut labels = 0u8;
        labels.from_network_bytes(buffer)?;
        let mut original_ttl = 0u32;
        original_ttl.from_network_bytes(buffer)?;
        let mut expiration = 0u32;
        expiration.from_network_bytes(buffer)?;
        let mut inception = 0u32;
        inception.from_network_bytes(buffer)?;
        let mut key_tag = 0u16;
        key_tag.from_network_bytes(buffer)?;
        let mut signer_name = Name::default();
        signer_name.from_network_bytes(buffer)?;
        let pos = buffer.position() as usize;
        let signature = buffer.get_ref()[pos..end].to_vec();
        buffer.set_position(end as u64);
        Ok(Rrsig {
            type_covered,
            algorithm,
            labels,
            original_ttl,
            expiration,
            inception,
            key_tag,
            signer_name,
            signature,
        })
    }

    /// `inception <= now <= expiration` under RFC1982 serial arithmetic, per
    /// spec.md §3's validity-window invariant
    pub fn is_valid_at(&self, now: u32) -> bool {
        serial_le(self.inception, now) && serial_le(now, self.expiration)
    }

    /// presentation form; timestamps render as raw epoch seconds rather than
    /// the YYYYMMDDHHmmSS convention since nothing else in this crate needs a
    /// calendar dependency. No `parse_text`: RRSIG/SIG records are produced by
    /// signing, not authored by hand, so this crate only renders them.
    pub fn to_text(&self) -> String {
        format!(
            "{} {} {} {} {} {} {} {} {}",
            self.type_covered,
            self.algorithm,
            self.labels,
            self.original_ttl,
            self.expiration,
            self.inception,
            self.key_tag,
            self.signer_name,
            to_base64(&self.signature)
        )
    }
}
