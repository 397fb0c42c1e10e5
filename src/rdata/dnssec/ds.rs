//! DS: delegation signer (RFC4034 §5). Authenticates a child zone's DNSKEY
//! RRset from the parent.
use std::io::Cursor;

use crate::error::{DNSError, DNSResult};
use crate::wire::text::{from_hex, to_hex};
use crate::wire::ToFromNetworkOrder;

/// digest algorithms this crate verifies (RFC4509, RFC6605, RFC5933)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DigestAlgorithm {
    Sha1,
    Sha256,
    Sha384,
    Unknown(u8),
}

impl From<u8> for DigestAlgorithm {
    fn from(v: u8) -> Self {
        match v {
            1 => DigestAlgorithm::Sha1,
            2 => DigestAlgorithm::Sha256,
            4 => DigestAlgorithm::Sha384,
            other => DigestAlgorithm::Unknown(other),
        }
    }
}

impl DigestAlgorithm {
    pub fn value(&self) -> u8 {
        match self {
            DigestAlgorithm::Sha1 => 1,
            DigestAlgorithm::Sha256 => 2,
            DigestAlgorithm::Sha384 => 4,
            DigestAlgorithm::Unknown(v) => *v,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ds {
    pub key_tag: u16,
    pub algorithm: u8,
    pub digest_type: u8,
    pub digest: Vec<u8>,
}

impl Ds {
    pub fn to_network_bytes(&self, buffer: &mut Vec<u8>) -> std::io::Result<usize> {
        let start = buffer.len();
        self.key_tag.to_network_bytes(buffer)?;
        self.algorithm.to_network_bytes(buffer)?;
        self.digest_type.to_network_bytes(buffer)?;
        buffer.extend_from_slice(&self.digest);
        Ok(buffer.len() - start)
    }

    pub(crate) fn from_cursor(buffer: &mut Cursor<&[u8]>, end: usize) -> DNSResult<Self> {
        let mut key_tag = 0u16;
        key_tag.from_network_bytes(buffer)?;
        let mut algorithm = 0u8;
        algorithm.from_network_bytes(buffer)?;
        let mut digest_type = 0u8;
        digest_type.from_network_bytes(buffer)?;
        let pos = buffer.position() as usize;
        let digest = buffer.get_ref()[pos..end].to_vec();
        buffer.set_position(end as u64);
        Ok(Ds { key_tag, algorithm, digest_type, digest })
    }

    pub fn digest_algorithm(&self) -> DigestAlgorithm {
        DigestAlgorithm::from(self.digest_type)
    }

    pub fn to_text(&self) -> String {
        format!("{} {} {} {}", self.key_tag, self.algorithm, self.digest_type, to_hex(&self.digest))
    }

    pub fn parse_text(tokens: &[&str]) -> DNSResult<Self> {
        if tokens.len() != 4 {
            return Err(DNSError::new("DS requires 4 fields"));
        }
        let key_tag = tokens[0].parse::<u16>().map_err(|_| DNSError::new("invalid DS key tag"))?;
        let algorithm = tokens[1].parse::<u8>().map_err(|_| DNSError::new("invalid DS algorithm"))?;
        let digest_type = tokens[2].parse::<u8>().map_err(|_| DNSError::new("invalid DS digest type"))?;
        let digest = from_hex(tokens[3]).ok_or_else(|| DNSError::new("invalid DS digest hex"))?;
        Ok(Ds { key_tag, algorithm, digest_type, digest })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ds_roundtrip() {
        let ds = Ds { key_tag: 12345, algorithm: 8, digest_type: 2, digest: vec![0xAB; 32] };
        let mut buf = Vec::new();
        ds.to_network_bytes(&mut buf).unwrap();
        let mut cur = Cursor::new(buf.as_slice());
        assert_eq!(Ds::from_cursor(&mut cur, buf.len()).unwrap(), ds);
    }

    #[test]
    fn ds_text_roundtrip() {
        let ds = Ds::parse_text(&["12345", "8", "2", "ABABABAB"]).unwrap();
        assert_eq!(ds.to_text(), "12345 8 2 ABABABAB");
    }
}
