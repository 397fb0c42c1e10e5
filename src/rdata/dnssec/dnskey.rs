//! DNSKEY: a zone signing/key-signing public key (RFC4034 §2).
use std::io::Cursor;

use crate::error::{DNSError, DNSResult};
use crate::wire::text::{from_base64, to_base64};
use crate::wire::ToFromNetworkOrder;

pub const FLAG_ZONE_KEY: u16 = 0x0100;
pub const FLAG_SECURE_ENTRY_POINT: u16 = 0x0001;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dnskey {
    pub flags: u16,
    pub protocol: u8,
    pub algorithm: u8,
    pub public_key: Vec<u8>,
}

impl Dnskey {
    pub fn to_network_bytes(&self, buffer: &mut Vec<u8>) -> std::io::Result<usize> {
        let start = buffer.len();
        self.flags.to_network_bytes(buffer)?;
        self.protocol.to_network_bytes(buffer)?;
        self.algorithm.to_network_bytes(buffer)?;
        buffer.extend_from_slice(&self.public_key);
        Ok(buffer.len() - start)
    }

    pub(crate) fn from_cursor(buffer: &mut Cursor<&[u8]>, end: usize) -> DNSResult<Self> {
        let mut flags = 0u16;
        flags.from_network_bytes(buffer)?;
        let mut protocol = 0u8;
        protocol.from_network_bytes(buffer)?;
        let mut algorithm = 0u8;
        algorithm.from_network_bytes(buffer)?;
        let pos = buffer.position() as usize;
        let public_key = buffer.get_ref()[pos..end].to_vec();
        buffer.set_position(end as u64);
        Ok(Dnskey { flags, protocol, algorithm, public_key })
    }

    pub fn is_zone_key(&self) -> bool {
        self.flags & FLAG_ZONE_KEY != 0
    }

    /// RFC4034 Appendix B key-tag algorithm; RRSIG records reference a
    /// signing DNSKEY by this tag rather than by full key material.
    pub fn key_tag(&self) -> u16 {
        let mut rdata = Vec::new();
        self.to_network_bytes(&mut rdata).expect("writing to a Vec never fails");

        if self.algorithm == 1 {
            // RSA/MD5: tag is the last two octets of the public key, big-endian
            let len = rdata.len();
            return u16::from_be_bytes([rdata[len - 3], rdata[len - 2]]);
        }

        let mut acc: u32 = 0;
        for (i, &byte) in rdata.iter().enumerate() {
            acc += if i % 2 == 0 { (byte as u32) << 8 } else { byte as u32 };
        }
        acc += (acc >> 16) & 0xFFFF;
        (acc & 0xFFFF) as u16
    }

    pub fn to_text(&self) -> String {
        format!("{} {} {} {}", self.flags, self.protocol, self.algorithm, to_base64(&self.public_key))
    }

    pub fn parse_text(tokens: &[&str]) -> DNSResult<Self> {
        if tokens.len() != 4 {
            return Err(DNSError::new("DNSKEY requires 4 fields"));
        }
        let flags = tokens[0].parse::<u16>().map_err(|_| DNSError::new("invalid DNSKEY flags"))?;
        let protocol = tokens[1].parse::<u8>().map_err(|_| DNSError::new("invalid DNSKEY protocol"))?;
        let algorithm = tokens[2].parse::<u8>().map_err(|_| DNSError::new("invalid DNSKEY algorithm"))?;
        let public_key = from_base64(tokens[3]).ok_or_else(|| DNSError::new("invalid DNSKEY public key base64"))?;
        Ok(Dnskey { flags, protocol, algorithm, public_key })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dnskey_roundtrip() {
        let key = Dnskey {
            flags: FLAG_ZONE_KEY | FLAG_SECURE_ENTRY_POINT,
            protocol: 3,
            algorithm: 8,
            public_key: vec![1, 2, 3, 4, 5, 6, 7, 8],
        };
        let mut buf = Vec::new();
        key.to_network_bytes(&mut buf).unwrap();
        let mut cur = Cursor::new(buf.as_slice());
        let decoded = Dnskey::from_cursor(&mut cur, buf.len()).unwrap();
        assert_eq!(decoded, key);
        assert!(decoded.is_zone_key());
    }

    #[test]
    fn key_tag_is_deterministic() {
        let key = Dnskey { flags: FLAG_ZONE_KEY, protocol: 3, algorithm: 8, public_key: vec![9; 32] };
        assert_eq!(key.key_tag(), key.key_tag());
    }

    #[test]
    fn dnskey_text_roundtrip() {
        let key = Dnskey::parse_text(&["256", "3", "8", "AQIDBA=="]).unwrap();
        assert_eq!(key.public_key, vec![1, 2, 3, 4]);
        assert_eq!(key.to_text(), "256 3 8 AQIDBA==");
    }
}
