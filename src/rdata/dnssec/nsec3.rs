//! NSEC3/NSEC3PARAM: hashed-name denial of existence (RFC5155).
use std::io::{Cursor, Read};

use crate::error::DNSResult;
use crate::rdata::dnssec::bitmap::TypeBitmap;
use crate::wire::text::{to_base32hex, to_hex};
use crate::wire::ToFromNetworkOrder;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashAlgorithm {
    Sha1,
    Unknown(u8),
}

impl From<u8> for HashAlgorithm {
    fn from(v: u8) -> Self {
        match v {
            1 => HashAlgorithm::Sha1,
            other => HashAlgorithm::Unknown(other),
        }
    }
}

pub const FLAG_OPT_OUT: u8 = 0x01;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Nsec3 {
    pub hash_algorithm: u8,
    pub flags: u8,
    pub iterations: u16,
    pub salt: Vec<u8>,
    pub next_hashed_owner: Vec<u8>,
    pub types: TypeBitmap,
}

impl Nsec3 {
    pub fn is_opt_out(&self) -> bool {
        self.flags & FLAG_OPT_OUT != 0
    }

    pub fn to_network_bytes(&self, buffer: &mut Vec<u8>) -> std::io::Result<usize> {
        let start = buffer.len();
        self.hash_algorithm.to_network_bytes(buffer)?;
        self.flags.to_network_bytes(buffer)?;
        self.iterations.to_network_bytes(buffer)?;
        buffer.push(self.salt.len() as u8);
        buffer.extend_from_slice(&self.salt);
        buffer.push(self.next_hashed_owner.len() as u8);
        buffer.extend_from_slice(&self.next_hashed_owner);
        self.types.to_network_bytes(buffer)?;
        Ok(buffer.len() - start)
    }

    pub(crate) fn from_cursor(buffer: &mut Cursor<&[u8]>, end: usize) -> DNSResult<Self> {
        let mut hash_algorithm = 0u8;
        hash_algorithm.from_network_bytes(buffer)?;
        let mut flags = 0u8;
        flags.from_network_bytes(buffer)?;
        let mut iterations = 0u16;
        iterations.from_network_bytes(buffer)?;

        let mut salt_len = [0u8; 1];
        buffer.read_exact(&mut salt_len)?;
        let mut salt = vec![0u8; salt_len[0] as usize];
        buffer.read_exact(&mut salt)?;

        let mut hash_len = [0u8; 1];
        buffer.read_exact(&mut hash_len)?;
        let mut next_hashed_owner = vec![0u8; hash_len[0] as usize];
        buffer.read_exact(&mut next_hashed_owner)?;

        let types = TypeBitmap::from_cursor(buffer, end)?;

        Ok(Nsec3 { hash_algorithm, flags, iterations, salt, next_hashed_owner, types })
    }

    pub fn to_text(&self) -> String {
        let salt = if self.salt.is_empty() { "-".to_string() } else { to_hex(&self.salt) };
        format!(
            "{} {} {} {} {} {}",
            self.hash_algorithm,
            self.flags,
            self.iterations,
            salt,
            to_base32hex(&self.next_hashed_owner),
            self.types.to_text()
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Nsec3Param {
    pub hash_algorithm: u8,
    pub flags: u8,
    pub iterations: u16,
    pub salt: Vec<u8>,
}

impl Nsec3Param {
    pub fn to_network_bytes(&self, buffer: &mut Vec<u8>) -> std::io::Result<usize> {
        let start = buffer.len();
        self.hash_algorithm.to_network_bytes(buffer)?;
        self.flags.to_network_bytes(buffer)?;
        self.iterations.to_network_bytes(buffer)?;
        buffer.push(self.salt.len() as u8);
        buffer.extend_from_slice(&self.salt);
        Ok(buffer.len() - start)
    }

    pub(crate) fn from_cursor(buffer: &mut Cursor<&[u8]>, _end: usize) -> DNSResult<Self> {
        let mut hash_algorithm = 0u8;
        hash_algorithm.from_network_bytes(buffer)?;
        let mut flags = 0u8;
        flags.from_network_bytes(buffer)?;
        let mut iterations = 0u16;
        iterations.from_network_bytes(buffer)?;
        let mut salt_len = [0u8; 1];
        buffer.read_exact(&mut salt_len)?;
        let mut salt = vec![0u8; salt_len[0] as usize];
        buffer.read_exact(&mut salt)?;
        Ok(Nsec3Param { hash_algorithm, flags, iterations, salt })
    }

    pub fn to_text(&self) -> String {
        let salt = if self.salt.is_empty() { "-".to_string() } else { to_hex(&self.salt) };
        format!("{} {} {} {}", self.hash_algorithm, self.flags, self.iterations, salt)
    }
}

/// the iterated hash of RFC5155 §5: `H(H(...H(x0 || salt)... || salt))`,
/// `iterations` additional rounds after the first
pub fn hashed_owner_name(name_wire: &[u8], salt: &[u8], iterations: u16) -> Vec<u8> {
    use ring::digest::{digest, SHA1_FOR_LEGACY_USE_ONLY};

    let mut input = name_wire.to_vec();
    input.extend_from_slice(salt);
    let mut hash = digest(&SHA1_FOR_LEGACY_USE_ONLY, &input).as_ref().to_vec();

    for _ in 0..iterations {
        let mut next_input = hash;
        next_input.extend_from_slice(salt);
        hash = digest(&SHA1_FOR_LEGACY_USE_ONLY, &next_input).as_ref().to_vec();
    }
    hash
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nsec3_roundtrip() {
        let nsec3 = Nsec3 {
            hash_algorithm: 1,
            flags: FLAG_OPT_OUT,
            iterations: 10,
            salt: vec![0xAB, 0xCD],
            next_hashed_owner: vec![1; 20],
            types: TypeBitmap(vec![1, 28]),
        };
        let mut buf = Vec::new();
        nsec3.to_network_bytes(&mut buf).unwrap();
        let mut cur = Cursor::new(buf.as_slice());
        let decoded = Nsec3::from_cursor(&mut cur, buf.len()).unwrap();
        assert_eq!(decoded, nsec3);
        assert!(decoded.is_opt_out());
    }

    #[test]
    fn nsec3_to_text_renders_salt_and_bitmap() {
        let nsec3 = Nsec3 {
            hash_algorithm: 1,
            flags: 0,
            iterations: 10,
            salt: vec![0xAB, 0xCD],
            next_hashed_owner: vec![1; 20],
            types: TypeBitmap(vec![1, 28]),
        };
        assert!(nsec3.to_text().starts_with("1 0 10 ABCD "));
        assert!(nsec3.to_text().ends_with("A AAAA"));
    }

    #[test]
    fn nsec3_to_text_renders_empty_salt_as_dash() {
        let nsec3 = Nsec3 {
            hash_algorithm: 1,
            flags: 0,
            iterations: 0,
            salt: vec![],
            next_hashed_owner: vec![1; 20],
            types: TypeBitmap::default(),
        };
        assert!(nsec3.to_text().contains(" - "));
    }

    #[test]
    fn nsec3param_roundtrip() {
        let param = Nsec3Param { hash_algorithm: 1, flags: 0, iterations: 5, salt: vec![1, 2, 3, 4] };
        let mut buf = Vec::new();
        param.to_network_bytes(&mut buf).unwrap();
        let mut cur = Cursor::new(buf.as_slice());
        assert_eq!(Nsec3Param::from_cursor(&mut cur, buf.len()).unwrap(), param);
    }

    #[test]
    fn hashed_owner_name_is_deterministic() {
        let a = hashed_owner_name(b"example", b"salt", 3);
        let b = hashed_owner_name(b"example", b"salt", 3);
        assert_eq!(a, b);
        assert_eq!(a.len(), 20);
    }
}
