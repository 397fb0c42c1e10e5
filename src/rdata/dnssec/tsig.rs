//! TSIG (RFC8945): transaction signatures on whole messages. TKEY (RFC2930):
//! out-of-band key establishment. Grouped together since both carry an
//! algorithm name plus a signature/keying blob and neither is part of a
//! cached RRset — TSIG records are stripped from the parsed view exposed to
//! higher layers per spec.md §4.2 and surfaced separately by `message.rs`.
use std::io::{Cursor, Read};

use crate::error::DNSResult;
use crate::name::Name;
use crate::wire::ToFromNetworkOrder;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tsig {
    pub algorithm: Name,
    /// 48-bit seconds since epoch
    pub time_signed: u64,
    pub fudge: u16,
    pub mac: Vec<u8>,
    pub original_id: u16,
    pub error: u16,
    pub other_data: Vec<u8>,
}

impl Tsig {
    pub fn to_network_bytes(&self, buffer: &mut Vec<u8>) -> std::io::Result<usize> {
        let start = buffer.len();
        self.algorithm.to_network_bytes(buffer)?;
        let time_bytes = self.time_signed.to_be_bytes();
        buffer.extend_from_slice(&time_bytes[2..8]); // low 48 bits
        self.fudge.to_network_bytes(buffer)?;
        (self.mac.len() as u16).to_network_bytes(buffer)?;
        buffer.extend_from_slice(&self.mac);
        self.original_id.to_network_bytes(buffer)?;
        self.error.to_network_bytes(buffer)?;
        (self.other_data.len() as u16).to_network_bytes(buffer)?;
        buffer.extend_from_slice(&self.other_data);
        Ok(buffer.len() - start)
    }

    pub(crate) fn from_cursor(buffer: &mut Cursor<&[u8]>, _end: usize) -> DNSResult<Self> {
        let mut algorithm = Name::default();
        algorithm.from_network_bytes(buffer)?;

        let mut time_buf = [0u8; 6];
        buffer.read_exact(&mut time_buf)?;
        let mut time_full = [0u8; 8];
        time_full[2..8].copy_from_slice(&time_buf);
        let time_signed = u64::from_be_bytes(time_full);

        let mut fudge = 0u16;
        fudge.from_network_bytes(buffer)?;

        let mut mac_size = 0u16;
        mac_size.from_network_bytes(buffer)?;
        let mut mac = vec![0u8; mac_size as usize];
        buffer.read_exact(&mut mac)?;

        let mut original_id = 0u16;
        original_id.from_network_bytes(buffer)?;
        let mut error = 0u16;
        error.from_network_bytes(buffer)?;

        let mut other_len = 0u16;
        other_len.from_network_bytes(buffer)?;
        let mut other_data = vec![0u8; other_len as usize];
        buffer.read_exact(&mut other_data)?;

        Ok(Tsig { algorithm, time_signed, fudge, mac, original_id, error, other_data })
    }

    /// `|now - time_signed| <= fudge`, the replay window of RFC8945 §5.2.3
    pub fn is_within_fudge(&self, now: u64) -> bool {
        now.abs_diff(self.time_signed) <= self.fudge as u64
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tkey {
    pub algorithm: Name,
    pub inception: u32,
    pub expiration: u32,
    pub mode: u16,
    pub error: u16,
    pub key_data: Vec<u8>,
    pub other_data: Vec<u8>,
}

impl Tkey {
    pub fn to_network_bytes(&self, buffer: &mut Vec<u8>) -> std::io::Result<usize> {
        let start = buffer.len();
        self.algorithm.to_network_bytes(buffer)?;
        self.inception.to_network_bytes(buffer)?;
        self.expiration.to_network_bytes(buffer)?;
        self.mode.to_network_bytes(buffer)?;
        self.error.to_network_bytes(buffer)?;
        (self.key_data.len() as u16).to_network_bytes(buffer)?;
        buffer.extend_from_slice(&self.key_data);
        (self.other_data.len() as u16).to_network_bytes(buffer)?;
        buffer.extend_from_slice(&self.other_data);
        Ok(buffer.len() - start)
    }

    pub(crate) fn from_cursor(buffer: &mut Cursor<&[u8]>, _end: usize) -> DNSResult<Self> {
        let mut algorithm = Name::default();
        algorithm.from_network_bytes(buffer)?;
        let mut inception = 0u32;
        inception.from_network_bytes(buffer)?;
        let mut expiration = 0u32;
        expiration.from_network_bytes(buffer)?;
        let mut mode = 0u16;
        mode.from_network_bytes(buffer)?;
        let mut error = 0u16;
        error.from_network_bytes(buffer)?;

        let mut key_size = 0u16;
        key_size.from_network_bytes(buffer)?;
        let mut key_data = vec![0u8; key_size as usize];
        buffer.read_exact(&mut key_data)?;

        let mut other_size = 0u16;
        other_size.from_network_bytes(buffer)?;
        let mut other_data = vec![0u8; other_size as usize];
        buffer.read_exact(&mut other_data)?;

        Ok(Tkey { algorithm, inception, expiration, mode, error, key_data, other_data })
    }
}
