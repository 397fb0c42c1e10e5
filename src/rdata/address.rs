//! A/AAAA: fixed-width address records.
use std::io::Cursor;
use std::net::{Ipv4Addr, Ipv6Addr};

use crate::error::{DNSError, DNSResult};
use crate::wire::ToFromNetworkOrder;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct A(pub Ipv4Addr);

impl A {
    pub fn to_network_bytes(&self, buffer: &mut Vec<u8>) -> std::io::Result<usize> {
        self.0.octets().to_network_bytes(buffer)
    }

    pub(crate) fn from_cursor(buffer: &mut Cursor<&[u8]>) -> DNSResult<Self> {
        let mut octets = [0u8; 4];
        octets.from_network_bytes(buffer)?;
        Ok(A(Ipv4Addr::from(octets)))
    }

    pub fn to_text(&self) -> String {
        self.0.to_string()
    }

    pub fn parse_text(token: &str) -> DNSResult<Self> {
        token
            .parse::<Ipv4Addr>()
            .map(A)
            .map_err(|_| DNSError::new(&format!("invalid A address: {token}")))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Aaaa(pub Ipv6Addr);

impl Aaaa {
    pub fn to_network_bytes(&self, buffer: &mut Vec<u8>) -> std::io::Result<usize> {
        self.0.octets().to_network_bytes(buffer)
    }

    pub(crate) fn from_cursor(buffer: &mut Cursor<&[u8]>) -> DNSResult<Self> {
        let mut octets = [0u8; 16];
        octets.from_network_bytes(buffer)?;
        Ok(Aaaa(Ipv6Addr::from(octets)))
    }

    pub fn to_text(&self) -> String {
        self.0.to_string()
    }

    pub fn parse_text(token: &str) -> DNSResult<Self> {
        token
            .parse::<Ipv6Addr>()
            .map(Aaaa)
            .map_err(|_| DNSError::new(&format!("invalid AAAA address: {token}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn a_roundtrip() {
        let a = A(Ipv4Addr::new(192, 0, 2, 42));
        let mut buf = Vec::new();
        a.to_network_bytes(&mut buf).unwrap();
        let mut cur = Cursor::new(buf.as_slice());
        assert_eq!(A::from_cursor(&mut cur).unwrap(), a);
    }

    #[test]
    fn aaaa_roundtrip() {
        let a = Aaaa(Ipv6Addr::LOCALHOST);
        let mut buf = Vec::new();
        a.to_network_bytes(&mut buf).unwrap();
        let mut cur = Cursor::new(buf.as_slice());
        assert_eq!(Aaaa::from_cursor(&mut cur).unwrap(), a);
    }

    #[test]
    fn a_text_roundtrip() {
        let a = A::parse_text("192.0.2.42").unwrap();
        assert_eq!(a.to_text(), "192.0.2.42");
        assert!(A::parse_text("not-an-ip").is_err());
    }

    #[test]
    fn aaaa_text_roundtrip() {
        let a = Aaaa::parse_text("::1").unwrap();
        assert_eq!(a.to_text(), "::1");
        assert!(Aaaa::parse_text("192.0.2.1").is_err());
    }
}
