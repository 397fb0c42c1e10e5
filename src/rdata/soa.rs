//! SOA: zone authority record. `minimum` doubles as the negative-caching TTL
//! (spec.md §4.6, §4.7 negative-answer classification).
use std::io::Cursor;

use crate::error::{DNSError, DNSResult};
use crate::name::Name;
use crate::wire::ToFromNetworkOrder;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Soa {
    pub mname: Name,
    pub rname: Name,
    pub serial: u32,
    pub refresh: u32,
    pub retry: u32,
    pub expire: u32,
    pub minimum: u32,
}

impl Soa {
    pub fn to_network_bytes(&self, buffer: &mut Vec<u8>) -> std::io::Result<usize> {
        let start = buffer.len();
        self.mname.to_network_bytes(buffer)?;
        self.rname.to_network_bytes(buffer)?;
        self.serial.to_network_bytes(buffer)?;
        self.refresh.to_network_bytes(buffer)?;
        self.retry.to_network_bytes(buffer)?;
        self.expire.to_network_bytes(buffer)?;
        self.minimum.to_network_bytes(buffer)?;
        Ok(buffer.len() - start)
    }

    pub(crate) fn from_cursor(buffer: &mut Cursor<&[u8]>) -> DNSResult<Self> {
        let mut soa = Soa::default();
        soa.mname.from_network_bytes(buffer)?;
        soa.rname.from_network_bytes(buffer)?;
        soa.serial.from_network_bytes(buffer)?;
        soa.refresh.from_network_bytes(buffer)?;
        soa.retry.from_network_bytes(buffer)?;
        soa.expire.from_network_bytes(buffer)?;
        soa.minimum.from_network_bytes(buffer)?;
        Ok(soa)
    }

    pub fn to_text(&self) -> String {
        format!(
            "{} {} {} {} {} {} {}",
            self.mname, self.rname, self.serial, self.refresh, self.retry, self.expire, self.minimum
        )
    }

    pub fn parse_text(tokens: &[&str], origin: &Name) -> DNSResult<Self> {
        if tokens.len() != 7 {
            return Err(DNSError::new("SOA requires 7 fields"));
        }
        let field = |s: &str| s.parse::<u32>().map_err(|_| DNSError::new(&format!("invalid SOA field: {s}")));
        Ok(Soa {
            mname: Name::from_text_with_origin(tokens[0], origin)?,
            rname: Name::from_text_with_origin(tokens[1], origin)?,
            serial: field(tokens[2])?,
            refresh: field(tokens[3])?,
            retry: field(tokens[4])?,
            expire: field(tokens[5])?,
            minimum: field(tokens[6])?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn soa_roundtrip() {
        let soa = Soa {
            mname: Name::from_str("ns1.example.com.").unwrap(),
            rname: Name::from_str("hostmaster.example.com.").unwrap(),
            serial: 2024010100,
            refresh: 7200,
            retry: 3600,
            expire: 1209600,
            minimum: 60,
        };
        let mut buf = Vec::new();
        soa.to_network_bytes(&mut buf).unwrap();
        let mut cur = Cursor::new(buf.as_slice());
        assert_eq!(Soa::from_cursor(&mut cur).unwrap(), soa);
    }

    #[test]
    fn soa_text_roundtrip() {
        let origin = Name::from_str("example.com.").unwrap();
        let soa = Soa::parse_text(
            &["ns1.example.com.", "hostmaster.example.com.", "2024010100", "7200", "3600", "1209600", "60"],
            &origin,
        )
        .unwrap();
        assert_eq!(soa.serial, 2024010100);
        assert_eq!(soa.to_text(), "ns1.example.com. hostmaster.example.com. 2024010100 7200 3600 1209600 60");
    }
}
