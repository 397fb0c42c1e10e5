//! MX: mail-exchange priority + target.
use std::io::Cursor;

use crate::error::{DNSError, DNSResult};
use crate::name::Name;
use crate::wire::ToFromNetworkOrder;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Mx {
    pub preference: u16,
    pub exchange: Name,
}

impl Mx {
    pub fn to_network_bytes(&self, buffer: &mut Vec<u8>) -> std::io::Result<usize> {
        let start = buffer.len();
        self.preference.to_network_bytes(buffer)?;
        self.exchange.to_network_bytes(buffer)?;
        Ok(buffer.len() - start)
    }

    pub(crate) fn from_cursor(buffer: &mut Cursor<&[u8]>) -> DNSResult<Self> {
        let mut mx = Mx::default();
        mx.preference.from_network_bytes(buffer)?;
        mx.exchange.from_network_bytes(buffer)?;
        Ok(mx)
    }

    pub fn to_text(&self) -> String {
        format!("{} {}", self.preference, self.exchange)
    }

    pub fn parse_text(tokens: &[&str], origin: &Name) -> DNSResult<Self> {
        if tokens.len() != 2 {
            return Err(DNSError::new("MX requires 2 fields"));
        }
        let preference = tokens[0].parse::<u16>().map_err(|_| DNSError::new("invalid MX preference"))?;
        Ok(Mx { preference, exchange: Name::from_text_with_origin(tokens[1], origin)? })
    }
}

/// sorts an MX/SRV-like RRset by priority ascending; equal-priority members
/// keep their listed order (weighted selection among ties is the caller's
/// responsibility at query time, per spec.md §4.2)
pub fn sort_by_preference(records: &mut [Mx]) {
    records.sort_by_key(|r| r.preference);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn mx_roundtrip() {
        let mx = Mx { preference: 10, exchange: Name::from_str("mail.example.com.").unwrap() };
        let mut buf = Vec::new();
        mx.to_network_bytes(&mut buf).unwrap();
        let mut cur = Cursor::new(buf.as_slice());
        assert_eq!(Mx::from_cursor(&mut cur).unwrap(), mx);
    }

    #[test]
    fn sorts_ascending_stable() {
        let mut records = vec![
            Mx { preference: 20, exchange: Name::from_str("b.example.com.").unwrap() },
            Mx { preference: 10, exchange: Name::from_str("a.example.com.").unwrap() },
            Mx { preference: 10, exchange: Name::from_str("c.example.com.").unwrap() },
        ];
        sort_by_preference(&mut records);
        assert_eq!(records[0].exchange.to_string(), "a.example.com.");
        assert_eq!(records[1].exchange.to_string(), "c.example.com.");
        assert_eq!(records[2].exchange.to_string(), "b.example.com.");
    }

    #[test]
    fn mx_text_roundtrip() {
        let origin = Name::from_str("example.com.").unwrap();
        let mx = Mx::parse_text(&["10", "mail"], &origin).unwrap();
        assert_eq!(mx.to_text(), "10 mail.example.com.");
    }
}
