//! NSEC: authenticated denial of existence via the "next" owner name in
//! canonical zone order (RFC4034 §4).
use std::io::Cursor;

use crate::error::DNSResult;
use crate::name::Name;
use crate::rdata::dnssec::bitmap::TypeBitmap;
use crate::wire::ToFromNetworkOrder;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Nsec {
    pub next_domain: Name,
    pub types: TypeBitmap,
}

impl Nsec {
    pub fn to_network_bytes(&self, buffer: &mut Vec<u8>) -> std::io::Result<usize> {
        let start = buffer.len();
        self.next_domain.to_network_bytes(buffer)?;
        self.types.to_network_bytes(buffer)?;
        Ok(buffer.len() - start)
    }

    pub(crate) fn from_cursor(buffer: &mut Cursor<&[u8]>, end: usize) -> DNSResult<Self> {
        let mut next_domain = Name::default();
        next_domain.from_network_bytes(buffer)?;
        let types = TypeBitmap::from_cursor(buffer, end)?;
        Ok(Nsec { next_domain, types })
    }

    pub fn to_text(&self) -> String {
        format!("{} {}", self.next_domain, self.types.to_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn nsec_roundtrip() {
        let nsec = Nsec {
            next_domain: Name::from_str("b.example.com.").unwrap(),
            types: TypeBitmap(vec![1, 2, 15, 16, 46, 47]),
        };
        let mut buf = Vec::new();
        nsec.to_network_bytes(&mut buf).unwrap();
        let mut cur = Cursor::new(buf.as_slice());
        let decoded = Nsec::from_cursor(&mut cur, buf.len()).unwrap();
        assert_eq!(decoded.next_domain, nsec.next_domain);
        assert!(decoded.types.contains(46));
    }

    #[test]
    fn nsec_to_text_joins_next_domain_and_bitmap() {
        let nsec = Nsec { next_domain: Name::from_str("b.example.com.").unwrap(), types: TypeBitmap(vec![1, 16]) };
        assert_eq!(nsec.to_text(), "b.example.com. A TXT");
    }
}
