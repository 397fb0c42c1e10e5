//! The Question section entry: (name, type, class). Immutable once built,
//! per spec.md §3.
use std::io::Cursor;

use crate::error::DNSResult;
use crate::name::Name;
use crate::types::{RecordClass, RecordType};
use crate::wire::ToFromNetworkOrder;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Question {
    pub qname: Name,
    pub qtype: RecordType,
    pub qclass: RecordClass,
}

impl Question {
    pub fn new(qname: Name, qtype: RecordType, qclass: RecordClass) -> Self {
        Question { qname, qtype, qclass }
    }

    /// compares label-for-label including case, as required for 0x20
    /// validation of an inbound response's echoed question
    pub fn matches_case_sensitive(&self, other: &Question) -> bool {
        self.qtype == other.qtype
            && self.qclass == other.qclass
            && self.qname.labels().len() == other.qname.labels().len()
            && self
                .qname
                .labels()
                .iter()
                .zip(other.qname.labels())
                .all(|(a, b)| a == b)
    }

    pub fn to_network_bytes_compressed(
        &self,
        buffer: &mut Vec<u8>,
        dictionary: &mut std::collections::HashMap<String, u16>,
    ) -> std::io::Result<usize> {
        let start = buffer.len();
        self.qname.to_network_bytes_compressed(buffer, dictionary)?;
        self.qtype.to_network_bytes(buffer)?;
        self.qclass.to_network_bytes(buffer)?;
        Ok(buffer.len() - start)
    }
}

impl<'a> ToFromNetworkOrder<'a> for Question {
    fn to_network_bytes(&self, buffer: &mut Vec<u8>) -> std::io::Result<usize> {
        let start = buffer.len();
        self.qname.to_network_bytes(buffer)?;
        self.qtype.to_network_bytes(buffer)?;
        self.qclass.to_network_bytes(buffer)?;
        Ok(buffer.len() - start)
    }

    fn from_network_bytes(&mut self, buffer: &mut Cursor<&'a [u8]>) -> DNSResult<()> {
        self.qname.from_network_bytes(buffer)?;
        self.qtype.from_network_bytes(buffer)?;
        self.qclass.from_network_bytes(buffer)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn roundtrip() {
        let q = Question::new(Name::from_str("example.com.").unwrap(), RecordType::A, RecordClass::IN);
        let mut buf = Vec::new();
        q.to_network_bytes(&mut buf).unwrap();
        let mut cur = Cursor::new(buf.as_slice());
        let mut decoded = Question::default();
        decoded.from_network_bytes(&mut cur).unwrap();
        assert_eq!(decoded, q);
    }

    #[test]
    fn case_sensitive_match() {
        let a = Question::new(Name::from_str("Example.com.").unwrap(), RecordType::A, RecordClass::IN);
        let b = Question::new(Name::from_str("example.COM.").unwrap(), RecordType::A, RecordClass::IN);
        let c = Question::new(Name::from_str("Example.com.").unwrap(), RecordType::A, RecordClass::IN);
        assert!(!a.matches_case_sensitive(&b));
        assert!(a.matches_case_sensitive(&c));
    }
}
