//! SRV: service location record (RFC2782). Sorted by priority ascending;
//! weighted reservoir selection among equal-priority members happens at
//! query time in the client/resolver, not in the codec.
use std::io::Cursor;

use crate::error::{DNSError, DNSResult};
use crate::name::Name;
use crate::wire::ToFromNetworkOrder;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Srv {
    pub priority: u16,
    pub weight: u16,
    pub port: u16,
    pub target: Name,
}

impl Srv {
    pub fn to_network_bytes(&self, buffer: &mut Vec<u8>) -> std::io::Result<usize> {
        let start = buffer.len();
        self.priority.to_network_bytes(buffer)?;
        self.weight.to_network_bytes(buffer)?;
        self.port.to_network_bytes(buffer)?;
        self.target.to_network_bytes(buffer)?;
        Ok(buffer.len() - start)
    }

    pub(crate) fn from_cursor(buffer: &mut Cursor<&[u8]>) -> DNSResult<Self> {
        let mut srv = Srv::default();
        srv.priority.from_network_bytes(buffer)?;
        srv.weight.from_network_bytes(buffer)?;
        srv.port.from_network_bytes(buffer)?;
        srv.target.from_network_bytes(buffer)?;
        Ok(srv)
    }

    pub fn to_text(&self) -> String {
        format!("{} {} {} {}", self.priority, self.weight, self.port, self.target)
    }

    pub fn parse_text(tokens: &[&str], origin: &Name) -> DNSResult<Self> {
        if tokens.len() != 4 {
            return Err(DNSError::new("SRV requires 4 fields"));
        }
        let field = |s: &str| s.parse::<u16>().map_err(|_| DNSError::new(&format!("invalid SRV field: {s}")));
        Ok(Srv {
            priority: field(tokens[0])?,
            weight: field(tokens[1])?,
            port: field(tokens[2])?,
            target: Name::from_text_with_origin(tokens[3], origin)?,
        })
    }
}

/// weighted reservoir pick among the lowest-priority tier of an SRV RRset,
/// per RFC2782's selection algorithm
pub fn pick_weighted<'a, R: rand::Rng>(records: &'a [Srv], rng: &mut R) -> Option<&'a Srv> {
    let min_priority = records.iter().map(|r| r.priority).min()?;
    let tier: Vec<&Srv> = records.iter().filter(|r| r.priority == min_priority).collect();
    let total_weight: u32 = tier.iter().map(|r| r.weight as u32).sum();
    if total_weight == 0 {
        return tier.first().copied();
    }
    let mut pick = rng.gen_range(0..total_weight);
    for r in &tier {
        if pick < r.weight as u32 {
            return Some(r);
        }
        pick -= r.weight as u32;
    }
    tier.last().copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn srv_roundtrip() {
        let srv = Srv {
            priority: 10,
            weight: 60,
            port: 5060,
            target: Name::from_str("sip.example.com.").unwrap(),
        };
        let mut buf = Vec::new();
        srv.to_network_bytes(&mut buf).unwrap();
        let mut cur = Cursor::new(buf.as_slice());
        assert_eq!(Srv::from_cursor(&mut cur).unwrap(), srv);
    }

    #[test]
    fn weighted_pick_prefers_lowest_priority_tier() {
        let records = vec![
            Srv { priority: 20, weight: 100, port: 1, target: Name::root() },
            Srv { priority: 10, weight: 0, port: 2, target: Name::root() },
        ];
        let mut rng = rand::thread_rng();
        let picked = pick_weighted(&records, &mut rng).unwrap();
        assert_eq!(picked.priority, 10);
    }

    #[test]
    fn srv_text_roundtrip() {
        let origin = Name::from_str("example.com.").unwrap();
        let srv = Srv::parse_text(&["10", "60", "5060", "sip"], &origin).unwrap();
        assert_eq!(srv.to_text(), "10 60 5060 sip.example.com.");
    }
}
