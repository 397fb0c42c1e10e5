//! OPT: the EDNS(0) pseudo-RR (RFC6891). The owner name, class (UDP payload
//! size) and TTL (ext_rcode/version/flags) reinterpretation lives on the
//! envelope in `rr.rs`; this module only covers the options-list RDATA.
use std::io::Cursor;

use crate::error::DNSResult;
use crate::wire::text::to_hex;
use crate::wire::ToFromNetworkOrder;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdnsOption {
    pub code: u16,
    pub data: Vec<u8>,
}

/// well-known EDNS option codes this crate assigns on outbound queries
pub const OPT_CODE_NSID: u16 = 3;
pub const OPT_CODE_DAU: u16 = 5; // DNSSEC Algorithm Understood
pub const OPT_CODE_DHU: u16 = 6; // DS Hash Understood
pub const OPT_CODE_N3U: u16 = 7; // NSEC3 Hash Understood
pub const OPT_CODE_COOKIE: u16 = 10;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Opt {
    pub options: Vec<EdnsOption>,
}

impl Opt {
    pub fn to_network_bytes(&self, buffer: &mut Vec<u8>) -> std::io::Result<usize> {
        let start = buffer.len();
        for opt in &self.options {
            opt.code.to_network_bytes(buffer)?;
            (opt.data.len() as u16).to_network_bytes(buffer)?;
            buffer.extend_from_slice(&opt.data);
        }
        Ok(buffer.len() - start)
    }

    pub(crate) fn from_cursor(buffer: &mut Cursor<&[u8]>, end: usize) -> DNSResult<Self> {
        let mut options = Vec::new();
        while (buffer.position() as usize) < end {
            let mut code = 0u16;
            code.from_network_bytes(buffer)?;
            let mut len = 0u16;
            len.from_network_bytes(buffer)?;
            let mut data = vec![0u8; len as usize];
            std::io::Read::read_exact(buffer, &mut data)?;
            options.push(EdnsOption { code, data });
        }
        Ok(Opt { options })
    }

    pub fn get(&self, code: u16) -> Option<&EdnsOption> {
        self.options.iter().find(|o| o.code == code)
    }

    /// diagnostic form only: `OPT` carries protocol metadata, not zone data,
    /// so there is no presentation-format parser to match
    pub fn to_text(&self) -> String {
        self.options
            .iter()
            .map(|o| format!("OPT={} {}", o.code, to_hex(&o.data)))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opt_roundtrip() {
        let opt = Opt {
            options: vec![
                EdnsOption { code: OPT_CODE_DAU, data: vec![8, 13, 14] },
                EdnsOption { code: OPT_CODE_COOKIE, data: vec![1, 2, 3, 4, 5, 6, 7, 8] },
            ],
        };
        let mut buf = Vec::new();
        opt.to_network_bytes(&mut buf).unwrap();
        let mut cur = Cursor::new(buf.as_slice());
        let decoded = Opt::from_cursor(&mut cur, buf.len()).unwrap();
        assert_eq!(decoded, opt);
        assert!(decoded.get(OPT_CODE_DAU).is_some());
    }
}
