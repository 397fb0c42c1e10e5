//! TXT: a sequence of character-strings filling the whole RDATA; HINFO: a
//! fixed pair of character-strings (CPU, OS).
use std::io::Cursor;

use crate::wire::primitive::CharacterString;
use crate::error::DNSResult;
use crate::wire::ToFromNetworkOrder;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Txt(pub Vec<CharacterString>);

impl Txt {
    pub fn to_network_bytes(&self, buffer: &mut Vec<u8>) -> std::io::Result<usize> {
        let start = buffer.len();
        for s in &self.0 {
            s.to_network_bytes(buffer)?;
        }
        Ok(buffer.len() - start)
    }

    /// TXT RDATA is self-describing strings until `end` is reached; there is
    /// no outer count, so the boundary must come from the record's rdlength
    pub(crate) fn from_cursor(buffer: &mut Cursor<&[u8]>, end: usize) -> DNSResult<Self> {
        let mut strings = Vec::new();
        while (buffer.position() as usize) < end {
            let mut s = CharacterString::default();
            s.from_network_bytes(buffer)?;
            strings.push(s);
        }
        Ok(Txt(strings))
    }

    /// presentation form: each string double-quoted and space-separated,
    /// per spec.md §4.2's TXT tie-break rule
    pub fn to_text(&self) -> String {
        self.0.iter().map(|s| s.to_quoted_string()).collect::<Vec<_>>().join(" ")
    }

    /// each whitespace-separated token becomes one character-string, quotes
    /// stripped but not otherwise unescaped
    pub fn parse_text(tokens: &[&str]) -> Self {
        Txt(tokens.iter().map(|t| CharacterString::from_str_lossless(t.trim_matches('"'))).collect())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Hinfo {
    pub cpu: CharacterString,
    pub os: CharacterString,
}

impl Hinfo {
    pub fn to_network_bytes(&self, buffer: &mut Vec<u8>) -> std::io::Result<usize> {
        let start = buffer.len();
        self.cpu.to_network_bytes(buffer)?;
        self.os.to_network_bytes(buffer)?;
        Ok(buffer.len() - start)
    }

    pub(crate) fn from_cursor(buffer: &mut Cursor<&[u8]>) -> DNSResult<Self> {
        let mut hinfo = Hinfo::default();
        hinfo.cpu.from_network_bytes(buffer)?;
        hinfo.os.from_network_bytes(buffer)?;
        Ok(hinfo)
    }

    pub fn to_text(&self) -> String {
        format!(
            "{} {}",
            CharacterString(self.cpu.0.clone()).to_quoted_string(),
            CharacterString(self.os.0.clone()).to_quoted_string()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn txt_roundtrip_and_render() {
        let txt = Txt(vec![
            CharacterString::from_str_lossless("v=spf1 -all"),
            CharacterString::from_str_lossless("second"),
        ]);
        let mut buf = Vec::new();
        txt.to_network_bytes(&mut buf).unwrap();
        let mut cur = Cursor::new(buf.as_slice());
        let decoded = Txt::from_cursor(&mut cur, buf.len()).unwrap();
        assert_eq!(decoded, txt);
        assert_eq!(decoded.to_text(), "\"v=spf1 -all\" \"second\"");
    }

    #[test]
    fn txt_parse_text_strips_quotes() {
        let txt = Txt::parse_text(&["\"hello\"", "world"]);
        assert_eq!(txt.0[0].0, b"hello");
        assert_eq!(txt.0[1].0, b"world");
    }

    #[test]
    fn hinfo_roundtrip() {
        let hinfo = Hinfo {
            cpu: CharacterString::from_str_lossless("INTEL"),
            os: CharacterString::from_str_lossless("LINUX"),
        };
        let mut buf = Vec::new();
        hinfo.to_network_bytes(&mut buf).unwrap();
        let mut cur = Cursor::new(buf.as_slice());
        assert_eq!(Hinfo::from_cursor(&mut cur).unwrap(), hinfo);
    }
}
