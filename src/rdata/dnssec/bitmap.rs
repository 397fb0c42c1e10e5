//! The NSEC/NSEC3 type bitmap (RFC4034 §4.1.2 / RFC5155 §3.2): a sequence of
//! windows, each covering 256 type values, with empty windows omitted and
//! the trailing all-zero octets of a non-empty window trimmed.
use std::io::Cursor;

use crate::error::{DNSError, DNSResult, MalformedKind};
use crate::types::RecordType;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TypeBitmap(pub Vec<u16>);

impl TypeBitmap {
    pub fn contains(&self, rtype: u16) -> bool {
        self.0.contains(&rtype)
    }

    /// space-separated mnemonics in ascending order, per the NSEC/NSEC3
    /// presentation convention
    pub fn to_text(&self) -> String {
        let mut types = self.0.clone();
        types.sort_unstable();
        types.dedup();
        types.iter().map(|&t| RecordType::from(t).to_string()).collect::<Vec<_>>().join(" ")
    }

    pub fn to_network_bytes(&self, buffer: &mut Vec<u8>) -> std::io::Result<usize> {
        let start = buffer.len();
        let mut types = self.0.clone();
        types.sort_unstable();
        types.dedup();

        let mut window = 0u8;
        while window as usize * 256 <= u16::MAX as usize {
            let lo = window as u16;
            let in_window: Vec<u16> = types
                .iter()
                .copied()
                .filter(|&t| (t >> 8) as u8 == lo)
                .collect();
            if !in_window.is_empty() {
                let max_bit = in_window.iter().map(|&t| (t & 0xFF) as usize).max().unwrap();
                let nbytes = max_bit / 8 + 1;
                let mut bits = vec![0u8; nbytes];
                for &t in &in_window {
                    let bit = (t & 0xFF) as usize;
                    bits[bit / 8] |= 0x80 >> (bit % 8);
                }
                buffer.push(window);
                buffer.push(bits.len() as u8);
                buffer.extend_from_slice(&bits);
            }
            if window == u8::MAX {
                break;
            }
            window += 1;
        }
        Ok(buffer.len() - start)
    }

    pub fn from_cursor(buffer: &mut Cursor<&[u8]>, end: usize) -> DNSResult<Self> {
        let mut types = Vec::new();
        let whole = *buffer.get_ref();
        let mut pos = buffer.position() as usize;

        while pos < end {
            let window = *whole
                .get(pos)
                .ok_or_else(|| DNSError::Malformed(MalformedKind::Record("truncated bitmap window")))?
                as u16;
            let len = *whole
                .get(pos + 1)
                .ok_or_else(|| DNSError::Malformed(MalformedKind::Record("truncated bitmap length")))?
                as usize;
            if len == 0 || len > 32 {
                return Err(DNSError::Malformed(MalformedKind::Record("invalid bitmap window length")));
            }
            let bits = whole
                .get(pos + 2..pos + 2 + len)
                .ok_or_else(|| DNSError::Malformed(MalformedKind::Record("truncated bitmap data")))?;
            for (i, byte) in bits.iter().enumerate() {
                for bit in 0..8 {
                    if byte & (0x80 >> bit) != 0 {
                        types.push(window * 256 + (i * 8 + bit) as u16);
                    }
                }
            }
            pos += 2 + len;
        }
        buffer.set_position(pos as u64);
        Ok(TypeBitmap(types))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip_trims_trailing_zero_octets() {
        let bitmap = TypeBitmap(vec![1, 16, 46, 47]); // A, TXT, RRSIG, NSEC
        let mut buf = Vec::new();
        bitmap.to_network_bytes(&mut buf).unwrap();

        let mut cur = Cursor::new(buf.as_slice());
        let decoded = TypeBitmap::from_cursor(&mut cur, buf.len()).unwrap();
        let mut expected = bitmap.0.clone();
        expected.sort_unstable();
        let mut got = decoded.0.clone();
        got.sort_unstable();
        assert_eq!(got, expected);
        // RRSIG=46 is bit 6 of byte 5 (0-indexed) -> window has 6 bytes, not 32
        assert!(buf.len() < 2 + 32);
    }

    #[test]
    fn to_text_renders_sorted_mnemonics() {
        let bitmap = TypeBitmap(vec![16, 1, 46]);
        assert_eq!(bitmap.to_text(), "A RRSIG TXT");
    }

    #[test]
    fn multi_window_roundtrip() {
        let bitmap = TypeBitmap(vec![1, 257]); // A (window 0), CAA (window 1)
        let mut buf = Vec::new();
        bitmap.to_network_bytes(&mut buf).unwrap();
        let mut cur = Cursor::new(buf.as_slice());
        let decoded = TypeBitmap::from_cursor(&mut cur, buf.len()).unwrap();
        assert!(decoded.contains(1));
        assert!(decoded.contains(257));
    }
}
