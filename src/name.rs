//! Domain names: presentation-format parsing/rendering, wire codec with
//! compression-pointer following on decode and a dictionary-aware encoder
//! for compression on encode (kept outside the `ToFromNetworkOrder` trait
//! since compression is a message-scoped concern, not a per-field one).
use std::collections::HashMap;
use std::fmt;
use std::io::Cursor;

use crate::error::{DNSError, DNSResult, MalformedKind};
use crate::util::{is_pointer, is_reserved_label_tag};
use crate::wire::ToFromNetworkOrder;

/// maximum hops the decoder will follow chasing compression pointers for a
/// single name, independent of the 255-octet total length cap
const MAX_POINTER_HOPS: usize = 126;
const MAX_NAME_LENGTH: usize = 255;
const MAX_LABEL_LENGTH: usize = 63;
/// pointers are a 14-bit offset: the top two bits of the first octet are the
/// `11` tag, so only offsets below 2^14 are representable
const MAX_POINTER_OFFSET: usize = 0x3FFF;

/// a domain name as a sequence of raw label octets, most significant
/// (closest to the root) last. Case is preserved for display but every
/// comparison and compression lookup is case-insensitive per RFC1035 §2.3.3.
#[derive(Debug, Clone, Default, Eq)]
pub struct Name {
    labels: Vec<Vec<u8>>,
}

impl Name {
    pub fn root() -> Self {
        Name { labels: Vec::new() }
    }

    pub fn is_root(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn labels(&self) -> &[Vec<u8>] {
        &self.labels
    }

    /// total wire length: each label contributes len-octet + data, plus the
    /// trailing root octet
    pub fn wire_len(&self) -> usize {
        self.labels.iter().map(|l| l.len() + 1).sum::<usize>() + 1
    }

    /// parse-from-text with an origin for relative names, per spec.md
    /// §4.2's per-record-type text parser: a token ending in `.` is
    /// absolute; anything else is relative to `origin`, e.g. `"www"` under
    /// origin `example.com.` becomes `www.example.com.`, matching zone-file
    /// presentation-format convention.
    pub fn from_text_with_origin(token: &str, origin: &Name) -> DNSResult<Name> {
        if token.ends_with('.') || token.is_empty() {
            return std::str::FromStr::from_str(token);
        }
        let mut name: Name = std::str::FromStr::from_str(token)?;
        name.labels.extend(origin.labels.iter().cloned());
        if name.wire_len() > MAX_NAME_LENGTH {
            return Err(DNSError::Malformed(MalformedKind::Name("name exceeds 255 octets")));
        }
        Ok(name)
    }

    pub fn parent(&self) -> Option<Name> {
        if self.labels.is_empty() {
            None
        } else {
            Some(Name { labels: self.labels[1..].to_vec() })
        }
    }

    /// true if `self` is `other` or a descendant of it
    pub fn is_subdomain_of(&self, other: &Name) -> bool {
        if other.labels.len() > self.labels.len() {
            return false;
        }
        let offset = self.labels.len() - other.labels.len();
        self.labels[offset..]
            .iter()
            .zip(other.labels.iter())
            .all(|(a, b)| a.eq_ignore_ascii_case(b))
    }

    /// lowercased, uncompressed canonical form, as used for DNSSEC RRset
    /// ordering and signing (RFC4034 §6.2)
    pub fn canonical(&self) -> Name {
        Name {
            labels: self
                .labels
                .iter()
                .map(|l| l.to_ascii_lowercase())
                .collect(),
        }
    }

    /// apply 0x20 case randomization to the presentation form: a sender-side
    /// defense against off-path spoofing that survives case-insensitive
    /// comparison on the way back
    pub fn randomize_case<R: rand::Rng>(&self, rng: &mut R) -> Name {
        let labels = self
            .labels
            .iter()
            .map(|l| {
                l.iter()
                    .map(|&b| {
                        if b.is_ascii_alphabetic() && rng.gen::<bool>() {
                            b ^ 0x20
                        } else {
                            b
                        }
                    })
                    .collect()
            })
            .collect();
        Name { labels }
    }

    /// build the name one label longer, with `label` as the new leftmost
    /// (most specific) label — e.g. `example.`.with_prefix_label(b"*")` for
    /// a wildcard owner name (RFC4035 §5.4, RFC5155 §8.3).
    pub fn with_prefix_label(&self, label: &[u8]) -> Name {
        let mut labels = Vec::with_capacity(self.labels.len() + 1);
        labels.push(label.to_vec());
        labels.extend(self.labels.iter().cloned());
        Name { labels }
    }

    fn push_label(&mut self, label: Vec<u8>) -> DNSResult<()> {
        if label.len() > MAX_LABEL_LENGTH {
            return Err(DNSError::Malformed(MalformedKind::Name("label exceeds 63 octets")));
        }
        self.labels.push(label);
        if self.wire_len() > MAX_NAME_LENGTH {
            return Err(DNSError::Malformed(MalformedKind::Name("name exceeds 255 octets")));
        }
        Ok(())
    }

    /// encode with message-scoped compression: `dictionary` maps a
    /// lowercased dotted suffix to the buffer offset it was first written at.
    /// Only offsets under 2^14 are usable as pointer targets, matching the
    /// 14-bit pointer field.
    pub fn to_network_bytes_compressed(
        &self,
        buffer: &mut Vec<u8>,
        dictionary: &mut HashMap<String, u16>,
    ) -> std::io::Result<usize> {
        let start_len = buffer.len();

        for i in 0..self.labels.len() {
            let suffix = self.suffix_key(i);

            if let Some(&offset) = dictionary.get(&suffix) {
                let pointer = 0xC000u16 | offset;
                buffer.push((pointer >> 8) as u8);
                buffer.push((pointer & 0xFF) as u8);
                return Ok(buffer.len() - start_len);
            }

            if buffer.len() <= MAX_POINTER_OFFSET {
                dictionary.insert(suffix, buffer.len() as u16);
            }

            let label = &self.labels[i];
            buffer.push(label.len() as u8);
            buffer.extend_from_slice(label);
        }

        buffer.push(0);
        Ok(buffer.len() - start_len)
    }

    fn suffix_key(&self, from: usize) -> String {
        self.labels[from..]
            .iter()
            .map(|l| String::from_utf8_lossy(l).to_ascii_lowercase())
            .collect::<Vec<_>>()
            .join(".")
    }
}

impl PartialEq for Name {
    fn eq(&self, other: &Self) -> bool {
        self.labels.len() == other.labels.len()
            && self
                .labels
                .iter()
                .zip(other.labels.iter())
                .all(|(a, b)| a.eq_ignore_ascii_case(b))
    }
}

impl std::hash::Hash for Name {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        for label in &self.labels {
            label.to_ascii_lowercase().hash(state);
        }
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.labels.is_empty() {
            return write!(f, ".");
        }
        for label in &self.labels {
            for &b in label {
                match b {
                    b'.' | b'\\' => write!(f, "\\{}", b as char)?,
                    0x21..=0x7e => write!(f, "{}", b as char)?,
                    _ => write!(f, "\\{:03}", b)?,
                }
            }
            write!(f, ".")?;
        }
        Ok(())
    }
}

impl std::str::FromStr for Name {
    type Err = DNSError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut name = Name::root();
        if s == "." || s.is_empty() {
            return Ok(name);
        }

        let chars: Vec<char> = s.chars().collect();
        let mut label = Vec::new();
        let mut i = 0;
        while i < chars.len() {
            match chars[i] {
                '\\' if i + 3 < chars.len() && chars[i + 1].is_ascii_digit() => {
                    let digits: String = chars[i + 1..i + 4].iter().collect();
                    let byte: u8 = digits
                        .parse()
                        .map_err(|_| DNSError::Malformed(MalformedKind::Name("bad \\DDD escape")))?;
                    label.push(byte);
                    i += 4;
                }
                '\\' if i + 1 < chars.len() => {
                    label.push(chars[i + 1] as u8);
                    i += 2;
                }
                '.' => {
                    name.push_label(std::mem::take(&mut label))?;
                    i += 1;
                }
                c => {
                    let mut buf = [0u8; 4];
                    label.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
                    i += 1;
                }
            }
        }
        if !label.is_empty() {
            name.push_label(label)?;
        }
        Ok(name)
    }
}

impl<'a> ToFromNetworkOrder<'a> for Name {
    fn to_network_bytes(&self, buffer: &mut Vec<u8>) -> std::io::Result<usize> {
        let start = buffer.len();
        for label in &self.labels {
            buffer.push(label.len() as u8);
            buffer.extend_from_slice(label);
        }
        buffer.push(0);
        Ok(buffer.len() - start)
    }

    fn from_network_bytes(&mut self, buffer: &mut Cursor<&'a [u8]>) -> DNSResult<()> {
        self.labels.clear();

        let whole = *buffer.get_ref();
        let mut cursor_offset = buffer.position() as usize;
        let mut end_position: Option<u64> = None;
        let mut hops = 0usize;
        let mut total_len = 1usize; // trailing root octet

        loop {
            let tag = *whole
                .get(cursor_offset)
                .ok_or_else(|| DNSError::Malformed(MalformedKind::Name("truncated name")))?;

            if tag == 0 {
                if end_position.is_none() {
                    end_position = Some((cursor_offset + 1) as u64);
                }
                break;
            }

            if is_pointer(tag) {
                hops += 1;
                if hops > MAX_POINTER_HOPS {
                    return Err(DNSError::Malformed(MalformedKind::Name(
                        "too many compression pointer hops",
                    )));
                }
                let lo = *whole
                    .get(cursor_offset + 1)
                    .ok_or_else(|| DNSError::Malformed(MalformedKind::Name("truncated pointer")))?;
                let target = (((tag & 0x3F) as usize) << 8) | lo as usize;

                if end_position.is_none() {
                    end_position = Some((cursor_offset + 2) as u64);
                }
                if target >= cursor_offset {
                    return Err(DNSError::Malformed(MalformedKind::Name(
                        "compression pointer does not point backward",
                    )));
                }
                cursor_offset = target;
                continue;
            }

            if is_reserved_label_tag(tag) {
                return Err(DNSError::Malformed(MalformedKind::Name(
                    "reserved label length tag",
                )));
            }

            let len = tag as usize;
            if len > MAX_LABEL_LENGTH {
                return Err(DNSError::Malformed(MalformedKind::Name("label exceeds 63 octets")));
            }
            cursor_offset += 1;
            let label = whole
                .get(cursor_offset..cursor_offset + len)
                .ok_or_else(|| DNSError::Malformed(MalformedKind::Name("truncated label")))?;
            self.labels.push(label.to_vec());
            cursor_offset += len;
            total_len += len + 1;
            if total_len > MAX_NAME_LENGTH {
                return Err(DNSError::Malformed(MalformedKind::Name("name exceeds 255 octets")));
            }
        }

        buffer.set_position(end_position.expect("loop always assigns before breaking"));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn parses_and_displays() {
        let n = Name::from_str("www.example.com.").unwrap();
        assert_eq!(n.to_string(), "www.example.com.");
        assert_eq!(n.labels().len(), 3);
    }

    #[test]
    fn root_is_empty() {
        let n = Name::from_str(".").unwrap();
        assert!(n.is_root());
        assert_eq!(n.wire_len(), 1);
    }

    #[test]
    fn relative_name_resolves_against_origin() {
        let origin = Name::from_str("example.com.").unwrap();
        let relative = Name::from_text_with_origin("www", &origin).unwrap();
        assert_eq!(relative.to_string(), "www.example.com.");

        let absolute = Name::from_text_with_origin("other.test.", &origin).unwrap();
        assert_eq!(absolute.to_string(), "other.test.");
    }

    #[test]
    fn case_insensitive_equality() {
        let a = Name::from_str("Example.COM.").unwrap();
        let b = Name::from_str("example.com.").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn subdomain_relationship() {
        let child = Name::from_str("www.example.com.").unwrap();
        let parent = Name::from_str("example.com.").unwrap();
        assert!(child.is_subdomain_of(&parent));
        assert!(!parent.is_subdomain_of(&child));
    }

    #[test]
    fn uncompressed_roundtrip() {
        let n = Name::from_str("a.b.c.").unwrap();
        let mut buf = Vec::new();
        n.to_network_bytes(&mut buf).unwrap();

        let mut cur = Cursor::new(buf.as_slice());
        let mut decoded = Name::default();
        decoded.from_network_bytes(&mut cur).unwrap();
        assert_eq!(decoded, n);
        assert_eq!(cur.position() as usize, buf.len());
    }

    #[test]
    fn compressed_pointer_decode() {
        // "example.com." written at offset 0, then a name that points back at it
        let base = Name::from_str("example.com.").unwrap();
        let mut buf = Vec::new();
        base.to_network_bytes(&mut buf).unwrap();
        let pointer_offset = buf.len();
        buf.push(0xC0);
        buf.push(0x00);

        let mut cur = Cursor::new(buf.as_slice());
        cur.set_position(pointer_offset as u64);
        let mut decoded = Name::default();
        decoded.from_network_bytes(&mut cur).unwrap();
        assert_eq!(decoded, base);
        assert_eq!(cur.position() as usize, buf.len());
    }

    #[test]
    fn rejects_forward_pointer() {
        let mut buf = vec![0xC0, 0x05, 0, 0, 0, 0];
        let mut cur = Cursor::new(buf.as_mut_slice() as &[u8]);
        let mut decoded = Name::default();
        assert!(decoded.from_network_bytes(&mut cur).is_err());
    }

    #[test]
    fn compression_dictionary_reuses_suffix() {
        let a = Name::from_str("www.example.com.").unwrap();
        let b = Name::from_str("mail.example.com.").unwrap();
        let mut buf = Vec::new();
        let mut dict = HashMap::new();
        a.to_network_bytes_compressed(&mut buf, &mut dict).unwrap();
        let before = buf.len();
        b.to_network_bytes_compressed(&mut buf, &mut dict).unwrap();
        // "mail" label plus a 2-byte pointer back into "example.com."
        assert_eq!(buf.len() - before, 4 + 1 + 2);
    }
}
