//! Text encodings used by the zone-file ("presentation") form of DNSSEC
//! records: base16 for DS digests and NSEC3 salt/next-hashed-owner, base32hex
//! for NSEC3 hashed owner labels, base64 for DNSKEY/RRSIG key material and
//! signatures.
use data_encoding::{BASE32HEX_NOPAD, BASE64};

pub fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02X}", b)).collect()
}

pub fn from_hex(s: &str) -> Option<Vec<u8>> {
    if s.len() % 2 != 0 {
        return None;
    }
    let mut out = Vec::with_capacity(s.len() / 2);
    let bytes = s.as_bytes();
    for chunk in bytes.chunks(2) {
        let pair = std::str::from_utf8(chunk).ok()?;
        out.push(u8::from_str_radix(pair, 16).ok()?);
    }
    Some(out)
}

pub fn to_base64(bytes: &[u8]) -> String {
    BASE64.encode(bytes)
}

pub fn from_base64(s: &str) -> Option<Vec<u8>> {
    BASE64.decode(s.as_bytes()).ok()
}

pub fn to_base32hex(bytes: &[u8]) -> String {
    BASE32HEX_NOPAD.encode(bytes).to_ascii_lowercase()
}

pub fn from_base32hex(s: &str) -> Option<Vec<u8>> {
    BASE32HEX_NOPAD.decode(s.to_ascii_uppercase().as_bytes()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_roundtrip() {
        let bytes = [0xDE, 0xAD, 0xBE, 0xEF];
        let hex = to_hex(&bytes);
        assert_eq!(hex, "DEADBEEF");
        assert_eq!(from_hex(&hex).unwrap(), bytes);
    }

    #[test]
    fn base64_roundtrip() {
        let bytes = b"hello dnssec";
        let s = to_base64(bytes);
        assert_eq!(from_base64(&s).unwrap(), bytes);
    }

    #[test]
    fn base32hex_roundtrip() {
        let bytes = [1u8, 2, 3, 4, 5];
        let s = to_base32hex(&bytes);
        assert_eq!(from_base32hex(&s).unwrap(), bytes);
    }
}
