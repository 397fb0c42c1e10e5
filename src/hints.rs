//! The resolver hint store: root-server addresses and trust anchors. A
//! read-only collaborator per spec.md §6 — the resolver owns one for its
//! lifetime and never mutates it after construction. The distribution ships
//! a small embedded text format (one line per hint) rather than parsing a
//! real `named.root`/`root.key` file, matching this crate's "opaque-bytes
//! passthrough for what we don't model" stance on anything outside §1's scope.
use std::net::IpAddr;
use std::str::FromStr;

use crate::error::{DNSError, DNSResult};
use crate::name::Name;
use crate::rdata::{Ds, Dnskey};

/// a DNSKEY or DS accepted a priori for a zone, typically the root
/// (spec.md §3 GLOSSARY "Trust anchor").
#[derive(Debug, Clone)]
pub enum TrustAnchor {
    Dnskey(Name, Dnskey),
    Ds(Name, Ds),
}

impl TrustAnchor {
    pub fn zone(&self) -> &Name {
        match self {
            TrustAnchor::Dnskey(name, _) => name,
            TrustAnchor::Ds(name, _) => name,
        }
    }
}

/// root-server addresses and trust anchors, immutable for the resolver's
/// lifetime once built.
#[derive(Debug, Clone, Default)]
pub struct HintStore {
    root_hints: Vec<IpAddr>,
    trust_anchors: Vec<TrustAnchor>,
}

impl HintStore {
    pub fn new() -> Self {
        HintStore::default()
    }

    pub fn with_root_hints(mut self, hints: impl IntoIterator<Item = IpAddr>) -> Self {
        self.root_hints.extend(hints);
        self
    }

    pub fn with_trust_anchor(mut self, anchor: TrustAnchor) -> Self {
        self.trust_anchors.push(anchor);
        self
    }

    pub fn root_hints(&self) -> &[IpAddr] {
        &self.root_hints
    }

    pub fn trust_anchors_for(&self, zone: &Name) -> Vec<&TrustAnchor> {
        self.trust_anchors.iter().filter(|a| a.zone() == zone).collect()
    }

    pub fn has_trust_anchor(&self, zone: &Name) -> bool {
        !self.trust_anchors_for(zone).is_empty()
    }

    /// the 13 IANA root-server addresses, embedded so a resolver can start
    /// cold without a network fetch. Trust anchors are not bundled here —
    /// the root DS/DNSKEY rotates over time and callers are expected to
    /// supply it (e.g. loaded from a local `root.key`-equivalent file).
    pub fn iana_root_hints() -> Self {
        const ROOTS: &[&str] = &[
            "198.41.0.4", "199.9.14.201", "192.33.4.12", "199.7.91.13", "192.203.230.10",
            "192.5.5.241", "192.112.36.4", "198.97.190.53", "192.36.148.17", "192.58.128.30",
            "193.0.14.129", "199.7.83.42", "202.12.27.33",
        ];
        let hints = ROOTS.iter().map(|s| IpAddr::from_str(s).expect("static root hint"));
        HintStore::new().with_root_hints(hints)
    }

    /// parse the embedded "one hint per line" text format:
    /// `hint <address>` or `anchor-ds <zone> <key_tag> <algorithm> <digest_type> <digest-hex>`
    pub fn from_text(text: &str) -> DNSResult<Self> {
        let mut store = HintStore::new();
        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let mut fields = line.split_whitespace();
            match fields.next() {
                Some("hint") => {
                    let addr = fields
                        .next()
                        .ok_or_else(|| DNSError::new("hint line missing address"))?;
                    store.root_hints.push(
                        IpAddr::from_str(addr).map_err(|e| DNSError::new(&e.to_string()))?,
                    );
                }
                Some("anchor-ds") => {
                    let zone = fields
                        .next()
                        .ok_or_else(|| DNSError::new("anchor-ds line missing zone"))?;
                    let key_tag: u16 = fields
                        .next()
                        .ok_or_else(|| DNSError::new("anchor-ds line missing key tag"))?
                        .parse()
                        .map_err(|_| DNSError::new("bad key tag"))?;
                    let algorithm: u8 = fields
                        .next()
                        .ok_or_else(|| DNSError::new("anchor-ds line missing algorithm"))?
                        .parse()
                        .map_err(|_| DNSError::new("bad algorithm"))?;
                    let digest_type: u8 = fields
                        .next()
                        .ok_or_else(|| DNSError::new("anchor-ds line missing digest type"))?
                        .parse()
                        .map_err(|_| DNSError::new("bad digest type"))?;
                    let digest = fields
                        .next()
                        .and_then(crate::wire::text::from_hex)
                        .ok_or_else(|| DNSError::new("bad digest hex"))?;
                    store = store.with_trust_anchor(TrustAnchor::Ds(
                        Name::from_str(zone)?,
                        Ds { key_tag, algorithm, digest_type, digest },
                    ));
                }
                Some(other) => return Err(DNSError::new(&format!("unrecognized hint line kind: {other}"))),
                None => {}
            }
        }
        Ok(store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iana_hints_parse() {
        let store = HintStore::iana_root_hints();
        assert_eq!(store.root_hints().len(), 13);
    }

    #[test]
    fn text_format_roundtrip() {
        let text = "\
            # comment\n\
            hint 198.41.0.4\n\
            anchor-ds . 20326 8 2 E06D44B80B8F1D39A95C0B0D7C65D08458E880409BBC683457104237C7F8EC8\n";
        let store = HintStore::from_text(text).unwrap();
        assert_eq!(store.root_hints().len(), 1);
        assert!(store.has_trust_anchor(&Name::root()));
    }
}
