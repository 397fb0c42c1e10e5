//! Pure DNSSEC validation primitives: signature verification, RRSIG/RRset
//! matching, and DS/DNSKEY authentication. These functions never re-enter
//! the resolver — the caller (`resolver/mod.rs`) is responsible for
//! fetching the DNSKEY/DS material first; this module only judges whether
//! the material it's handed proves what it claims to prove (spec.md §4.7).
use ring::digest;
use ring::signature;

use crate::name::Name;
use crate::rdata::dnssec::serial_le;
use crate::rdata::{Dnskey, Ds, Rrsig};
use crate::rr::{canonical_sort, ResourceRecord};
use crate::types::{RecordClass, RecordType};
use crate::wire::ToFromNetworkOrder;

/// algorithm numbers this crate can cryptographically verify (RFC8624 and
/// friends); published to servers via the EDNS DAU option (spec.md §4.7).
pub fn supported_algorithms() -> &'static [u8] {
    &[8, 10, 13, 14, 15] // RSASHA256, RSASHA512, ECDSAP256SHA256, ECDSAP384SHA384, ED25519
}

pub fn is_algorithm_supported(algorithm: u8) -> bool {
    supported_algorithms().contains(&algorithm)
}

/// RFC4034 §3.1.8.1: an RRSIG covers `rrset` only if owner, class,
/// type-covered, labels, and original TTL all match.
pub fn rrsig_matches_rrset(
    rrsig: &Rrsig,
    owner: &Name,
    rclass: RecordClass,
    rtype: RecordType,
    rrset: &[ResourceRecord],
) -> bool {
    if rrsig.type_covered != rtype {
        return false;
    }
    if rrset.iter().any(|r| &r.name != owner || r.rclass != rclass) {
        return false;
    }
    let expected_labels = canonical_label_count(owner);
    rrsig.labels == expected_labels || rrsig.labels < expected_labels // wildcard-expanded owner
}

/// label count per RFC4034 §3.1.3: the root label doesn't count, and a
/// wildcard's `*` label doesn't count either (the signature was made over
/// the wildcard's expansion).
fn canonical_label_count(name: &Name) -> u8 {
    let labels = name.labels();
    let mut count = labels.len() as u8;
    if labels.first().map_or(false, |l| l == b"*") {
        count = count.saturating_sub(1);
    }
    count
}

/// the signing input for an RRSIG over `rrset` per RFC4034 §3.1.8.1: the
/// RRSIG RDATA up to (not including) the signature, followed by the
/// canonically sorted RRset, each member's TTL rewritten to
/// `rrsig.original_ttl`.
pub fn signing_input(rrsig: &Rrsig, rrset: &[ResourceRecord]) -> std::io::Result<Vec<u8>> {
    let mut buf = Vec::new();
    rrsig.type_covered.to_network_bytes(&mut buf)?;
    rrsig.algorithm.to_network_bytes(&mut buf)?;
    rrsig.labels.to_network_bytes(&mut buf)?;
    rrsig.original_ttl.to_network_bytes(&mut buf)?;
    rrsig.expiration.to_network_bytes(&mut buf)?;
    rrsig.inception.to_network_bytes(&mut buf)?;
    rrsig.key_tag.to_network_bytes(&mut buf)?;
    rrsig.signer_name.canonical().to_network_bytes(&mut buf)?;

    let mut sorted: Vec<ResourceRecord> = rrset.to_vec();
    for r in &mut sorted {
        r.ttl = rrsig.original_ttl;
    }
    canonical_sort(&mut sorted)?;
    for r in &sorted {
        buf.extend_from_slice(&r.to_canonical_bytes()?);
    }
    Ok(buf)
}

/// verify `signature` over `signed_data` with the given DNSSEC algorithm
/// number and raw DNSKEY public-key material.
pub fn verify_signature(algorithm: u8, public_key: &[u8], signed_data: &[u8], signature_bytes: &[u8]) -> bool {
    let verify = |alg: &'static dyn signature::VerificationAlgorithm, key: &[u8]| {
        signature::UnparsedPublicKey::new(alg, key).verify(signed_data, signature_bytes).is_ok()
    };

    match algorithm {
        8 => verify(&signature::RSA_PKCS1_2048_8192_SHA256, public_key),
        10 => verify(&signature::RSA_PKCS1_2048_8192_SHA512, public_key),
        13 => {
            // ECDSAP256SHA256: DNSKEY stores raw X||Y, ring wants an
            // uncompressed SEC1 point with a leading 0x04 tag.
            let mut point = Vec::with_capacity(public_key.len() + 1);
            point.push(0x04);
            point.extend_from_slice(public_key);
            verify(&signature::ECDSA_P256_SHA256_FIXED, &point)
        }
        14 => {
            let mut point = Vec::with_capacity(public_key.len() + 1);
            point.push(0x04);
            point.extend_from_slice(public_key);
            verify(&signature::ECDSA_P384_SHA384_FIXED, &point)
        }
        15 => verify(&signature::ED25519, public_key),
        _ => false,
    }
}

/// RFC4034 §3.1.4 / §5.3: does `rrsig`'s validity window, its algorithm
/// support, and the signing DNSKEY's key tag all line up, and does the
/// signature verify?
pub fn verify_rrset(
    rrsig: &Rrsig,
    dnskey: &Dnskey,
    owner: &Name,
    rclass: RecordClass,
    rtype: RecordType,
    rrset: &[ResourceRecord],
    now: u32,
) -> bool {
    if !is_algorithm_supported(rrsig.algorithm) || rrsig.algorithm != dnskey.algorithm {
        return false;
    }
    if !rrsig.is_valid_at(now) {
        return false;
    }
    if !rrsig_matches_rrset(rrsig, owner, rclass, rtype, rrset) {
        return false;
    }
    if dnskey.key_tag() != rrsig.key_tag {
        return false;
    }
    let Ok(input) = signing_input(rrsig, rrset) else { return false };
    verify_signature(rrsig.algorithm, &dnskey.public_key, &input, &rrsig.signature)
}

/// RFC4034 §5.1.4: `DS.digest == digest(owner_canonical || dnskey_rdata)`.
pub fn ds_matches_dnskey(ds: &Ds, dnskey: &Dnskey, owner: &Name) -> bool {
    if ds.algorithm != dnskey.algorithm || ds.key_tag != dnskey.key_tag() {
        return false;
    }
    let alg = match ds.digest_type {
        1 => &digest::SHA1_FOR_LEGACY_USE_ONLY,
        2 => &digest::SHA256,
        4 => &digest::SHA384,
        _ => return false,
    };
    let mut input = Vec::new();
    let Ok(()) = owner.canonical().to_network_bytes(&mut input).map(|_| ()) else { return false };
    let mut rdata = Vec::new();
    if dnskey.to_network_bytes(&mut rdata).is_err() {
        return false;
    }
    input.extend_from_slice(&rdata);
    digest::digest(alg, &input).as_ref() == ds.digest.as_slice()
}

/// RFC1982-aware "is this RRSIG still worth trying" helper used by the
/// resolver to pick among multiple RRSIGs covering the same RRset.
pub fn is_temporally_valid(rrsig: &Rrsig, now: u32) -> bool {
    serial_le(rrsig.inception, now) && serial_le(now, rrsig.expiration)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ring::rand::SystemRandom;
    use ring::signature::{Ed25519KeyPair, KeyPair};
    use std::str::FromStr;

    fn sample_rrset() -> (Name, Vec<ResourceRecord>) {
        use crate::rdata::{RecordData, A};
        use std::net::Ipv4Addr;
        let owner = Name::from_str("secure.test.").unwrap();
        let rr = ResourceRecord::new(owner.clone(), RecordClass::IN, 300, RecordData::A(A(Ipv4Addr::new(203, 0, 113, 5))));
        (owner, vec![rr])
    }

    #[test]
    fn ed25519_signature_roundtrip() {
        let rng = SystemRandom::new();
        let pkcs8 = Ed25519KeyPair::generate_pkcs8(&rng).unwrap();
        let keypair = Ed25519KeyPair::from_pkcs8(pkcs8.as_ref()).unwrap();
        let public_key = keypair.public_key().as_ref().to_vec();

        let (owner, rrset) = sample_rrset();
        let dnskey = Dnskey { flags: 256, protocol: 3, algorithm: 15, public_key: public_key.clone() };

        let mut rrsig = Rrsig {
            type_covered: RecordType::A,
            algorithm: 15,
            labels: 2,
            original_ttl: 300,
            expiration: 2_000_000_000,
            inception: 1_000_000_000,
            key_tag: dnskey.key_tag(),
            signer_name: owner.clone(),
            signature: Vec::new(),
        };
        let input = signing_input(&rrsig, &rrset).unwrap();
        rrsig.signature = keypair.sign(&input).as_ref().to_vec();

        assert!(verify_rrset(&rrsig, &dnskey, &owner, RecordClass::IN, RecordType::A, &rrset, 1_500_000_000));
        assert!(!verify_rrset(&rrsig, &dnskey, &owner, RecordClass::IN, RecordType::A, &rrset, 2_500_000_000));
    }

    #[test]
    fn ds_matches_dnskey_roundtrip() {
        let owner = Name::from_str("example.").unwrap();
        let dnskey = Dnskey { flags: 257, protocol: 3, algorithm: 8, public_key: vec![1, 2, 3, 4, 5] };
        let mut rdata = Vec::new();
        dnskey.to_network_bytes(&mut rdata).unwrap();
        let mut input = Vec::new();
        owner.canonical().to_network_bytes(&mut input).unwrap();
        input.extend_from_slice(&rdata);
        let digest = ring::digest::digest(&ring::digest::SHA256, &input);

        let ds = Ds {
            key_tag: dnskey.key_tag(),
            algorithm: 8,
            digest_type: 2,
            digest: digest.as_ref().to_vec(),
        };
        assert!(ds_matches_dnskey(&ds, &dnskey, &owner));
    }
}
