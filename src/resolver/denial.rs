//! Authenticated denial of existence: NSEC bracket/bitmap proofs (RFC4035
//! §5.4) and NSEC3 hashed bracket/bitmap proofs (RFC5155 §8).
use std::cmp::Ordering;

use crate::name::Name;
use crate::rdata::dnssec::nsec3::hashed_owner_name;
use crate::rdata::{Nsec, Nsec3};
use crate::types::RecordType;
use crate::wire::text::from_base32hex;
use crate::wire::ToFromNetworkOrder;

/// RFC4034 §6.1 canonical DNS name ordering: compare labels right-to-left
/// (zone apex first), lowercased; a name that is a proper suffix of another
/// sorts first.
pub fn canonical_name_cmp(a: &Name, b: &Name) -> Ordering {
    let a = a.canonical();
    let b = b.canonical();
    let a_labels = a.labels();
    let b_labels = b.labels();
    let mut ai = a_labels.len();
    let mut bi = b_labels.len();
    loop {
        match (ai, bi) {
            (0, 0) => return Ordering::Equal,
            (0, _) => return Ordering::Less,
            (_, 0) => return Ordering::Greater,
            _ => {
                ai -= 1;
                bi -= 1;
                match a_labels[ai].cmp(&b_labels[bi]) {
                    Ordering::Equal => continue,
                    other => return other,
                }
            }
        }
    }
}

/// true if `name` falls strictly between `owner` and `next` in canonical
/// zone order. `next` wrapping around past the zone apex (the last NSEC in
/// a zone points back to the apex) is handled per RFC4035 §5.4.
fn between(owner: &Name, next: &Name, name: &Name) -> bool {
    if canonical_name_cmp(owner, next) == Ordering::Less {
        canonical_name_cmp(owner, name) == Ordering::Less && canonical_name_cmp(name, next) == Ordering::Less
    } else {
        canonical_name_cmp(owner, name) == Ordering::Less || canonical_name_cmp(name, next) == Ordering::Less
    }
}

/// RFC4035 §5.4: `nsec` (owned by `owner`) proves NXDOMAIN for `qname` if
/// `qname` falls in the gap between `owner` and `nsec.next_domain`.
pub fn nsec_proves_nxdomain(owner: &Name, nsec: &Nsec, qname: &Name) -> bool {
    between(owner, &nsec.next_domain, qname)
}

/// RFC4035 §5.4: `nsec` proves NODATA for `qname`/`qtype` if it is the exact
/// match for `qname` and its type bitmap lists neither `qtype` nor CNAME (a
/// CNAME there would have redirected rather than answered directly).
pub fn nsec_proves_nodata(owner: &Name, nsec: &Nsec, qname: &Name, qtype: RecordType) -> bool {
    owner == qname && !nsec.types.contains(qtype.value()) && !nsec.types.contains(RecordType::CNAME.value())
}

/// decode an NSEC3 owner name's leading base32hex label back into the raw
/// hash it represents (RFC5155 §3.3). The remaining labels are the zone
/// apex and aren't part of the hash.
pub fn nsec3_owner_hash(owner: &Name) -> Option<Vec<u8>> {
    let first = owner.labels().first()?;
    from_base32hex(std::str::from_utf8(first).ok()?)
}

/// RFC5155 §8.3: `nsec3` (owned by `owner`) covers `hash` if `hash` falls in
/// the gap between the owner's hash and `next_hashed_owner`, wrapping at the
/// end of the hash-ordered zone like the NSEC case above.
pub fn nsec3_covers(owner: &Name, nsec3: &Nsec3, hash: &[u8]) -> bool {
    let Some(owner_hash) = nsec3_owner_hash(owner) else { return false };
    let next = nsec3.next_hashed_owner.as_slice();
    if owner_hash.as_slice() < next {
        owner_hash.as_slice() < hash && hash < next
    } else {
        owner_hash.as_slice() < hash || hash < next
    }
}

/// RFC5155 §7.2.1: does `nsec3`'s owner hash exactly match `name_wire`
/// (the canonical wire form of some name) under the record's own
/// algorithm/salt/iterations?
pub fn nsec3_matches(owner: &Name, nsec3: &Nsec3, name_wire: &[u8]) -> bool {
    let Some(owner_hash) = nsec3_owner_hash(owner) else { return false };
    let hash = hashed_owner_name(name_wire, &nsec3.salt, nsec3.iterations);
    owner_hash == hash
}

/// RFC5155 §8.4 NODATA proof: an NSEC3 exactly matching `qname`'s hash whose
/// type bitmap lists neither `qtype` nor CNAME.
pub fn nsec3_proves_nodata(owner: &Name, nsec3: &Nsec3, qname_wire: &[u8], qtype: RecordType) -> bool {
    nsec3_matches(owner, nsec3, qname_wire)
        && !nsec3.types.contains(qtype.value())
        && !nsec3.types.contains(RecordType::CNAME.value())
}

fn canonical_wire(name: &Name) -> Vec<u8> {
    let mut buf = Vec::new();
    let _ = name.canonical().to_network_bytes(&mut buf);
    buf
}

/// RFC5155 §8.3 full NXDOMAIN proof: walk up from `qname`'s parent looking
/// for the closest encloser (the longest ancestor some NSEC3 in `records`
/// exactly matches). Once found, both the next closer name (one label below
/// the closest encloser, on the path to `qname`) and the closest encloser's
/// wildcard expansion must fall in some record's hashed gap — the former
/// rules out `qname` itself, the latter rules out a wildcard having
/// answered instead.
pub fn nsec3_proves_nxdomain(records: &[(&Name, &Nsec3)], qname: &Name) -> bool {
    let mut next_closer = qname.clone();
    let mut ancestor = match qname.parent() {
        Some(p) => p,
        None => return false,
    };

    loop {
        let ancestor_wire = canonical_wire(&ancestor);
        let is_closest_encloser = records.iter().any(|(owner, n)| nsec3_matches(owner, n, &ancestor_wire));

        if is_closest_encloser {
            let next_closer_wire = canonical_wire(&next_closer);
            let wildcard_wire = canonical_wire(&ancestor.with_prefix_label(b"*"));

            let next_closer_covered = records.iter().any(|(owner, n)| {
                let hash = hashed_owner_name(&next_closer_wire, &n.salt, n.iterations);
                nsec3_covers(owner, n, &hash)
            });
            let wildcard_covered = records.iter().any(|(owner, n)| {
                let hash = hashed_owner_name(&wildcard_wire, &n.salt, n.iterations);
                nsec3_covers(owner, n, &hash)
            });

            return next_closer_covered && wildcard_covered;
        }

        next_closer = ancestor.clone();
        ancestor = match ancestor.parent() {
            Some(p) => p,
            None => return false,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rdata::dnssec::bitmap::TypeBitmap;
    use std::str::FromStr;

    #[test]
    fn canonical_order_matches_rfc4034_example() {
        // RFC4034 appendix: example. < a.example. < yljkjljk.a.example. <
        // Z.a.example. < zABC.a.EXAMPLE. < z.example < \001.z.example <
        // *.z.example < \200.z.example
        let names = [
            "example.",
            "a.example.",
            "yljkjljk.a.example.",
            "Z.a.example.",
            "zABC.a.EXAMPLE.",
            "z.example.",
        ];
        let parsed: Vec<Name> = names.iter().map(|s| Name::from_str(s).unwrap()).collect();
        for pair in parsed.windows(2) {
            assert_eq!(canonical_name_cmp(&pair[0], &pair[1]), Ordering::Less, "{:?}", pair);
        }
    }

    #[test]
    fn nsec_bracket_proves_nxdomain() {
        let owner = Name::from_str("a.example.").unwrap();
        let qname = Name::from_str("b.example.").unwrap();
        let next = Name::from_str("c.example.").unwrap();
        let nsec = Nsec { next_domain: next, types: TypeBitmap(vec![1, 46, 47]) };
        assert!(nsec_proves_nxdomain(&owner, &nsec, &qname));
    }

    #[test]
    fn nsec_bracket_wraps_at_zone_end() {
        let owner = Name::from_str("z.example.").unwrap();
        let apex = Name::from_str("example.").unwrap();
        let qname = Name::from_str("zz.example.").unwrap();
        let nsec = Nsec { next_domain: apex, types: TypeBitmap(vec![1]) };
        assert!(nsec_proves_nxdomain(&owner, &nsec, &qname));
    }

    #[test]
    fn nsec_proves_nodata_when_type_absent() {
        let owner = Name::from_str("www.example.").unwrap();
        let nsec = Nsec {
            next_domain: Name::from_str("z.example.").unwrap(),
            types: TypeBitmap(vec![1, 46, 47]), // A, RRSIG, NSEC -- no AAAA
        };
        assert!(nsec_proves_nodata(&owner, &nsec, &owner, RecordType::AAAA));
        assert!(!nsec_proves_nodata(&owner, &nsec, &owner, RecordType::A));
    }

    #[test]
    fn nsec3_covers_hashed_gap() {
        let salt: Vec<u8> = vec![];
        let qname_wire = b"\x03www\x07example\x00".to_vec();
        let hash = hashed_owner_name(&qname_wire, &salt, 0);

        // bracket the computed hash with the all-zero and all-one hashes of
        // the same length; any real SHA1 digest falls strictly between them
        let before = vec![0u8; hash.len()];
        let after = vec![0xFFu8; hash.len()];

        let owner_label = crate::wire::text::to_base32hex(&before);
        let owner = Name::from_str(&format!("{}.example.", owner_label)).unwrap();
        let nsec3 = Nsec3 {
            hash_algorithm: 1,
            flags: 0,
            iterations: 0,
            salt,
            next_hashed_owner: after,
            types: TypeBitmap(vec![]),
        };
        assert!(nsec3_covers(&owner, &nsec3, &hash));
    }

    #[test]
    fn nsec3_proves_nxdomain_via_closest_encloser() {
        let apex = Name::from_str("example.").unwrap();
        let qname = Name::from_str("nonexistent.example.").unwrap();
        let wildcard = apex.with_prefix_label(b"*");

        let apex_hash = hashed_owner_name(&canonical_wire(&apex), &[], 0);
        let next_closer_hash = hashed_owner_name(&canonical_wire(&qname), &[], 0);
        let wildcard_hash = hashed_owner_name(&canonical_wire(&wildcard), &[], 0);

        // record 1: exact match on the zone apex, proving it's the closest encloser
        let apex_owner = Name::from_str(&format!("{}.example.", crate::wire::text::to_base32hex(&apex_hash)))
            .unwrap();
        let apex_record = Nsec3 {
            hash_algorithm: 1,
            flags: 0,
            iterations: 0,
            salt: vec![],
            next_hashed_owner: vec![0xFFu8; apex_hash.len()],
            types: TypeBitmap(vec![]),
        };

        // record 2: an all-zero..all-one gap, wide enough to cover both the
        // next closer name and the wildcard's hash
        let before = vec![0u8; apex_hash.len()];
        let after = vec![0xFFu8; apex_hash.len()];
        let gap_owner = Name::from_str(&format!("{}.example.", crate::wire::text::to_base32hex(&before)))
            .unwrap();
        let gap_record = Nsec3 {
            hash_algorithm: 1,
            flags: 0,
            iterations: 0,
            salt: vec![],
            next_hashed_owner: after,
            types: TypeBitmap(vec![]),
        };
        assert_ne!(next_closer_hash, before);
        assert_ne!(wildcard_hash, before);

        let records: Vec<(&Name, &Nsec3)> = vec![(&apex_owner, &apex_record), (&gap_owner, &gap_record)];
        assert!(nsec3_proves_nxdomain(&records, &qname));
    }

    #[test]
    fn nsec3_rejects_nxdomain_without_closest_encloser_match() {
        let qname = Name::from_str("nonexistent.example.").unwrap();
        let hash_len = hashed_owner_name(b"anything", &[], 0).len();
        let before = vec![0u8; hash_len];
        let after = vec![0xFFu8; hash_len];
        let gap_owner =
            Name::from_str(&format!("{}.example.", crate::wire::text::to_base32hex(&before))).unwrap();
        let gap_record = Nsec3 {
            hash_algorithm: 1,
            flags: 0,
            iterations: 0,
            salt: vec![],
            next_hashed_owner: after,
            types: TypeBitmap(vec![]),
        };
        let records: Vec<(&Name, &Nsec3)> = vec![(&gap_owner, &gap_record)];
        assert!(!nsec3_proves_nxdomain(&records, &qname));
    }
}
