//! The two caches the resolver shares across concurrent top-level
//! resolutions, per spec.md §4.6: a record cache keyed by (name, type,
//! class) and a nameserver cache keyed by zone. Both allow many concurrent
//! readers and serialize writers through a `RwLock`; no lock is ever held
//! across a suspension point (spec.md §5) — every public method takes the
//! lock, does its map work, and releases it before returning.
use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::RwLock;
use std::time::{Duration, Instant};

use rand::seq::SliceRandom;

use crate::name::Name;
use crate::rr::ResourceRecord;
use crate::types::{RecordClass, RecordType};

/// the DNSSEC validation verdict attached to a cached RRset, per spec.md §3
/// and §4.7. `Unsigned` marks an answer nobody asked to validate at all,
/// distinct from `Insecure` (provably unsigned via an NSEC/NSEC3 proof).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verdict {
    Secure,
    Insecure,
    Bogus,
    Indeterminate,
    #[default]
    Unsigned,
}

impl Verdict {
    /// combine the verdicts of two chained hops (e.g. a CNAME and its
    /// target), per spec.md §4.7's classification rule: `Secure ∧ Secure =
    /// Secure`, any `Unsigned` demotes the pair, any `Bogus` poisons it.
    pub fn combine(self, other: Verdict) -> Verdict {
        use Verdict::*;
        match (self, other) {
            (Bogus, _) | (_, Bogus) => Bogus,
            (Indeterminate, _) | (_, Indeterminate) => Indeterminate,
            (Unsigned, _) | (_, Unsigned) => Unsigned,
            (Insecure, _) | (_, Insecure) => Insecure,
            (Secure, Secure) => Secure,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub name: Name,
    pub rtype: RecordType,
    pub rclass: RecordClass,
}

impl CacheKey {
    pub fn new(name: Name, rtype: RecordType, rclass: RecordClass) -> Self {
        CacheKey { name, rtype, rclass }
    }
}

#[derive(Debug, Clone)]
struct CacheEntry {
    rrset: Vec<ResourceRecord>,
    verdict: Verdict,
    expiry: Instant,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheHit {
    pub rrset: Vec<ResourceRecord>,
    pub verdict: Verdict,
}

/// an in-memory mapping from (name, type, class) to a validated RRset with
/// an absolute expiry. TTL only ever decays: a write with a smaller TTL than
/// an existing live entry still replaces it outright (spec.md §4.6 "writes
/// replace any existing entry"), but the cache never hands back an entry
/// past its expiry.
#[derive(Debug, Default)]
pub struct RecordCache {
    entries: RwLock<HashMap<CacheKey, CacheEntry>>,
}

impl RecordCache {
    pub fn new() -> Self {
        RecordCache { entries: RwLock::new(HashMap::new()) }
    }

    /// a hit only if `now < expiry`; a stale entry is treated as a miss and
    /// lazily evicted on the next write that touches the same key.
    pub fn get(&self, key: &CacheKey) -> Option<CacheHit> {
        let entries = self.entries.read().expect("record cache lock poisoned");
        let entry = entries.get(key)?;
        if Instant::now() >= entry.expiry {
            return None;
        }
        Some(CacheHit { rrset: entry.rrset.clone(), verdict: entry.verdict })
    }

    /// a CNAME entry at `name` under any class-matching query type: the
    /// resolver consults this before issuing a fresh query for (name, type),
    /// per spec.md §4.7's "record-cache has a CNAME" check.
    pub fn get_cname(&self, name: &Name, rclass: RecordClass) -> Option<CacheHit> {
        self.get(&CacheKey::new(name.clone(), RecordType::CNAME, rclass))
    }

    /// `ttl == 0` is a documented no-op (spec.md §4.6); an empty `rrset`
    /// with a verdict is legal and expresses negative caching.
    pub fn put(&self, key: CacheKey, rrset: Vec<ResourceRecord>, verdict: Verdict, ttl: u32) {
        if ttl == 0 {
            return;
        }
        let expiry = Instant::now() + Duration::from_secs(ttl as u64);
        let mut entries = self.entries.write().expect("record cache lock poisoned");
        entries.insert(key, CacheEntry { rrset, verdict, expiry });
    }

    /// cache an RRset whose TTL is the minimum of its members' TTLs, per
    /// spec.md §3's RRset invariant.
    pub fn put_rrset(&self, key: CacheKey, rrset: Vec<ResourceRecord>, verdict: Verdict) {
        let ttl = rrset.iter().map(|r| r.ttl).min().unwrap_or(0);
        self.put(key, rrset, verdict, ttl);
    }

    pub fn clear(&self) {
        self.entries.write().expect("record cache lock poisoned").clear();
    }

    /// drop entries that have already expired; not required for
    /// correctness (reads already treat them as misses) but keeps long-lived
    /// resolver instances from growing without bound.
    pub fn evict_expired(&self) {
        let now = Instant::now();
        let mut entries = self.entries.write().expect("record cache lock poisoned");
        entries.retain(|_, entry| entry.expiry > now);
    }
}

/// zone name -> set of (address, expiry). Kept separate from the record
/// cache because nameserver selection ranks by address family and
/// randomization, not by DNS type, per spec.md §4.6.
#[derive(Debug, Default)]
pub struct NameserverCache {
    zones: RwLock<HashMap<Name, Vec<(IpAddr, Instant)>>>,
}

impl NameserverCache {
    pub fn new() -> Self {
        NameserverCache { zones: RwLock::new(HashMap::new()) }
    }

    pub fn insert(&self, zone: Name, addr: IpAddr, ttl: u32) {
        if ttl == 0 {
            return;
        }
        let expiry = Instant::now() + Duration::from_secs(ttl as u64);
        let mut zones = self.zones.write().expect("nameserver cache lock poisoned");
        let live = zones.entry(zone).or_default();
        live.retain(|(a, _)| *a != addr);
        live.push((addr, expiry));
    }

    pub fn insert_many(&self, zone: &Name, addrs: impl IntoIterator<Item = IpAddr>, ttl: u32) {
        for addr in addrs {
            self.insert(zone.clone(), addr, ttl);
        }
    }

    /// live addresses for the longest suffix of `name` that has any,
    /// ordered IPv6-first and then randomized within each family, per
    /// spec.md §4.6. Returns `None` if no suffix (including the root) has a
    /// live entry, so the caller falls back to configured root hints.
    pub fn best_nameservers(&self, name: &Name) -> Option<Vec<IpAddr>> {
        let zones = self.zones.read().expect("nameserver cache lock poisoned");
        let now = Instant::now();

        let mut candidate = Some(name.clone());
        loop {
            let zone = candidate?;
            if let Some(live) = zones.get(&zone) {
                let mut addrs: Vec<IpAddr> =
                    live.iter().filter(|(_, expiry)| *expiry > now).map(|(a, _)| *a).collect();
                if !addrs.is_empty() {
                    let mut rng = rand::thread_rng();
                    let (mut v6, mut v4): (Vec<IpAddr>, Vec<IpAddr>) =
                        addrs.drain(..).partition(|a| a.is_ipv6());
                    v6.shuffle(&mut rng);
                    v4.shuffle(&mut rng);
                    v6.extend(v4);
                    return Some(v6);
                }
            }
            candidate = zone.parent();
            if zone.is_root() {
                return None;
            }
        }
    }

    pub fn clear(&self) {
        self.zones.write().expect("nameserver cache lock poisoned").clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rdata::{RecordData, A};
    use std::net::Ipv4Addr;
    use std::str::FromStr;

    fn rr(name: &str, ttl: u32, octet: u8) -> ResourceRecord {
        ResourceRecord::new(
            Name::from_str(name).unwrap(),
            RecordClass::IN,
            ttl,
            RecordData::A(A(Ipv4Addr::new(192, 0, 2, octet))),
        )
    }

    #[test]
    fn miss_then_hit_then_expiry() {
        let cache = RecordCache::new();
        let key = CacheKey::new(Name::from_str("example.").unwrap(), RecordType::A, RecordClass::IN);
        assert!(cache.get(&key).is_none());

        cache.put(key.clone(), vec![rr("example.", 300, 42)], Verdict::Unsigned, 300);
        let hit = cache.get(&key).unwrap();
        assert_eq!(hit.rrset.len(), 1);
        assert_eq!(hit.verdict, Verdict::Unsigned);
    }

    #[test]
    fn zero_ttl_write_is_a_no_op() {
        let cache = RecordCache::new();
        let key = CacheKey::new(Name::from_str("example.").unwrap(), RecordType::A, RecordClass::IN);
        cache.put(key.clone(), vec![rr("example.", 0, 1)], Verdict::Unsigned, 0);
        assert!(cache.get(&key).is_none());
    }

    #[test]
    fn negative_entry_is_an_empty_rrset() {
        let cache = RecordCache::new();
        let key = CacheKey::new(Name::from_str("missing.test.").unwrap(), RecordType::A, RecordClass::IN);
        cache.put(key.clone(), Vec::new(), Verdict::Insecure, 60);
        let hit = cache.get(&key).unwrap();
        assert!(hit.rrset.is_empty());
    }

    #[test]
    fn rrset_ttl_is_the_minimum_of_members() {
        let cache = RecordCache::new();
        let key = CacheKey::new(Name::from_str("example.").unwrap(), RecordType::A, RecordClass::IN);
        cache.put_rrset(key.clone(), vec![rr("example.", 300, 1), rr("example.", 60, 2)], Verdict::Unsigned);
        // can't observe the TTL directly, but a put with a 60s floor must still be live now
        assert!(cache.get(&key).is_some());
    }

    #[test]
    fn verdict_combination_rules() {
        assert_eq!(Verdict::Secure.combine(Verdict::Secure), Verdict::Secure);
        assert_eq!(Verdict::Secure.combine(Verdict::Unsigned), Verdict::Unsigned);
        assert_eq!(Verdict::Secure.combine(Verdict::Bogus), Verdict::Bogus);
        assert_eq!(Verdict::Insecure.combine(Verdict::Secure), Verdict::Insecure);
    }

    #[test]
    fn nameserver_cache_longest_suffix_match() {
        let cache = NameserverCache::new();
        cache.insert(Name::from_str("example.").unwrap(), IpAddr::V4(Ipv4Addr::new(192, 0, 2, 1)), 300);

        let servers = cache.best_nameservers(&Name::from_str("www.example.").unwrap());
        assert_eq!(servers, Some(vec![IpAddr::V4(Ipv4Addr::new(192, 0, 2, 1))]));

        assert!(cache.best_nameservers(&Name::from_str("other.test.").unwrap()).is_none());
    }

    #[test]
    fn nameserver_cache_prefers_ipv6_ordering() {
        let cache = NameserverCache::new();
        let zone = Name::from_str("example.").unwrap();
        cache.insert(zone.clone(), IpAddr::V4(Ipv4Addr::new(192, 0, 2, 1)), 300);
        cache.insert(zone.clone(), "2001:db8::1".parse().unwrap(), 300);

        let servers = cache.best_nameservers(&zone).unwrap();
        assert!(servers[0].is_ipv6());
    }
}
