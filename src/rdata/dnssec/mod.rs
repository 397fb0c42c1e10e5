//! DNSSEC record types, grouped the way `youngbloood-rsdns` separates
//! `src/dns/rdata/sec/` from the rest of its record registry.
pub mod bitmap;
pub mod dnskey;
pub mod ds;
pub mod hip;
pub mod nsec;
pub mod nsec3;
pub mod rrsig;
pub mod tsig;

/// RFC1982 serial-number arithmetic: `a <= b` in the circular space, used for
/// RRSIG inception/expiration comparisons (spec.md §3, §4.7) since plain u32
/// comparison breaks across a wraparound.
pub fn serial_le(a: u32, b: u32) -> bool {
    let diff = b.wrapping_sub(a);
    diff == 0 || diff < (1u32 << 31)
}
