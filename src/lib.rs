//! `dnslib`: a DNS wire codec plus a recursive, cache-aware, DNSSEC-validating
//! resolver. The codec round-trips every record type this crate enumerates
//! between wire bytes and a structured in-memory form; the resolver walks
//! referrals from a set of root hints toward an authoritative answer,
//! validating the chain of trust as it goes.
#[macro_use]
pub mod macros;

pub mod cache;
pub mod client;
pub mod error;
pub mod header;
pub mod hints;
pub mod message;
pub mod name;
pub mod question;
pub mod rdata;
pub mod resolver;
pub mod rr;
pub mod transport;
pub mod types;
pub mod util;
pub mod wire;

pub use error::{DNSError, DNSResult};
pub use message::Message;
pub use name::Name;
pub use question::Question;
pub use resolver::{FromRecordData, Resolver, ResolverConfig};
pub use rr::ResourceRecord;
