//! The resource-record envelope: (name, type, class, ttl) shared header plus
//! a `RecordData` payload, per the "tagged variant over registered payloads"
//! redesign (spec.md §9 DESIGN NOTES). OPT records reinterpret `class` as
//! the UDP payload size and `ttl` as `ext_rcode:8 | version:8 | flags:16`.
use std::collections::HashMap;
use std::io::Cursor;

use crate::error::{DNSError, DNSResult, MalformedKind};
use crate::name::Name;
use crate::rdata::RecordData;
use crate::types::{RecordClass, RecordType};
use crate::wire::ToFromNetworkOrder;

pub const EDNS_DO_BIT: u16 = 1 << 15;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceRecord {
    pub name: Name,
    pub rtype: RecordType,
    pub rclass: RecordClass,
    pub ttl: u32,
    pub rdata: RecordData,
}

impl ResourceRecord {
    pub fn new(name: Name, rclass: RecordClass, ttl: u32, rdata: RecordData) -> Self {
        ResourceRecord { name, rtype: rdata.record_type(), rclass, ttl, rdata }
    }

    pub fn is_opt(&self) -> bool {
        matches!(self.rtype, RecordType::OPT)
    }

    /// the OPT record's class field is the requestor's UDP payload size
    pub fn udp_payload_size(&self) -> Option<u16> {
        self.is_opt().then(|| self.rclass.value())
    }

    /// the OPT record's TTL field, reinterpreted
    pub fn opt_ext_rcode(&self) -> Option<u8> {
        self.is_opt().then(|| (self.ttl >> 24) as u8)
    }

    pub fn opt_version(&self) -> Option<u8> {
        self.is_opt().then(|| (self.ttl >> 16) as u8)
    }

    pub fn opt_flags(&self) -> Option<u16> {
        self.is_opt().then(|| self.ttl as u16)
    }

    pub fn opt_do_bit(&self) -> bool {
        self.opt_flags().map(|f| f & EDNS_DO_BIT != 0).unwrap_or(false)
    }

    pub fn to_network_bytes_compressed(
        &self,
        buffer: &mut Vec<u8>,
        dictionary: &mut HashMap<String, u16>,
    ) -> std::io::Result<usize> {
        let start = buffer.len();
        self.name.to_network_bytes_compressed(buffer, dictionary)?;
        self.rtype.to_network_bytes(buffer)?;
        self.rclass.to_network_bytes(buffer)?;
        self.ttl.to_network_bytes(buffer)?;

        let rdlength_pos = buffer.len();
        buffer.extend_from_slice(&[0, 0]);
        let rdata_start = buffer.len();
        self.rdata.to_network_bytes(buffer)?;
        let rdlength = (buffer.len() - rdata_start) as u16;
        buffer[rdlength_pos..rdlength_pos + 2].copy_from_slice(&rdlength.to_be_bytes());

        Ok(buffer.len() - start)
    }

    /// canonical (lowercase, uncompressed) encoding per RFC4034 §6.2, used as
    /// the input to RRset canonical ordering and to signature verification
    pub fn to_canonical_bytes(&self) -> std::io::Result<Vec<u8>> {
        let mut buffer = Vec::new();
        self.name.canonical().to_network_bytes(&mut buffer)?;
        self.rtype.to_network_bytes(&mut buffer)?;
        self.rclass.to_network_bytes(&mut buffer)?;
        self.ttl.to_network_bytes(&mut buffer)?;
        let rdlength_pos = buffer.len();
        buffer.extend_from_slice(&[0, 0]);
        let rdata_start = buffer.len();
        self.rdata.to_network_bytes(&mut buffer)?;
        let rdlength = (buffer.len() - rdata_start) as u16;
        buffer[rdlength_pos..rdlength_pos + 2].copy_from_slice(&rdlength.to_be_bytes());
        Ok(buffer)
    }

    pub fn from_network_bytes(buffer: &mut Cursor<&[u8]>) -> DNSResult<ResourceRecord> {
        let mut name = Name::default();
        name.from_network_bytes(buffer)?;
        let mut rtype = RecordType::default();
        rtype.from_network_bytes(buffer)?;
        let mut rclass = RecordClass::default();
        rclass.from_network_bytes(buffer)?;
        let mut ttl = 0u32;
        ttl.from_network_bytes(buffer)?;
        let mut rdlength = 0u16;
        rdlength.from_network_bytes(buffer)?;

        if buffer.position() as usize + rdlength as usize > buffer.get_ref().len() {
            return Err(DNSError::Malformed(MalformedKind::Record("rdlength exceeds message buffer")));
        }
        let rdata = RecordData::from_network_bytes(rtype, rdlength, buffer)?;

        Ok(ResourceRecord { name, rtype, rclass, ttl, rdata })
    }
}

/// total order for RRset canonical encoding: bytewise comparison of each
/// member's canonical wire form, per RFC4034 §6.3
pub fn canonical_sort(records: &mut [ResourceRecord]) -> std::io::Result<()> {
    let mut keyed: Vec<(Vec<u8>, usize)> = records
        .iter()
        .enumerate()
        .map(|(i, r)| r.to_canonical_bytes().map(|b| (b, i)))
        .collect::<std::io::Result<_>>()?;
    keyed.sort_by(|a, b| a.0.cmp(&b.0));

    let reordered: Vec<ResourceRecord> = keyed.into_iter().map(|(_, i)| records[i].clone()).collect();
    records.clone_from_slice(&reordered);
    Ok(())
}
