//! HIP (RFC8005): Host Identity Protocol binding between a Host Identity Tag
//! and a public key, with optional rendezvous servers.
use std::io::{Cursor, Read};

use crate::error::DNSResult;
use crate::name::Name;
use crate::wire::text::{to_base64, to_hex};
use crate::wire::ToFromNetworkOrder;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hip {
    pub pk_algorithm: u8,
    pub hit: Vec<u8>,
    pub public_key: Vec<u8>,
    pub rendezvous_servers: Vec<Name>,
}

impl Hip {
    pub fn to_network_bytes(&self, buffer: &mut Vec<u8>) -> std::io::Result<usize> {
        let start = buffer.len();
        buffer.push(self.hit.len() as u8);
        buffer.push(self.pk_algorithm);
        (self.public_key.len() as u16).to_network_bytes(buffer)?;
        buffer.extend_from_slice(&self.hit);
        buffer.extend_from_slice(&self.public_key);
        for server in &self.rendezvous_servers {
            server.to_network_bytes(buffer)?;
        }
        Ok(buffer.len() - start)
    }

    pub(crate) fn from_cursor(buffer: &mut Cursor<&[u8]>, end: usize) -> DNSResult<Self> {
        let mut hit_len = [0u8; 1];
        buffer.read_exact(&mut hit_len)?;
        let mut pk_algorithm = [0u8; 1];
        buffer.read_exact(&mut pk_algorithm)?;
        let mut pk_len = 0u16;
        pk_len.from_network_bytes(buffer)?;

        let mut hit = vec![0u8; hit_len[0] as usize];
        buffer.read_exact(&mut hit)?;
        let mut public_key = vec![0u8; pk_len as usize];
        buffer.read_exact(&mut public_key)?;

        let mut rendezvous_servers = Vec::new();
        while (buffer.position() as usize) < end {
            let mut name = Name::default();
            name.from_network_bytes(buffer)?;
            rendezvous_servers.push(name);
        }

        Ok(Hip { pk_algorithm: pk_algorithm[0], hit, public_key, rendezvous_servers })
    }

    pub fn to_text(&self) -> String {
        let servers = self.rendezvous_servers.iter().map(|n| n.to_string()).collect::<Vec<_>>().join(" ");
        let mut out = format!("{} {} {}", self.pk_algorithm, to_hex(&self.hit), to_base64(&self.public_key));
        if !servers.is_empty() {
            out.push(' ');
            out.push_str(&servers);
        }
        out
    }
}
