//! The full DNS message: header plus the four sections. Owns the
//! message-scoped compression dictionary on encode and hands each section's
//! `Name` decode a cursor over the whole buffer so compression pointers can
//! reach backward across section boundaries, per spec.md §4.3.
use std::collections::HashMap;
use std::io::Cursor;

use crate::error::{DNSError, DNSResult, MalformedKind};
use crate::header::{Flags, Header};
use crate::name::Name;
use crate::question::Question;
use crate::rdata::{Opt, RecordData};
use crate::rr::ResourceRecord;
use crate::types::{OpCode, RecordClass, RecordType, ResponseCode};

pub const CLASSIC_UDP_PAYLOAD: usize = 512;
pub const DEFAULT_EDNS_PAYLOAD: usize = 4096;

#[derive(Debug, Clone, Default)]
pub struct Message {
    pub header: Header,
    pub questions: Vec<Question>,
    pub answers: Vec<ResourceRecord>,
    pub authorities: Vec<ResourceRecord>,
    pub additionals: Vec<ResourceRecord>,
}

impl Message {
    pub fn new_query(id: u16, question: Question, recursion_desired: bool) -> Self {
        let mut message = Message {
            header: Header {
                id,
                flags: Flags {
                    qr: false,
                    opcode: OpCode::Query,
                    rd: recursion_desired,
                    ..Default::default()
                },
                qd_count: 1,
                ..Default::default()
            },
            ..Default::default()
        };
        message.questions.push(question);
        message
    }

    /// attach an OPT pseudo-record with the given UDP payload size and DO bit
    pub fn with_edns(mut self, udp_payload_size: u16, dnssec_ok: bool) -> Self {
        let ttl = if dnssec_ok { (crate::rr::EDNS_DO_BIT as u32) } else { 0 };
        let opt = ResourceRecord {
            name: Name::root(),
            rtype: RecordType::OPT,
            rclass: RecordClass::Unknown(udp_payload_size),
            ttl,
            rdata: RecordData::Opt(Opt::default()),
        };
        self.additionals.push(opt);
        self.header.ar_count += 1;
        self
    }

    pub fn opt_record(&self) -> Option<&ResourceRecord> {
        self.additionals.iter().find(|r| r.is_opt())
    }

    pub fn has_opt(&self) -> bool {
        self.opt_record().is_some()
    }

    /// resolves the BadVers/BadSig rcode-16 collision using OPT presence,
    /// per spec.md §9
    pub fn rcode(&self) -> ResponseCode {
        let extended = self
            .opt_record()
            .and_then(|opt| opt.opt_ext_rcode())
            .map(|ext| (ext as u16) << 4)
            .unwrap_or(0);
        ResponseCode::from_value(extended | self.header.flags.rcode, self.has_opt())
    }

    pub fn tsig_record(&self) -> Option<&ResourceRecord> {
        self.additionals.iter().find(|r| matches!(r.rtype, RecordType::TSIG))
    }

    /// the additional-section records minus TSIG, the "stripped view"
    /// surfaced to higher layers per spec.md §4.2
    pub fn additionals_without_tsig(&self) -> Vec<&ResourceRecord> {
        self.additionals.iter().filter(|r| !matches!(r.rtype, RecordType::TSIG)).collect()
    }

    pub fn from_network_bytes(buffer: &mut Cursor<&[u8]>) -> DNSResult<Message> {
        use crate::wire::ToFromNetworkOrder;

        let mut header = Header::default();
        header.from_network_bytes(buffer)?;

        let mut questions = Vec::with_capacity(header.qd_count as usize);
        for _ in 0..header.qd_count {
            let mut q = Question::default();
            q.from_network_bytes(buffer)?;
            questions.push(q);
        }

        let mut answers = Vec::with_capacity(header.an_count as usize);
        for _ in 0..header.an_count {
            answers.push(ResourceRecord::from_network_bytes(buffer)?);
        }

        let mut authorities = Vec::with_capacity(header.ns_count as usize);
        for _ in 0..header.ns_count {
            authorities.push(ResourceRecord::from_network_bytes(buffer)?);
        }

        let mut additionals = Vec::with_capacity(header.ar_count as usize);
        for _ in 0..header.ar_count {
            additionals.push(ResourceRecord::from_network_bytes(buffer)?);
        }

        let opt_count = additionals.iter().filter(|r| r.is_opt()).count();
        if opt_count > 1 {
            return Err(DNSError::Malformed(MalformedKind::Message("more than one OPT record")));
        }

        Ok(Message { header, questions, answers, authorities, additionals })
    }

    /// encode with a fresh message-scoped compression dictionary; if the
    /// result exceeds `size_limit`, sets TC and truncates whole records
    /// (Answer first, then Authority, then Additional), re-appending TSIG
    /// and OPT unmodified afterward, per spec.md §4.3
    pub fn to_network_bytes(&self, size_limit: usize) -> std::io::Result<Vec<u8>> {
        let preserved: Vec<ResourceRecord> = self
            .additionals
            .iter()
            .filter(|r| r.is_opt() || matches!(r.rtype, RecordType::TSIG))
            .cloned()
            .collect();

        let mut attempt = self.clone();
        loop {
            let bytes = attempt.encode_once()?;
            if bytes.len() <= size_limit || attempt.is_minimal(&preserved) {
                return Ok(bytes);
            }
            attempt.truncate_one(&preserved);
        }
    }

    fn is_minimal(&self, preserved: &[ResourceRecord]) -> bool {
        self.answers.is_empty()
            && self.authorities.is_empty()
            && self.additionals.len() <= preserved.len()
    }

    fn truncate_one(&mut self, preserved: &[ResourceRecord]) {
        self.header.flags.tc = true;
        if !self.answers.is_empty() {
            self.answers.pop();
            self.header.an_count = self.answers.len() as u16;
        } else if !self.authorities.is_empty() {
            self.authorities.pop();
            self.header.ns_count = self.authorities.len() as u16;
        } else if self.additionals.len() > preserved.len() {
            // drop the first non-preserved additional record
            if let Some(pos) = self
                .additionals
                .iter()
                .position(|r| !r.is_opt() && !matches!(r.rtype, RecordType::TSIG))
            {
                self.additionals.remove(pos);
                self.header.ar_count = self.additionals.len() as u16;
            }
        }
    }

    fn encode_once(&self) -> std::io::Result<Vec<u8>> {
        use crate::wire::ToFromNetworkOrder;

        let mut buffer = Vec::new();
        self.header.id.to_network_bytes(&mut buffer)?;
        self.header.flags.to_network_bytes(&mut buffer)?;
        (self.questions.len() as u16).to_network_bytes(&mut buffer)?;
        (self.answers.len() as u16).to_network_bytes(&mut buffer)?;
        (self.authorities.len() as u16).to_network_bytes(&mut buffer)?;
        (self.additionals.len() as u16).to_network_bytes(&mut buffer)?;

        let mut dictionary: HashMap<String, u16> = HashMap::new();
        for q in &self.questions {
            q.to_network_bytes_compressed(&mut buffer, &mut dictionary)?;
        }
        for r in self.answers.iter().chain(&self.authorities).chain(&self.additionals) {
            r.to_network_bytes_compressed(&mut buffer, &mut dictionary)?;
        }
        Ok(buffer)
    }

    /// apply 0x20 case randomization to the (single) outbound question
    pub fn randomize_question_case<R: rand::Rng>(&mut self, rng: &mut R) {
        for q in &mut self.questions {
            q.qname = q.qname.randomize_case(rng);
        }
    }

    /// validates that the response's echoed question matches the outbound
    /// one, label-for-label including case when 0x20 is enabled
    pub fn question_matches(&self, outbound: &Question, case_sensitive: bool) -> bool {
        self.questions.first().map_or(false, |q| {
            if case_sensitive {
                q.matches_case_sensitive(outbound)
            } else {
                q == outbound
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rdata::{RecordData, A};
    use std::net::Ipv4Addr;
    use std::str::FromStr;

    fn sample_question() -> Question {
        Question::new(Name::from_str("example.com.").unwrap(), RecordType::A, RecordClass::IN)
    }

    #[test]
    fn query_roundtrip() {
        let msg = Message::new_query(0xBEEF, sample_question(), true);
        let bytes = msg.to_network_bytes(DEFAULT_EDNS_PAYLOAD).unwrap();
        let mut cur = Cursor::new(bytes.as_slice());
        let decoded = Message::from_network_bytes(&mut cur).unwrap();
        assert_eq!(decoded.header.id, 0xBEEF);
        assert_eq!(decoded.questions, vec![sample_question()]);
        assert!(decoded.header.flags.rd);
    }

    #[test]
    fn opt_record_reinterprets_class_and_ttl() {
        let msg = Message::new_query(1, sample_question(), true).with_edns(4096, true);
        let opt = msg.opt_record().unwrap();
        assert_eq!(opt.udp_payload_size(), Some(4096));
        assert!(opt.opt_do_bit());
    }

    #[test]
    fn badvers_disambiguation_via_opt_presence() {
        // rcode 16 with no OPT record: BadSig (RFC8945 §5.3, no EDNS in play)
        let mut msg = Message::new_query(1, sample_question(), true);
        msg.header.flags.rcode = 0; // low nibble contributes 0 to the extended value
        assert_eq!(msg.rcode(), ResponseCode::NoError);

        // same low nibble, but an OPT record with ext_rcode=1 makes the
        // combined value 16 and, since OPT is present, BadVers (RFC6891 §6.1.3)
        let mut msg = msg.with_edns(4096, false);
        if let Some(opt) = msg.additionals.last_mut() {
            opt.ttl |= 1 << 24;
        }
        assert_eq!(msg.rcode(), ResponseCode::BadVers);
    }

    #[test]
    fn truncation_drops_whole_records_and_sets_tc() {
        let mut msg = Message::new_query(1, sample_question(), true);
        for i in 0..100u8 {
            msg.answers.push(ResourceRecord::new(
                Name::from_str("example.com.").unwrap(),
                RecordClass::IN,
                300,
                RecordData::A(A(Ipv4Addr::new(10, 0, 0, i))),
            ));
        }
        msg.header.an_count = msg.answers.len() as u16;

        let bytes = msg.to_network_bytes(CLASSIC_UDP_PAYLOAD).unwrap();
        assert!(bytes.len() <= CLASSIC_UDP_PAYLOAD);
        let mut cur = Cursor::new(bytes.as_slice());
        let decoded = Message::from_network_bytes(&mut cur).unwrap();
        assert!(decoded.header.flags.tc);
        assert!(decoded.answers.len() < 100);
    }

    #[test]
    fn tsig_and_opt_survive_truncation() {
        let mut msg = Message::new_query(1, sample_question(), true).with_edns(4096, false);
        for i in 0..200u8 {
            msg.answers.push(ResourceRecord::new(
                Name::from_str("example.com.").unwrap(),
                RecordClass::IN,
                300,
                RecordData::A(A(Ipv4Addr::new(10, 0, 0, i))),
            ));
        }
        msg.header.an_count = msg.answers.len() as u16;

        let bytes = msg.to_network_bytes(CLASSIC_UDP_PAYLOAD).unwrap();
        let mut cur = Cursor::new(bytes.as_slice());
        let decoded = Message::from_network_bytes(&mut cur).unwrap();
        assert!(decoded.has_opt());
    }
}
