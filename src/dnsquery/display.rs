//! Display method: as we can't impl the Display trait outside the module where it's defined, and
//! to not put these methods in the lib, use a wrapper
use std::fmt;

use dnslib::{header::Flags, header::Header, message::Message, rr::ResourceRecord};

pub struct DisplayWrapper<'a, T>(pub &'a T);

// Now we can implement the Display trait for DisplayWrapper for all structure we want to display
impl fmt::Display for DisplayWrapper<'_, Flags> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "qr:{} opcode:{:?} aa:{} tc:{} rd:{} ra:{} ad:{} cd:{} rcode:{}",
            self.0.qr, self.0.opcode, self.0.aa, self.0.tc, self.0.rd, self.0.ra, self.0.ad, self.0.cd, self.0.rcode
        )
    }
}

impl fmt::Display for DisplayWrapper<'_, Header> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "id:{:X}({}) ", self.0.id, self.0.id)?;
        write!(f, "flags:[{}] ", DisplayWrapper(&self.0.flags))?;
        write!(
            f,
            "qd:{}, an:{} ns:{} ar:{}",
            self.0.qd_count, self.0.an_count, self.0.ns_count, self.0.ar_count
        )
    }
}

impl fmt::Display for DisplayWrapper<'_, ResourceRecord> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<30}{:<8}{:<8}{:<10}{}",
            self.0.name.to_string(),
            self.0.ttl,
            self.0.rclass,
            self.0.rtype,
            self.0.rdata.to_text()
        )
    }
}

fn display_section(title: &str, records: &[ResourceRecord]) {
    if records.is_empty() {
        return;
    }
    println!();
    println!(";; {} SECTION:", title);
    for rr in records {
        println!("{}", DisplayWrapper(rr));
    }
}

/// The global display method: prints the header, question and every section
/// of a decoded response in a zone-file-like layout.
pub fn display_message(message: &Message) {
    println!("{}", DisplayWrapper(&message.header));
    println!(";; status: {:?}", message.rcode());

    if !message.questions.is_empty() {
        println!();
        println!(";; QUESTION SECTION:");
        for q in &message.questions {
            println!(";{:<29}{:<8}{}", q.qname.to_string(), q.qclass, q.qtype);
        }
    }

    display_section("ANSWER", &message.answers);
    display_section("AUTHORITY", &message.authorities);
    display_section("ADDITIONAL", &message.additionals);
    println!();
}
