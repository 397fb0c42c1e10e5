//! The single-query engine (spec.md §4.5): serializes a question into a
//! message, picks UDP or TCP, retries on truncation, validates response
//! identity, and verifies TSIG if configured. The client never interprets
//! rcode — that is the resolver's job.
use std::net::SocketAddr;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use rand::Rng;
use ring::hmac;

use crate::error::{DNSError, DNSResult, ProtocolKind, ResolutionKind};
use crate::message::{Message, CLASSIC_UDP_PAYLOAD, DEFAULT_EDNS_PAYLOAD};
use crate::name::Name;
use crate::question::Question;
use crate::rdata::dnssec::tsig::Tsig;
use crate::rdata::{EdnsOption, RecordData, OPT_CODE_DAU, OPT_CODE_DHU, OPT_CODE_N3U};
use crate::rr::ResourceRecord;
use crate::transport::tcp::is_axfr_terminator;
use crate::transport::{Cancellation, TcpTransport, UdpTransport};
use crate::types::{RecordClass, RecordType};

/// bounds how many mismatched UDP datagrams (off-path noise, stale retries)
/// the client discards before giving up on a single server, per spec.md
/// §4.5 step 4's "discard responses whose id/question/TSIG do not match".
const MAX_UDP_MISMATCHES: usize = 8;

#[derive(Debug, Clone)]
pub struct TsigKey {
    pub name: Name,
    pub algorithm: Name,
    pub secret: Vec<u8>,
}

impl TsigKey {
    fn hmac_algorithm(&self) -> DNSResult<&'static hmac::Algorithm> {
        match self.algorithm.to_string().trim_end_matches('.') {
            "hmac-sha256" => Ok(&hmac::HMAC_SHA256),
            "hmac-sha384" => Ok(&hmac::HMAC_SHA384),
            "hmac-sha512" => Ok(&hmac::HMAC_SHA512),
            // unrecognized algorithms fail verification outright, per spec.md §9
            // Open Question resolution: never silently skipped.
            _ => Err(DNSError::Protocol(ProtocolKind::TsigMismatch)),
        }
    }

    fn sign(&self, unsigned_message: &[u8], variables: &[u8]) -> DNSResult<Vec<u8>> {
        let algorithm = *self.hmac_algorithm()?;
        let key = hmac::Key::new(algorithm, &self.secret);
        let mut ctx = hmac::Context::with_key(&key);
        ctx.update(unsigned_message);
        ctx.update(variables);
        Ok(ctx.sign().as_ref().to_vec())
    }
}

/// the RFC8945 §4.2 "TSIG variables" block signed alongside the unsigned
/// message: owner name, class ANY, ttl 0, algorithm, time, fudge, error,
/// other data — none of it downcased, unlike RRSIG's canonical form.
fn tsig_variables(key: &TsigKey, tsig: &Tsig) -> std::io::Result<Vec<u8>> {
    use crate::wire::ToFromNetworkOrder;
    let mut buf = Vec::new();
    key.name.to_network_bytes(&mut buf)?;
    RecordClass::ANY.to_network_bytes(&mut buf)?;
    0u32.to_network_bytes(&mut buf)?;
    tsig.algorithm.to_network_bytes(&mut buf)?;
    buf.extend_from_slice(&tsig.time_signed.to_be_bytes()[2..8]);
    tsig.fudge.to_network_bytes(&mut buf)?;
    tsig.error.to_network_bytes(&mut buf)?;
    (tsig.other_data.len() as u16).to_network_bytes(&mut buf)?;
    buf.extend_from_slice(&tsig.other_data);
    Ok(buf)
}

fn now_unix() -> u64 {
    SystemTime::now().duration_since(UNIX_EPOCH).expect("system clock before epoch").as_secs()
}

fn sign_message(message: &mut Message, key: &TsigKey) -> DNSResult<()> {
    let unsigned = message.to_network_bytes(usize::MAX)?;
    let tsig = Tsig {
        algorithm: key.algorithm.clone(),
        time_signed: now_unix(),
        fudge: 300,
        mac: Vec::new(),
        original_id: message.header.id,
        error: 0,
        other_data: Vec::new(),
    };
    let variables = tsig_variables(key, &tsig)?;
    let mac = key.sign(&unsigned, &variables)?;
    let signed = Tsig { mac, ..tsig };

    message.additionals.push(ResourceRecord {
        name: key.name.clone(),
        rtype: RecordType::TSIG,
        rclass: RecordClass::ANY,
        ttl: 0,
        rdata: RecordData::Tsig(signed),
    });
    message.header.ar_count += 1;
    Ok(())
}

/// verify a response's TSIG, per spec.md §4.5 step 6. Returns an error for
/// any mismatch: wrong key name, unsupported algorithm, stale timestamp, or
/// a MAC that does not verify.
fn verify_tsig(message: &Message, unsigned_message: &[u8], key: &TsigKey) -> DNSResult<()> {
    let record = message.tsig_record().ok_or(DNSError::Protocol(ProtocolKind::TsigMismatch))?;
    let tsig = match &record.rdata {
        RecordData::Tsig(t) => t,
        _ => return Err(DNSError::Protocol(ProtocolKind::TsigMismatch)),
    };
    if record.name != key.name || tsig.algorithm != key.algorithm {
        return Err(DNSError::Protocol(ProtocolKind::TsigMismatch));
    }
    if !tsig.is_within_fudge(now_unix()) {
        return Err(DNSError::Protocol(ProtocolKind::TsigMismatch));
    }

    let variables = tsig_variables(key, tsig)?;
    let algorithm = *key.hmac_algorithm()?;
    let verify_key = hmac::Key::new(algorithm, &key.secret);
    let mut signing_input = unsigned_message.to_vec();
    signing_input.extend_from_slice(&variables);
    hmac::verify(&verify_key, &signing_input, &tsig.mac)
        .map_err(|_| DNSError::Protocol(ProtocolKind::TsigMismatch))
}

#[derive(Debug, Clone)]
pub struct QueryOptions {
    pub recursion_desired: bool,
    /// set on outbound resolver queries (RD=0, CD=1) so upstream servers
    /// don't suppress DNSSEC records the validator needs, per spec.md §4.7.
    pub checking_disabled: bool,
    /// `None` disables EDNS entirely (classic 512-octet UDP payloads).
    pub edns_payload_size: Option<u16>,
    pub dnssec_ok: bool,
    pub enable_0x20: bool,
    pub validate_response_identity: bool,
    pub tsig: Option<TsigKey>,
}

impl Default for QueryOptions {
    fn default() -> Self {
        QueryOptions {
            recursion_desired: true,
            checking_disabled: false,
            edns_payload_size: Some(DEFAULT_EDNS_PAYLOAD as u16),
            dnssec_ok: false,
            enable_0x20: false,
            validate_response_identity: true,
            tsig: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub query_timeout: Duration,
    pub tcp_connect_timeout: Duration,
    pub tcp_keepalive: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            query_timeout: Duration::from_secs(3),
            tcp_connect_timeout: Duration::from_secs(5),
            tcp_keepalive: Duration::from_secs(10),
        }
    }
}

pub struct DnsClient {
    config: ClientConfig,
}

impl DnsClient {
    pub fn new(config: ClientConfig) -> Self {
        DnsClient { config }
    }

    /// `query(message, servers, options, cancellation) -> message` per
    /// spec.md §6. Retries once against the next server on a transport
    /// failure; there is no exponential backoff (spec.md §4.5's retry policy).
    pub async fn query(
        &self,
        question: Question,
        servers: &[SocketAddr],
        options: &QueryOptions,
        cancellation: &Cancellation,
    ) -> DNSResult<Message> {
        if servers.is_empty() {
            return Err(DNSError::Resolution(ResolutionKind::Unreachable));
        }

        let mut last_err = DNSError::Resolution(ResolutionKind::Unreachable);
        for (i, server) in servers.iter().enumerate() {
            match self.query_one_server(question.clone(), *server, options, cancellation).await {
                Ok(message) => return Ok(message),
                Err(err) => {
                    last_err = err;
                    if !last_err.is_retryable() || i + 1 == servers.len() {
                        return Err(last_err);
                    }
                }
            }
        }
        Err(last_err)
    }

    async fn query_one_server(
        &self,
        question: Question,
        server: SocketAddr,
        options: &QueryOptions,
        cancellation: &Cancellation,
    ) -> DNSResult<Message> {
        let reliable_send = matches!(question.qtype, RecordType::AXFR | RecordType::IXFR)
            || question.qtype == RecordType::ANY;

        let mut rng = rand::thread_rng();
        let id = rng.gen::<u16>();
        let mut query = self.build_query(id, question.clone(), options, &mut rng)?;

        if reliable_send {
            return self.query_tcp(query, server, options, cancellation).await;
        }

        let udp = UdpTransport::bind().await?;
        let payload_size = options.edns_payload_size.map(|s| s as usize).unwrap_or(CLASSIC_UDP_PAYLOAD);
        let bytes = query.to_network_bytes(payload_size)?;
        udp.send(&bytes, server).await?;

        for _ in 0..MAX_UDP_MISMATCHES {
            let package = match udp.receive(payload_size, self.config.query_timeout, cancellation).await? {
                Some(p) => p,
                None => return Err(DNSError::Transport(crate::error::TransportKind::Timeout)),
            };
            let mut cursor = std::io::Cursor::new(package.bytes.as_slice());
            let response = match Message::from_network_bytes(&mut cursor) {
                Ok(m) => m,
                Err(_) => continue, // malformed noise: keep waiting for the real response
            };

            if response.header.id != id {
                continue;
            }
            if options.validate_response_identity
                && !response.question_matches(&query.questions[0], options.enable_0x20)
            {
                continue;
            }
            if let Some(key) = &options.tsig {
                let unsigned = strip_tsig_for_verification(&response)?;
                if verify_tsig(&response, &unsigned, key).is_err() {
                    return Err(DNSError::Protocol(ProtocolKind::TsigMismatch));
                }
            }

            if response.header.flags.tc {
                // retry over TCP with the same id, per spec.md §4.5 step 4
                query.header.id = id;
                return self.query_tcp(query, server, options, cancellation).await;
            }

            return Ok(response);
        }

        Err(DNSError::Protocol(ProtocolKind::IdMismatch))
    }

    async fn query_tcp(
        &self,
        mut query: Message,
        server: SocketAddr,
        options: &QueryOptions,
        cancellation: &Cancellation,
    ) -> DNSResult<Message> {
        let mut tcp = TcpTransport::connect(server, self.config.tcp_connect_timeout).await?;
        let bytes = query.to_network_bytes(usize::MAX)?;
        tcp.send(&bytes).await?;

        let multi_response = matches!(query.questions[0].qtype, RecordType::AXFR | RecordType::IXFR);
        let mut opening_soa: Option<ResourceRecord> = None;
        let mut merged: Option<Message> = None;

        loop {
            let package = tcp
                .receive(self.config.tcp_keepalive, self.config.query_timeout, cancellation)
                .await?;
            let package = match package {
                Some(p) => p,
                None => break,
            };
            let mut cursor = std::io::Cursor::new(package.bytes.as_slice());
            let mut response = Message::from_network_bytes(&mut cursor)?;

            if response.header.id != query.header.id {
                return Err(DNSError::Protocol(ProtocolKind::IdMismatch));
            }
            if let Some(key) = &options.tsig {
                let unsigned = strip_tsig_for_verification(&response)?;
                verify_tsig(&response, &unsigned, key)?;
            }

            if !multi_response {
                return Ok(response);
            }

            let terminal = match (&opening_soa, response.answers.last()) {
                (None, Some(first)) if matches!(first.rtype, RecordType::SOA) => {
                    opening_soa = Some(first.clone());
                    response.answers.len() == 1
                }
                (Some(opening), Some(last)) => is_axfr_terminator(opening, last),
                _ => false,
            };

            match &mut merged {
                Some(acc) => acc.answers.append(&mut response.answers),
                None => merged = Some(response),
            }

            if terminal {
                break;
            }
        }

        merged.ok_or(DNSError::Transport(crate::error::TransportKind::ConnectionClosed))
    }

    fn build_query<R: Rng>(
        &self,
        id: u16,
        mut question: Question,
        options: &QueryOptions,
        rng: &mut R,
    ) -> DNSResult<Message> {
        if options.enable_0x20 {
            question.qname = question.qname.randomize_case(rng);
        }
        let mut message = Message::new_query(id, question, options.recursion_desired);
        message.header.flags.cd = options.checking_disabled;

        if let Some(payload_size) = options.edns_payload_size {
            message = message.with_edns(payload_size.max(512), options.dnssec_ok);
            if options.dnssec_ok {
                if let Some(opt) = message.additionals.last_mut() {
                    if let RecordData::Opt(opt_data) = &mut opt.rdata {
                        opt_data.options.push(EdnsOption { code: OPT_CODE_DAU, data: vec![8, 13, 14] });
                        opt_data.options.push(EdnsOption { code: OPT_CODE_DHU, data: vec![1, 2] });
                        opt_data.options.push(EdnsOption { code: OPT_CODE_N3U, data: vec![1] });
                    }
                }
            }
        }

        if let Some(key) = &options.tsig {
            sign_message(&mut message, key)?;
        }

        Ok(message)
    }
}

/// re-encode the response with its TSIG record removed, for use as the
/// "unsigned message" half of the TSIG verification input.
fn strip_tsig_for_verification(message: &Message) -> DNSResult<Vec<u8>> {
    let mut stripped = message.clone();
    stripped.additionals.retain(|r| !matches!(r.rtype, RecordType::TSIG));
    stripped.header.ar_count = stripped.additionals.len() as u16;
    Ok(stripped.to_network_bytes(usize::MAX)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn sample_question() -> Question {
        Question::new(Name::from_str("example.com.").unwrap(), RecordType::A, RecordClass::IN)
    }

    #[test]
    fn builds_query_with_edns_and_0x20() {
        let client = DnsClient::new(ClientConfig::default());
        let options = QueryOptions { enable_0x20: true, dnssec_ok: true, ..Default::default() };
        let mut rng = rand::thread_rng();
        let message = client.build_query(1, sample_question(), &options, &mut rng).unwrap();
        assert!(message.has_opt());
        assert!(message.opt_record().unwrap().opt_do_bit());
    }

    #[test]
    fn tsig_sign_then_verify_roundtrip() {
        let key = TsigKey {
            name: Name::from_str("key.example.").unwrap(),
            algorithm: Name::from_str("hmac-sha256.").unwrap(),
            secret: vec![0x11; 32],
        };
        let options =
            QueryOptions { tsig: Some(key.clone()), edns_payload_size: None, ..Default::default() };
        let client = DnsClient::new(ClientConfig::default());
        let mut rng = rand::thread_rng();
        let message = client.build_query(42, sample_question(), &options, &mut rng).unwrap();

        let unsigned = strip_tsig_for_verification(&message).unwrap();
        verify_tsig(&message, &unsigned, &key).unwrap();
    }

    #[test]
    fn tsig_verify_rejects_tampered_mac() {
        let key = TsigKey {
            name: Name::from_str("key.example.").unwrap(),
            algorithm: Name::from_str("hmac-sha256.").unwrap(),
            secret: vec![0x22; 32],
        };
        let options =
            QueryOptions { tsig: Some(key.clone()), edns_payload_size: None, ..Default::default() };
        let client = DnsClient::new(ClientConfig::default());
        let mut rng = rand::thread_rng();
        let mut message = client.build_query(7, sample_question(), &options, &mut rng).unwrap();
        if let Some(r) = message.additionals.last_mut() {
            if let RecordData::Tsig(tsig) = &mut r.rdata {
                tsig.mac[0] ^= 0xFF;
            }
        }
        let unsigned = strip_tsig_for_verification(&message).unwrap();
        assert!(verify_tsig(&message, &unsigned, &key).is_err());
    }
}
