//! A DNS resource query
use std::net::{SocketAddr, ToSocketAddrs};
use std::str::FromStr;

use log::debug;

// our DNS library
use dnslib::{
    client::{ClientConfig, DnsClient, QueryOptions},
    error::{DNSError, DNSResult},
    format_buffer,
    name::Name,
    question::Question,
    transport::Cancellation,
    types::{RecordClass, ResponseCode},
};

mod args;
use args::CliOptions;

mod display;
use display::display_message;

#[tokio::main]
async fn main() -> DNSResult<()> {
    env_logger::init();

    // manage arguments from command line
    let options = CliOptions::options()?;
    debug!("options: {:?}", &options);

    let servers = resolve_nameserver(&options.ns)?;
    debug!("servers: {:?}", &servers);

    // build the question from command line arguments
    let qname = Name::from_text_with_origin(&options.domain, &Name::root())?;
    let question = Question::new(qname, options.qtype, RecordClass::IN);
    debug!("question to send: {:?}", &question);

    let query_options = QueryOptions {
        recursion_desired: true,
        checking_disabled: false,
        edns_payload_size: if options.no_opt { None } else { Some(4096) },
        dnssec_ok: options.dnssec,
        enable_0x20: false,
        validate_response_identity: true,
        tsig: None,
    };

    let client = DnsClient::new(ClientConfig::default());
    let cancellation = Cancellation::new();

    let response = client.query(question, &servers, &query_options, &cancellation).await?;

    if options.debug {
        let bytes = response.to_network_bytes(usize::MAX)?;
        debug!("received buffer: {}", format_buffer!("X", &bytes));
    }

    if response.rcode() != ResponseCode::NoError {
        eprintln!("Response error: {:?}", response.rcode());
        display_message(&response);
        std::process::exit(1);
    }

    display_message(&response);

    Ok(())
}

/// accepts either `ip` or `ip:port`, defaulting to the standard DNS port
fn resolve_nameserver(ns: &str) -> DNSResult<Vec<SocketAddr>> {
    if let Ok(addr) = SocketAddr::from_str(ns) {
        return Ok(vec![addr]);
    }
    let with_port = format!("{ns}:53");
    with_port
        .to_socket_addrs()
        .map(|it| it.collect())
        .map_err(|_| DNSError::new(&format!("invalid nameserver address: {ns}")))
}
