//! TCP transport: each message prefixed with a 16-bit big-endian length.
//! The read path is a two-state machine (awaiting-length, awaiting-body),
//! not a single blocking call, so it tolerates partial reads (spec.md §4.4,
//! §9 DESIGN NOTES). The first length-prefix read gets the generous
//! `keepalive` budget (an idle, still-open connection waiting for the next
//! AXFR/IXFR response, or the very first response to a query); every
//! subsequent read on that same message gets the tighter `timeout`.
use std::net::SocketAddr;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::timeout;

use crate::error::{DNSError, DNSResult, TransportKind};
use crate::transport::{Cancellation, RawPackage};

pub struct TcpTransport {
    stream: TcpStream,
    local: SocketAddr,
    peer: SocketAddr,
}

impl TcpTransport {
    pub async fn connect(addr: SocketAddr, connect_timeout: Duration) -> DNSResult<Self> {
        let stream = timeout(connect_timeout, TcpStream::connect(addr))
            .await
            .map_err(|_| DNSError::Transport(TransportKind::Timeout))??;
        let local = stream.local_addr()?;
        Ok(TcpTransport { stream, local, peer: addr })
    }

    pub fn peer_addr(&self) -> SocketAddr {
        self.peer
    }

    /// `connection.send(raw_package) -> bool` per spec.md §6.
    pub async fn send(&mut self, bytes: &[u8]) -> DNSResult<bool> {
        let len = u16::try_from(bytes.len())
            .map_err(|_| DNSError::new("message too large for 16-bit TCP length prefix"))?;
        self.stream.write_all(&len.to_be_bytes()).await?;
        self.stream.write_all(bytes).await?;
        Ok(true)
    }

    /// read one framed message. A zero-byte read, timeout, or cancellation
    /// at either stage is reported as a clean end-of-stream (`Ok(None)`),
    /// per spec.md §4.4 — the caller (the client) decides whether that means
    /// "done" or "server hung up unexpectedly".
    pub async fn receive(
        &mut self,
        keepalive: Duration,
        read_timeout: Duration,
        cancellation: &Cancellation,
    ) -> DNSResult<Option<RawPackage>> {
        let len = match self.read_exact_or_eof(2, keepalive, cancellation).await? {
            Some(bytes) => u16::from_be_bytes([bytes[0], bytes[1]]) as usize,
            None => return Ok(None),
        };

        let body = match self.read_exact_or_eof(len, read_timeout, cancellation).await? {
            Some(bytes) => bytes,
            None => return Ok(None),
        };

        Ok(Some(RawPackage { bytes: body, local: self.local, remote: self.peer }))
    }

    async fn read_exact_or_eof(
        &mut self,
        n: usize,
        budget: Duration,
        cancellation: &Cancellation,
    ) -> DNSResult<Option<Vec<u8>>> {
        if n == 0 {
            return Ok(Some(Vec::new()));
        }
        let mut buffer = vec![0u8; n];
        tokio::select! {
            _ = cancellation.cancelled() => Ok(None),
            result = timeout(budget, self.stream.read_exact(&mut buffer)) => {
                match result {
                    Err(_) => Ok(None), // timed out: clean end-of-stream per spec.md §4.4
                    Ok(Err(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => Ok(None),
                    Ok(Err(e)) => Err(e.into()),
                    Ok(Ok(())) => Ok(Some(buffer)),
                }
            }
        }
    }
}

/// true once `last` is a terminal SOA matching `opening`'s owner, per
/// RFC5936 §2.2's AXFR/IXFR end-of-stream convention (spec.md §4.4).
pub fn is_axfr_terminator(opening_soa: &crate::rr::ResourceRecord, last_answer: &crate::rr::ResourceRecord) -> bool {
    use crate::types::RecordType;
    matches!(last_answer.rtype, RecordType::SOA) && last_answer.name == opening_soa.name
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::TcpListener;

    #[tokio::test]
    async fn loopback_framed_roundtrip() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let server = tokio::spawn(async move {
            let (mut stream, peer) = listener.accept().await.unwrap();
            let local = stream.local_addr().unwrap();
            let mut len_buf = [0u8; 2];
            stream.read_exact(&mut len_buf).await.unwrap();
            let len = u16::from_be_bytes(len_buf) as usize;
            let mut body = vec![0u8; len];
            stream.read_exact(&mut body).await.unwrap();
            (body, local, peer)
        });

        let mut client = TcpTransport::connect(addr, Duration::from_secs(1)).await.unwrap();
        client.send(b"hello-dns").await.unwrap();

        let (body, _local, _peer) = server.await.unwrap();
        assert_eq!(body, b"hello-dns");
    }

    #[tokio::test]
    async fn multi_response_framing() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            for msg in [&b"first"[..], &b"second"[..]] {
                let len = (msg.len() as u16).to_be_bytes();
                stream.write_all(&len).await.unwrap();
                stream.write_all(msg).await.unwrap();
            }
        });

        let mut client = TcpTransport::connect(addr, Duration::from_secs(1)).await.unwrap();
        let cancellation = Cancellation::new();

        let first = client
            .receive(Duration::from_secs(1), Duration::from_secs(1), &cancellation)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(first.bytes, b"first");

        let second = client
            .receive(Duration::from_secs(1), Duration::from_secs(1), &cancellation)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(second.bytes, b"second");
    }

    #[tokio::test]
    async fn connection_close_is_clean_eof() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            drop(stream);
        });

        let mut client = TcpTransport::connect(addr, Duration::from_secs(1)).await.unwrap();
        let cancellation = Cancellation::new();
        let result = client
            .receive(Duration::from_millis(200), Duration::from_millis(200), &cancellation)
            .await
            .unwrap();
        assert!(result.is_none());
    }
}
