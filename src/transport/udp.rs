//! UDP transport: one-shot send/recv per query (spec.md §4.4). The caller
//! (the client) is responsible for retrying over TCP when the response
//! comes back with TC set.
use std::net::SocketAddr;
use std::time::Duration;

use tokio::net::UdpSocket;
use tokio::time::timeout;

use crate::error::{DNSError, DNSResult, TransportKind};
use crate::transport::{Cancellation, RawPackage};

/// default/classic payload size without EDNS, the floor also used when
/// clamping an advertised EDNS payload size on send (spec.md §4.4).
pub const MIN_UDP_PAYLOAD: usize = 512;
pub const MAX_UDP_PAYLOAD: usize = 4096;

pub struct UdpTransport {
    socket: UdpSocket,
}

impl UdpTransport {
    /// bind an ephemeral local socket, per spec.md §6's `bind()`.
    pub async fn bind() -> DNSResult<Self> {
        let socket = UdpSocket::bind("0.0.0.0:0").await?;
        Ok(UdpTransport { socket })
    }

    pub fn local_addr(&self) -> DNSResult<SocketAddr> {
        Ok(self.socket.local_addr()?)
    }

    /// `connection.send(raw_package) -> bool` per spec.md §6: `true` on a
    /// successful send, propagating only genuine I/O errors.
    pub async fn send(&self, bytes: &[u8], to: SocketAddr) -> DNSResult<bool> {
        self.socket.send_to(bytes, to).await?;
        Ok(true)
    }

    /// `connection.receive() -> raw_package?` per spec.md §6. A timeout,
    /// cancellation, or zero-byte datagram is reported as a clean "no
    /// response" rather than an error, matching the TCP path's end-of-stream
    /// handling.
    pub async fn receive(
        &self,
        payload_size: usize,
        query_timeout: Duration,
        cancellation: &Cancellation,
    ) -> DNSResult<Option<RawPackage>> {
        let mut buffer = vec![0u8; payload_size.max(MIN_UDP_PAYLOAD)];
        let local = self.local_addr()?;

        tokio::select! {
            _ = cancellation.cancelled() => Ok(None),
            result = timeout(query_timeout, self.socket.recv_from(&mut buffer)) => {
                match result {
                    Err(_) => Err(DNSError::Transport(TransportKind::Timeout)),
                    Ok(Err(e)) => Err(e.into()),
                    Ok(Ok((0, _))) => Ok(None),
                    Ok(Ok((len, remote))) => {
                        buffer.truncate(len);
                        Ok(Some(RawPackage { bytes: buffer, local, remote }))
                    }
                }
            }
        }
    }
}
