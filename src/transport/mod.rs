//! Transport abstractions: length-framed byte buffers in, length-framed byte
//! buffers out. UDP is one-shot send/recv; TCP is a persistent, keepalive
//! connection with 16-bit length-prefixed framing and support for
//! multi-response AXFR/IXFR streaming (spec.md §4.4, §6 Transport API).
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::Notify;

pub mod tcp;
pub mod udp;

pub use tcp::TcpTransport;
pub use udp::UdpTransport;

/// a framed byte buffer plus its remote and local endpoints, per spec.md §6's
/// Transport API (`raw_package`).
#[derive(Debug, Clone)]
pub struct RawPackage {
    pub bytes: Vec<u8>,
    pub local: SocketAddr,
    pub remote: SocketAddr,
}

/// a cooperative cancellation handle: cheap to clone, triggered once from
/// anywhere, observed at the next suspension point. This crate hand-rolls
/// the one method it needs instead of depending on `tokio-util` for a
/// single type (spec.md §5 resolution note, recorded in DESIGN.md).
#[derive(Debug, Clone, Default)]
pub struct Cancellation {
    cancelled: Arc<AtomicBool>,
    notify: Arc<Notify>,
}

impl Cancellation {
    pub fn new() -> Self {
        Cancellation::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
        self.notify.notify_waiters();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// resolves immediately if already cancelled, otherwise waits for the
    /// next `cancel()` call. Callers race this against I/O with
    /// `tokio::select!` at every suspension point (spec.md §5).
    pub async fn cancelled(&self) {
        if self.is_cancelled() {
            return;
        }
        self.notify.notified().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn cancellation_resolves_once_triggered() {
        let cancellation = Cancellation::new();
        assert!(!cancellation.is_cancelled());

        let waiter = cancellation.clone();
        let handle = tokio::spawn(async move {
            waiter.cancelled().await;
        });

        cancellation.cancel();
        handle.await.unwrap();
        assert!(cancellation.is_cancelled());
    }

    #[tokio::test]
    async fn already_cancelled_returns_immediately() {
        let cancellation = Cancellation::new();
        cancellation.cancel();
        cancellation.cancelled().await;
    }
}
