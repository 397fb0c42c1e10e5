//! A dedicated error type for everything that can go wrong in this crate: I/O,
//! malformed wire data, transport hiccups, and resolution/validation failures.
use std::io;
use std::str;

/// Kinds of malformed input detected by the wire codec. Never retried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MalformedKind {
    /// a name decoded to more than 255 octets, a label > 63 octets, a
    /// reserved 0b10/0b01 label tag, or a compression pointer cycle/overflow
    Name(&'static str),
    /// a record's RDATA did not match its declared rdlength or type shape
    Record(&'static str),
    /// the message header/section counts are inconsistent with the buffer
    Message(&'static str),
}

/// Transport-level failures. Retried once against an alternate server by the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportKind {
    Timeout,
    ConnectionClosed,
    Cancelled,
}

/// Protocol-level failures detected by the client while matching a response
/// to its query. Dropped and retried at most once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProtocolKind {
    /// response arrived over UDP with TC set; recover by retrying on TCP
    TruncatedOverUdp,
    IdMismatch,
    QuestionMismatch,
    TsigMismatch,
}

/// Resolution failures surfaced to the caller of `resolve`/`resolve_secure`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionKind {
    LoopDetected,
    ReferralLimitExceeded,
    Unreachable,
    NoDelegation,
    NoAnswer,
}

/// DNSSEC validation failures surfaced only when the caller asked for a
/// secure result and no valid chain of trust could be built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationKind {
    Bogus(&'static str),
    Indeterminate(&'static str),
}

#[derive(Debug)]
pub enum DNSError {
    Io(io::Error),
    FromUtf8(std::string::FromUtf8Error),
    Utf8(str::Utf8Error),
    Malformed(MalformedKind),
    Transport(TransportKind),
    Protocol(ProtocolKind),
    Resolution(ResolutionKind),
    Validation(ValidationKind),
    /// catch-all for truly unclassified internal errors (enum conversions, etc)
    Other(String),
}

/// A specific custom `Result` for all functions in this crate.
pub type DNSResult<T> = Result<T, DNSError>;

impl DNSError {
    pub fn new(s: &str) -> Self {
        DNSError::Other(String::from(s))
    }

    /// whether the client should retry this error once against another
    /// server / over another transport, per spec.md §7's propagation policy
    pub fn is_retryable(&self) -> bool {
        matches!(self, DNSError::Transport(_) | DNSError::Protocol(_))
    }
}

impl std::fmt::Display for DNSError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl std::error::Error for DNSError {}

impl From<io::Error> for DNSError {
    fn from(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::TimedOut => DNSError::Transport(TransportKind::Timeout),
            io::ErrorKind::ConnectionReset
            | io::ErrorKind::ConnectionAborted
            | io::ErrorKind::BrokenPipe
            | io::ErrorKind::UnexpectedEof => DNSError::Transport(TransportKind::ConnectionClosed),
            _ => DNSError::Io(err),
        }
    }
}

impl From<std::string::FromUtf8Error> for DNSError {
    fn from(err: std::string::FromUtf8Error) -> Self {
        DNSError::FromUtf8(err)
    }
}

impl From<str::Utf8Error> for DNSError {
    fn from(err: str::Utf8Error) -> Self {
        DNSError::Utf8(err)
    }
}

impl From<String> for DNSError {
    fn from(err: String) -> Self {
        DNSError::Other(err)
    }
}

impl From<tokio::time::error::Elapsed> for DNSError {
    fn from(_: tokio::time::error::Elapsed) -> Self {
        DNSError::Transport(TransportKind::Timeout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retryable_kinds() {
        assert!(DNSError::Transport(TransportKind::Timeout).is_retryable());
        assert!(DNSError::Protocol(ProtocolKind::TruncatedOverUdp).is_retryable());
        assert!(!DNSError::Resolution(ResolutionKind::LoopDetected).is_retryable());
    }
}
