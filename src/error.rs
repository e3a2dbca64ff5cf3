use std::net::SocketAddrV4;

use thiserror::Error;

/// Everything that can go wrong while talking to a SA-MP server.
#[derive(Error, Debug)]
pub enum SampQueryError {
    /// The host could not be looked up at all.
    #[error("failed to resolve host `{0}`: {1}")]
    HostResolution(String, #[source] std::io::Error),

    /// The host resolved, but not to any IPv4 address.
    #[error("host `{0}` has no IPv4 address")]
    NoIpv4Address(String),

    /// `host[:port]` input with a port outside 0..=65535.
    #[error("invalid port `{0}`")]
    InvalidPort(String),

    /// Input with more than one `:`, e.g. an IPv6 address.
    #[error("`{0}` is not a `host[:port]` address, IPv6 is not supported")]
    UnsupportedAddress(String),

    #[error("failed to bind local socket: {0}")]
    FailedPortBind(#[source] std::io::Error),

    #[error("failed to connect socket to host: {0}")]
    UnreachableHost(#[source] std::io::Error),

    /// The liveness probe sent on session construction got no reply.
    #[error("couldn't connect to server {0}")]
    ConnectionFailed(SocketAddrV4),

    #[error("failed to send packet: {0}")]
    SendError(#[source] std::io::Error),

    #[error("failed to receive packet: {0}")]
    ReceiveError(#[source] std::io::Error),

    #[error("timed out waiting for server")]
    Timeout(#[from] tokio::time::error::Elapsed),

    /// The session was closed, locally or through a [crate::session::SessionCloser].
    #[error("use of closed query session")]
    Closed,

    #[error("reply shorter than the {0} byte header")]
    TruncatedHeader(usize),

    #[error("reply does not start with `SAMP`")]
    BadMagic,

    #[error("unknown opcode {0:#04x}")]
    UnknownOpcode(u8),

    #[error("reply ended early: needed {needed} bytes at offset {offset}")]
    UnexpectedEof { offset: usize, needed: usize },
}

impl SampQueryError {
    /// True if the server did not answer in time.
    pub fn is_timeout(&self) -> bool {
        matches!(self, SampQueryError::Timeout(_))
    }

    /// True if the server answered with something that could not be parsed.
    pub fn is_malformed(&self) -> bool {
        matches!(
            self,
            SampQueryError::TruncatedHeader(_)
                | SampQueryError::BadMagic
                | SampQueryError::UnknownOpcode(_)
                | SampQueryError::UnexpectedEof { .. }
        )
    }
}
