use std::fmt;
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;

use crate::charset::{ChardetDetector, CharsetDetector};
use crate::packet::RECV_BUFFER_SIZE;

/// Settings for a [crate::session::QuerySession].
///
/// ```
/// use sampquery::config::SessionConfig;
/// use std::time::Duration;
///
/// let config = SessionConfig::default().with_timeout(Duration::from_millis(500));
/// ```
#[derive(Clone)]
pub struct SessionConfig {
    /// Bound on every send and receive. Defaults to 2 seconds.
    pub timeout: Duration,
    /// Local address the UDP socket binds to.
    pub bind_address: SocketAddr,
    /// Size of the receive buffer. Replies larger than this are cut off.
    pub recv_buffer_size: usize,
    /// Guesses the charset of info strings.
    pub detector: Arc<dyn CharsetDetector>,
}

impl SessionConfig {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(2000);

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_bind_address(mut self, bind_address: SocketAddr) -> Self {
        self.bind_address = bind_address;
        self
    }

    pub fn with_recv_buffer_size(mut self, size: usize) -> Self {
        self.recv_buffer_size = size;
        self
    }

    pub fn with_detector(mut self, detector: impl CharsetDetector + 'static) -> Self {
        self.detector = Arc::new(detector);
        self
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            timeout: Self::DEFAULT_TIMEOUT,
            bind_address: SocketAddr::from((Ipv4Addr::UNSPECIFIED, 0)),
            recv_buffer_size: RECV_BUFFER_SIZE,
            detector: Arc::new(ChardetDetector),
        }
    }
}

impl fmt::Debug for SessionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionConfig")
            .field("timeout", &self.timeout)
            .field("bind_address", &self.bind_address)
            .field("recv_buffer_size", &self.recv_buffer_size)
            .finish_non_exhaustive()
    }
}
