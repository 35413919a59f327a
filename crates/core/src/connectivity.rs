//! Connectivity detection, consulted before any catalog request goes out.

use std::net::{SocketAddr, TcpStream};
use std::time::Duration;

pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(2);

/// Public DNS on port 53 answers from almost any network.
pub fn default_probe_addr() -> SocketAddr {
    SocketAddr::from(([8, 8, 8, 8], 53))
}

/// Yes/no connectivity answer at trigger time.
pub trait ConnectivityProbe: Send + Sync {
    fn is_connected(&self) -> bool;
}

/// Probe that opens (and immediately drops) one TCP connection to a
/// well-known address.
pub struct TcpProbe {
    addr: SocketAddr,
    timeout: Duration,
}

impl TcpProbe {
    pub fn new(addr: SocketAddr) -> Self {
        Self {
            addr,
            timeout: DEFAULT_PROBE_TIMEOUT,
        }
    }

    pub fn with_timeout(addr: SocketAddr, timeout: Duration) -> Self {
        Self { addr, timeout }
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }
}

impl Default for TcpProbe {
    fn default() -> Self {
        Self::new(default_probe_addr())
    }
}

impl ConnectivityProbe for TcpProbe {
    fn is_connected(&self) -> bool {
        match TcpStream::connect_timeout(&self.addr, self.timeout) {
            Ok(_) => true,
            Err(e) => {
                tracing::debug!(addr = %self.addr, error = %e, "connectivity probe failed");
                false
            }
        }
    }
}

/// Always-connected stub, for callers that want to skip the probe.
pub struct AlwaysOnline;

impl ConnectivityProbe for AlwaysOnline {
    fn is_connected(&self) -> bool {
        true
    }
}

/// Never-connected stub.
pub struct Offline;

impl ConnectivityProbe for Offline {
    fn is_connected(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stubs_answer_as_named() {
        assert!(AlwaysOnline.is_connected());
        assert!(!Offline.is_connected());
    }

    #[test]
    fn probe_against_closed_local_port_reports_offline() {
        let probe = TcpProbe::with_timeout(
            SocketAddr::from(([127, 0, 0, 1], 1)),
            Duration::from_millis(200),
        );
        assert!(!probe.is_connected());
    }

    #[test]
    fn probe_against_listening_socket_reports_online() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let probe = TcpProbe::new(listener.local_addr().unwrap());
        assert!(probe.is_connected());
    }
}
