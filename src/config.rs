//! Link and protocol configuration.

use std::net::Ipv4Addr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Minimum display-name length in bytes.
pub const MIN_NAME_LEN: usize = 10;

/// Maximum display-name length in bytes.
pub const MAX_NAME_LEN: usize = 50;

/// Default transport read timeout.
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(60);

/// Default UDP port for the link-segment emulation.
pub const DEFAULT_UDP_PORT: u16 = 31420;

/// Configuration for opening a transport and running the protocol phases.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkConfig {
    /// How long a receive call waits before reporting no activity.
    pub read_timeout: Duration,

    /// UDP port the link-segment emulation binds and broadcasts on.
    pub udp_port: u16,

    /// Broadcast address of the emulated segment.
    pub broadcast_addr: Ipv4Addr,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            read_timeout: DEFAULT_READ_TIMEOUT,
            udp_port: DEFAULT_UDP_PORT,
            broadcast_addr: Ipv4Addr::BROADCAST,
        }
    }
}

impl LinkConfig {
    /// Override the read timeout.
    pub fn with_read_timeout(mut self, read_timeout: Duration) -> Self {
        self.read_timeout = read_timeout;
        self
    }

    /// Override the UDP port.
    pub fn with_udp_port(mut self, udp_port: u16) -> Self {
        self.udp_port = udp_port;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LinkConfig::default();
        assert_eq!(config.read_timeout, DEFAULT_READ_TIMEOUT);
        assert_eq!(config.udp_port, DEFAULT_UDP_PORT);
        assert_eq!(config.broadcast_addr, Ipv4Addr::BROADCAST);
    }

    #[test]
    fn test_builder_overrides() {
        let config = LinkConfig::default()
            .with_read_timeout(Duration::from_millis(50))
            .with_udp_port(40000);
        assert_eq!(config.read_timeout, Duration::from_millis(50));
        assert_eq!(config.udp_port, 40000);
    }
}
