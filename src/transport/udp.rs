//! Link-segment emulation over UDP broadcast.
//!
//! Protocol frames carry their own 6-byte addressing, so the datagram
//! layer only has to deliver every frame to every host on the segment.
//! Each endpoint binds the configured port, broadcasts its transmissions,
//! and filters nothing: destination checks belong to the protocol loops,
//! the same as on a promiscuous NIC.

use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};
use std::time::Duration;

use async_trait::async_trait;
use tokio::net::UdpSocket;
use tokio::time::timeout;

use crate::addr::MacAddr;
use crate::config::LinkConfig;
use crate::error::ChatError;
use crate::frame::FRAME_LEN;
use crate::transport::FrameTransport;

/// One endpoint on a UDP-emulated link segment.
pub struct UdpLinkTransport {
    socket: UdpSocket,
    broadcast_to: SocketAddr,
    addr: MacAddr,
    read_timeout: Duration,
}

impl UdpLinkTransport {
    /// Bind the segment port and prepare for broadcasting.
    ///
    /// The local link address is taken from `addr`, or generated randomly
    /// when the operator did not supply one.
    pub async fn open(config: &LinkConfig, addr: Option<MacAddr>) -> Result<Self, ChatError> {
        let socket = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, config.udp_port)).await?;
        socket.set_broadcast(true)?;

        Ok(Self {
            socket,
            broadcast_to: SocketAddr::V4(SocketAddrV4::new(config.broadcast_addr, config.udp_port)),
            addr: addr.unwrap_or_else(MacAddr::random),
            read_timeout: config.read_timeout,
        })
    }
}

#[async_trait]
impl FrameTransport for UdpLinkTransport {
    async fn send(&mut self, frame: &[u8]) -> Result<(), ChatError> {
        self.socket.send_to(frame, self.broadcast_to).await?;
        Ok(())
    }

    async fn recv(&mut self) -> Result<Option<Vec<u8>>, ChatError> {
        let mut buf = vec![0u8; FRAME_LEN];
        match timeout(self.read_timeout, self.socket.recv_from(&mut buf)).await {
            Err(_elapsed) => Ok(None),
            Ok(Ok((n, _from))) => {
                buf.truncate(n);
                Ok(Some(buf))
            }
            Ok(Err(e)) => Err(ChatError::Io(e)),
        }
    }

    fn local_addr(&self) -> MacAddr {
        self.addr
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_open_reports_configured_address() {
        let config = LinkConfig::default()
            .with_udp_port(0) // any free port
            .with_read_timeout(Duration::from_millis(20));
        let addr = MacAddr([0x02, 0, 0, 0, 0, 0x42]);

        let transport = UdpLinkTransport::open(&config, Some(addr)).await.unwrap();
        assert_eq!(transport.local_addr(), addr);
    }

    #[tokio::test]
    async fn test_open_generates_address_when_unset() {
        let config = LinkConfig::default().with_udp_port(0);
        let transport = UdpLinkTransport::open(&config, None).await.unwrap();
        assert_eq!(transport.local_addr().octets()[0] & 0x03, 0x02);
    }

    #[tokio::test]
    async fn test_recv_times_out_quietly() {
        let config = LinkConfig::default()
            .with_udp_port(0)
            .with_read_timeout(Duration::from_millis(20));
        let mut transport = UdpLinkTransport::open(&config, None).await.unwrap();
        assert_eq!(transport.recv().await.unwrap(), None);
    }
}
