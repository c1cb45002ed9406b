//! Frame transports.
//!
//! The protocol phases depend only on the narrow [`FrameTransport`]
//! contract: transmit one frame, wait for the next frame up to a
//! configured read timeout, and report the local link address.

mod hub;
mod udp;

pub use hub::{HubTransport, LinkHub};
pub use udp::UdpLinkTransport;

use async_trait::async_trait;

use crate::addr::MacAddr;
use crate::error::ChatError;

/// Bidirectional access to a shared link segment.
#[async_trait]
pub trait FrameTransport: Send {
    /// Transmit one encoded frame to the segment.
    async fn send(&mut self, frame: &[u8]) -> Result<(), ChatError>;

    /// Wait for the next frame on the segment.
    ///
    /// Returns `Ok(None)` when the configured read timeout elapses with no
    /// traffic; errors are reserved for transport failures.
    async fn recv(&mut self) -> Result<Option<Vec<u8>>, ChatError>;

    /// The link address this endpoint transmits from.
    fn local_addr(&self) -> MacAddr;
}
