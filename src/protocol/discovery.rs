//! Peer discovery.
//!
//! One side broadcasts an announcement carrying its display name; the
//! other collects announcements into the registry until the caller stops
//! it or the transport window closes with no traffic at all.

use tokio::sync::oneshot;
use tracing::{debug, trace};

use crate::error::ChatError;
use crate::frame::{Frame, FrameType};
use crate::protocol::validate_name;
use crate::registry::PeerRegistry;
use crate::transport::FrameTransport;

/// Broadcast one presence announcement.
///
/// The display name must be within the protocol bound; a violation is a
/// caller error reported before anything reaches the wire.
pub async fn announce<T>(transport: &mut T, name: &str) -> Result<(), ChatError>
where
    T: FrameTransport,
{
    validate_name(name)?;
    let frame = Frame::announce(transport.local_addr(), name);
    transport.send(&frame.encode()).await?;
    debug!(name = %name, "announced presence");
    Ok(())
}

/// Collect announcements into the registry until stopped.
///
/// Accepts only broadcast Announce frames from other hosts; everything
/// else is filtered and listening continues. Returns `Ok` when the stop
/// handle fires, or a timeout error when the transport reports no activity
/// within its configured window.
pub async fn listen<T>(
    transport: &mut T,
    registry: &mut PeerRegistry,
    mut stop: oneshot::Receiver<()>,
) -> Result<(), ChatError>
where
    T: FrameTransport,
{
    let local = transport.local_addr();

    loop {
        tokio::select! {
            _ = &mut stop => {
                debug!(peers = registry.len(), "discovery stopped");
                return Ok(());
            }
            received = transport.recv() => {
                let Some(raw) = received? else {
                    return Err(ChatError::Timeout { phase: "announce" });
                };
                let Some(frame) = Frame::decode(&raw) else {
                    trace!(len = raw.len(), "ignoring non-protocol frame");
                    continue;
                };
                if frame.frame_type != FrameType::Announce {
                    trace!(subtype = ?frame.frame_type, "discarding non-announce frame");
                    continue;
                }
                if !frame.destination.is_broadcast() {
                    trace!(destination = %frame.destination, "discarding non-broadcast announce");
                    continue;
                }
                if frame.source == local {
                    trace!("ignoring our own announcement");
                    continue;
                }
                let Some(name) = frame.name() else {
                    trace!(source = %frame.source, "discarding announce with malformed name");
                    continue;
                };
                registry.record_peer(name, frame.source);
            }
        }
    }
}
