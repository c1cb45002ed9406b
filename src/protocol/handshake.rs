//! Session handshake.
//!
//! The initiator sends one unicast offer to the peer it selected during
//! discovery; the offer is not acknowledged, the selection itself is
//! authoritative. The other side blocks until an offer addressed to it
//! arrives and binds the session to the offering peer.

use tracing::debug;

use crate::error::ChatError;
use crate::frame::{Frame, FrameType};
use crate::protocol::{await_frame, validate_name};
use crate::session::Session;
use crate::transport::FrameTransport;

/// Send a session offer to the selected peer.
///
/// Carries the local display name so the peer can show who is offering.
/// Fire-and-forget: the session moves straight to the key-exchange phase.
pub async fn offer<T>(
    transport: &mut T,
    session: &mut Session,
    name: &str,
) -> Result<(), ChatError>
where
    T: FrameTransport,
{
    validate_name(name)?;
    let peer = session.peer_addr()?;

    let frame = Frame::session_accept(peer, session.local(), name);
    transport.send(&frame.encode()).await.map_err(|e| {
        session.terminate();
        e
    })?;

    debug!(peer = %peer, "session offer sent");
    session.complete_handshake(peer);
    Ok(())
}

/// Block until a session offer addressed to us arrives.
///
/// When a peer was already selected, only offers from that address match;
/// otherwise the first valid offer binds the session peer. A quiet window
/// is fatal for this phase.
pub async fn await_offer<T>(transport: &mut T, session: &mut Session) -> Result<(), ChatError>
where
    T: FrameTransport,
{
    let local = session.local();
    let expected = session.peer();
    session.begin_handshake();

    let frame = await_frame(transport, "session accept", |f| {
        f.frame_type == FrameType::SessionAccept
            && f.destination == local
            && expected.map_or(true, |peer| f.source == peer)
    })
    .await
    .map_err(|e| {
        session.terminate();
        e
    })?;

    match frame.name() {
        Some(name) => debug!(peer = %frame.source, name = %name, "session offer accepted"),
        None => debug!(peer = %frame.source, "session offer accepted"),
    }
    session.complete_handshake(frame.source);
    Ok(())
}
