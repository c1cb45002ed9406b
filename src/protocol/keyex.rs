//! Key exchange.
//!
//! The initiator generates the session key and salt, installs them, and
//! ships them to the bound peer in one KeyMaterial frame. The peer blocks
//! until that frame arrives and installs the bytes exactly as sent.

use tracing::debug;

use crate::crypto;
use crate::error::ChatError;
use crate::frame::{Frame, FrameType};
use crate::protocol::await_frame;
use crate::session::Session;
use crate::transport::FrameTransport;

/// Generate and send the session key material. Initiator only.
pub async fn offer_key<T>(transport: &mut T, session: &mut Session) -> Result<(), ChatError>
where
    T: FrameTransport,
{
    let peer = session.peer_addr()?;

    let key = crypto::generate_key();
    let salt = crypto::generate_salt();
    let frame = Frame::key_material(peer, session.local(), &key, &salt);
    session.install_key(key, salt);

    transport.send(&frame.encode()).await.map_err(|e| {
        session.terminate();
        e
    })?;

    debug!(peer = %peer, "key material offered");
    Ok(())
}

/// Block until the session key material arrives from the bound peer.
///
/// The key and salt are read at their fixed payload offsets; the received
/// bytes are installed exactly as sent. A quiet window is fatal.
pub async fn await_key<T>(transport: &mut T, session: &mut Session) -> Result<(), ChatError>
where
    T: FrameTransport,
{
    let peer = session.peer_addr()?;
    let local = session.local();

    let frame = await_frame(transport, "key material", |f| {
        f.frame_type == FrameType::KeyMaterial
            && f.destination == local
            && f.source == peer
            && f.key_material_payload().is_some()
    })
    .await
    .map_err(|e| {
        session.terminate();
        e
    })?;

    let (key, salt) = frame
        .key_material_payload()
        .ok_or_else(|| ChatError::Transport("key material payload vanished".into()))?;
    session.install_key(key, salt);

    debug!(peer = %peer, "key material installed");
    Ok(())
}
