//! Liveness probing.
//!
//! A probe is an empty frame each way. An unanswered probe is the one
//! timeout the protocol treats as recoverable: the session is marked
//! unreachable and the caller may probe again, since probing is expected
//! to repeat throughout a chat.

use tracing::{debug, warn};

use crate::error::ChatError;
use crate::frame::{Frame, FrameType};
use crate::protocol::await_frame;
use crate::session::Session;
use crate::transport::FrameTransport;

/// Send a liveness probe to the bound peer.
pub async fn ping<T>(transport: &mut T, session: &mut Session) -> Result<(), ChatError>
where
    T: FrameTransport,
{
    let peer = session.peer_addr()?;
    session.begin_verify();

    let frame = Frame::liveness(peer, session.local());
    transport.send(&frame.encode()).await.map_err(|e| {
        session.terminate();
        e
    })
}

/// Block for the answering probe from the bound peer.
///
/// A quiet window reports [`ChatError::Unreachable`] instead of a fatal
/// timeout; the session can recover through a later probe.
pub async fn await_pong<T>(transport: &mut T, session: &mut Session) -> Result<(), ChatError>
where
    T: FrameTransport,
{
    let peer = session.peer_addr()?;
    let local = session.local();

    let result = await_frame(transport, "liveness", |f| {
        f.frame_type == FrameType::Liveness && f.destination == local && f.source == peer
    })
    .await;

    match result {
        Ok(_) => {
            debug!(peer = %peer, "peer is reachable");
            session.set_reachable();
            Ok(())
        }
        Err(ChatError::Timeout { .. }) => {
            warn!(peer = %peer, "liveness probe unanswered");
            session.set_unreachable();
            Err(ChatError::Unreachable)
        }
        Err(e) => {
            session.terminate();
            Err(e)
        }
    }
}
