//! Encrypted chat channel.
//!
//! Messages are transformed with the session key material and carried in
//! one frame each. A message that cannot fit is a caller error; it is
//! never silently truncated.

use tracing::debug;

use crate::crypto;
use crate::error::ChatError;
use crate::frame::{Frame, FrameType, CHAT_CAPACITY};
use crate::protocol::await_frame;
use crate::session::Session;
use crate::transport::FrameTransport;

/// Encrypt and send one chat message to the bound peer.
pub async fn send<T>(
    transport: &mut T,
    session: &mut Session,
    plaintext: &str,
) -> Result<(), ChatError>
where
    T: FrameTransport,
{
    let peer = session.peer_addr()?;
    let (key, salt) = session.key_material()?;

    if plaintext.len() > CHAT_CAPACITY {
        return Err(ChatError::PayloadTooLarge {
            len: plaintext.len(),
            max: CHAT_CAPACITY,
        });
    }

    let ciphertext = crypto::transform(plaintext.as_bytes(), &key, &salt);
    let frame = Frame::chat(peer, session.local(), &ciphertext)?;
    transport.send(&frame.encode()).await.map_err(|e| {
        session.terminate();
        e
    })?;

    session.begin_chat();
    debug!(peer = %peer, len = plaintext.len(), "chat message sent");
    Ok(())
}

/// Block for the next chat message from the bound peer and decrypt it.
///
/// The transform is its own inverse, so decryption is the same call that
/// encrypted. A quiet window is fatal for this receive; callers that want
/// to keep the session alive probe liveness and try again.
pub async fn receive<T>(transport: &mut T, session: &mut Session) -> Result<String, ChatError>
where
    T: FrameTransport,
{
    let peer = session.peer_addr()?;
    let (key, salt) = session.key_material()?;
    let local = session.local();

    let frame = match await_frame(transport, "chat", |f| {
        f.frame_type == FrameType::Chat
            && f.destination == local
            && f.source == peer
            && f.chat_ciphertext().is_some()
    })
    .await
    {
        Ok(frame) => frame,
        // A quiet window leaves the session intact so the caller can
        // probe liveness; real transport failures end it.
        Err(e @ ChatError::Timeout { .. }) => return Err(e),
        Err(e) => {
            session.terminate();
            return Err(e);
        }
    };

    let ciphertext = frame
        .chat_ciphertext()
        .ok_or_else(|| ChatError::Transport("chat payload vanished".into()))?;
    let plaintext = crypto::transform(&ciphertext, &key, &salt);

    session.begin_chat();
    debug!(peer = %peer, len = plaintext.len(), "chat message received");
    // The stream cipher carries no integrity; a mismatched key shows up
    // as garbage here, not as an error.
    Ok(String::from_utf8_lossy(&plaintext).into_owned())
}
