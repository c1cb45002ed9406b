//! Protocol phases.
//!
//! Each phase is one blocking call that suspends the caller until a
//! matching frame arrives or the transport's read timeout elapses. The
//! receive loops share one primitive: await the next frame matching a
//! predicate, discarding everything else. A discarded frame is never an
//! error; the loop simply keeps listening.

pub mod chat;
pub mod discovery;
pub mod handshake;
pub mod keyex;
pub mod liveness;

use tracing::trace;

use crate::config::{MAX_NAME_LEN, MIN_NAME_LEN};
use crate::error::ChatError;
use crate::frame::Frame;
use crate::transport::FrameTransport;

/// Await the next frame matching `accept`, up to the read timeout.
///
/// Non-protocol buffers and non-matching frames are filtered and the loop
/// continues; a quiet window surfaces as [`ChatError::Timeout`] tagged with
/// the waiting phase.
pub(crate) async fn await_frame<T, F>(
    transport: &mut T,
    phase: &'static str,
    accept: F,
) -> Result<Frame, ChatError>
where
    T: FrameTransport,
    F: Fn(&Frame) -> bool,
{
    loop {
        let Some(raw) = transport.recv().await? else {
            return Err(ChatError::Timeout { phase });
        };
        let Some(frame) = Frame::decode(&raw) else {
            trace!(len = raw.len(), "ignoring non-protocol frame");
            continue;
        };
        if accept(&frame) {
            return Ok(frame);
        }
        trace!(
            subtype = ?frame.frame_type,
            source = %frame.source,
            "discarding non-matching frame"
        );
    }
}

/// Enforce the display-name length bound before anything is sent.
pub(crate) fn validate_name(name: &str) -> Result<(), ChatError> {
    let len = name.len();
    if !(MIN_NAME_LEN..=MAX_NAME_LEN).contains(&len) {
        return Err(ChatError::InvalidName {
            len,
            min: MIN_NAME_LEN,
            max: MAX_NAME_LEN,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_bounds() {
        assert!(validate_name("Alice-Device").is_ok());
        assert!(validate_name("a".repeat(10).as_str()).is_ok());
        assert!(validate_name("a".repeat(50).as_str()).is_ok());

        assert!(matches!(
            validate_name("short"),
            Err(ChatError::InvalidName { len: 5, .. })
        ));
        assert!(matches!(
            validate_name("a".repeat(51).as_str()),
            Err(ChatError::InvalidName { len: 51, .. })
        ));
    }
}
