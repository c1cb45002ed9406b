//! Chat error types.

use thiserror::Error;

/// Errors that can occur during link-chat operations.
#[derive(Error, Debug)]
pub enum ChatError {
    /// Requested interface, address, or peer not found.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The underlying send/receive primitive failed for a reason other
    /// than a timeout.
    #[error("Transport error: {0}")]
    Transport(String),

    /// No matching frame arrived within the configured window.
    ///
    /// Fatal for the phase that was waiting; the session moves to
    /// `Terminated`.
    #[error("Timed out waiting for a {phase} frame")]
    Timeout {
        /// Which frame the receive loop was waiting for.
        phase: &'static str,
    },

    /// The peer did not answer a liveness probe within the window.
    ///
    /// Unlike [`ChatError::Timeout`] this is recoverable: the caller may
    /// probe again.
    #[error("Peer did not answer the liveness probe")]
    Unreachable,

    /// Outgoing message exceeds the frame payload capacity.
    #[error("Message too long for one frame: {len} > {max} bytes")]
    PayloadTooLarge {
        /// Length of the rejected message.
        len: usize,
        /// Maximum payload the frame can carry.
        max: usize,
    },

    /// Display name outside the allowed length bound.
    #[error("Display name must be {min}..={max} bytes, got {len}")]
    InvalidName {
        /// Byte length of the rejected name.
        len: usize,
        /// Minimum allowed length.
        min: usize,
        /// Maximum allowed length.
        max: usize,
    },

    /// Textual link address that does not parse as `xx:xx:xx:xx:xx:xx`.
    #[error("Invalid link address '{0}' (expected xx:xx:xx:xx:xx:xx)")]
    InvalidAddress(String),

    /// Operation requires session state that has not been established yet.
    #[error("Session not ready: {0}")]
    SessionState(&'static str),

    /// I/O error from the transport.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
