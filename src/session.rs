//! Session state.
//!
//! Exactly one [`Session`] exists per running instance. It binds the local
//! and peer link addresses, carries the negotiated key material, and tracks
//! which protocol phase the instance is in. Key material is zeroized when
//! the session is dropped.

use tracing::debug;
use zeroize::Zeroize;

use crate::addr::MacAddr;
use crate::error::ChatError;
use crate::frame::{KEY_LEN, SALT_LEN};

/// Protocol phase of the running instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Nothing has happened yet.
    Idle,
    /// Collecting announcements from the segment.
    Discovering,
    /// The operator picked a peer from the registry.
    PeerSelected,
    /// Waiting for (or having just sent) the session offer.
    HandshakePending,
    /// Peer bound; key material not yet exchanged.
    KeyPending,
    /// Key material installed; the channel is usable.
    Ready,
    /// Messages are flowing.
    Chatting,
    /// A liveness probe went unanswered. Recoverable: probe again.
    Unreachable,
    /// A fatal transport failure ended the session.
    Terminated,
}

/// The bound local/peer address pair plus negotiated key material.
pub struct Session {
    local: MacAddr,
    peer: Option<MacAddr>,
    key: Option<[u8; KEY_LEN]>,
    salt: Option<[u8; SALT_LEN]>,
    state: SessionState,
    verifying: bool,
}

impl Drop for Session {
    fn drop(&mut self) {
        if let Some(ref mut key) = self.key {
            key.zeroize();
        }
        if let Some(ref mut salt) = self.salt {
            salt.zeroize();
        }
    }
}

impl Session {
    /// Create an idle session for the given local address.
    pub fn new(local: MacAddr) -> Self {
        Self {
            local,
            peer: None,
            key: None,
            salt: None,
            state: SessionState::Idle,
            verifying: false,
        }
    }

    /// The local link address.
    pub fn local(&self) -> MacAddr {
        self.local
    }

    /// The bound peer address, if any.
    pub fn peer(&self) -> Option<MacAddr> {
        self.peer
    }

    /// Current protocol phase.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Whether a liveness probe is in flight.
    pub fn verifying(&self) -> bool {
        self.verifying
    }

    /// The bound peer address, or an error if no peer is bound yet.
    pub fn peer_addr(&self) -> Result<MacAddr, ChatError> {
        self.peer
            .ok_or(ChatError::SessionState("no peer bound to the session"))
    }

    /// The installed key and salt, or an error before key exchange.
    pub fn key_material(&self) -> Result<([u8; KEY_LEN], [u8; SALT_LEN]), ChatError> {
        match (self.key, self.salt) {
            (Some(key), Some(salt)) => Ok((key, salt)),
            _ => Err(ChatError::SessionState("no key material installed")),
        }
    }

    /// Whether a frame from `source` belongs to this session.
    ///
    /// Once a peer is bound it is the only accepted source address.
    pub fn accepts_from(&self, source: MacAddr) -> bool {
        match self.peer {
            Some(peer) => peer == source,
            None => true,
        }
    }

    /// Enter the discovery phase.
    pub fn begin_discovery(&mut self) {
        self.advance(SessionState::Discovering);
    }

    /// Bind the operator's peer choice.
    pub fn select_peer(&mut self, peer: MacAddr) {
        self.peer = Some(peer);
        self.advance(SessionState::PeerSelected);
    }

    /// Enter the handshake phase (offer sent or awaited).
    pub fn begin_handshake(&mut self) {
        self.advance(SessionState::HandshakePending);
    }

    /// Complete the handshake with the given peer.
    ///
    /// A peer selected during discovery stays authoritative; only an
    /// unselected session binds the peer from the handshake frame.
    pub fn complete_handshake(&mut self, peer: MacAddr) {
        if self.peer.is_none() {
            self.peer = Some(peer);
        }
        self.advance(SessionState::KeyPending);
    }

    /// Install the exchanged key material and mark the session ready.
    pub fn install_key(&mut self, key: [u8; KEY_LEN], salt: [u8; SALT_LEN]) {
        if let Some(ref mut old) = self.key {
            old.zeroize();
        }
        if let Some(ref mut old) = self.salt {
            old.zeroize();
        }
        self.key = Some(key);
        self.salt = Some(salt);
        self.advance(SessionState::Ready);
    }

    /// Enter the chat phase.
    pub fn begin_chat(&mut self) {
        if self.state == SessionState::Ready {
            self.advance(SessionState::Chatting);
        }
    }

    /// Mark a liveness probe as started.
    pub fn begin_verify(&mut self) {
        self.verifying = true;
    }

    /// A probe was answered; recover from `Unreachable` if needed.
    pub fn set_reachable(&mut self) {
        self.verifying = false;
        if self.state == SessionState::Unreachable {
            self.advance(SessionState::Ready);
        }
    }

    /// A probe went unanswered.
    pub fn set_unreachable(&mut self) {
        self.verifying = false;
        self.advance(SessionState::Unreachable);
    }

    /// A fatal transport failure ended the session.
    pub fn terminate(&mut self) {
        self.verifying = false;
        self.advance(SessionState::Terminated);
    }

    fn advance(&mut self, next: SessionState) {
        if self.state != next {
            debug!(from = ?self.state, to = ?next, "session state");
            self.state = next;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(last: u8) -> MacAddr {
        MacAddr([0x02, 0, 0, 0, 0, last])
    }

    #[test]
    fn test_initiator_phase_sequence() {
        let mut session = Session::new(addr(1));
        assert_eq!(session.state(), SessionState::Idle);

        session.begin_discovery();
        session.select_peer(addr(2));
        assert_eq!(session.state(), SessionState::PeerSelected);

        session.begin_handshake();
        session.complete_handshake(addr(2));
        assert_eq!(session.state(), SessionState::KeyPending);

        session.install_key([7u8; KEY_LEN], [1, 2, 3, 4]);
        assert_eq!(session.state(), SessionState::Ready);

        session.begin_chat();
        assert_eq!(session.state(), SessionState::Chatting);
    }

    #[test]
    fn test_selected_peer_stays_authoritative() {
        let mut session = Session::new(addr(1));
        session.select_peer(addr(2));
        session.complete_handshake(addr(3));
        assert_eq!(session.peer(), Some(addr(2)));
    }

    #[test]
    fn test_unselected_session_binds_peer_from_handshake() {
        let mut session = Session::new(addr(1));
        session.begin_handshake();
        session.complete_handshake(addr(3));
        assert_eq!(session.peer(), Some(addr(3)));
    }

    #[test]
    fn test_source_filter() {
        let mut session = Session::new(addr(1));
        assert!(session.accepts_from(addr(9)), "unbound session accepts any source");

        session.select_peer(addr(2));
        assert!(session.accepts_from(addr(2)));
        assert!(!session.accepts_from(addr(9)));
    }

    #[test]
    fn test_missing_state_errors() {
        let session = Session::new(addr(1));
        assert!(matches!(session.peer_addr(), Err(ChatError::SessionState(_))));
        assert!(matches!(session.key_material(), Err(ChatError::SessionState(_))));
    }

    #[test]
    fn test_unreachable_is_recoverable() {
        let mut session = Session::new(addr(1));
        session.select_peer(addr(2));
        session.complete_handshake(addr(2));
        session.install_key([7u8; KEY_LEN], [1, 2, 3, 4]);

        session.begin_verify();
        assert!(session.verifying());
        session.set_unreachable();
        assert_eq!(session.state(), SessionState::Unreachable);
        assert!(!session.verifying());

        session.begin_verify();
        session.set_reachable();
        assert_eq!(session.state(), SessionState::Ready);
    }

    #[test]
    fn test_terminated_is_terminal_for_this_run() {
        let mut session = Session::new(addr(1));
        session.terminate();
        assert_eq!(session.state(), SessionState::Terminated);
    }
}
