//! Discovered-peer registry.
//!
//! Holds the local link address and every peer that announced itself on
//! the segment, most recently discovered first. Entries live for the
//! process lifetime; there is no removal.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::addr::MacAddr;

/// One peer discovered through an announcement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeerRecord {
    /// Display name the peer announced.
    pub name: String,
    /// The peer's link address.
    pub address: MacAddr,
}

/// Ordered collection of discovered peers plus the local address.
#[derive(Debug, Default)]
pub struct PeerRegistry {
    local: Option<MacAddr>,
    peers: Vec<PeerRecord>,
}

impl PeerRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the address of the active transport. Called once at startup.
    pub fn set_local_addr(&mut self, addr: MacAddr) {
        self.local = Some(addr);
    }

    /// The local link address, if one has been recorded.
    pub fn local_addr(&self) -> Option<MacAddr> {
        self.local
    }

    /// Record a discovered peer at the most-recent position.
    ///
    /// Re-announcing an address updates its name and moves the record to
    /// the front instead of accumulating duplicates.
    pub fn record_peer(&mut self, name: String, address: MacAddr) {
        if let Some(pos) = self.peers.iter().position(|p| p.address == address) {
            self.peers.remove(pos);
        }
        debug!(peer = %address, name = %name, "recorded peer");
        self.peers.insert(0, PeerRecord { name, address });
    }

    /// Find a peer by address, as selected by the operator.
    pub fn lookup(&self, address: MacAddr) -> Option<&PeerRecord> {
        self.peers.iter().find(|p| p.address == address)
    }

    /// All discovered peers, most recent first.
    pub fn peers(&self) -> &[PeerRecord] {
        &self.peers
    }

    /// Number of known peers.
    pub fn len(&self) -> usize {
        self.peers.len()
    }

    /// Whether no peers have been discovered yet.
    pub fn is_empty(&self) -> bool {
        self.peers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(last: u8) -> MacAddr {
        MacAddr([0x02, 0, 0, 0, 0, last])
    }

    #[test]
    fn test_most_recent_first() {
        let mut registry = PeerRegistry::new();
        registry.record_peer("Alice-Device".into(), addr(1));
        registry.record_peer("Bob-Machine".into(), addr(2));

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.peers()[0].address, addr(2));
        assert_eq!(registry.peers()[1].address, addr(1));
    }

    #[test]
    fn test_reannounce_updates_and_moves_to_front() {
        let mut registry = PeerRegistry::new();
        registry.record_peer("Alice-Device".into(), addr(1));
        registry.record_peer("Bob-Machine".into(), addr(2));
        registry.record_peer("Alice-Laptop".into(), addr(1));

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.peers()[0].name, "Alice-Laptop");
        assert_eq!(registry.peers()[0].address, addr(1));
        assert_eq!(registry.lookup(addr(1)).unwrap().name, "Alice-Laptop");
    }

    #[test]
    fn test_lookup_missing_peer() {
        let mut registry = PeerRegistry::new();
        registry.record_peer("Alice-Device".into(), addr(1));
        assert!(registry.lookup(addr(9)).is_none());
    }

    #[test]
    fn test_local_addr_is_recorded() {
        let mut registry = PeerRegistry::new();
        assert!(registry.local_addr().is_none());
        registry.set_local_addr(addr(7));
        assert_eq!(registry.local_addr(), Some(addr(7)));
    }
}
