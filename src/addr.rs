//! Link-layer addressing.

use std::fmt;
use std::str::FromStr;

use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::error::ChatError;

/// Length of a link-layer hardware address in bytes.
pub const ADDR_LEN: usize = 6;

/// A 6-byte link-layer hardware address.
///
/// Equality is byte-wise; the value is immutable once obtained from the
/// transport or parsed from operator input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MacAddr(pub [u8; ADDR_LEN]);

impl MacAddr {
    /// The all-ones broadcast address.
    pub const BROADCAST: MacAddr = MacAddr([0xFF; ADDR_LEN]);

    /// Raw address bytes.
    pub const fn octets(&self) -> [u8; ADDR_LEN] {
        self.0
    }

    /// Whether this is the broadcast address.
    pub fn is_broadcast(&self) -> bool {
        *self == Self::BROADCAST
    }

    /// Generate a random locally-administered unicast address.
    ///
    /// Used by transports that emulate a link segment and have no real
    /// NIC address to report.
    pub fn random() -> Self {
        let mut bytes = [0u8; ADDR_LEN];
        rand::rngs::OsRng.fill_bytes(&mut bytes);
        // Locally administered, unicast.
        bytes[0] = (bytes[0] | 0x02) & 0xFE;
        MacAddr(bytes)
    }
}

impl From<[u8; ADDR_LEN]> for MacAddr {
    fn from(bytes: [u8; ADDR_LEN]) -> Self {
        MacAddr(bytes)
    }
}

impl fmt::Display for MacAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02x}:{:02x}:{:02x}:{:02x}:{:02x}:{:02x}",
            self.0[0], self.0[1], self.0[2], self.0[3], self.0[4], self.0[5]
        )
    }
}

impl FromStr for MacAddr {
    type Err = ChatError;

    /// Parse the operator-facing `xx:xx:xx:xx:xx:xx` form.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut bytes = [0u8; ADDR_LEN];
        let mut groups = 0;

        for (i, group) in s.trim().split(':').enumerate() {
            if i >= ADDR_LEN || group.len() != 2 {
                return Err(ChatError::InvalidAddress(s.to_string()));
            }
            bytes[i] = u8::from_str_radix(group, 16)
                .map_err(|_| ChatError::InvalidAddress(s.to_string()))?;
            groups += 1;
        }

        if groups != ADDR_LEN {
            return Err(ChatError::InvalidAddress(s.to_string()));
        }

        Ok(MacAddr(bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_display_roundtrip() {
        let addr: MacAddr = "aa:bb:cc:00:11:22".parse().unwrap();
        assert_eq!(addr.octets(), [0xAA, 0xBB, 0xCC, 0x00, 0x11, 0x22]);
        assert_eq!(addr.to_string(), "aa:bb:cc:00:11:22");
    }

    #[test]
    fn test_parse_accepts_uppercase_and_whitespace() {
        let addr: MacAddr = " FF:FF:FF:FF:FF:FF ".parse().unwrap();
        assert!(addr.is_broadcast());
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for bad in ["", "aa:bb:cc", "aa:bb:cc:dd:ee:ff:00", "zz:bb:cc:dd:ee:ff", "aabbccddeeff"] {
            assert!(bad.parse::<MacAddr>().is_err(), "should reject {:?}", bad);
        }
    }

    #[test]
    fn test_broadcast_is_all_ones() {
        assert_eq!(MacAddr::BROADCAST.octets(), [0xFF; 6]);
        assert!(!MacAddr([0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFE]).is_broadcast());
    }

    #[test]
    fn test_random_is_local_unicast() {
        let addr = MacAddr::random();
        assert_eq!(addr.octets()[0] & 0x01, 0, "must be unicast");
        assert_eq!(addr.octets()[0] & 0x02, 0x02, "must be locally administered");
    }
}
