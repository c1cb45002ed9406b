//! # Etherchat - encrypted chat over raw link-layer frames
//!
//! Etherchat carries a peer-to-peer encrypted chat session directly in
//! link-layer frames tagged with a private EtherType, bypassing IP and TCP
//! entirely. Everything travels in one fixed 500-byte frame format; a
//! one-byte subtype multiplexes the five protocol messages.
//!
//! ## Session Flow
//!
//! 1. **Discovery** - one side broadcasts an announcement with its display
//!    name; the other collects announcements into a registry
//! 2. **Handshake** - the operator picks a peer and a unicast offer binds
//!    the session
//! 3. **Key exchange** - the initiator generates and ships a symmetric key
//!    and salt
//! 4. **Liveness** - an empty probe each way confirms reachability, and
//!    keeps doing so during the chat
//! 5. **Chat** - messages are keystream-encrypted and exchanged until the
//!    operator stops
//!
//! ## Security Model
//!
//! - **Single session** per running instance; once a peer is bound, frames
//!   from any other source are silently discarded
//! - **Involutory transform**: one ChaCha20-keystream call both encrypts
//!   and decrypts
//! - **Key material zeroized** when the session drops
//! - **No identity layer**: peers are matched by link address only
//!
//! ## Modules
//!
//! - [`addr`]: 6-byte link addresses
//! - [`frame`]: the fixed-size wire codec
//! - [`registry`]: discovered peers
//! - [`session`]: session state machine and key material
//! - [`transport`]: the frame transport seam and its implementations
//! - [`protocol`]: the five protocol phases
//! - [`crypto`]: key generation and the message transform

pub mod addr;
pub mod config;
pub mod crypto;
pub mod error;
pub mod frame;
pub mod protocol;
pub mod registry;
pub mod session;
pub mod transport;

// Re-export commonly used types at the crate root
pub use addr::MacAddr;
pub use config::LinkConfig;
pub use error::ChatError;
pub use frame::{Frame, FrameType, CHAT_CAPACITY, FRAME_LEN};
pub use registry::{PeerRecord, PeerRegistry};
pub use session::{Session, SessionState};
pub use transport::{FrameTransport, HubTransport, LinkHub, UdpLinkTransport};
