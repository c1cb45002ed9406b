//! Announce command: broadcast presence and wait to be chosen.

use anyhow::{Context, Result};
use async_trait::async_trait;

use etherchat::addr::MacAddr;
use etherchat::config::LinkConfig;
use etherchat::protocol::{discovery, handshake, keyex, liveness};
use etherchat::session::Session;
use etherchat::transport::{FrameTransport, UdpLinkTransport};

use super::{chat_loop, CommandExecutor};

/// Broadcast presence, then follow the responder side of the session:
/// await the offer, await the key, answer the first probe, chat.
pub struct AnnounceCommand {
    /// Display name shown to listening peers.
    pub name: String,
    /// Link configuration.
    pub config: LinkConfig,
    /// Local link address; random when not supplied.
    pub addr: Option<MacAddr>,
}

#[async_trait]
impl CommandExecutor for AnnounceCommand {
    async fn execute(&self) -> Result<()> {
        let mut transport = UdpLinkTransport::open(&self.config, self.addr)
            .await
            .context("Failed to open the link transport")?;
        let local = transport.local_addr();
        println!("Local link address: {}", local);

        let mut session = Session::new(local);

        discovery::announce(&mut transport, &self.name).await?;
        println!("Announced as '{}'. Waiting for a session offer...", self.name);

        handshake::await_offer(&mut transport, &mut session).await?;
        let peer = session.peer_addr()?;
        println!("Session bound to {}", peer);

        keyex::await_key(&mut transport, &mut session).await?;
        println!("Key material received; channel ready.");

        // The initiator probes first; our answering probe completes the pair.
        liveness::await_pong(&mut transport, &mut session).await?;
        liveness::ping(&mut transport, &mut session).await?;
        println!("Liveness confirmed.");

        chat_loop(&mut transport, &mut session).await
    }
}
