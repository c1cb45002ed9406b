//! Connect command: discover announcers, choose one, drive the session.

use std::io::Write;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use tokio::sync::oneshot;

use etherchat::addr::MacAddr;
use etherchat::config::LinkConfig;
use etherchat::error::ChatError;
use etherchat::protocol::{discovery, handshake, keyex, liveness};
use etherchat::registry::PeerRegistry;
use etherchat::session::Session;
use etherchat::transport::{FrameTransport, UdpLinkTransport};

use super::{chat_loop, CommandExecutor};

/// Collect announcements, let the operator pick a peer by link address,
/// then follow the initiator side: offer, ship the key, probe, chat.
pub struct ConnectCommand {
    /// Display name carried in the session offer.
    pub name: String,
    /// Link configuration.
    pub config: LinkConfig,
    /// Local link address; random when not supplied.
    pub addr: Option<MacAddr>,
    /// How long to collect announcements before choosing.
    pub window: Duration,
    /// Peer to select without prompting.
    pub peer: Option<MacAddr>,
}

#[async_trait]
impl CommandExecutor for ConnectCommand {
    async fn execute(&self) -> Result<()> {
        let mut transport = UdpLinkTransport::open(&self.config, self.addr)
            .await
            .context("Failed to open the link transport")?;
        let local = transport.local_addr();
        println!("Local link address: {}", local);

        let mut session = Session::new(local);
        let mut registry = PeerRegistry::new();
        registry.set_local_addr(local);

        session.begin_discovery();
        println!(
            "Listening for announcements for {}s...",
            self.window.as_secs()
        );
        let (stop_tx, stop_rx) = oneshot::channel();
        let window = self.window;
        tokio::spawn(async move {
            tokio::time::sleep(window).await;
            let _ = stop_tx.send(());
        });
        discovery::listen(&mut transport, &mut registry, stop_rx).await?;

        if registry.is_empty() {
            bail!("No peers announced themselves; try again");
        }

        println!("Available peers:");
        for peer in registry.peers() {
            println!("  {} : {}", peer.name, peer.address);
        }

        let chosen = match self.peer {
            Some(addr) => addr,
            None => prompt_for_peer()?,
        };
        let record = registry
            .lookup(chosen)
            .ok_or_else(|| ChatError::Configuration(format!("Device {} not found", chosen)))?;
        println!("Selected {} ({})", record.name, record.address);
        session.select_peer(record.address);

        handshake::offer(&mut transport, &mut session, &self.name).await?;
        keyex::offer_key(&mut transport, &mut session).await?;
        println!("Session offered; probing reachability...");

        liveness::ping(&mut transport, &mut session).await?;
        match liveness::await_pong(&mut transport, &mut session).await {
            Ok(()) => println!("Peer reachable."),
            Err(ChatError::Unreachable) => bail!("Peer did not answer the liveness probe"),
            Err(e) => return Err(e.into()),
        }

        chat_loop(&mut transport, &mut session).await
    }
}

/// Ask the operator for a peer link address.
fn prompt_for_peer() -> Result<MacAddr> {
    print!("Choose a device (by link address): ");
    std::io::stdout().flush().context("Failed to flush stdout")?;

    let mut line = String::new();
    std::io::stdin()
        .read_line(&mut line)
        .context("Failed to read from stdin")?;

    Ok(line.trim().parse::<MacAddr>()?)
}
