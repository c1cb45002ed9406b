//! Etherchat - encrypted chat over raw link-layer frames
//!
//! A CLI for peer-to-peer chat carried in fixed-size frames tagged with a
//! private EtherType. One side announces, the other connects; every
//! message is encrypted with session key material exchanged in-band.

use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use etherchat::addr::MacAddr;
use etherchat::config::{LinkConfig, DEFAULT_UDP_PORT};

mod commands;

use commands::{AnnounceCommand, CommandExecutor, ConnectCommand};

/// Etherchat - encrypted chat over raw link-layer frames
///
/// Peers discover each other over broadcast, bind a session by link
/// address, exchange a symmetric key in-band, and chat until stopped.
#[derive(Parser)]
#[command(name = "etherchat")]
#[command(version)]
#[command(about = "Encrypted peer-to-peer chat over link-layer frames")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Broadcast your presence and wait for a peer to start a session
    Announce {
        /// Display name shown to listening peers (10-50 bytes)
        #[arg(short, long)]
        name: String,

        /// UDP port emulating the link segment
        #[arg(long, default_value_t = DEFAULT_UDP_PORT)]
        port: u16,

        /// Read timeout in seconds
        #[arg(long, default_value_t = 60)]
        timeout: u64,

        /// Local link address (xx:xx:xx:xx:xx:xx); random when omitted
        #[arg(long)]
        addr: Option<MacAddr>,
    },

    /// Discover announcing peers, pick one, and start the session
    Connect {
        /// Display name carried in the session offer (10-50 bytes)
        #[arg(short, long)]
        name: String,

        /// Seconds to collect announcements before choosing
        #[arg(long, default_value_t = 10)]
        window: u64,

        /// UDP port emulating the link segment
        #[arg(long, default_value_t = DEFAULT_UDP_PORT)]
        port: u16,

        /// Read timeout in seconds
        #[arg(long, default_value_t = 60)]
        timeout: u64,

        /// Local link address (xx:xx:xx:xx:xx:xx); random when omitted
        #[arg(long)]
        addr: Option<MacAddr>,

        /// Peer link address to select without prompting
        #[arg(long)]
        peer: Option<MacAddr>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Announce {
            name,
            port,
            timeout,
            addr,
        } => {
            let config = LinkConfig::default()
                .with_udp_port(port)
                .with_read_timeout(Duration::from_secs(timeout));
            AnnounceCommand { name, config, addr }.execute().await
        }

        Commands::Connect {
            name,
            window,
            port,
            timeout,
            addr,
            peer,
        } => {
            let config = LinkConfig::default()
                .with_udp_port(port)
                .with_read_timeout(Duration::from_secs(timeout));
            ConnectCommand {
                name,
                config,
                addr,
                window: Duration::from_secs(window),
                peer,
            }
            .execute()
            .await
        }
    }
}
