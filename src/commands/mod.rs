//! Command module - Strategy pattern for CLI commands.
//!
//! Each command is a separate module implementing the `CommandExecutor`
//! trait. The two commands are the two ends of one session: `announce`
//! broadcasts presence and waits to be chosen; `connect` discovers
//! announcers, lets the operator choose, and drives the session setup.

mod announce;
mod connect;

pub use announce::AnnounceCommand;
pub use connect::ConnectCommand;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, BufReader};

use etherchat::error::ChatError;
use etherchat::protocol::{chat, liveness};
use etherchat::session::Session;
use etherchat::transport::FrameTransport;

/// Trait for command execution - Strategy pattern.
#[async_trait]
pub trait CommandExecutor {
    /// Executes the command with its parsed arguments.
    async fn execute(&self) -> Result<()>;
}

/// What one turn of the chat loop produced.
enum Turn {
    /// A line typed by the operator (`None` on end of input).
    Line(Option<String>),
    /// The outcome of waiting for the peer.
    Received(Result<String, ChatError>),
}

/// Interactive chat loop shared by both commands.
///
/// Multiplexes operator input with frame receipt. When the peer goes quiet
/// past the read timeout, the loop probes liveness; both sides probe after
/// the same quiet window, so each side's probe doubles as the answer to
/// the other's.
pub(crate) async fn chat_loop<T>(transport: &mut T, session: &mut Session) -> Result<()>
where
    T: FrameTransport,
{
    let stdin = BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();

    println!("Chat ready. Type a message and press Enter; Ctrl-D to leave.");

    loop {
        let turn = tokio::select! {
            line = lines.next_line() => {
                Turn::Line(line.context("Failed to read from stdin")?)
            }
            received = chat::receive(transport, session) => Turn::Received(received),
        };

        match turn {
            Turn::Line(None) => {
                println!("Leaving chat.");
                return Ok(());
            }
            Turn::Line(Some(line)) => {
                let text = line.trim();
                if text.is_empty() {
                    continue;
                }
                chat::send(transport, session, text)
                    .await
                    .context("Failed to send message")?;
            }
            Turn::Received(Ok(message)) => {
                println!("peer> {}", message);
            }
            Turn::Received(Err(ChatError::Timeout { .. })) => {
                eprintln!("No traffic from the peer; probing...");
                liveness::ping(transport, session).await?;
                match liveness::await_pong(transport, session).await {
                    Ok(()) => eprintln!("Peer is still reachable."),
                    Err(ChatError::Unreachable) => {
                        bail!("Peer is unreachable; session ended")
                    }
                    Err(e) => return Err(e.into()),
                }
            }
            Turn::Received(Err(e)) => return Err(e.into()),
        }
    }
}
