//! In-memory link segment.
//!
//! A [`LinkHub`] behaves like a shared medium in promiscuous mode: every
//! attached endpoint observes every transmitted frame, its own included.
//! The protocol filters are written against exactly that view, which makes
//! this transport the vehicle for tests and same-process demos.

use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::broadcast;
use tokio::time::timeout;
use tracing::warn;

use crate::addr::MacAddr;
use crate::error::ChatError;
use crate::transport::FrameTransport;

/// Frames buffered per endpoint before the slowest reader starts lagging.
const HUB_CAPACITY: usize = 64;

/// A broadcast domain endpoints attach to.
#[derive(Clone)]
pub struct LinkHub {
    tx: broadcast::Sender<Vec<u8>>,
}

impl LinkHub {
    /// Create an empty segment.
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(HUB_CAPACITY);
        Self { tx }
    }

    /// Attach an endpoint with the given address and read timeout.
    pub fn attach(&self, addr: MacAddr, read_timeout: Duration) -> HubTransport {
        HubTransport {
            addr,
            read_timeout,
            tx: self.tx.clone(),
            rx: self.tx.subscribe(),
        }
    }
}

impl Default for LinkHub {
    fn default() -> Self {
        Self::new()
    }
}

/// One endpoint on an in-memory segment.
pub struct HubTransport {
    addr: MacAddr,
    read_timeout: Duration,
    tx: broadcast::Sender<Vec<u8>>,
    rx: broadcast::Receiver<Vec<u8>>,
}

#[async_trait]
impl FrameTransport for HubTransport {
    async fn send(&mut self, frame: &[u8]) -> Result<(), ChatError> {
        self.tx
            .send(frame.to_vec())
            .map_err(|_| ChatError::Transport("link hub has no attached endpoints".into()))?;
        Ok(())
    }

    async fn recv(&mut self) -> Result<Option<Vec<u8>>, ChatError> {
        loop {
            match timeout(self.read_timeout, self.rx.recv()).await {
                Err(_elapsed) => return Ok(None),
                Ok(Ok(frame)) => return Ok(Some(frame)),
                Ok(Err(broadcast::error::RecvError::Lagged(missed))) => {
                    warn!(missed, "receiver lagged; frames dropped");
                    continue;
                }
                Ok(Err(broadcast::error::RecvError::Closed)) => {
                    return Err(ChatError::Transport("link hub closed".into()));
                }
            }
        }
    }

    fn local_addr(&self) -> MacAddr {
        self.addr
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(last: u8) -> MacAddr {
        MacAddr([0x02, 0, 0, 0, 0, last])
    }

    #[tokio::test]
    async fn test_endpoints_observe_each_other() {
        let hub = LinkHub::new();
        let mut a = hub.attach(addr(1), Duration::from_millis(200));
        let mut b = hub.attach(addr(2), Duration::from_millis(200));

        a.send(&[1, 2, 3]).await.unwrap();
        assert_eq!(b.recv().await.unwrap(), Some(vec![1, 2, 3]));
    }

    #[tokio::test]
    async fn test_sender_observes_its_own_frames() {
        let hub = LinkHub::new();
        let mut a = hub.attach(addr(1), Duration::from_millis(200));

        a.send(&[9]).await.unwrap();
        assert_eq!(a.recv().await.unwrap(), Some(vec![9]));
    }

    #[tokio::test]
    async fn test_recv_times_out_quietly() {
        let hub = LinkHub::new();
        let mut a = hub.attach(addr(1), Duration::from_millis(20));
        assert_eq!(a.recv().await.unwrap(), None);
    }
}
