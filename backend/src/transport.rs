//! Outbound side of a live connection
//!
//! The registry only ever asks two things of a transport: is it still open,
//! and deliver this serialized message. Closing is the owner's job.

use thiserror::Error;
use tokio::sync::mpsc;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("transport is closed")]
    Closed,
}

/// Handle a connection's messages are delivered through
///
/// `send` must not block: a slow peer may not stall delivery to the rest of
/// its group.
pub trait Transport: Send + Sync {
    fn is_open(&self) -> bool;

    fn send(&self, message: &str) -> Result<(), TransportError>;
}

/// Queues frames onto an unbounded channel drained by a writer task
#[derive(Debug, Clone)]
pub struct ChannelTransport {
    tx: mpsc::UnboundedSender<String>,
}

impl ChannelTransport {
    pub fn new(tx: mpsc::UnboundedSender<String>) -> Self {
        Self { tx }
    }

    /// Transport plus the receiving end, for writer tasks and tests
    pub fn pair() -> (Self, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }
}

impl Transport for ChannelTransport {
    fn is_open(&self) -> bool {
        !self.tx.is_closed()
    }

    fn send(&self, message: &str) -> Result<(), TransportError> {
        self.tx
            .send(message.to_string())
            .map_err(|_| TransportError::Closed)
    }
}
