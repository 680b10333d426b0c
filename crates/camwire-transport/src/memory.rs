//! In-process multipart transport.
//!
//! Behaves like a single PUB socket wired to a single SUB socket: messages keep
//! their order, and sends after the receiver is gone are silently discarded.

use std::sync::mpsc;

use bytes::Bytes;
use tracing::debug;

use crate::error::{Result, TransportError};
use crate::traits::{MultipartReceiver, MultipartSender};

/// Create a connected in-memory sender/receiver pair.
pub fn channel() -> (MemorySender, MemoryReceiver) {
    let (tx, rx) = mpsc::channel();
    (
        MemorySender {
            tx,
            messages_sent: 0,
        },
        MemoryReceiver { rx },
    )
}

/// Sending half of an in-memory transport.
#[derive(Debug)]
pub struct MemorySender {
    tx: mpsc::Sender<Vec<Bytes>>,
    messages_sent: usize,
}

impl MemorySender {
    /// Number of `send_parts` calls that reached the transport.
    pub fn messages_sent(&self) -> usize {
        self.messages_sent
    }
}

impl MultipartSender for MemorySender {
    fn send_parts(&mut self, parts: Vec<Bytes>) -> Result<()> {
        self.messages_sent += 1;
        if self.tx.send(parts).is_err() {
            debug!("no receiver attached, message discarded");
        }
        Ok(())
    }
}

/// Receiving half of an in-memory transport.
#[derive(Debug)]
pub struct MemoryReceiver {
    rx: mpsc::Receiver<Vec<Bytes>>,
}

impl MemoryReceiver {
    /// Build a receiver that yields `messages` in order, then reports
    /// [`TransportError::Closed`].
    pub fn scripted<I>(messages: I) -> Self
    where
        I: IntoIterator<Item = Vec<Bytes>>,
    {
        let (tx, rx) = mpsc::channel();
        for message in messages {
            // The receiver is alive for the whole loop.
            let _ = tx.send(message);
        }
        Self { rx }
    }

    /// Return the next message if one is already queued.
    pub fn try_recv_parts(&mut self) -> Result<Option<Vec<Bytes>>> {
        match self.rx.try_recv() {
            Ok(parts) => Ok(Some(parts)),
            Err(mpsc::TryRecvError::Empty) => Ok(None),
            Err(mpsc::TryRecvError::Disconnected) => Err(TransportError::Closed),
        }
    }
}

impl MultipartReceiver for MemoryReceiver {
    fn recv_parts(&mut self) -> Result<Vec<Bytes>> {
        self.rx.recv().map_err(|_| TransportError::Closed)
    }
}
