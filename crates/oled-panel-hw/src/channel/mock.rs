//! Recording channel for tests and offline rendering.

use super::{check_transfer, ByteChannel};
use crate::{Error, Result};
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Debug, Default)]
struct LogInner {
    writes: Vec<Vec<u8>>,
    closed: bool,
    short_write: Option<usize>,
}

/// Shared view of everything written to a [`MockChannel`].
///
/// Clones observe the same log, so a test can keep one after handing the
/// channel to a panel.
#[derive(Debug, Clone, Default)]
pub struct TransferLog {
    inner: Rc<RefCell<LogInner>>,
}

impl TransferLog {
    /// Returns a copy of every write call, one entry per call.
    pub fn writes(&self) -> Vec<Vec<u8>> {
        self.inner.borrow().writes.clone()
    }

    /// Number of write calls recorded.
    pub fn len(&self) -> usize {
        self.inner.borrow().writes.len()
    }

    /// Returns true if nothing has been written.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns true once the channel has been closed.
    pub fn is_closed(&self) -> bool {
        self.inner.borrow().closed
    }

    /// Forgets recorded writes.
    pub fn clear(&self) {
        self.inner.borrow_mut().writes.clear();
    }

    /// Limits every later write to `limit` bytes; `None` accepts writes in
    /// full again.
    pub fn set_short_write(&self, limit: Option<usize>) {
        self.inner.borrow_mut().short_write = limit;
    }
}

/// In-memory [`ByteChannel`] that records each write call.
#[derive(Debug, Default)]
pub struct MockChannel {
    log: TransferLog,
}

impl MockChannel {
    /// Creates a channel that accepts every write in full.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a channel that transfers at most `limit` bytes per call.
    pub fn with_short_write(limit: usize) -> Self {
        let channel = Self::default();
        channel.log.set_short_write(Some(limit));
        channel
    }

    /// Returns a handle to the write log.
    pub fn log(&self) -> TransferLog {
        self.log.clone()
    }
}

impl ByteChannel for MockChannel {
    fn write(&mut self, bytes: &[u8]) -> Result<()> {
        let mut inner = self.log.inner.borrow_mut();
        if inner.closed {
            return Err(Error::ChannelUnavailable);
        }
        let count = inner.short_write.map_or(bytes.len(), |n| n.min(bytes.len()));
        inner.writes.push(bytes[..count].to_vec());
        check_transfer(bytes.len(), count)
    }

    fn read(&mut self, buffer: &mut [u8]) -> Result<()> {
        if self.log.is_closed() {
            return Err(Error::ChannelUnavailable);
        }
        buffer.fill(0);
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        self.log.inner.borrow_mut().closed = true;
        Ok(())
    }
}
