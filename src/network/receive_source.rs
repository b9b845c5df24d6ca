//! Connection-backed source.
//!
//! Reads from the connection's receive buffer through a private cursor. Bytes are
//! only released from the buffer by [`ReceiveSource::consume`]; dropping the
//! source without consuming leaves everything in place, which is how a caller
//! backs off from a message that has not fully arrived yet.

use super::connection::{Connection, Transport};
use crate::core::source::Source;
use crate::error::{IoError, Result};
use bytes::Buf;
use tracing::trace;

/// Source over a connection's buffered incoming bytes
#[derive(Debug)]
pub struct ReceiveSource<'c, T: Transport> {
    connection: &'c mut Connection<T>,
    cursor: usize,
}

impl<'c, T: Transport> ReceiveSource<'c, T> {
    pub(super) fn new(connection: &'c mut Connection<T>) -> Self {
        Self {
            connection,
            cursor: 0,
        }
    }

    /// Buffered bytes after the cursor
    pub fn remaining(&self) -> &[u8] {
        &self.connection.receive_buffer[self.cursor..]
    }

    /// Release everything read so far from the connection, returning the count
    pub fn consume(self) -> usize {
        let consumed = self.cursor;
        self.connection.receive_buffer.advance(consumed);
        self.connection.metrics.consumed(consumed as u64);
        trace!(bytes = consumed, "Consumed received bytes");
        consumed
    }
}

impl<T: Transport> Source for ReceiveSource<'_, T> {
    fn read(&mut self, dst: &mut [u8]) -> Result<usize> {
        let available = self.remaining();
        let count = dst.len().min(available.len());
        dst[..count].copy_from_slice(&available[..count]);
        self.cursor += count;
        Ok(count)
    }

    fn skip(&mut self, len: usize) -> Result<usize> {
        let count = len.min(self.remaining().len());
        self.cursor += count;
        Ok(count)
    }

    fn position(&self) -> usize {
        self.cursor
    }

    fn size(&mut self) -> Option<usize> {
        Some(self.connection.receive_buffer.len())
    }

    fn seek(&mut self, position: usize) -> Result<()> {
        let size = self.connection.receive_buffer.len();
        if position > size {
            return Err(IoError::SeekOutOfRange { position, size });
        }
        self.cursor = position;
        Ok(())
    }
}
