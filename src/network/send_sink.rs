//! Connection-backed sink.
//!
//! Takes exclusive ownership of the connection's send buffer while a message is
//! being built. Writes only grow the local buffer; `flush` transmits it once and
//! clears it. Dropping the sink hands the (emptied) buffer back to the
//! connection, so bytes that were never flushed are never seen by the peer.

use super::connection::{Connection, Transport};
use crate::core::sink::{check_overwrite_range, Sink};
use crate::error::{IoError, Result};
use bytes::BytesMut;
use std::mem;
use tracing::warn;

/// Sink appending to a connection's outgoing buffer
#[derive(Debug)]
pub struct SendSink<'c, T: Transport> {
    connection: &'c mut Connection<T>,
    buffer: BytesMut,
}

impl<'c, T: Transport> SendSink<'c, T> {
    pub(super) fn new(connection: &'c mut Connection<T>) -> Self {
        let buffer = mem::take(&mut connection.send_buffer);
        Self { connection, buffer }
    }

    /// Bytes staged for the next flush
    pub fn pending(&self) -> &[u8] {
        &self.buffer[..]
    }
}

impl<T: Transport> Sink for SendSink<'_, T> {
    fn write(&mut self, data: &[u8]) -> Result<usize> {
        let requested = self.buffer.len() + data.len();
        if requested > self.connection.max_send_buffer {
            return Err(IoError::SendBufferOverflow {
                requested,
                limit: self.connection.max_send_buffer,
            });
        }
        self.buffer.extend_from_slice(data);
        Ok(data.len())
    }

    fn overwrite(&mut self, offset: usize, data: &[u8]) -> Result<usize> {
        check_overwrite_range(offset, data.len(), self.buffer.len())?;
        self.buffer[offset..offset + data.len()].copy_from_slice(data);
        Ok(data.len())
    }

    fn position(&self) -> usize {
        self.buffer.len()
    }

    /// Transmit everything staged so far.
    ///
    /// Positions restart at zero afterwards, so backpatch handles taken before
    /// the flush no longer apply. On transport failure the bytes stay staged.
    fn flush(&mut self) -> Result<()> {
        if self.buffer.is_empty() {
            return Ok(());
        }
        self.connection.transmit(&self.buffer)?;
        self.buffer.clear();
        Ok(())
    }
}

impl<T: Transport> Drop for SendSink<'_, T> {
    fn drop(&mut self) {
        if !self.buffer.is_empty() {
            warn!(bytes = self.buffer.len(), "Discarding unflushed outgoing message");
            self.connection
                .metrics
                .message_discarded(self.buffer.len() as u64);
            self.buffer.clear();
        }
        self.connection.send_buffer = mem::take(&mut self.buffer);
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;
    use crate::config::ConnectionConfig;
    use crate::core::writer::Writer;

    #[derive(Default)]
    struct Recorder {
        sent: Vec<Vec<u8>>,
    }

    impl Transport for Recorder {
        fn send(&mut self, data: &[u8]) -> Result<()> {
            self.sent.push(data.to_vec());
            Ok(())
        }
    }

    #[test]
    fn test_nothing_sent_before_flush() {
        let mut connection = Connection::new(Recorder::default());
        {
            let mut sink = connection.send_sink();
            Writer::new(&mut sink).write(1u32).write(2u32);
            assert_eq!(sink.pending().len(), 8);
        }
        assert!(connection.transport().sent.is_empty());
    }

    #[test]
    fn test_second_flush_sends_nothing() {
        let mut connection = Connection::new(Recorder::default());
        {
            let mut sink = connection.send_sink();
            sink.write(&[1, 2, 3]).unwrap();
            sink.flush().unwrap();
            sink.flush().unwrap();
            assert_eq!(sink.position(), 0);
        }
        assert_eq!(connection.transport().sent, vec![vec![1, 2, 3]]);
    }

    #[test]
    fn test_buffer_capacity_returns_to_connection() {
        let mut connection = Connection::new(Recorder::default());
        {
            let mut sink = connection.send_sink();
            sink.write(&[0; 64]).unwrap();
            sink.flush().unwrap();
        }
        assert!(connection.send_buffer.capacity() >= 64);
        assert!(connection.send_buffer.is_empty());
    }

    #[test]
    fn test_overflow_fails_writer() {
        let config = ConnectionConfig {
            max_send_buffer: 6,
            ..ConnectionConfig::default()
        };
        let mut connection = Connection::with_config(Recorder::default(), &config);
        let mut sink = connection.send_sink();
        let mut writer = Writer::new(&mut sink);

        writer.write(1u32).write(2u32);
        assert!(!writer.is_ok());
        assert_eq!(writer.position(), 4);
    }
}
