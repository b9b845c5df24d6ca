//! # Sinks
//!
//! Write-capable byte destinations. A [`Sink`] only knows how to append bytes,
//! correct bytes it already holds, and report where the next byte will land.
//! Typed encoding lives one layer up in [`Writer`](super::writer::Writer).
//!
//! ## Implementations
//! - [`BufferSink`]: appends to a caller-owned `BytesMut`, never fails
//! - [`StreamSink`]: writes eagerly through any `Write + Seek` stream (files, cursors)
//!
//! The connection-backed sink lives in [`crate::network::send_sink`].

use crate::error::{IoError, Result};
use bytes::BytesMut;
use std::io::{Seek, SeekFrom, Write};
use tracing::debug;

/// Append-oriented byte destination with an in-place correction primitive.
pub trait Sink {
    /// Append `data` at the current position.
    ///
    /// Returns the number of bytes accepted. Anything short of `data.len()`
    /// (or an error) is a failure the caller must observe.
    fn write(&mut self, data: &[u8]) -> Result<usize>;

    /// Replace already written bytes starting at `offset`.
    ///
    /// The range `offset..offset + data.len()` must lie within the written data;
    /// otherwise [`IoError::BackpatchOutOfRange`] is returned and nothing changes.
    /// `position()` is identical before and after the call.
    fn overwrite(&mut self, offset: usize, data: &[u8]) -> Result<usize>;

    /// Offset at which the next `write` lands.
    fn position(&self) -> usize;

    /// Hand staged bytes to whatever sits behind this sink.
    fn flush(&mut self) -> Result<()>;
}

impl<S: Sink + ?Sized> Sink for &mut S {
    fn write(&mut self, data: &[u8]) -> Result<usize> {
        (**self).write(data)
    }

    fn overwrite(&mut self, offset: usize, data: &[u8]) -> Result<usize> {
        (**self).overwrite(offset, data)
    }

    fn position(&self) -> usize {
        (**self).position()
    }

    fn flush(&mut self) -> Result<()> {
        (**self).flush()
    }
}

/// Rejects a correction that would reach past the written end.
pub(crate) fn check_overwrite_range(offset: usize, width: usize, end: usize) -> Result<()> {
    match offset.checked_add(width) {
        Some(stop) if stop <= end => Ok(()),
        _ => {
            debug!(offset, width, end, "Rejected overwrite outside written range");
            Err(IoError::BackpatchOutOfRange { offset, width, end })
        }
    }
}

/// Sink over an exclusively borrowed growable buffer.
///
/// Offsets are indices into the buffer, so bytes already present when the sink
/// was created count toward `position()`.
#[derive(Debug)]
pub struct BufferSink<'a> {
    buffer: &'a mut BytesMut,
}

impl<'a> BufferSink<'a> {
    /// Wrap a buffer; writes append after any existing content
    pub fn new(buffer: &'a mut BytesMut) -> Self {
        Self { buffer }
    }

    /// Bytes written so far
    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer[..]
    }
}

impl Sink for BufferSink<'_> {
    fn write(&mut self, data: &[u8]) -> Result<usize> {
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

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Sink writing straight through a seekable stream.
///
/// Writes are eager: a writer discarded halfway leaves a truncated structure in
/// the stream. The tracked position starts at the stream position observed on
/// construction.
#[derive(Debug)]
pub struct StreamSink<W> {
    stream: W,
    position: usize,
}

impl<W: Write + Seek> StreamSink<W> {
    /// Wrap a stream at its current position
    pub fn new(mut stream: W) -> Result<Self> {
        let position = stream.stream_position()? as usize;
        Ok(Self { stream, position })
    }

    /// Recover the wrapped stream
    pub fn into_inner(self) -> W {
        self.stream
    }

    /// Borrow the wrapped stream
    pub fn get_ref(&self) -> &W {
        &self.stream
    }
}

impl<W: Write + Seek> Sink for StreamSink<W> {
    fn write(&mut self, data: &[u8]) -> Result<usize> {
        if let Err(e) = self.stream.write_all(data) {
            debug!(error = %e, position = self.position, "Stream sink write failed");
            return Err(IoError::Io(e));
        }
        self.position += data.len();
        Ok(data.len())
    }

    fn overwrite(&mut self, offset: usize, data: &[u8]) -> Result<usize> {
        check_overwrite_range(offset, data.len(), self.position)?;

        self.stream.seek(SeekFrom::Start(offset as u64))?;
        let written = self.stream.write_all(data);
        // Restore the cursor even when the write failed.
        self.stream.seek(SeekFrom::Start(self.position as u64))?;
        written?;

        Ok(data.len())
    }

    fn position(&self) -> usize {
        self.position
    }

    fn flush(&mut self) -> Result<()> {
        self.stream.flush()?;
        Ok(())
    }
}
