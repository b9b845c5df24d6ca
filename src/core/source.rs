//! # Sources
//!
//! Read-capable byte origins. A [`Source`] hands out raw bytes and tracks a read
//! position; a short read is how it reports exhaustion. Random access (`size` and
//! `seek`) is optional and only used by format codecs that locate payload regions
//! after decoding a header.

use crate::error::{IoError, Result};
use std::io::{ErrorKind, Read, Seek, SeekFrom};
use tracing::debug;

/// Byte source with a current read position.
pub trait Source {
    /// Fill up to `dst.len()` bytes, returning how many were produced.
    ///
    /// A count below `dst.len()` means the source is exhausted.
    fn read(&mut self, dst: &mut [u8]) -> Result<usize>;

    /// Advance past `len` bytes without retaining them.
    ///
    /// Returns the number of bytes actually skipped; a short count is exhaustion.
    fn skip(&mut self, len: usize) -> Result<usize>;

    /// Current read offset.
    fn position(&self) -> usize;

    /// Total size in bytes, when known.
    fn size(&mut self) -> Option<usize> {
        None
    }

    /// Move the read position to `position`.
    fn seek(&mut self, _position: usize) -> Result<()> {
        Err(IoError::Unseekable)
    }
}

impl<O: Source + ?Sized> Source for &mut O {
    fn read(&mut self, dst: &mut [u8]) -> Result<usize> {
        (**self).read(dst)
    }

    fn skip(&mut self, len: usize) -> Result<usize> {
        (**self).skip(len)
    }

    fn position(&self) -> usize {
        (**self).position()
    }

    fn size(&mut self) -> Option<usize> {
        (**self).size()
    }

    fn seek(&mut self, position: usize) -> Result<()> {
        (**self).seek(position)
    }
}

/// Source over an in-memory byte slice
#[derive(Debug, Clone)]
pub struct BufferSource<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> BufferSource<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, position: 0 }
    }

    /// Bytes not yet consumed
    pub fn remaining(&self) -> &'a [u8] {
        &self.data[self.position..]
    }
}

impl Source for BufferSource<'_> {
    fn read(&mut self, dst: &mut [u8]) -> Result<usize> {
        let available = self.remaining();
        let count = dst.len().min(available.len());
        dst[..count].copy_from_slice(&available[..count]);
        self.position += count;
        Ok(count)
    }

    fn skip(&mut self, len: usize) -> Result<usize> {
        let count = len.min(self.data.len() - self.position);
        self.position += count;
        Ok(count)
    }

    fn position(&self) -> usize {
        self.position
    }

    fn size(&mut self) -> Option<usize> {
        Some(self.data.len())
    }

    fn seek(&mut self, position: usize) -> Result<()> {
        if position > self.data.len() {
            return Err(IoError::SeekOutOfRange {
                position,
                size: self.data.len(),
            });
        }
        self.position = position;
        Ok(())
    }
}

/// Source reading from a seekable stream such as an open file.
#[derive(Debug)]
pub struct StreamSource<R> {
    stream: R,
    position: usize,
    size: Option<usize>,
}

impl<R: Read + Seek> StreamSource<R> {
    /// Wrap a stream at its current position
    pub fn new(mut stream: R) -> Result<Self> {
        let position = stream.stream_position()? as usize;
        Ok(Self {
            stream,
            position,
            size: None,
        })
    }

    pub fn into_inner(self) -> R {
        self.stream
    }
}

impl<R: Read + Seek> Source for StreamSource<R> {
    fn read(&mut self, dst: &mut [u8]) -> Result<usize> {
        let mut filled = 0;
        while filled < dst.len() {
            match self.stream.read(&mut dst[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => {
                    self.position += filled;
                    debug!(error = %e, position = self.position, "Stream source read failed");
                    return Err(IoError::Io(e));
                }
            }
        }
        self.position += filled;
        Ok(filled)
    }

    fn skip(&mut self, len: usize) -> Result<usize> {
        // Seeking past EOF succeeds on most streams, so clamp to the known size.
        let available = match self.size() {
            Some(size) => size.saturating_sub(self.position),
            None => len,
        };
        let count = len.min(available);
        self.stream.seek(SeekFrom::Current(count as i64))?;
        self.position += count;
        Ok(count)
    }

    fn position(&self) -> usize {
        self.position
    }

    fn size(&mut self) -> Option<usize> {
        if self.size.is_none() {
            let end = self.stream.seek(SeekFrom::End(0)).ok()?;
            self.stream
                .seek(SeekFrom::Start(self.position as u64))
                .ok()?;
            self.size = Some(end as usize);
        }
        self.size
    }

    fn seek(&mut self, position: usize) -> Result<()> {
        if let Some(size) = self.size() {
            if position > size {
                return Err(IoError::SeekOutOfRange { position, size });
            }
        }
        self.stream.seek(SeekFrom::Start(position as u64))?;
        self.position = position;
        Ok(())
    }
}
