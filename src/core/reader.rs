//! # Reader
//!
//! Typed, chainable decoding on top of a [`Source`]. Mirrors the
//! [`Writer`](super::writer::Writer): calls compose left to right and the first
//! short read poisons the rest of the chain.
//!
//! A failed read never touches its output. Once failed, no further bytes are
//! consumed from the source.

use super::scalar::{Scalar, MAX_SCALAR_SIZE};
use super::source::Source;
use crate::error::{IoError, Result};
use std::fmt;
use tracing::debug;

/// Typed reader with sticky failure state
pub struct Reader<'s, O: Source + ?Sized> {
    source: &'s mut O,
    failed: bool,
}

impl<'s, O: Source + ?Sized> Reader<'s, O> {
    pub fn new(source: &'s mut O) -> Self {
        Self {
            source,
            failed: false,
        }
    }

    /// `true` while every call so far has succeeded
    pub fn is_ok(&self) -> bool {
        !self.failed
    }

    /// Aggregate outcome of the chain so far
    pub fn finish(&self) -> Result<()> {
        if self.failed {
            Err(IoError::ReadFailed {
                position: self.source.position(),
            })
        } else {
            Ok(())
        }
    }

    /// Current read offset of the underlying source
    pub fn position(&self) -> usize {
        self.source.position()
    }

    /// Access the source directly, e.g. to seek to a payload region
    pub fn source(&mut self) -> &mut O {
        &mut *self.source
    }

    fn fail(&mut self, reason: &str) {
        if !self.failed {
            debug!(position = self.source.position(), reason, "Reader entered failed state");
        }
        self.failed = true;
    }

    /// Fill `dst` completely or mark the reader failed.
    fn fill(&mut self, dst: &mut [u8]) -> bool {
        if self.failed {
            return false;
        }
        match self.source.read(dst) {
            Ok(n) if n == dst.len() => true,
            Ok(n) => {
                self.fail(&format!("short read: {n} of {} bytes", dst.len()));
                false
            }
            Err(e) => {
                self.fail(&e.to_string());
                false
            }
        }
    }

    /// Decode one scalar into `out`; `out` is untouched on failure
    pub fn read<T: Scalar>(&mut self, out: &mut T) -> &mut Self {
        let mut scratch = [0u8; MAX_SCALAR_SIZE];
        if self.fill(&mut scratch[..T::SIZE]) {
            *out = T::decode(&scratch[..T::SIZE]);
        }
        self
    }

    /// Decode `out.len()` consecutive scalars.
    ///
    /// On failure the reader is failed and `out` may be partially overwritten.
    pub fn read_range<T: Scalar>(&mut self, out: &mut [T]) -> &mut Self {
        let mut encoded = vec![0u8; out.len() * T::SIZE];
        if self.fill(&mut encoded) {
            for (slot, chunk) in out.iter_mut().zip(encoded.chunks_exact(T::SIZE)) {
                *slot = T::decode(chunk);
            }
        }
        self
    }

    /// Copy raw bytes into `out`
    pub fn read_bytes(&mut self, out: &mut [u8]) -> &mut Self {
        self.fill(out);
        self
    }

    /// Skip over one `T` without decoding it
    pub fn skip<T: Scalar>(&mut self) -> &mut Self {
        self.skip_bytes(T::SIZE)
    }

    /// Skip `len` raw bytes
    pub fn skip_bytes(&mut self, len: usize) -> &mut Self {
        if self.failed {
            return self;
        }
        match self.source.skip(len) {
            Ok(n) if n == len => {}
            Ok(n) => self.fail(&format!("short skip: {n} of {len} bytes")),
            Err(e) => self.fail(&e.to_string()),
        }
        self
    }

    /// Decode one scalar and return it, `None` once the chain has failed
    pub fn value<T: Scalar>(&mut self) -> Option<T> {
        let mut out = T::default();
        self.read(&mut out);
        self.is_ok().then_some(out)
    }
}

impl<O: Source + ?Sized> fmt::Debug for Reader<'_, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reader")
            .field("position", &self.source.position())
            .field("failed", &self.failed)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;
    use crate::core::source::BufferSource;

    #[test]
    fn test_read_scalars() {
        let data = [0x34u8, 0x12, 0xFF, 1];
        let mut source = BufferSource::new(&data);
        let mut reader = Reader::new(&mut source);

        let (mut a, mut b, mut c) = (0u16, 0i8, false);
        reader.read(&mut a).read(&mut b).read(&mut c);
        assert!(reader.is_ok());
        assert_eq!((a, b, c), (0x1234, -1, true));
    }

    #[test]
    fn test_chain_stops_after_short_read() {
        let data = [1u8, 0, 0, 0, 2, 0];
        let mut source = BufferSource::new(&data);
        let mut reader = Reader::new(&mut source);

        let (mut a, mut b, mut c) = (0u32, 77u32, 88u32);
        reader.read(&mut a).read(&mut b).read(&mut c);

        assert!(reader.finish().is_err());
        assert_eq!(a, 1);
        assert_eq!(b, 77);
        assert_eq!(c, 88);
        // The partial attempt for `b` consumed what was left; `c` never ran.
        assert_eq!(source.position(), 6);
    }

    #[test]
    fn test_failed_reader_consumes_nothing() {
        let data = [0u8; 8];
        let mut source = BufferSource::new(&data);
        let mut reader = Reader::new(&mut source);

        reader.skip_bytes(9);
        let consumed = reader.position();
        let mut value = 5u16;
        reader.read(&mut value).skip::<u32>();
        assert_eq!(reader.position(), consumed);
        assert_eq!(value, 5);
    }

    #[test]
    fn test_read_range_and_skip() {
        let data = [9u8, 9, 1, 0, 2, 0, 3, 0];
        let mut source = BufferSource::new(&data);
        let mut reader = Reader::new(&mut source);

        let mut values = [0u16; 3];
        reader.skip::<u16>().read_range(&mut values);
        assert!(reader.is_ok());
        assert_eq!(values, [1, 2, 3]);
    }

    #[test]
    fn test_value_helper() {
        let data = 0xDEAD_BEEFu32.to_le_bytes();
        let mut source = BufferSource::new(&data);
        let mut reader = Reader::new(&mut source);
        assert_eq!(reader.value::<u32>(), Some(0xDEAD_BEEF));
        assert_eq!(reader.value::<u8>(), None);
    }
}
