//! # Writer
//!
//! Typed, chainable encoding on top of a [`Sink`].
//!
//! Every write call returns the writer so a whole structure can be expressed as
//! one chain. The first failing call marks the writer failed; every later call
//! becomes a no-op, so the caller checks the outcome once at the end.
//!
//! ## Backpatching
//! Fields whose value depends on data written later (payload offsets, lengths)
//! are written as placeholders first. The returned [`Backpatch`] handle remembers
//! where the placeholder lives and is later redeemed with [`Writer::commit`],
//! which corrects the bytes in place without moving the write position.
//!
//! ```rust
//! use binary_io::core::sink::BufferSink;
//! use binary_io::core::writer::Writer;
//! use bytes::BytesMut;
//!
//! let mut buffer = BytesMut::new();
//! let mut sink = BufferSink::new(&mut buffer);
//! let mut writer = Writer::new(&mut sink);
//!
//! let length = writer.reserve::<u32>();
//! writer.write_bytes(b"payload");
//! writer.commit(length, 7).unwrap();
//! assert!(writer.is_ok());
//! assert_eq!(&buffer[..4], &7u32.to_le_bytes());
//! ```

use super::scalar::{Scalar, MAX_SCALAR_SIZE};
use super::sink::Sink;
use crate::error::{IoError, Result};
use std::fmt;
use std::marker::PhantomData;
use tracing::debug;

/// Position of a previously written scalar that may be corrected later.
///
/// The width is fixed by `T`; variable-width fields cannot be backpatched.
pub struct Backpatch<T> {
    offset: usize,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Scalar> Backpatch<T> {
    fn at(offset: usize) -> Self {
        Self {
            offset,
            _marker: PhantomData,
        }
    }

    /// Byte offset of the slot in the sink
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Width of the slot in bytes
    pub fn width(&self) -> usize {
        T::SIZE
    }
}

impl<T> Clone for Backpatch<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Backpatch<T> {}

impl<T> fmt::Debug for Backpatch<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Backpatch")
            .field("offset", &self.offset)
            .field("type", &std::any::type_name::<T>())
            .finish()
    }
}

/// Handle to a fixed-capacity array of `N` placeholder slots.
pub struct RangePatch<T, const N: usize> {
    offset: usize,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Scalar, const N: usize> RangePatch<T, N> {
    /// Byte offset of the first slot
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Handle for element `index`, or `None` when out of bounds
    pub fn slot(&self, index: usize) -> Option<Backpatch<T>> {
        (index < N).then(|| Backpatch::at(self.offset + index * T::SIZE))
    }

    pub const fn len(&self) -> usize {
        N
    }

    pub const fn is_empty(&self) -> bool {
        N == 0
    }
}

impl<T, const N: usize> Clone for RangePatch<T, N> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T, const N: usize> Copy for RangePatch<T, N> {}

impl<T, const N: usize> fmt::Debug for RangePatch<T, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RangePatch")
            .field("offset", &self.offset)
            .field("len", &N)
            .finish()
    }
}

/// Typed writer with sticky failure state
pub struct Writer<'s, S: Sink + ?Sized> {
    sink: &'s mut S,
    failed: bool,
}

impl<'s, S: Sink + ?Sized> Writer<'s, S> {
    pub fn new(sink: &'s mut S) -> Self {
        Self {
            sink,
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
            Err(IoError::WriteFailed {
                position: self.sink.position(),
            })
        } else {
            Ok(())
        }
    }

    /// Current write offset of the underlying sink
    pub fn position(&self) -> usize {
        self.sink.position()
    }

    /// Inspect the underlying sink.
    ///
    /// Read-only so that bytes cannot bypass the failed state or land outside
    /// a backpatch handle.
    pub fn sink(&self) -> &S {
        &*self.sink
    }

    fn fail(&mut self, reason: &str) {
        if !self.failed {
            debug!(position = self.sink.position(), reason, "Writer entered failed state");
        }
        self.failed = true;
    }

    fn put(&mut self, bytes: &[u8]) {
        if self.failed {
            return;
        }
        match self.sink.write(bytes) {
            Ok(n) if n == bytes.len() => {}
            Ok(_) => self.fail(crate::error::constants::ERR_SHORT_WRITE),
            Err(e) => self.fail(&e.to_string()),
        }
    }

    /// Encode one scalar
    pub fn write<T: Scalar>(&mut self, value: T) -> &mut Self {
        if self.failed {
            return self;
        }
        let mut scratch = [0u8; MAX_SCALAR_SIZE];
        value.encode(&mut scratch[..T::SIZE]);
        self.put(&scratch[..T::SIZE]);
        self
    }

    /// Encode a fixed-size sequence element by element, without a length prefix
    pub fn write_range<T: Scalar>(&mut self, values: &[T]) -> &mut Self {
        if self.failed {
            return self;
        }
        let mut encoded = vec![0u8; values.len() * T::SIZE];
        for (value, chunk) in values.iter().zip(encoded.chunks_exact_mut(T::SIZE)) {
            value.encode(chunk);
        }
        self.put(&encoded);
        self
    }

    /// Append raw bytes
    pub fn write_bytes(&mut self, bytes: &[u8]) -> &mut Self {
        self.put(bytes);
        self
    }

    /// Remember the current position as a `T` slot without writing anything
    pub fn capture<T: Scalar>(&self) -> Backpatch<T> {
        Backpatch::at(self.sink.position())
    }

    /// Write a `T::default()` placeholder and return its handle
    pub fn reserve<T: Scalar>(&mut self) -> Backpatch<T> {
        let patch = self.capture();
        self.write(T::default());
        patch
    }

    /// Write `N` default placeholders and return a handle to the array
    pub fn reserve_range<T: Scalar, const N: usize>(&mut self) -> RangePatch<T, N> {
        let patch = RangePatch {
            offset: self.sink.position(),
            _marker: PhantomData,
        };
        self.write_range(&[T::default(); N]);
        patch
    }

    /// Correct the slot behind `patch` with `value`.
    ///
    /// The write position is unchanged afterwards. An out-of-range handle is
    /// rejected without touching the writer state; sink failures during the
    /// overwrite mark the writer failed.
    pub fn commit<T: Scalar>(&mut self, patch: Backpatch<T>, value: T) -> Result<()> {
        if self.failed {
            return Err(IoError::WriterFailed);
        }
        let mut scratch = [0u8; MAX_SCALAR_SIZE];
        value.encode(&mut scratch[..T::SIZE]);

        match self.sink.overwrite(patch.offset, &scratch[..T::SIZE]) {
            Ok(n) if n == T::SIZE => Ok(()),
            Ok(_) => {
                self.fail(crate::error::constants::ERR_SHORT_WRITE);
                Err(IoError::WriteFailed {
                    position: patch.offset,
                })
            }
            Err(e @ IoError::BackpatchOutOfRange { .. }) => Err(e),
            Err(e) => {
                self.fail(&e.to_string());
                Err(e)
            }
        }
    }

    /// Commit every slot of `patch` from `values`
    pub fn commit_range<T: Scalar, const N: usize>(
        &mut self,
        patch: RangePatch<T, N>,
        values: &[T; N],
    ) -> Result<()> {
        for (index, value) in values.iter().enumerate() {
            if let Some(slot) = patch.slot(index) {
                self.commit(slot, *value)?;
            }
        }
        Ok(())
    }

    /// Flush the sink, only if the chain is still valid
    pub fn flush(&mut self) -> Result<()> {
        if self.failed {
            return Err(IoError::WriterFailed);
        }
        if let Err(e) = self.sink.flush() {
            self.fail(&e.to_string());
            return Err(e);
        }
        Ok(())
    }
}

impl<S: Sink + ?Sized> fmt::Debug for Writer<'_, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Writer")
            .field("position", &self.sink.position())
            .field("failed", &self.failed)
            .finish()
    }
}
