//! # Error Types
//!
//! Error handling for the binary I/O core.
//!
//! Two classes of failure flow through this crate:
//! - **Transport/exhaustion failures**: short reads, rejected writes. Inside a
//!   [`Reader`](crate::core::reader::Reader) or [`Writer`](crate::core::writer::Writer)
//!   chain these are carried as a sticky flag and only become an [`IoError`] when the
//!   caller asks for the aggregate result (`finish()`).
//! - **Semantic failures**: signature/version mismatches, out-of-range backpatches,
//!   invalid configuration. These are returned directly by the function that
//!   detected them.
//!
//! Nothing in this crate panics or retries on its own; the caller decides.
//!
//! ## Example Usage
//! ```rust
//! use binary_io::core::sink::BufferSink;
//! use binary_io::core::writer::Writer;
//! use binary_io::error::Result;
//! use bytes::BytesMut;
//!
//! fn encode(buffer: &mut BytesMut) -> Result<()> {
//!     let mut sink = BufferSink::new(buffer);
//!     let mut writer = Writer::new(&mut sink);
//!     writer.write(1u8).write(0x1234u16);
//!     writer.finish()
//! }
//!
//! let mut buffer = BytesMut::new();
//! encode(&mut buffer).unwrap();
//! assert_eq!(&buffer[..], &[0x01, 0x34, 0x12]);
//! ```

use std::io;
use thiserror::Error;

/// Error message constants to reduce allocations in error paths.
pub mod constants {
    /// Sink errors
    pub const ERR_SHORT_WRITE: &str = "Sink accepted fewer bytes than requested";

    /// Connection errors
    pub const ERR_TRANSPORT_CLOSED: &str = "Transport closed";
}

/// IoError is the primary error type for all sink, source and codec operations
#[derive(Error, Debug)]
pub enum IoError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Write chain failed at position {position}")]
    WriteFailed { position: usize },

    #[error("Read chain failed at position {position}")]
    ReadFailed { position: usize },

    #[error("Writer is in failed state")]
    WriterFailed,

    #[error("Backpatch of {width} bytes at offset {offset} exceeds written length {end}")]
    BackpatchOutOfRange {
        offset: usize,
        width: usize,
        end: usize,
    },

    #[error("Source does not support random access")]
    Unseekable,

    #[error("Seek to {position} is past the end of the source ({size} bytes)")]
    SeekOutOfRange { position: usize, size: usize },

    #[error("Invalid signature: expected {expected:#010x}, found {found:#010x}")]
    InvalidSignature { expected: u32, found: u32 },

    #[error("Unsupported format version: {0:#06x}")]
    UnsupportedVersion(u32),

    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    #[error("Send buffer overflow: {requested} bytes requested, limit is {limit}")]
    SendBufferOverflow { requested: usize, limit: usize },

    #[error("Transport error: {0}")]
    TransportError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Type alias for Results using IoError
pub type Result<T> = std::result::Result<T, IoError>;
