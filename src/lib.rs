//! # binary-io
//!
//! Binary I/O core: byte sinks and sources, typed readers and writers with
//! sticky failure, and in-place backpatching of values only known after later
//! data has been produced.
//!
//! The same layer frames messages on a network connection
//! ([`network`]) and encodes fixed-layout file headers ([`tex`]).
//!
//! ## Quick Start
//! ```rust
//! use binary_io::{BufferSink, BufferSource, Reader, Writer};
//! use bytes::BytesMut;
//!
//! let mut buffer = BytesMut::new();
//! let mut sink = BufferSink::new(&mut buffer);
//! let mut writer = Writer::new(&mut sink);
//!
//! let length = writer.reserve::<u32>();
//! writer.write(0x1234u16).write_bytes(b"body");
//! writer.commit(length, 6).unwrap();
//! writer.finish().unwrap();
//!
//! let mut source = BufferSource::new(&buffer);
//! let mut reader = Reader::new(&mut source);
//! let (mut len, mut tag) = (0u32, 0u16);
//! reader.read(&mut len).read(&mut tag);
//! assert!(reader.is_ok());
//! assert_eq!((len, tag), (6, 0x1234));
//! ```
//!
//! ## Modules
//! - [`core`]: scalars, sinks, sources, writer, reader
//! - [`network`]: connection-owned send/receive buffers over a caller transport
//! - [`tex`]: htex texture file pre-header and v1.0 header codec
//! - [`config`], [`error`], [`utils`]: ambient configuration, errors, logging, metrics

pub mod config;
pub mod core;
pub mod error;
pub mod network;
pub mod tex;
pub mod utils;

pub use crate::core::reader::Reader;
pub use crate::core::scalar::Scalar;
pub use crate::core::sink::{BufferSink, Sink, StreamSink};
pub use crate::core::source::{BufferSource, Source, StreamSource};
pub use crate::core::writer::{Backpatch, RangePatch, Writer};
pub use crate::error::{IoError, Result};
