//! # Core I/O Components
//!
//! Byte sinks and sources, plus the typed writer/reader layer built on them.
//!
//! This module decouples *how* values are serialized from *where* the bytes go.
//! Format codecs and the connection layer only ever talk to [`writer::Writer`]
//! and [`reader::Reader`]; what backs them is decided by whoever owns the
//! [`sink::Sink`] or [`source::Source`].
//!
//! ## Components
//! - **Scalar**: little-endian encoding of fixed-width values
//! - **Sink / Source**: byte-level traits with buffer and stream implementations
//! - **Writer / Reader**: sticky-failure chains, backpatch handles
//!
//! ## Wire Format
//! All multi-byte scalars are little-endian. Fixed-capacity arrays are written
//! element by element with no length prefix.
//!
//! ## Threading
//! Nothing here is synchronized. A writer or reader is built for one message or
//! one file section and dropped afterwards.

pub mod reader;
pub mod scalar;
pub mod sink;
pub mod source;
pub mod writer;
