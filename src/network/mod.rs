//! # Network Integration
//!
//! Connection-backed sink and source for building and decoding messages.
//!
//! The socket itself is not part of this crate: callers provide a
//! [`connection::Transport`] and feed received bytes into the
//! [`connection::Connection`]. Message dispatch and session handling belong to
//! the layers above.
//!
//! ## Send path
//! ```text
//! Writer -> SendSink (owns send buffer) -> flush -> Transport::send
//! ```
//! Nothing reaches the transport before `flush`, which makes backpatching a
//! length or offset field safe: the bytes being corrected are still local.
//!
//! ## Receive path
//! ```text
//! Transport -> Connection::receive -> ReceiveSource -> Reader -> consume
//! ```

pub mod connection;
pub mod receive_source;
pub mod send_sink;

pub use connection::{Connection, Transport};
pub use receive_source::ReceiveSource;
pub use send_sink::SendSink;
