//! # Connection
//!
//! Owner of a transport plus its outgoing and incoming byte buffers.
//!
//! Outgoing messages are built in the send buffer through a
//! [`SendSink`] and only reach the transport on flush, so a message can be
//! backpatched freely before anything is observable by the peer. Incoming bytes
//! are appended with [`Connection::receive`] and decoded through a
//! [`ReceiveSource`], which only releases what a successful read consumed.

use super::receive_source::ReceiveSource;
use super::send_sink::SendSink;
use crate::config::ConnectionConfig;
use crate::core::writer::Writer;
use crate::error::Result;
use crate::utils::metrics::ConnectionMetrics;
use bytes::BytesMut;
use tracing::{debug, instrument, trace};

/// The socket layer behind a connection.
///
/// `send` must either accept all of `data` or return an error.
pub trait Transport {
    fn send(&mut self, data: &[u8]) -> Result<()>;
}

impl<T: Transport + ?Sized> Transport for &mut T {
    fn send(&mut self, data: &[u8]) -> Result<()> {
        (**self).send(data)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn send(&mut self, data: &[u8]) -> Result<()> {
        (**self).send(data)
    }
}

/// One logical connection: transport, send buffer, receive buffer
#[derive(Debug)]
pub struct Connection<T> {
    transport: T,
    pub(super) send_buffer: BytesMut,
    pub(super) receive_buffer: BytesMut,
    pub(super) max_send_buffer: usize,
    pub(super) metrics: ConnectionMetrics,
}

impl<T: Transport> Connection<T> {
    /// Create a connection with default buffer settings
    pub fn new(transport: T) -> Self {
        Self::with_config(transport, &ConnectionConfig::default())
    }

    /// Create a connection sized by `config`
    pub fn with_config(transport: T, config: &ConnectionConfig) -> Self {
        Self {
            transport,
            send_buffer: BytesMut::with_capacity(config.initial_send_capacity),
            receive_buffer: BytesMut::with_capacity(config.initial_receive_capacity),
            max_send_buffer: config.max_send_buffer,
            metrics: ConnectionMetrics::new(),
        }
    }

    /// Start building an outgoing message.
    ///
    /// The send buffer moves into the returned sink until it is dropped.
    pub fn send_sink(&mut self) -> SendSink<'_, T> {
        SendSink::new(self)
    }

    /// Build one message with a [`Writer`] and transmit it.
    ///
    /// Nothing is transmitted unless both `build` and the writer chain succeed.
    #[instrument(skip(self, build))]
    pub fn send_with<F>(&mut self, build: F) -> Result<()>
    where
        F: FnOnce(&mut Writer<'_, SendSink<'_, T>>) -> Result<()>,
    {
        let mut sink = self.send_sink();
        let mut writer = Writer::new(&mut sink);
        build(&mut writer)?;
        writer.finish()?;
        writer.flush()
    }

    /// Hand `data` to the transport, updating counters
    pub(super) fn transmit(&mut self, data: &[u8]) -> Result<()> {
        match self.transport.send(data) {
            Ok(()) => {
                trace!(bytes = data.len(), "Transmitted send buffer");
                self.metrics.message_sent(data.len() as u64);
                Ok(())
            }
            Err(e) => {
                debug!(error = %e, bytes = data.len(), "Transport rejected send buffer");
                self.metrics.send_error();
                Err(e)
            }
        }
    }

    /// Append bytes delivered by the transport
    pub fn receive(&mut self, data: &[u8]) {
        self.receive_buffer.extend_from_slice(data);
        self.metrics.received(data.len() as u64);
    }

    /// Start decoding buffered incoming bytes
    pub fn receive_source(&mut self) -> ReceiveSource<'_, T> {
        ReceiveSource::new(self)
    }

    /// Incoming bytes not yet consumed
    pub fn pending_receive(&self) -> usize {
        self.receive_buffer.len()
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    pub fn into_transport(self) -> T {
        self.transport
    }

    pub fn metrics(&self) -> &ConnectionMetrics {
        &self.metrics
    }
}
