//! Transport layer for the AS108M driver
//!
//! The driver talks to the sensor through a byte stream it does not own:
//! opening the serial port (or a TCP serial bridge) is the application's
//! job. This crate defines the narrow contract the protocol engine needs
//! and a generic adapter over any tokio stream.

pub mod error;
pub mod stream;

pub use error::{Error, Result};
pub use stream::StreamTransport;

use async_trait::async_trait;
use bytes::BytesMut;
use std::time::Duration;

/// Byte transport to the sensor
#[async_trait]
pub trait Transport: Send {
    /// Send raw bytes
    async fn send(&mut self, data: &[u8]) -> Result<()>;

    /// Receive one burst of reply bytes
    ///
    /// Waits up to `timeout` for the first byte, then returns everything
    /// that arrives in the same burst. Yields [`Error::ReadTimeout`] when
    /// nothing arrives at all.
    async fn receive(&mut self, timeout: Duration) -> Result<BytesMut>;

    /// Discard any buffered input, returning the number of bytes dropped
    async fn purge(&mut self) -> Result<usize>;
}
