//! Generic stream transport
//!
//! Wraps any `AsyncRead + AsyncWrite` byte stream — a serial port handle,
//! a TCP serial bridge, or an in-memory duplex in tests.

use std::time::Duration;

use async_trait::async_trait;
use bytes::BytesMut;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::time::{sleep, timeout};
use tracing::trace;

use as108m_core::constants::SETTLE_DELAY;

use crate::{Error, Result, Transport};

/// Transport over a tokio byte stream
///
/// `receive` implements the sensor's reply timing: block until the first
/// byte of the burst or the caller's timeout, sleep a short settle delay so
/// the rest of the frame can arrive, then drain whatever is readable in one
/// shot. There is no loop to accumulate a complete frame across bursts —
/// a transport slower than the settle delay needs a second receive call.
pub struct StreamTransport<S> {
    stream: S,
    settle_delay: Duration,
}

impl<S> StreamTransport<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    /// Wrap an already-open stream.
    pub fn new(stream: S) -> Self {
        Self {
            stream,
            settle_delay: SETTLE_DELAY,
        }
    }

    /// Set the settle delay between the first byte and the drain.
    pub fn with_settle_delay(mut self, settle_delay: Duration) -> Self {
        self.settle_delay = settle_delay;
        self
    }

    /// Read whatever is immediately available, without waiting.
    async fn drain_ready(&mut self, buf: &mut BytesMut) -> Result<usize> {
        let mut drained = 0;
        loop {
            match timeout(Duration::ZERO, self.stream.read_buf(buf)).await {
                Ok(Ok(0)) => break, // EOF; whatever we have is the burst
                Ok(Ok(n)) => drained += n,
                Ok(Err(e)) => return Err(e.into()),
                Err(_) => break, // nothing more buffered right now
            }
        }
        Ok(drained)
    }
}

#[async_trait]
impl<S> Transport for StreamTransport<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    async fn send(&mut self, data: &[u8]) -> Result<()> {
        trace!("sending {} bytes: {:02X?}", data.len(), &data[..data.len().min(16)]);

        self.stream.write_all(data).await?;
        self.stream.flush().await?;

        Ok(())
    }

    async fn receive(&mut self, timeout_duration: Duration) -> Result<BytesMut> {
        let mut buf = BytesMut::with_capacity(64);

        // Block until the burst starts or the caller's timeout elapses
        let n = timeout(timeout_duration, self.stream.read_buf(&mut buf))
            .await
            .map_err(|_| Error::ReadTimeout)??;

        if n == 0 {
            return Err(Error::StreamClosed);
        }

        // Let the rest of the frame arrive, then take it all at once
        sleep(self.settle_delay).await;
        self.drain_ready(&mut buf).await?;

        trace!("received {} bytes: {:02X?}", buf.len(), &buf[..buf.len().min(16)]);

        Ok(buf)
    }

    async fn purge(&mut self) -> Result<usize> {
        let mut buf = BytesMut::with_capacity(64);
        let dropped = self.drain_ready(&mut buf).await?;

        if dropped > 0 {
            trace!("purged {} stale bytes", dropped);
        }

        Ok(dropped)
    }
}
