//! Delivery tracking for committed responses.
//!
//! Once status and headers are on the wire, a failing stream cannot change
//! the status code any more; the connection just closes. `MonitoredStream`
//! wraps the store's byte stream so that whatever happens after commit —
//! clean completion, upstream failure, client disconnect — is recorded as
//! a `DeliveryOutcome` when the body is dropped.

use std::{
    pin::Pin,
    task::{Context, Poll},
    time::Instant,
};

use bytes::Bytes;
use futures::{Stream, StreamExt};

use crate::{
    models::delivery::DeliveryOutcome,
    services::store::{ByteStream, StoreError},
};

/// Byte-counting passthrough over a store stream.
///
/// Copying stays incremental: chunks flow through as the client accepts
/// them, so object size never translates into proxy memory. Dropping the
/// wrapper before the stream completed (client went away, or upstream
/// failed) is what marks the delivery interrupted.
pub struct MonitoredStream {
    inner: ByteStream,
    key: String,
    expected: u64,
    written: u64,
    completed: bool,
    started: Instant,
}

impl MonitoredStream {
    pub fn new(inner: ByteStream, key: String, expected: u64, started: Instant) -> Self {
        Self {
            inner,
            key,
            expected,
            written: 0,
            completed: false,
            started,
        }
    }

    /// Terminal state as of now. `Delivered` only when the stream ran to
    /// its end and the byte count matches the announced `Content-Length`.
    pub fn outcome(&self) -> DeliveryOutcome {
        if self.completed && self.written == self.expected {
            DeliveryOutcome::Delivered {
                bytes_written: self.written,
            }
        } else {
            DeliveryOutcome::Interrupted {
                bytes_written: self.written,
            }
        }
    }
}

impl Stream for MonitoredStream {
    type Item = Result<Bytes, StoreError>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        match this.inner.poll_next_unpin(cx) {
            Poll::Ready(Some(Ok(chunk))) => {
                this.written += chunk.len() as u64;
                Poll::Ready(Some(Ok(chunk)))
            }
            Poll::Ready(Some(Err(err))) => {
                tracing::error!(
                    key = %this.key,
                    bytes_written = this.written,
                    error = %err,
                    "stream failed after response was committed"
                );
                Poll::Ready(Some(Err(err)))
            }
            Poll::Ready(None) => {
                this.completed = true;
                Poll::Ready(None)
            }
            Poll::Pending => Poll::Pending,
        }
    }
}

impl Drop for MonitoredStream {
    fn drop(&mut self) {
        match self.outcome() {
            DeliveryOutcome::Delivered { bytes_written } => {
                tracing::info!(
                    key = %self.key,
                    bytes_served = bytes_written,
                    response_time = ?self.started.elapsed(),
                    "object delivered"
                );
            }
            DeliveryOutcome::Interrupted { bytes_written } => {
                tracing::warn!(
                    key = %self.key,
                    bytes_written,
                    expected = self.expected,
                    response_time = ?self.started.elapsed(),
                    "delivery interrupted, connection closed"
                );
            }
            DeliveryOutcome::NotModified => {}
        }
    }
}
