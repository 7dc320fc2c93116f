//! Terminal state of a single proxied request, recorded for observability.

/// How a request ultimately ended.
///
/// `Interrupted` covers both upstream stream failures and client
/// disconnects after the response was committed; by then the status line
/// has already been sent, so the only remedy is closing the connection
/// and logging what happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryOutcome {
    /// Conditional request satisfied; 304 sent, no body.
    NotModified,
    /// Full body streamed to the client.
    Delivered { bytes_written: u64 },
    /// Stream ended early after headers were committed.
    Interrupted { bytes_written: u64 },
}
