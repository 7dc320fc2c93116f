//! Object metadata snapshot returned by the store's stat operation.

use chrono::{DateTime, Utc};

/// Read-only metadata for a single stored object, fetched once per request.
///
/// The proxy never mutates these; they feed conditional evaluation and the
/// response headers (`ETag`, `Last-Modified`, `Content-Length`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectAttrs {
    /// Opaque validator identifying this object version, served verbatim.
    pub etag: String,

    /// Time the object content was last replaced.
    pub last_modified: DateTime<Utc>,

    /// Object size in bytes; becomes `Content-Length`.
    pub size: u64,
}
