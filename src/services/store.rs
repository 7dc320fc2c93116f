//! src/services/store.rs
//!
//! Store client seam: the minimal capability pair the proxy needs from a
//! blob store — stat an object by key, open a byte stream by key. The
//! production implementation wraps Google Cloud Storage via the
//! `object_store` crate; tests substitute an in-memory fake.
//!
//! The error classification here is the most important one in the system:
//! "object does not exist" must stay distinguishable from every other
//! store failure, because the former is a user-facing 404 and the latter
//! a generic 500.

use async_trait::async_trait;
use bytes::Bytes;
use futures::{StreamExt, stream::BoxStream};
use object_store::{ObjectStore, gcp::GoogleCloudStorageBuilder, path::Path};
use thiserror::Error;

use crate::models::attrs::ObjectAttrs;

/// Chunked object content, paced by the consumer (backpressure comes from
/// whoever polls this stream).
pub type ByteStream = BoxStream<'static, Result<Bytes, StoreError>>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("object `{0}` does not exist")]
    NotFound(String),
    #[error("store request failed: {0}")]
    Transient(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Read-only blob store capabilities used by the request pipeline.
///
/// A single long-lived implementation is shared by all concurrent
/// requests; implementations must be safe for that.
#[async_trait]
pub trait StoreClient: Send + Sync {
    /// Fetch object metadata without touching content bytes.
    async fn stat(&self, key: &str) -> StoreResult<ObjectAttrs>;

    /// Open an incremental byte stream over the object content.
    async fn open(&self, key: &str) -> StoreResult<ByteStream>;
}

/// `StoreClient` backed by a GCS bucket.
pub struct GcsStore {
    inner: Box<dyn ObjectStore>,
}

impl GcsStore {
    /// Build a client for `bucket`, authenticating with the service
    /// account key file when one is given, otherwise with application
    /// default credentials picked up from the environment.
    pub fn new(bucket: &str, key_file: Option<&str>) -> anyhow::Result<Self> {
        let mut builder = GoogleCloudStorageBuilder::from_env().with_bucket_name(bucket);
        if let Some(path) = key_file {
            builder = builder.with_service_account_path(path);
        }

        let client = builder.build()?;
        tracing::info!(
            bucket,
            auth_method = if key_file.is_some() {
                "service_account_key"
            } else {
                "application_default_credentials"
            },
            "GCS client initialized"
        );

        Ok(Self {
            inner: Box::new(client),
        })
    }
}

#[async_trait]
impl StoreClient for GcsStore {
    async fn stat(&self, key: &str) -> StoreResult<ObjectAttrs> {
        let meta = self
            .inner
            .head(&Path::from(key))
            .await
            .map_err(|err| classify(key, err))?;

        let etag = meta
            .e_tag
            .clone()
            .unwrap_or_else(|| format!("\"{:x}-{:x}\"", meta.size, meta.last_modified.timestamp()));

        Ok(ObjectAttrs {
            etag,
            last_modified: meta.last_modified,
            size: meta.size,
        })
    }

    async fn open(&self, key: &str) -> StoreResult<ByteStream> {
        let owned_key = key.to_string();
        let result = self
            .inner
            .get(&Path::from(key))
            .await
            .map_err(|err| classify(key, err))?;

        Ok(result
            .into_stream()
            .map(move |chunk| chunk.map_err(|err| classify(&owned_key, err)))
            .boxed())
    }
}

/// Split "does not exist" off from every other store failure.
fn classify(key: &str, err: object_store::Error) -> StoreError {
    match err {
        object_store::Error::NotFound { .. } => StoreError::NotFound(key.to_string()),
        other => StoreError::Transient(other.to_string()),
    }
}
